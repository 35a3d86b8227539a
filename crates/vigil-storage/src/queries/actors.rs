// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Actor CRUD, relapse application, and leaderboard queries.

use chrono::{DateTime, Utc};
use rusqlite::{Row, params};
use vigil_core::VigilError;
use vigil_core::types::{Actor, ActorId, RelapseRecord, RelapseUpdate, WizardState};

use crate::database::{Database, fmt_ts, map_tr_err, parse_ts};

const ACTOR_COLUMNS: &str = "id, display_name, streak_start, best_streak, wizard_state";

fn actor_from_row(row: &Row<'_>) -> Result<Actor, rusqlite::Error> {
    let streak_start_raw: String = row.get(2)?;
    let wizard_raw: String = row.get(4)?;
    let wizard: WizardState = serde_json::from_str(&wizard_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Actor {
        id: ActorId(row.get(0)?),
        display_name: row.get(1)?,
        streak_start: parse_ts(2, &streak_start_raw)?,
        best_streak: row.get(3)?,
        wizard,
    })
}

/// Look up an actor by identity.
pub async fn get_actor(db: &Database, id: &ActorId) -> Result<Option<Actor>, VigilError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {ACTOR_COLUMNS} FROM actors WHERE id = ?1"))?;
            match stmt.query_row(params![id], actor_from_row) {
                Ok(actor) => Ok(Some(actor)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Create the actor if absent, refreshing the display name either way.
///
/// A new actor starts its streak at `now` with best-streak 0 and no wizard
/// state. Returns the stored record.
pub async fn upsert_actor(
    db: &Database,
    id: &ActorId,
    display_name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Actor, VigilError> {
    let id_owned = id.0.clone();
    let name = display_name.map(|s| s.to_string());
    let ts = fmt_ts(now);

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO actors (id, display_name, streak_start, best_streak, wizard_state, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 0, '{}', ?4, ?4)
                 ON CONFLICT (id) DO UPDATE SET
                     display_name = COALESCE(excluded.display_name, actors.display_name),
                     updated_at = excluded.updated_at",
                params![id_owned, name, ts, ts],
            )?;

            let mut stmt = conn
                .prepare(&format!("SELECT {ACTOR_COLUMNS} FROM actors WHERE id = ?1"))?;
            stmt.query_row(params![id_owned], actor_from_row)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the actor's wizard state wholesale, creating the actor if absent.
pub async fn set_wizard_state(
    db: &Database,
    id: &ActorId,
    state: &WizardState,
    now: DateTime<Utc>,
) -> Result<(), VigilError> {
    let id = id.0.clone();
    let state_json = serde_json::to_string(state).map_err(|e| VigilError::Storage {
        source: Box::new(e),
    })?;
    let ts = fmt_ts(now);

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO actors (id, streak_start, best_streak, wizard_state, created_at, updated_at)
                 VALUES (?1, ?3, 0, ?2, ?3, ?3)
                 ON CONFLICT (id) DO UPDATE SET
                     wizard_state = excluded.wizard_state,
                     updated_at = excluded.updated_at",
                params![id, state_json, ts],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a planned relapse as one transaction: ratchet best-streak, reset
/// streak-start, append the history record.
///
/// Fails with no-rows if the actor does not exist; nothing is written.
pub async fn apply_relapse(
    db: &Database,
    id: &ActorId,
    update: &RelapseUpdate,
) -> Result<(), VigilError> {
    let id = id.0.clone();
    let new_best = update.new_best;
    let new_start = fmt_ts(update.new_start);
    let occurred_at = fmt_ts(update.record.occurred_at);
    let reason = update.record.reason.to_string();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE actors SET best_streak = ?1, streak_start = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![new_best, new_start, occurred_at, id],
            )?;
            if changed == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }

            tx.execute(
                "INSERT INTO relapses (actor_id, occurred_at, reason) VALUES (?1, ?2, ?3)",
                params![id, occurred_at, reason],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The actor's relapse history, oldest first.
pub async fn relapse_history(
    db: &Database,
    id: &ActorId,
) -> Result<Vec<RelapseRecord>, VigilError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT occurred_at, reason FROM relapses WHERE actor_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![id], |row| {
                let occurred_raw: String = row.get(0)?;
                let reason_raw: String = row.get(1)?;
                Ok(RelapseRecord {
                    occurred_at: parse_ts(0, &occurred_raw)?,
                    reason: reason_raw.parse().map_err(|_| {
                        rusqlite::Error::FromSqlConversionFailure(
                            1,
                            rusqlite::types::Type::Text,
                            format!("unknown relapse reason: {reason_raw}").into(),
                        )
                    })?,
                })
            })?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}

/// The `n` actors with the oldest streak-start, ascending; row id breaks ties
/// stably.
pub async fn oldest_streaks(db: &Database, n: i64) -> Result<Vec<Actor>, VigilError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACTOR_COLUMNS} FROM actors
                 ORDER BY streak_start ASC, id ASC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![n], actor_from_row)?;

            let mut actors = Vec::new();
            for row in rows {
                actors.push(row?);
            }
            Ok(actors)
        })
        .await
        .map_err(map_tr_err)
}

/// Total number of known actors.
pub async fn actor_count(db: &Database) -> Result<i64, VigilError> {
    db.connection()
        .call(|conn| {
            let n = conn.query_row("SELECT COUNT(*) FROM actors", [], |row| row.get(0))?;
            Ok(n)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;
    use vigil_core::types::{RelapseReason, WizardStep};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("actors.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, secs).unwrap()
    }

    #[tokio::test]
    async fn upsert_creates_then_refreshes_name_only() {
        let (db, _dir) = setup_db().await;
        let id = ActorId("u-1".into());

        let created = upsert_actor(&db, &id, Some("Sam"), at(0)).await.unwrap();
        assert_eq!(created.display_name.as_deref(), Some("Sam"));
        assert_eq!(created.best_streak, 0);
        assert_eq!(created.streak_start, at(0));

        // Re-upsert later: name refreshes, streak start does not move.
        let again = upsert_actor(&db, &id, Some("Samuel"), at(30)).await.unwrap();
        assert_eq!(again.display_name.as_deref(), Some("Samuel"));
        assert_eq!(again.streak_start, at(0));

        // A None name keeps the existing one.
        let kept = upsert_actor(&db, &id, None, at(40)).await.unwrap();
        assert_eq!(kept.display_name.as_deref(), Some("Samuel"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn wizard_state_round_trips_and_upserts_unknown_actor() {
        let (db, _dir) = setup_db().await;
        let id = ActorId("admin-1".into());

        let state = WizardState::at(WizardStep::AwaitingChannelName);
        set_wizard_state(&db, &id, &state, at(0)).await.unwrap();

        let actor = get_actor(&db, &id).await.unwrap().unwrap();
        assert_eq!(actor.wizard, state);

        set_wizard_state(&db, &id, &WizardState::default(), at(1))
            .await
            .unwrap();
        let actor = get_actor(&db, &id).await.unwrap().unwrap();
        assert!(!actor.wizard.is_active());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn apply_relapse_commits_all_three_mutations() {
        let (db, _dir) = setup_db().await;
        let id = ActorId("u-2".into());
        upsert_actor(&db, &id, None, at(0)).await.unwrap();

        let update = RelapseUpdate {
            new_best: 12,
            new_start: at(50),
            record: RelapseRecord {
                occurred_at: at(50),
                reason: RelapseReason::Stress,
            },
        };
        apply_relapse(&db, &id, &update).await.unwrap();

        let actor = get_actor(&db, &id).await.unwrap().unwrap();
        assert_eq!(actor.best_streak, 12);
        assert_eq!(actor.streak_start, at(50));

        let history = relapse_history(&db, &id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reason, RelapseReason::Stress);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn apply_relapse_to_unknown_actor_writes_nothing() {
        let (db, _dir) = setup_db().await;
        let update = RelapseUpdate {
            new_best: 1,
            new_start: at(0),
            record: RelapseRecord {
                occurred_at: at(0),
                reason: RelapseReason::Urge,
            },
        };

        let result = apply_relapse(&db, &ActorId("ghost".into()), &update).await;
        assert!(result.is_err());

        let history = relapse_history(&db, &ActorId("ghost".into())).await.unwrap();
        assert!(history.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn oldest_streaks_orders_ascending() {
        let (db, _dir) = setup_db().await;

        upsert_actor(&db, &ActorId("c".into()), None, at(30)).await.unwrap();
        upsert_actor(&db, &ActorId("a".into()), None, at(10)).await.unwrap();
        upsert_actor(&db, &ActorId("b".into()), None, at(20)).await.unwrap();

        let top = oldest_streaks(&db, 2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id.0, "a");
        assert_eq!(top[1].id.0, "b");

        assert_eq!(actor_count(&db).await.unwrap(), 3);

        db.close().await.unwrap();
    }
}
