// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dedup ledger operations.
//!
//! The ledger's primary key is the at-most-once mechanism: the insert either
//! succeeds (first sight) or fails with a uniqueness violation (duplicate).
//! There is no read-then-write window.

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use vigil_core::VigilError;
use vigil_core::types::EventId;

use crate::database::{Database, fmt_ts, is_unique_violation, map_tr_err};

/// Record an event id, purging entries older than `retention` in the same
/// write call (SQLite has no TTL index; expiry is piggybacked on inserts).
///
/// Returns [`VigilError::DuplicateEvent`] when the id is already present.
pub async fn note_event(
    db: &Database,
    id: &EventId,
    retention: std::time::Duration,
    now: DateTime<Utc>,
) -> Result<(), VigilError> {
    let event_id = id.0.clone();
    let event_id_for_err = id.0.clone();
    let cutoff = fmt_ts(now - Duration::from_std(retention).unwrap_or(Duration::hours(1)));
    let received_at = fmt_ts(now);

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM processed_events WHERE received_at < ?1",
                params![cutoff],
            )?;
            tx.execute(
                "INSERT INTO processed_events (event_id, received_at) VALUES (?1, ?2)",
                params![event_id, received_at],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                VigilError::DuplicateEvent {
                    event_id: event_id_for_err,
                }
            } else {
                map_tr_err(e)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration as StdDuration;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("dedup.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn at(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, min, 0).unwrap()
    }

    #[tokio::test]
    async fn second_insert_is_a_distinguishable_duplicate() {
        let (db, _dir) = setup_db().await;
        let id = EventId("update-100".into());
        let retention = StdDuration::from_secs(3600);

        note_event(&db, &id, retention, at(0)).await.unwrap();

        let err = note_event(&db, &id, retention, at(1)).await.unwrap_err();
        assert!(err.is_duplicate(), "expected DuplicateEvent, got {err}");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn expired_entries_are_purged_on_insert() {
        let (db, _dir) = setup_db().await;
        let retention = StdDuration::from_secs(600); // 10 minutes

        note_event(&db, &EventId("old".into()), retention, at(0))
            .await
            .unwrap();

        // 20 minutes later the old entry falls outside the window and is
        // purged by the next insert, so re-noting it succeeds again.
        note_event(&db, &EventId("fresh".into()), retention, at(20))
            .await
            .unwrap();
        note_event(&db, &EventId("old".into()), retention, at(21))
            .await
            .unwrap();

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn distinct_ids_always_insert() {
        let (db, _dir) = setup_db().await;
        let retention = StdDuration::from_secs(3600);

        for i in 0..5 {
            note_event(&db, &EventId(format!("update-{i}")), retention, at(0))
                .await
                .unwrap();
        }

        db.close().await.unwrap();
    }
}
