// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaderboard assembly over the session store.

use chrono::{DateTime, Utc};

use vigil_core::types::Actor;
use vigil_core::{SessionStore, VigilError};

use crate::engine::elapsed_days;

/// One ranked leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based rank.
    pub rank: usize,
    pub display_name: String,
    /// Current elapsed days, computed at query time.
    pub days: i64,
}

/// Rank the `n` longest-running current streaks.
///
/// The store returns actors ordered by oldest streak-start; day counts are
/// recomputed against `now` on every call and never stored, so the board is
/// always fresh.
pub async fn leaderboard(
    store: &dyn SessionStore,
    n: i64,
    now: DateTime<Utc>,
) -> Result<Vec<LeaderboardRow>, VigilError> {
    let actors = store.oldest_streaks(n).await?;
    Ok(annotate(&actors, now))
}

/// Annotate already-ranked actors with their current day counts.
pub fn annotate(actors: &[Actor], now: DateTime<Utc>) -> Vec<LeaderboardRow> {
    actors
        .iter()
        .enumerate()
        .map(|(i, actor)| LeaderboardRow {
            rank: i + 1,
            display_name: actor
                .display_name
                .clone()
                .unwrap_or_else(|| actor.id.0.clone()),
            days: elapsed_days(actor.streak_start, now),
        })
        .collect()
}
