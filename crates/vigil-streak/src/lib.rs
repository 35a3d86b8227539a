// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streak and relapse engine for the Vigil streak bot.
//!
//! Streak length is duration-based: whole days of absolute elapsed
//! wall-clock time since the last relapse, not midnight crossings. The
//! engine is pure; atomic application of a planned relapse belongs to the
//! session store.

pub mod engine;
pub mod leaderboard;

pub use engine::{elapsed_days, plan_relapse};
pub use leaderboard::{LeaderboardRow, annotate, leaderboard};
