// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure streak arithmetic and relapse planning.

use chrono::{DateTime, Utc};

use vigil_core::types::{Actor, RelapseReason, RelapseRecord, RelapseUpdate};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days elapsed between `streak_start` and `now`.
///
/// Duration-based truncation of absolute wall-clock time, NOT calendar-day
/// boundaries: a streak started at 23:00 yesterday is 0 days at 10:00 today.
pub fn elapsed_days(streak_start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - streak_start).num_seconds().abs() / SECONDS_PER_DAY
}

/// Plan a relapse for `actor` at `now`.
///
/// The best-streak ratchet never decreases: the new best is the larger of
/// the stored best and the streak that just ended. The streak restarts at
/// `now` and the reason is recorded with the same timestamp. The plan is
/// applied atomically by the session store.
pub fn plan_relapse(actor: &Actor, reason: RelapseReason, now: DateTime<Utc>) -> RelapseUpdate {
    let ended = elapsed_days(actor.streak_start, now);
    RelapseUpdate {
        new_best: actor.best_streak.max(ended),
        new_start: now,
        record: RelapseRecord {
            occurred_at: now,
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use vigil_core::types::{ActorId, WizardState};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn actor(streak_start: DateTime<Utc>, best_streak: i64) -> Actor {
        Actor {
            id: ActorId("u-1".into()),
            display_name: Some("Sam".into()),
            streak_start,
            best_streak,
            wizard: WizardState::default(),
        }
    }

    #[test]
    fn zero_days_at_streak_start() {
        assert_eq!(elapsed_days(start(), start()), 0);
    }

    #[test]
    fn truncates_to_whole_days_not_calendar_boundaries() {
        let late_evening = Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap();
        let next_morning = Utc.with_ymd_and_hms(2026, 1, 2, 10, 0, 0).unwrap();
        // Crosses midnight but only 11 hours have elapsed.
        assert_eq!(elapsed_days(late_evening, next_morning), 0);

        let full_day_later = Utc.with_ymd_and_hms(2026, 1, 2, 23, 0, 0).unwrap();
        assert_eq!(elapsed_days(late_evening, full_day_later), 1);
    }

    #[test]
    fn ratchet_raises_best_on_longer_streak() {
        let now = Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap(); // 10 days
        let update = plan_relapse(&actor(start(), 4), RelapseReason::Urge, now);
        assert_eq!(update.new_best, 10);
        assert_eq!(update.new_start, now);
        assert_eq!(update.record.occurred_at, now);
    }

    #[test]
    fn ratchet_never_decreases_best() {
        let now = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap(); // 2 days
        let update = plan_relapse(&actor(start(), 30), RelapseReason::Boredom, now);
        assert_eq!(update.new_best, 30);
    }

    proptest! {
        #[test]
        fn elapsed_days_is_monotonic_in_now(a in 0i64..4_000_000, b in 0i64..4_000_000) {
            let (earlier, later) = (a.min(b), a.max(b));
            let t0 = start();
            let at = |offset: i64| t0 + chrono::Duration::seconds(offset);
            prop_assert!(elapsed_days(t0, at(earlier)) <= elapsed_days(t0, at(later)));
        }

        #[test]
        fn elapsed_days_is_never_negative(offset in -4_000_000i64..4_000_000) {
            let t0 = start();
            let now = t0 + chrono::Duration::seconds(offset);
            prop_assert!(elapsed_days(t0, now) >= 0);
        }
    }
}
