use chrono::{Duration, NaiveDate};

//
// ─── STREAK TRACKER ────────────────────────────────────────────────────────────
//

/// Result of advancing a streak on a day of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current: u32,
    pub longest: u32,
    pub last_active: NaiveDate,
}

/// Advances a consecutive-day streak given today's activity.
///
/// Rules, evaluated in order:
/// 1. last active yesterday — the streak continues, increment it.
/// 2. last active neither yesterday nor today (including never) — fresh
///    start, reset to 1.
/// 3. last active today — repeat activity on the same day, unchanged.
///
/// `longest` is raised to match `current` when exceeded, and `last_active`
/// always becomes `today`. Inactivity is not handled here: a user who never
/// comes back is caught by the scheduled sweep, which force-clears stale
/// streaks.
#[must_use]
pub fn advance_streak(
    last_active: Option<NaiveDate>,
    current: u32,
    longest: u32,
    today: NaiveDate,
) -> StreakUpdate {
    let yesterday = today - Duration::days(1);

    let current = if last_active == Some(yesterday) {
        current.saturating_add(1)
    } else if last_active != Some(today) {
        1
    } else {
        current
    };

    StreakUpdate {
        current,
        longest: longest.max(current),
        last_active: today,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
