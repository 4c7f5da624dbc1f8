use chrono::NaiveDate;

use crate::level::level_for;
use crate::model::ids::UserId;
use crate::streak::{StreakUpdate, advance_streak};

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// Outcome of adding XP to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub leveled_up: bool,
    pub new_level: u32,
}

/// Per-user progression aggregate: XP, cached level, and day streaks.
///
/// `current_level` is always the level derived from `total_xp`; both
/// constructors and [`Profile::add_xp`] maintain that invariant, and
/// `longest_streak` never drops below `current_streak`. Only the progression
/// services and the scheduled streak sweep mutate a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    user_id: UserId,
    display_name: String,
    total_xp: u32,
    current_level: u32,
    current_streak: u32,
    longest_streak: u32,
    last_active_date: Option<NaiveDate>,
}

impl Profile {
    /// Creates a fresh profile with no XP and no activity history.
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            total_xp: 0,
            current_level: level_for(0).level,
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
        }
    }

    /// Rehydrates a profile from persisted storage.
    ///
    /// The cached level is re-derived from `total_xp` rather than trusted
    /// from storage, so the level invariant cannot drift.
    #[must_use]
    pub fn from_persisted(
        user_id: UserId,
        display_name: impl Into<String>,
        total_xp: u32,
        current_streak: u32,
        longest_streak: u32,
        last_active_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            total_xp,
            current_level: level_for(total_xp).level,
            current_streak,
            longest_streak: longest_streak.max(current_streak),
            last_active_date,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    #[must_use]
    pub fn last_active_date(&self) -> Option<NaiveDate> {
        self.last_active_date
    }

    /// Adds XP and recomputes the cached level.
    ///
    /// Reports whether the addition crossed a level threshold.
    pub fn add_xp(&mut self, amount: u32) -> XpAward {
        let old_level = self.current_level;
        self.total_xp = self.total_xp.saturating_add(amount);
        self.current_level = level_for(self.total_xp).level;

        XpAward {
            leveled_up: self.current_level > old_level,
            new_level: self.current_level,
        }
    }

    /// Records qualifying activity for `today`, advancing the streak.
    pub fn record_activity(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = advance_streak(
            self.last_active_date,
            self.current_streak,
            self.longest_streak,
            today,
        );
        self.current_streak = update.current;
        self.longest_streak = update.longest;
        self.last_active_date = Some(update.last_active);
        update
    }

    /// Forces the current streak to zero.
    ///
    /// Used only by the scheduled sweep for users who went inactive; leaves
    /// `longest_streak` and `last_active_date` untouched.
    pub fn clear_streak(&mut self) {
        self.current_streak = 0;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_today;
    use chrono::Duration;

    fn build_profile() -> Profile {
        Profile::new(UserId::generate(), "Dev")
    }

    #[test]
    fn fresh_profile_starts_at_level_one() {
        let profile = build_profile();
        assert_eq!(profile.total_xp(), 0);
        assert_eq!(profile.current_level(), 1);
        assert_eq!(profile.last_active_date(), None);
    }

    #[test]
    fn add_xp_reports_level_up() {
        let mut profile = build_profile();
        let award = profile.add_xp(450);
        assert!(!award.leveled_up);
        assert_eq!(award.new_level, 1);

        let award = profile.add_xp(100);
        assert!(award.leveled_up);
        assert_eq!(award.new_level, 2);
        assert_eq!(profile.total_xp(), 550);
    }

    #[test]
    fn add_xp_within_a_level_does_not_level_up() {
        let mut profile = build_profile();
        profile.add_xp(100);
        let award = profile.add_xp(100);
        assert!(!award.leveled_up);
        assert_eq!(profile.current_level(), 1);
    }

    #[test]
    fn from_persisted_rederives_level() {
        let profile =
            Profile::from_persisted(UserId::generate(), "Dev", 1_250, 2, 5, Some(fixed_today()));
        assert_eq!(profile.current_level(), 3);
        assert_eq!(profile.longest_streak(), 5);
    }

    #[test]
    fn record_activity_advances_streak() {
        let mut profile = build_profile();
        let today = fixed_today();

        profile.record_activity(today - Duration::days(1));
        let update = profile.record_activity(today);
        assert_eq!(update.current, 2);
        assert_eq!(profile.current_streak(), 2);
        assert_eq!(profile.longest_streak(), 2);
        assert_eq!(profile.last_active_date(), Some(today));
    }

    #[test]
    fn clear_streak_keeps_longest() {
        let mut profile = build_profile();
        let today = fixed_today();
        profile.record_activity(today - Duration::days(1));
        profile.record_activity(today);

        profile.clear_streak();
        assert_eq!(profile.current_streak(), 0);
        assert_eq!(profile.longest_streak(), 2);
        assert_eq!(profile.last_active_date(), Some(today));
    }
}
