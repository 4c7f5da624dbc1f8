use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

use crate::model::ids::{DayId, UserId, WeekId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DayError {
    #[error("day title cannot be empty")]
    EmptyTitle,

    #[error("day number must be >= 1")]
    InvalidDayNumber,

    #[error("day is already finalized")]
    Finalized,

    #[error("day is outside the {kind} completion window")]
    OutsideCompletionWindow { kind: CompletionKind },
}

//
// ─── STATUS & COMPLETION KIND ──────────────────────────────────────────────────
//

/// Lifecycle states of a day.
///
/// `Completed`, `PreCompleted` and `PostCompleted` are terminal: once a day
/// enters one of them, its completion fields never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Upcoming,
    Active,
    Completed,
    PreCompleted,
    PostCompleted,
    Missed,
}

impl DayStatus {
    /// True for the three terminal completion states.
    #[must_use]
    pub fn is_finalized(self) -> bool {
        matches!(
            self,
            DayStatus::Completed | DayStatus::PreCompleted | DayStatus::PostCompleted
        )
    }

    /// Storage representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Upcoming => "upcoming",
            DayStatus::Active => "active",
            DayStatus::Completed => "completed",
            DayStatus::PreCompleted => "pre_completed",
            DayStatus::PostCompleted => "post_completed",
            DayStatus::Missed => "missed",
        }
    }
}

/// How a day is being completed: on time, one day early, or one day late.
///
/// The kind fixes both the resulting status and the XP modifier; late
/// completion pays out at three quarters of the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Normal,
    Pre,
    Post,
}

impl CompletionKind {
    /// Multiplier applied to the day's base XP reward.
    #[must_use]
    pub fn xp_modifier(self) -> f64 {
        match self {
            CompletionKind::Normal | CompletionKind::Pre => 1.0,
            CompletionKind::Post => 0.75,
        }
    }

    /// The finalized status this completion kind produces.
    #[must_use]
    pub fn finalized_status(self) -> DayStatus {
        match self {
            CompletionKind::Normal => DayStatus::Completed,
            CompletionKind::Pre => DayStatus::PreCompleted,
            CompletionKind::Post => DayStatus::PostCompleted,
        }
    }

    /// Storage representation of the completion kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionKind::Normal => "normal",
            CompletionKind::Pre => "pre",
            CompletionKind::Post => "post",
        }
    }
}

impl std::fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── DAY ───────────────────────────────────────────────────────────────────────
//

/// A single day of the journey: a dated unit of work that can be completed
/// on time, a day early, or a day late.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    id: DayId,
    user_id: UserId,
    week_id: WeekId,
    day_number: u32,
    date: Option<NaiveDate>,
    title: String,
    status: DayStatus,
    completion_type: CompletionKind,
    xp_modifier: f64,
    xp_reward: u32,
    xp_earned: u32,
    notes: String,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Day {
    /// Creates a new, not-yet-completed day.
    ///
    /// # Errors
    ///
    /// Returns `DayError::EmptyTitle` for a blank title and
    /// `DayError::InvalidDayNumber` for day number zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DayId,
        user_id: UserId,
        week_id: WeekId,
        day_number: u32,
        date: Option<NaiveDate>,
        title: impl Into<String>,
        xp_reward: u32,
        status: DayStatus,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DayError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DayError::EmptyTitle);
        }
        if day_number == 0 {
            return Err(DayError::InvalidDayNumber);
        }

        Ok(Self {
            id,
            user_id,
            week_id,
            day_number,
            date,
            title,
            status,
            completion_type: CompletionKind::Normal,
            xp_modifier: 1.0,
            xp_reward,
            xp_earned: 0,
            notes: String::new(),
            completed_at: None,
            created_at,
        })
    }

    /// Rehydrates a day from persisted storage.
    ///
    /// # Errors
    ///
    /// Same validation as [`Day::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: DayId,
        user_id: UserId,
        week_id: WeekId,
        day_number: u32,
        date: Option<NaiveDate>,
        title: impl Into<String>,
        status: DayStatus,
        completion_type: CompletionKind,
        xp_modifier: f64,
        xp_reward: u32,
        xp_earned: u32,
        notes: impl Into<String>,
        completed_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DayError> {
        let mut day = Self::new(
            id, user_id, week_id, day_number, date, title, xp_reward, status, created_at,
        )?;
        day.completion_type = completion_type;
        day.xp_modifier = xp_modifier;
        day.xp_earned = xp_earned;
        day.notes = notes.into();
        day.completed_at = completed_at;
        Ok(day)
    }

    #[must_use]
    pub fn id(&self) -> DayId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn week_id(&self) -> WeekId {
        self.week_id
    }

    #[must_use]
    pub fn day_number(&self) -> u32 {
        self.day_number
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn status(&self) -> DayStatus {
        self.status
    }

    #[must_use]
    pub fn completion_type(&self) -> CompletionKind {
        self.completion_type
    }

    #[must_use]
    pub fn xp_modifier(&self) -> f64 {
        self.xp_modifier
    }

    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn xp_earned(&self) -> u32 {
        self.xp_earned
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True once the day has entered a terminal completion state.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.status.is_finalized()
    }

    /// Checks the calendar window for the given completion kind.
    ///
    /// Normal completion is allowed any time. Pre-completion targets only
    /// tomorrow's day, post-completion only yesterday's; an undated day is
    /// never inside either window.
    ///
    /// # Errors
    ///
    /// Returns `DayError::OutsideCompletionWindow` when the day's date does
    /// not match the one-day offset the kind requires.
    pub fn eligible_on(&self, kind: CompletionKind, today: NaiveDate) -> Result<(), DayError> {
        let required = match kind {
            CompletionKind::Normal => return Ok(()),
            CompletionKind::Pre => today + Duration::days(1),
            CompletionKind::Post => today - Duration::days(1),
        };

        if self.date == Some(required) {
            Ok(())
        } else {
            Err(DayError::OutsideCompletionWindow { kind })
        }
    }

    /// Moves the day into the finalized state for `kind`, computing earned XP.
    ///
    /// Sets status, completion type, XP modifier, `xp_earned`
    /// (reward × modifier, truncated) and `completed_at` exactly once, and
    /// returns the earned XP.
    ///
    /// # Errors
    ///
    /// Returns `DayError::Finalized` if the day is already in a terminal
    /// state; no field is touched in that case.
    pub fn finalize(
        &mut self,
        kind: CompletionKind,
        completed_at: DateTime<Utc>,
    ) -> Result<u32, DayError> {
        if self.is_finalized() {
            return Err(DayError::Finalized);
        }

        let modifier = kind.xp_modifier();
        let earned = (f64::from(self.xp_reward) * modifier).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let earned = earned as u32;

        self.status = kind.finalized_status();
        self.completion_type = kind;
        self.xp_modifier = modifier;
        self.xp_earned = earned;
        self.completed_at = Some(completed_at);

        Ok(earned)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{fixed_now, fixed_today};

    fn build_day(date: Option<NaiveDate>, xp_reward: u32) -> Day {
        Day::new(
            DayId::new(1),
            UserId::generate(),
            WeekId::new(1),
            1,
            date,
            "Arrays and hashing",
            xp_reward,
            DayStatus::Active,
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn new_day_is_not_finalized() {
        let day = build_day(Some(fixed_today()), 100);
        assert!(!day.is_finalized());
        assert_eq!(day.xp_earned(), 0);
        assert_eq!(day.completed_at(), None);
    }

    #[test]
    fn normal_completion_pays_full_reward() {
        let mut day = build_day(Some(fixed_today()), 100);
        let earned = day.finalize(CompletionKind::Normal, fixed_now()).unwrap();
        assert_eq!(earned, 100);
        assert_eq!(day.status(), DayStatus::Completed);
        assert_eq!(day.completion_type(), CompletionKind::Normal);
        assert_eq!(day.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn pre_completion_pays_full_reward() {
        let mut day = build_day(Some(fixed_today() + Duration::days(1)), 100);
        let earned = day.finalize(CompletionKind::Pre, fixed_now()).unwrap();
        assert_eq!(earned, 100);
        assert_eq!(day.status(), DayStatus::PreCompleted);
    }

    #[test]
    fn post_completion_pays_three_quarters() {
        let mut day = build_day(Some(fixed_today() - Duration::days(1)), 100);
        let earned = day.finalize(CompletionKind::Post, fixed_now()).unwrap();
        assert_eq!(earned, 75);
        assert_eq!(day.status(), DayStatus::PostCompleted);
        assert!((day.xp_modifier() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn post_completion_truncates_fractional_xp() {
        let mut day = build_day(Some(fixed_today() - Duration::days(1)), 90);
        let earned = day.finalize(CompletionKind::Post, fixed_now()).unwrap();
        assert_eq!(earned, 67);
    }

    #[test]
    fn finalized_day_rejects_every_completion_kind() {
        let mut day = build_day(Some(fixed_today()), 100);
        day.finalize(CompletionKind::Normal, fixed_now()).unwrap();

        for kind in [CompletionKind::Normal, CompletionKind::Pre, CompletionKind::Post] {
            let err = day.finalize(kind, fixed_now()).unwrap_err();
            assert_eq!(err, DayError::Finalized);
        }
        assert_eq!(day.xp_earned(), 100);
        assert_eq!(day.completion_type(), CompletionKind::Normal);
    }

    #[test]
    fn pre_window_requires_tomorrow() {
        let today = fixed_today();
        let tomorrow = build_day(Some(today + Duration::days(1)), 100);
        assert!(tomorrow.eligible_on(CompletionKind::Pre, today).is_ok());

        let two_out = build_day(Some(today + Duration::days(2)), 100);
        let err = two_out.eligible_on(CompletionKind::Pre, today).unwrap_err();
        assert!(matches!(
            err,
            DayError::OutsideCompletionWindow {
                kind: CompletionKind::Pre
            }
        ));
    }

    #[test]
    fn post_window_requires_yesterday() {
        let today = fixed_today();
        let yesterday = build_day(Some(today - Duration::days(1)), 100);
        assert!(yesterday.eligible_on(CompletionKind::Post, today).is_ok());

        let same_day = build_day(Some(today), 100);
        assert!(same_day.eligible_on(CompletionKind::Post, today).is_err());
    }

    #[test]
    fn undated_day_is_outside_both_windows() {
        let day = build_day(None, 100);
        let today = fixed_today();
        assert!(day.eligible_on(CompletionKind::Pre, today).is_err());
        assert!(day.eligible_on(CompletionKind::Post, today).is_err());
        assert!(day.eligible_on(CompletionKind::Normal, today).is_ok());
    }
}
