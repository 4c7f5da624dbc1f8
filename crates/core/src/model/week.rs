use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{UserId, WeekId};

/// Accent used for weeks that do not specify their own.
pub const DEFAULT_COLOR_ACCENT: &str = "#00FF88";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WeekError {
    #[error("week title cannot be empty")]
    EmptyTitle,

    #[error("week number must be >= 1")]
    InvalidWeekNumber,
}

//
// ─── WEEK ──────────────────────────────────────────────────────────────────────
//

/// One themed week of a journey, owning an ordered set of days.
///
/// `bonus_awarded` records that the perfect-week bonus has been paid out; it
/// is set at most once and never unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    id: WeekId,
    user_id: UserId,
    week_number: u32,
    title: String,
    theme: String,
    color_accent: String,
    bonus_awarded: bool,
    created_at: DateTime<Utc>,
}

impl Week {
    /// Creates a new week with the bonus not yet awarded.
    ///
    /// # Errors
    ///
    /// Returns `WeekError::EmptyTitle` if the title is blank and
    /// `WeekError::InvalidWeekNumber` if the week number is zero.
    pub fn new(
        id: WeekId,
        user_id: UserId,
        week_number: u32,
        title: impl Into<String>,
        theme: impl Into<String>,
        color_accent: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, WeekError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(WeekError::EmptyTitle);
        }
        if week_number == 0 {
            return Err(WeekError::InvalidWeekNumber);
        }

        Ok(Self {
            id,
            user_id,
            week_number,
            title,
            theme: theme.into(),
            color_accent: color_accent.into(),
            bonus_awarded: false,
            created_at,
        })
    }

    /// Rehydrates a week from persisted storage.
    ///
    /// # Errors
    ///
    /// Same validation as [`Week::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: WeekId,
        user_id: UserId,
        week_number: u32,
        title: impl Into<String>,
        theme: impl Into<String>,
        color_accent: impl Into<String>,
        bonus_awarded: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, WeekError> {
        let mut week = Self::new(
            id,
            user_id,
            week_number,
            title,
            theme,
            color_accent,
            created_at,
        )?;
        week.bonus_awarded = bonus_awarded;
        Ok(week)
    }

    #[must_use]
    pub fn id(&self) -> WeekId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn week_number(&self) -> u32 {
        self.week_number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[must_use]
    pub fn color_accent(&self) -> &str {
        &self.color_accent
    }

    #[must_use]
    pub fn bonus_awarded(&self) -> bool {
        self.bonus_awarded
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the perfect-week bonus as awarded.
    ///
    /// Returns true only the first time; repeat calls are no-ops, which keeps
    /// the bonus path idempotent.
    pub fn mark_bonus_awarded(&mut self) -> bool {
        if self.bonus_awarded {
            return false;
        }
        self.bonus_awarded = true;
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
