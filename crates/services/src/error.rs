//! Shared error types for the services crate.

use thiserror::Error;

use journey_core::model::{CheckError, DayError, TaskError, WeekError};
use storage::repository::StorageError;

/// Errors emitted by `ProgressionService`.
///
/// Each variant identifies the rule a rejected request violated; a rejected
/// transition leaves every entity unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error(transparent)]
    Day(#[from] DayError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("complete at least half of today's tasks before completing tomorrow")]
    InsufficientTodayProgress,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the streak sweep.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SweepError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while seeding a journey.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("invalid seed plan: {0}")]
    InvalidPlan(#[from] serde_json::Error),

    #[error(transparent)]
    Week(#[from] WeekError),

    #[error(transparent)]
    Day(#[from] DayError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
