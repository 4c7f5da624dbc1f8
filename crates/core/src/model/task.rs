use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{DayId, TaskId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("task is already done and cannot be un-done")]
    AlreadyDone,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a task, carrying its fixed XP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Boss,
}

impl Difficulty {
    /// The fixed XP awarded for completing a task of this difficulty.
    #[must_use]
    pub fn xp_value(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 25,
            Difficulty::Hard => 50,
            Difficulty::Boss => 100,
        }
    }

    /// Storage representation of the difficulty.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Boss => "boss",
        }
    }
}

//
// ─── TASK STATE ────────────────────────────────────────────────────────────────
//

/// Completion state of a task.
///
/// Tagged rather than a raw bool so "already done" is a distinct state the
/// one-way transition can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Done { completed_at: DateTime<Utc> },
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

/// One unit of work inside a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    day_id: DayId,
    title: String,
    description: String,
    difficulty: Difficulty,
    xp_value: u32,
    order: u32,
    state: TaskState,
}

impl Task {
    /// Creates a pending task; its XP value is fixed from the difficulty.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyTitle` if the title is blank.
    pub fn new(
        id: TaskId,
        day_id: DayId,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        order: u32,
    ) -> Result<Self, TaskError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        Ok(Self {
            id,
            day_id,
            title,
            description: description.into(),
            difficulty,
            xp_value: difficulty.xp_value(),
            order,
            state: TaskState::Pending,
        })
    }

    /// Rehydrates a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Same validation as [`Task::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: TaskId,
        day_id: DayId,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        xp_value: u32,
        order: u32,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, TaskError> {
        let mut task = Self::new(id, day_id, title, description, difficulty, order)?;
        task.xp_value = xp_value;
        task.state = match completed_at {
            Some(completed_at) => TaskState::Done { completed_at },
            None => TaskState::Pending,
        };
        Ok(task)
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn day_id(&self) -> DayId {
        self.day_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn xp_value(&self) -> u32 {
        self.xp_value
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.state, TaskState::Done { .. })
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            TaskState::Done { completed_at } => Some(completed_at),
            TaskState::Pending => None,
        }
    }

    /// Marks the task done, returning the XP it awards.
    ///
    /// The transition is one-way: a done task can never return to pending.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::AlreadyDone` on repeat completion.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<u32, TaskError> {
        if self.is_done() {
            return Err(TaskError::AlreadyDone);
        }

        self.state = TaskState::Done { completed_at: now };
        Ok(self.xp_value)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
