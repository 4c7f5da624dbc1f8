use async_trait::async_trait;
use chrono::NaiveDate;
use journey_core::model::{
    CheckId, Day, DayId, KnowledgeCheck, Profile, Task, TaskId, UserId, Week, WeekId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Repository contract for profiles.
///
/// Every operation here, and on the other repositories, is scoped to a single
/// user: a record owned by a different user behaves exactly like a missing
/// record (`StorageError::NotFound`).
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Persist or update a profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StorageError>;

    /// Fetch a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_profile(&self, user: UserId) -> Result<Profile, StorageError>;

    /// Fetch profiles whose `last_active_date` is strictly before `cutoff`.
    ///
    /// Profiles that never recorded activity are not returned; the streak
    /// sweep has nothing to clear for them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn profiles_last_active_before(
        &self,
        cutoff: NaiveDate,
    ) -> Result<Vec<Profile>, StorageError>;
}

/// Repository contract for weeks.
#[async_trait]
pub trait WeekRepository: Send + Sync {
    /// Persist or update a week.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the week cannot be stored.
    async fn upsert_week(&self, week: &Week) -> Result<(), StorageError>;

    /// Fetch one of the user's weeks by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or owned by another user.
    async fn get_week(&self, user: UserId, id: WeekId) -> Result<Week, StorageError>;

    /// List the user's weeks ordered by week number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_weeks(&self, user: UserId) -> Result<Vec<Week>, StorageError>;

    /// Delete all of the user's weeks, cascading days, tasks and checks.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_weeks(&self, user: UserId) -> Result<(), StorageError>;
}

/// Repository contract for days.
#[async_trait]
pub trait DayRepository: Send + Sync {
    /// Persist or update a day.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the day cannot be stored.
    async fn upsert_day(&self, day: &Day) -> Result<(), StorageError>;

    /// Fetch one of the user's days by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or owned by another user.
    async fn get_day(&self, user: UserId, id: DayId) -> Result<Day, StorageError>;

    /// Fetch the user's day dated `date`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn day_on_date(&self, user: UserId, date: NaiveDate)
    -> Result<Option<Day>, StorageError>;

    /// List the days of one of the user's weeks ordered by day number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn days_in_week(&self, user: UserId, week: WeekId) -> Result<Vec<Day>, StorageError>;

    /// List all of the user's days ordered by day number.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_days(&self, user: UserId) -> Result<Vec<Day>, StorageError>;
}

/// Repository contract for tasks.
///
/// Tasks carry no user id of their own (they belong to a day), so the scope
/// is passed explicitly on every call.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist or update a task owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the task cannot be stored.
    async fn upsert_task(&self, user: UserId, task: &Task) -> Result<(), StorageError>;

    /// Fetch one of the user's tasks by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or owned by another user.
    async fn get_task(&self, user: UserId, id: TaskId) -> Result<Task, StorageError>;

    /// List the tasks of one of the user's days, ordered by their position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn tasks_for_day(&self, user: UserId, day: DayId) -> Result<Vec<Task>, StorageError>;
}

/// Repository contract for knowledge checks.
#[async_trait]
pub trait KnowledgeCheckRepository: Send + Sync {
    /// Persist or update a knowledge check owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the check cannot be stored.
    async fn upsert_check(&self, user: UserId, check: &KnowledgeCheck)
    -> Result<(), StorageError>;

    /// Fetch one of the user's knowledge checks by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or owned by another user.
    async fn get_check(&self, user: UserId, id: CheckId) -> Result<KnowledgeCheck, StorageError>;

    /// List the knowledge checks of one of the user's days, ordered by
    /// their position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn checks_for_day(
        &self,
        user: UserId,
        day: DayId,
    ) -> Result<Vec<KnowledgeCheck>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
    weeks: Arc<Mutex<HashMap<(UserId, WeekId), Week>>>,
    days: Arc<Mutex<HashMap<(UserId, DayId), Day>>>,
    tasks: Arc<Mutex<HashMap<(UserId, TaskId), Task>>>,
    checks: Arc<Mutex<HashMap<(UserId, CheckId), KnowledgeCheck>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        let mut guard = self.profiles.lock().map_err(poisoned)?;
        guard.insert(profile.user_id(), profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile, StorageError> {
        let guard = self.profiles.lock().map_err(poisoned)?;
        guard.get(&user).cloned().ok_or(StorageError::NotFound)
    }

    async fn profiles_last_active_before(
        &self,
        cutoff: NaiveDate,
    ) -> Result<Vec<Profile>, StorageError> {
        let guard = self.profiles.lock().map_err(poisoned)?;
        let mut stale: Vec<Profile> = guard
            .values()
            .filter(|p| p.last_active_date().is_some_and(|d| d < cutoff))
            .cloned()
            .collect();
        stale.sort_by_key(Profile::user_id);
        Ok(stale)
    }
}

#[async_trait]
impl WeekRepository for InMemoryRepository {
    async fn upsert_week(&self, week: &Week) -> Result<(), StorageError> {
        let mut guard = self.weeks.lock().map_err(poisoned)?;
        guard.insert((week.user_id(), week.id()), week.clone());
        Ok(())
    }

    async fn get_week(&self, user: UserId, id: WeekId) -> Result<Week, StorageError> {
        let guard = self.weeks.lock().map_err(poisoned)?;
        guard.get(&(user, id)).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_weeks(&self, user: UserId) -> Result<Vec<Week>, StorageError> {
        let guard = self.weeks.lock().map_err(poisoned)?;
        let mut weeks: Vec<Week> = guard
            .values()
            .filter(|w| w.user_id() == user)
            .cloned()
            .collect();
        weeks.sort_by_key(Week::week_number);
        Ok(weeks)
    }

    async fn delete_weeks(&self, user: UserId) -> Result<(), StorageError> {
        self.weeks
            .lock()
            .map_err(poisoned)?
            .retain(|(owner, _), _| *owner != user);
        self.days
            .lock()
            .map_err(poisoned)?
            .retain(|(owner, _), _| *owner != user);
        self.tasks
            .lock()
            .map_err(poisoned)?
            .retain(|(owner, _), _| *owner != user);
        self.checks
            .lock()
            .map_err(poisoned)?
            .retain(|(owner, _), _| *owner != user);
        Ok(())
    }
}

#[async_trait]
impl DayRepository for InMemoryRepository {
    async fn upsert_day(&self, day: &Day) -> Result<(), StorageError> {
        let mut guard = self.days.lock().map_err(poisoned)?;
        guard.insert((day.user_id(), day.id()), day.clone());
        Ok(())
    }

    async fn get_day(&self, user: UserId, id: DayId) -> Result<Day, StorageError> {
        let guard = self.days.lock().map_err(poisoned)?;
        guard.get(&(user, id)).cloned().ok_or(StorageError::NotFound)
    }

    async fn day_on_date(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Option<Day>, StorageError> {
        let guard = self.days.lock().map_err(poisoned)?;
        Ok(guard
            .values()
            .filter(|d| d.user_id() == user && d.date() == Some(date))
            .min_by_key(|d| d.day_number())
            .cloned())
    }

    async fn days_in_week(&self, user: UserId, week: WeekId) -> Result<Vec<Day>, StorageError> {
        let guard = self.days.lock().map_err(poisoned)?;
        let mut days: Vec<Day> = guard
            .values()
            .filter(|d| d.user_id() == user && d.week_id() == week)
            .cloned()
            .collect();
        days.sort_by_key(Day::day_number);
        Ok(days)
    }

    async fn list_days(&self, user: UserId) -> Result<Vec<Day>, StorageError> {
        let guard = self.days.lock().map_err(poisoned)?;
        let mut days: Vec<Day> = guard
            .values()
            .filter(|d| d.user_id() == user)
            .cloned()
            .collect();
        days.sort_by_key(Day::day_number);
        Ok(days)
    }
}

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn upsert_task(&self, user: UserId, task: &Task) -> Result<(), StorageError> {
        let mut guard = self.tasks.lock().map_err(poisoned)?;
        guard.insert((user, task.id()), task.clone());
        Ok(())
    }

    async fn get_task(&self, user: UserId, id: TaskId) -> Result<Task, StorageError> {
        let guard = self.tasks.lock().map_err(poisoned)?;
        guard.get(&(user, id)).cloned().ok_or(StorageError::NotFound)
    }

    async fn tasks_for_day(&self, user: UserId, day: DayId) -> Result<Vec<Task>, StorageError> {
        let guard = self.tasks.lock().map_err(poisoned)?;
        let mut tasks: Vec<Task> = guard
            .iter()
            .filter(|((owner, _), t)| *owner == user && t.day_id() == day)
            .map(|(_, t)| t.clone())
            .collect();
        tasks.sort_by_key(|t| (t.order(), t.id()));
        Ok(tasks)
    }
}

#[async_trait]
impl KnowledgeCheckRepository for InMemoryRepository {
    async fn upsert_check(
        &self,
        user: UserId,
        check: &KnowledgeCheck,
    ) -> Result<(), StorageError> {
        let mut guard = self.checks.lock().map_err(poisoned)?;
        guard.insert((user, check.id()), check.clone());
        Ok(())
    }

    async fn get_check(&self, user: UserId, id: CheckId) -> Result<KnowledgeCheck, StorageError> {
        let guard = self.checks.lock().map_err(poisoned)?;
        guard.get(&(user, id)).cloned().ok_or(StorageError::NotFound)
    }

    async fn checks_for_day(
        &self,
        user: UserId,
        day: DayId,
    ) -> Result<Vec<KnowledgeCheck>, StorageError> {
        let guard = self.checks.lock().map_err(poisoned)?;
        let mut checks: Vec<KnowledgeCheck> = guard
            .iter()
            .filter(|((owner, _), c)| *owner == user && c.day_id() == day)
            .map(|(_, c)| c.clone())
            .collect();
        checks.sort_by_key(|c| (c.order(), c.id()));
        Ok(checks)
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the journey repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
    pub weeks: Arc<dyn WeekRepository>,
    pub days: Arc<dyn DayRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub checks: Arc<dyn KnowledgeCheckRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            profiles: Arc::new(repo.clone()),
            weeks: Arc::new(repo.clone()),
            days: Arc::new(repo.clone()),
            tasks: Arc::new(repo.clone()),
            checks: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
