use journey_core::model::{
    CheckId, CompletionKind, Day, DayError, DayId, KnowledgeCheck, Task, TaskError, TaskId, UserId,
};
use journey_core::time::Clock;
use storage::repository::Storage;

use crate::error::ProgressionError;

/// Flat XP paid out when every day of a 7-day week is finalized.
pub const PERFECT_WEEK_BONUS_XP: u32 = 500;

/// Flat XP paid out when a knowledge check is first answered.
pub const KNOWLEDGE_CHECK_XP: u32 = 15;

/// A week only counts as perfect at exactly this many days.
pub const PERFECT_WEEK_LENGTH: usize = 7;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Consolidated result of completing a day.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub day: Day,
    /// True if the day XP or the week bonus crossed a level threshold.
    pub leveled_up: bool,
    pub new_level: u32,
    /// Day XP plus the week bonus when it fired.
    pub xp_earned_total: u32,
    pub perfect_week: bool,
}

/// Result of marking a task done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task: Task,
    pub leveled_up: bool,
    pub new_level: u32,
    pub xp_gained: u32,
}

/// Result of answering (or editing) a knowledge check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub check: KnowledgeCheck,
    pub leveled_up: bool,
    pub new_level: u32,
    pub xp_gained: u32,
}

//
// ─── WEEK BONUS DETECTION ──────────────────────────────────────────────────────
//

/// Decides whether finalizing `just_finalized` completes a perfect week.
///
/// `days` is the week's day list as currently persisted, so the day being
/// finalized may still read as unfinalized in it; it is counted as done.
/// Weeks with any other length than seven days never qualify — that is an
/// intentional rule, not an oversight.
fn week_becomes_perfect(days: &[Day], just_finalized: DayId) -> bool {
    days.len() == PERFECT_WEEK_LENGTH
        && days
            .iter()
            .all(|d| d.id() == just_finalized || d.is_finalized())
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Orchestrates every XP-bearing mutation for a user's journey.
///
/// Day completions run the full pipeline: validate, update the streak,
/// finalize the day, apply XP, then detect the perfect-week bonus. Task and
/// knowledge-check awards take the short path of XP plus a level recompute.
/// Nothing else writes a profile.
///
/// Mutations for one user are expected to be serialized by the caller;
/// requests for different users share no mutable state.
#[derive(Clone)]
pub struct ProgressionService {
    clock: Clock,
    storage: Storage,
}

impl ProgressionService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }

    /// Completes a day on time, a day early, or a day late.
    ///
    /// Validation happens before any entity is touched, so a rejected request
    /// leaves profile, day and week exactly as they were.
    ///
    /// # Errors
    ///
    /// - `ProgressionError::Day(DayError::Finalized)` if the day is already
    ///   finalized.
    /// - `ProgressionError::InsufficientTodayProgress` if pre-completing
    ///   while today's day has fewer than half of its tasks done.
    /// - `ProgressionError::Day(DayError::OutsideCompletionWindow)` if the
    ///   day is not tomorrow's (pre) or yesterday's (post).
    /// - `ProgressionError::Storage` for missing records, including days
    ///   owned by another user.
    pub async fn apply_completion(
        &self,
        user: UserId,
        day_id: DayId,
        kind: CompletionKind,
    ) -> Result<CompletionOutcome, ProgressionError> {
        let mut day = self.storage.days.get_day(user, day_id).await?;
        if day.is_finalized() {
            return Err(DayError::Finalized.into());
        }

        let today = self.clock.today();
        if kind == CompletionKind::Pre {
            self.ensure_today_progress(user).await?;
        }
        day.eligible_on(kind, today)?;

        let mut profile = self.storage.profiles.get_profile(user).await?;
        profile.record_activity(today);

        let earned = day.finalize(kind, self.clock.now())?;
        let day_award = profile.add_xp(earned);

        let mut week = self.storage.weeks.get_week(user, day.week_id()).await?;
        let week_days = self.storage.days.days_in_week(user, day.week_id()).await?;

        let mut perfect_week = false;
        let mut bonus_leveled_up = false;
        if !week.bonus_awarded() && week_becomes_perfect(&week_days, day.id()) {
            week.mark_bonus_awarded();
            let bonus_award = profile.add_xp(PERFECT_WEEK_BONUS_XP);
            bonus_leveled_up = bonus_award.leveled_up;
            perfect_week = true;
            tracing::info!(
                user = %user,
                week = %week.id(),
                "perfect week bonus awarded"
            );
        }

        self.storage.days.upsert_day(&day).await?;
        if perfect_week {
            self.storage.weeks.upsert_week(&week).await?;
        }
        self.storage.profiles.upsert_profile(&profile).await?;

        let xp_earned_total = if perfect_week {
            earned + PERFECT_WEEK_BONUS_XP
        } else {
            earned
        };
        tracing::debug!(
            user = %user,
            day = %day.id(),
            kind = %kind,
            xp = xp_earned_total,
            "day completed"
        );

        Ok(CompletionOutcome {
            day,
            leveled_up: day_award.leveled_up || bonus_leveled_up,
            new_level: profile.current_level(),
            xp_earned_total,
            perfect_week,
        })
    }

    /// Marks a task done and awards its difficulty XP.
    ///
    /// # Errors
    ///
    /// - `ProgressionError::Task(TaskError::AlreadyDone)` on repeat
    ///   completion.
    /// - `ProgressionError::Day(DayError::Finalized)` if the owning day is
    ///   finalized.
    /// - `ProgressionError::Storage` for missing records.
    pub async fn complete_task(
        &self,
        user: UserId,
        task_id: TaskId,
    ) -> Result<TaskOutcome, ProgressionError> {
        let mut task = self.storage.tasks.get_task(user, task_id).await?;
        if task.is_done() {
            return Err(TaskError::AlreadyDone.into());
        }

        let day = self.storage.days.get_day(user, task.day_id()).await?;
        if day.is_finalized() {
            return Err(DayError::Finalized.into());
        }

        let xp_gained = task.complete(self.clock.now())?;
        let mut profile = self.storage.profiles.get_profile(user).await?;
        let award = profile.add_xp(xp_gained);

        self.storage.tasks.upsert_task(user, &task).await?;
        self.storage.profiles.upsert_profile(&profile).await?;

        tracing::debug!(user = %user, task = %task.id(), xp = xp_gained, "task completed");

        Ok(TaskOutcome {
            task,
            leveled_up: award.leveled_up,
            new_level: award.new_level,
            xp_gained,
        })
    }

    /// Records a knowledge-check answer and any notes.
    ///
    /// Content updates are accepted even on a finalized day for
    /// record-keeping; the flat XP is awarded only when this call performs
    /// the first answer transition on a day that is still open.
    ///
    /// # Errors
    ///
    /// `ProgressionError::Storage` for missing records.
    pub async fn answer_check(
        &self,
        user: UserId,
        check_id: CheckId,
        answered: bool,
        notes: Option<String>,
    ) -> Result<CheckOutcome, ProgressionError> {
        let mut check = self.storage.checks.get_check(user, check_id).await?;
        let day = self.storage.days.get_day(user, check.day_id()).await?;
        let mut profile = self.storage.profiles.get_profile(user).await?;

        if let Some(notes) = notes {
            check.set_answer_notes(notes);
        }
        let transitioned = check.record_answer(answered);
        let award_xp = transitioned && !day.is_finalized();

        self.storage.checks.upsert_check(user, &check).await?;

        let mut leveled_up = false;
        let mut xp_gained = 0;
        if award_xp {
            let award = profile.add_xp(KNOWLEDGE_CHECK_XP);
            leveled_up = award.leveled_up;
            xp_gained = KNOWLEDGE_CHECK_XP;
            self.storage.profiles.upsert_profile(&profile).await?;
            tracing::debug!(user = %user, check = %check.id(), "knowledge check answered");
        }

        Ok(CheckOutcome {
            check,
            leveled_up,
            new_level: profile.current_level(),
            xp_gained,
        })
    }

    /// The pre-completion gate: if a day exists for today and has tasks, at
    /// least half of them must be done before tomorrow can be claimed.
    async fn ensure_today_progress(&self, user: UserId) -> Result<(), ProgressionError> {
        let today = self.clock.today();
        let Some(today_day) = self.storage.days.day_on_date(user, today).await? else {
            return Ok(());
        };

        let tasks = self
            .storage
            .tasks
            .tasks_for_day(user, today_day.id())
            .await?;
        if tasks.is_empty() {
            return Ok(());
        }

        let done = tasks.iter().filter(|t| t.is_done()).count();
        if done * 2 < tasks.len() {
            return Err(ProgressionError::InsufficientTodayProgress);
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
