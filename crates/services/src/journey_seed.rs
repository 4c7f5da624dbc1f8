use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use journey_core::model::{
    CheckId, DEFAULT_COLOR_ACCENT, Day, DayId, DayStatus, Difficulty, KnowledgeCheck, Task,
    TaskId, UserId, Week, WeekId,
};
use journey_core::time::Clock;
use storage::repository::Storage;

use crate::error::SeedError;

//
// ─── SEED PLAN ─────────────────────────────────────────────────────────────────
//

/// Declarative description of a journey, loaded from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPlan {
    pub weeks: Vec<SeedWeek>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedWeek {
    pub week_number: u32,
    pub title: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default = "default_color_accent")]
    pub color_accent: String,
    #[serde(default)]
    pub days: Vec<SeedDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDay {
    pub day_number: u32,
    pub title: String,
    #[serde(default = "default_xp_reward")]
    pub xp_reward: u32,
    #[serde(default)]
    pub tasks: Vec<SeedTask>,
    #[serde(default)]
    pub knowledge_checks: Vec<SeedCheck>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCheck {
    pub question: String,
    #[serde(default)]
    pub order: u32,
}

fn default_color_accent() -> String {
    DEFAULT_COLOR_ACCENT.to_string()
}

fn default_xp_reward() -> u32 {
    100
}

impl SeedPlan {
    /// Parses a seed plan from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::InvalidPlan` on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Counts of the records a seeding run created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub weeks: usize,
    pub days: usize,
    pub tasks: usize,
    pub checks: usize,
}

//
// ─── SEEDER ────────────────────────────────────────────────────────────────────
//

/// Builds a user's journey from a seed plan.
///
/// Reseeding is idempotent: any existing journey for the user is deleted
/// first, then weeks and days are created with day 1 dated at `start_date`
/// and active, and every later day upcoming. Task XP values are fixed from
/// the difficulty table at creation.
#[derive(Clone)]
pub struct JourneySeeder {
    clock: Clock,
    storage: Storage,
}

impl JourneySeeder {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }

    /// Replaces the user's journey with the plan's weeks, days, tasks and
    /// knowledge checks.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the plan contains invalid entities or a write
    /// fails.
    pub async fn seed(
        &self,
        user: UserId,
        plan: &SeedPlan,
        start_date: NaiveDate,
    ) -> Result<SeedSummary, SeedError> {
        self.storage.weeks.delete_weeks(user).await?;

        let created_at = self.clock.now();
        let mut summary = SeedSummary::default();
        let mut next_task_id: u64 = 1;
        let mut next_check_id: u64 = 1;
        let mut next_day_id: u64 = 1;

        for seed_week in &plan.weeks {
            let week = Week::new(
                WeekId::new(u64::from(seed_week.week_number)),
                user,
                seed_week.week_number,
                seed_week.title.clone(),
                seed_week.theme.clone(),
                seed_week.color_accent.clone(),
                created_at,
            )?;
            self.storage.weeks.upsert_week(&week).await?;
            summary.weeks += 1;

            for seed_day in &seed_week.days {
                let date = start_date + Duration::days(i64::from(seed_day.day_number) - 1);
                let status = if seed_day.day_number == 1 {
                    DayStatus::Active
                } else {
                    DayStatus::Upcoming
                };
                let day = Day::new(
                    DayId::new(next_day_id),
                    user,
                    week.id(),
                    seed_day.day_number,
                    Some(date),
                    seed_day.title.clone(),
                    seed_day.xp_reward,
                    status,
                    created_at,
                )?;
                next_day_id += 1;
                self.storage.days.upsert_day(&day).await?;
                summary.days += 1;

                for seed_task in &seed_day.tasks {
                    let task = Task::new(
                        TaskId::new(next_task_id),
                        day.id(),
                        seed_task.title.clone(),
                        seed_task.description.clone(),
                        seed_task.difficulty,
                        seed_task.order,
                    )?;
                    next_task_id += 1;
                    self.storage.tasks.upsert_task(user, &task).await?;
                    summary.tasks += 1;
                }

                for seed_check in &seed_day.knowledge_checks {
                    let check = KnowledgeCheck::new(
                        CheckId::new(next_check_id),
                        day.id(),
                        seed_check.question.clone(),
                        seed_check.order,
                    )?;
                    next_check_id += 1;
                    self.storage.checks.upsert_check(user, &check).await?;
                    summary.checks += 1;
                }
            }
        }

        tracing::info!(
            user = %user,
            weeks = summary.weeks,
            days = summary.days,
            "journey seeded"
        );
        Ok(summary)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::time::{fixed_clock, fixed_today};

    const PLAN_JSON: &str = r#"
    {
        "weeks": [
            {
                "week_number": 1,
                "title": "Foundations",
                "theme": "arrays",
                "days": [
                    {
                        "day_number": 1,
                        "title": "Arrays and hashing",
                        "xp_reward": 100,
                        "tasks": [
                            {"title": "Two Sum", "difficulty": "easy", "order": 0},
                            {"title": "Group Anagrams", "difficulty": "hard", "order": 1}
                        ],
                        "knowledge_checks": [
                            {"question": "Why does hashing help here?", "order": 0}
                        ]
                    },
                    {
                        "day_number": 2,
                        "title": "Two pointers"
                    }
                ]
            },
            {
                "week_number": 2,
                "title": "Graphs",
                "days": [
                    {"day_number": 8, "title": "BFS", "xp_reward": 150}
                ]
            }
        ]
    }
    "#;

    #[tokio::test]
    async fn seed_creates_weeks_days_tasks_and_checks() {
        let storage = Storage::in_memory();
        let seeder = JourneySeeder::new(fixed_clock(), storage.clone());
        let user = UserId::generate();

        let plan = SeedPlan::from_json(PLAN_JSON).unwrap();
        let summary = seeder.seed(user, &plan, fixed_today()).await.unwrap();

        assert_eq!(summary.weeks, 2);
        assert_eq!(summary.days, 3);
        assert_eq!(summary.tasks, 2);
        assert_eq!(summary.checks, 1);

        let weeks = storage.weeks.list_weeks(user).await.unwrap();
        assert_eq!(weeks.len(), 2);
        assert!(!weeks[0].bonus_awarded());

        let days = storage.days.list_days(user).await.unwrap();
        assert_eq!(days[0].status(), DayStatus::Active);
        assert_eq!(days[0].date(), Some(fixed_today()));
        assert_eq!(days[1].status(), DayStatus::Upcoming);
        assert_eq!(days[1].date(), Some(fixed_today() + Duration::days(1)));
        // Day numbers are 1-based within the whole journey.
        assert_eq!(days[2].day_number(), 8);
        assert_eq!(days[2].date(), Some(fixed_today() + Duration::days(7)));
        assert_eq!(days[2].xp_reward(), 150);

        let tasks = storage.tasks.tasks_for_day(user, days[0].id()).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].xp_value(), 10);
        assert_eq!(tasks[1].xp_value(), 50);

        let checks = storage
            .checks
            .checks_for_day(user, days[0].id())
            .await
            .unwrap();
        assert_eq!(checks.len(), 1);
        assert!(!checks[0].is_answered());
    }

    #[tokio::test]
    async fn reseeding_replaces_the_existing_journey() {
        let storage = Storage::in_memory();
        let seeder = JourneySeeder::new(fixed_clock(), storage.clone());
        let user = UserId::generate();
        let plan = SeedPlan::from_json(PLAN_JSON).unwrap();

        seeder.seed(user, &plan, fixed_today()).await.unwrap();
        let summary = seeder.seed(user, &plan, fixed_today()).await.unwrap();

        assert_eq!(summary.days, 3);
        assert_eq!(storage.days.list_days(user).await.unwrap().len(), 3);
        assert_eq!(storage.weeks.list_weeks(user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeding_does_not_touch_other_users() {
        let storage = Storage::in_memory();
        let seeder = JourneySeeder::new(fixed_clock(), storage.clone());
        let first = UserId::generate();
        let second = UserId::generate();
        let plan = SeedPlan::from_json(PLAN_JSON).unwrap();

        seeder.seed(first, &plan, fixed_today()).await.unwrap();
        seeder.seed(second, &plan, fixed_today()).await.unwrap();

        assert_eq!(storage.days.list_days(first).await.unwrap().len(), 3);
        assert_eq!(storage.days.list_days(second).await.unwrap().len(), 3);
    }

    #[test]
    fn malformed_plan_is_rejected() {
        let err = SeedPlan::from_json("{\"weeks\": [{\"title\": 3}]}").unwrap_err();
        assert!(matches!(err, SeedError::InvalidPlan(_)));
    }

    #[test]
    fn task_difficulty_defaults_to_medium() {
        let plan = SeedPlan::from_json(
            r#"{"weeks": [{"week_number": 1, "title": "W", "days": [
                {"day_number": 1, "title": "D", "tasks": [{"title": "T"}]}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(plan.weeks[0].days[0].tasks[0].difficulty, Difficulty::Medium);
    }
}
