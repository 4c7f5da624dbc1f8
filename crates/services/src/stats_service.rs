use chrono::{Duration, NaiveDate};
use serde::Serialize;

use journey_core::level::level_for;
use journey_core::model::UserId;
use journey_core::time::Clock;
use storage::repository::Storage;

use crate::error::StatsError;

/// XP earned on one calendar day of the trailing week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyXp {
    pub date: NaiveDate,
    /// Three-letter uppercase weekday, e.g. `MON`.
    pub day_name: String,
    pub xp: u32,
}

/// Snapshot of a user's journey progress for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyStats {
    pub total_xp: u32,
    pub level: u32,
    pub xp_in_current: u32,
    pub xp_needed: u32,
    pub streak: u32,
    pub days_completed: usize,
    pub total_days: usize,
    pub percent_complete: u32,
    pub daily_xp: Vec<DailyXp>,
}

/// Read-only journey statistics, assembled per request.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    storage: Storage,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }

    /// Builds the stats readout for a user.
    ///
    /// `daily_xp` covers the trailing 7 calendar days ending today; days with
    /// no recorded journey day contribute zero.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if the profile is missing or a read
    /// fails.
    pub async fn journey_stats(&self, user: UserId) -> Result<JourneyStats, StatsError> {
        let profile = self.storage.profiles.get_profile(user).await?;
        let progress = level_for(profile.total_xp());

        let days = self.storage.days.list_days(user).await?;
        let total_days = days.len();
        let days_completed = days.iter().filter(|d| d.is_finalized()).count();

        let percent_complete = if total_days == 0 {
            0
        } else {
            let completed = u64::try_from(days_completed).unwrap_or(u64::MAX);
            let total = u64::try_from(total_days).unwrap_or(u64::MAX);
            u32::try_from(completed * 100 / total).unwrap_or(u32::MAX)
        };

        let today = self.clock.today();
        let week_ago = today - Duration::days(6);
        let mut daily_xp = Vec::with_capacity(7);
        for offset in 0..7 {
            let date = week_ago + Duration::days(offset);
            let xp = self
                .storage
                .days
                .day_on_date(user, date)
                .await?
                .map_or(0, |d| d.xp_earned());
            daily_xp.push(DailyXp {
                date,
                day_name: date.format("%a").to_string().to_uppercase(),
                xp,
            });
        }

        Ok(JourneyStats {
            total_xp: profile.total_xp(),
            level: progress.level,
            xp_in_current: progress.xp_into_level,
            xp_needed: progress.xp_needed,
            streak: profile.current_streak(),
            days_completed,
            total_days,
            percent_complete,
            daily_xp,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::model::{
        CompletionKind, DEFAULT_COLOR_ACCENT, Day, DayId, DayStatus, Profile, Week, WeekId,
    };
    use journey_core::time::{fixed_clock, fixed_now, fixed_today};

    async fn seed_journey(storage: &Storage, user: UserId, completed: u32, total: u32) {
        let week = Week::new(
            WeekId::new(1),
            user,
            1,
            "Week 1",
            "",
            DEFAULT_COLOR_ACCENT,
            fixed_now(),
        )
        .unwrap();
        storage.weeks.upsert_week(&week).await.unwrap();

        for number in 1..=total {
            // Day 1 is yesterday so completed days land inside the chart window.
            let date = fixed_today() + Duration::days(i64::from(number) - 2);
            let mut day = Day::new(
                DayId::new(u64::from(number)),
                user,
                week.id(),
                number,
                Some(date),
                format!("Day {number}"),
                100,
                DayStatus::Upcoming,
                fixed_now(),
            )
            .unwrap();
            if number <= completed {
                day.finalize(CompletionKind::Normal, fixed_now()).unwrap();
            }
            storage.days.upsert_day(&day).await.unwrap();
        }
    }

    #[tokio::test]
    async fn stats_summarize_level_streak_and_completion() {
        let storage = Storage::in_memory();
        let user = UserId::generate();
        let mut profile = Profile::new(user, "Dev");
        profile.add_xp(550);
        profile.record_activity(fixed_today());
        storage.profiles.upsert_profile(&profile).await.unwrap();

        seed_journey(&storage, user, 2, 3).await;

        let service = StatsService::new(fixed_clock(), storage);
        let stats = service.journey_stats(user).await.unwrap();

        assert_eq!(stats.total_xp, 550);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.xp_in_current, 50);
        assert_eq!(stats.xp_needed, 700);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.days_completed, 2);
        assert_eq!(stats.total_days, 3);
        assert_eq!(stats.percent_complete, 66);
    }

    #[tokio::test]
    async fn empty_journey_reports_zero_percent() {
        let storage = Storage::in_memory();
        let user = UserId::generate();
        storage
            .profiles
            .upsert_profile(&Profile::new(user, "Dev"))
            .await
            .unwrap();

        let service = StatsService::new(fixed_clock(), storage);
        let stats = service.journey_stats(user).await.unwrap();

        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.percent_complete, 0);
        assert_eq!(stats.level, 1);
    }

    #[tokio::test]
    async fn daily_xp_covers_the_trailing_week() {
        let storage = Storage::in_memory();
        let user = UserId::generate();
        storage
            .profiles
            .upsert_profile(&Profile::new(user, "Dev"))
            .await
            .unwrap();
        seed_journey(&storage, user, 2, 3).await;

        let service = StatsService::new(fixed_clock(), storage);
        let stats = service.journey_stats(user).await.unwrap();

        assert_eq!(stats.daily_xp.len(), 7);
        assert_eq!(stats.daily_xp[0].date, fixed_today() - Duration::days(6));
        assert_eq!(stats.daily_xp[6].date, fixed_today());

        // Day 1 (yesterday) and day 2 (today) are completed at 100 XP each.
        assert_eq!(stats.daily_xp[5].xp, 100);
        assert_eq!(stats.daily_xp[6].xp, 100);
        assert_eq!(stats.daily_xp[0].xp, 0);

        for entry in &stats.daily_xp {
            assert_eq!(entry.day_name, entry.day_name.to_uppercase());
            assert_eq!(entry.day_name.len(), 3);
        }
    }
}
