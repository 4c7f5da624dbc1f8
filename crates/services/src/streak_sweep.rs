use chrono::Duration;

use journey_core::model::UserId;
use journey_core::time::Clock;
use storage::repository::Storage;

use crate::error::SweepError;

/// Scheduled sweep that clears streaks for users who went inactive.
///
/// The on-activity tracker only runs when a user shows up, so a user who
/// never returns would keep a stale streak forever; this sweep is the other
/// half of the rule. It only ever force-decreases: `longest_streak` and
/// `last_active_date` are never touched, and it must not run concurrently
/// with the same user's own completion request.
#[derive(Clone)]
pub struct StreakSweep {
    clock: Clock,
    storage: Storage,
}

impl StreakSweep {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }

    /// Clears the current streak of every profile whose last activity is
    /// strictly older than yesterday, returning how many were reset.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::Storage` if reading or writing profiles fails.
    pub async fn run(&self) -> Result<usize, SweepError> {
        let yesterday = self.clock.today() - Duration::days(1);
        let stale = self
            .storage
            .profiles
            .profiles_last_active_before(yesterday)
            .await?;

        let mut reset: Vec<UserId> = Vec::new();
        for mut profile in stale {
            if profile.current_streak() == 0 {
                continue;
            }
            profile.clear_streak();
            self.storage.profiles.upsert_profile(&profile).await?;
            reset.push(profile.user_id());
        }

        tracing::info!(count = reset.len(), "streak sweep reset stale streaks");
        Ok(reset.len())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use journey_core::model::Profile;
    use journey_core::time::{fixed_clock, fixed_today};

    async fn seed_profile(storage: &Storage, name: &str, active_days_ago: Option<i64>) -> UserId {
        let user = UserId::generate();
        let mut profile = Profile::new(user, name);
        if let Some(days_ago) = active_days_ago {
            profile.record_activity(fixed_today() - Duration::days(days_ago));
        }
        storage.profiles.upsert_profile(&profile).await.unwrap();
        user
    }

    #[tokio::test]
    async fn sweep_resets_only_stale_positive_streaks() {
        let storage = Storage::in_memory();

        let stale = seed_profile(&storage, "Stale", Some(3)).await;
        let yesterday = seed_profile(&storage, "Yesterday", Some(1)).await;
        let today = seed_profile(&storage, "Today", Some(0)).await;
        let never = seed_profile(&storage, "Never", None).await;

        let sweep = StreakSweep::new(fixed_clock(), storage.clone());
        let count = sweep.run().await.unwrap();
        assert_eq!(count, 1);

        assert_eq!(
            storage.profiles.get_profile(stale).await.unwrap().current_streak(),
            0
        );
        assert_eq!(
            storage
                .profiles
                .get_profile(yesterday)
                .await
                .unwrap()
                .current_streak(),
            1
        );
        assert_eq!(
            storage.profiles.get_profile(today).await.unwrap().current_streak(),
            1
        );
        assert_eq!(
            storage.profiles.get_profile(never).await.unwrap().current_streak(),
            0
        );
    }

    #[tokio::test]
    async fn sweep_preserves_longest_streak_and_last_active() {
        let storage = Storage::in_memory();
        let user = UserId::generate();
        let mut profile = Profile::new(user, "Dev");
        for days_ago in (3..=7).rev() {
            profile.record_activity(fixed_today() - Duration::days(days_ago));
        }
        assert_eq!(profile.current_streak(), 5);
        storage.profiles.upsert_profile(&profile).await.unwrap();

        let sweep = StreakSweep::new(fixed_clock(), storage.clone());
        sweep.run().await.unwrap();

        let swept = storage.profiles.get_profile(user).await.unwrap();
        assert_eq!(swept.current_streak(), 0);
        assert_eq!(swept.longest_streak(), 5);
        assert_eq!(swept.last_active_date(), Some(fixed_today() - Duration::days(3)));
    }

    #[tokio::test]
    async fn repeat_sweep_is_a_no_op() {
        let storage = Storage::in_memory();
        seed_profile(&storage, "Stale", Some(4)).await;

        let sweep = StreakSweep::new(fixed_clock(), storage.clone());
        assert_eq!(sweep.run().await.unwrap(), 1);
        assert_eq!(sweep.run().await.unwrap(), 0);
    }
}
