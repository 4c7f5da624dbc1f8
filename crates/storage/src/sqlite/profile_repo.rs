use chrono::NaiveDate;
use journey_core::model::{Profile, UserId};

use super::SqliteRepository;
use super::mapping::map_profile_row;
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO profiles (user_id, display_name, total_xp, current_streak, longest_streak, last_active_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                total_xp = excluded.total_xp,
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                last_active_date = excluded.last_active_date
            ",
        )
        .bind(profile.user_id().to_string())
        .bind(profile.display_name())
        .bind(i64::from(profile.total_xp()))
        .bind(i64::from(profile.current_streak()))
        .bind(i64::from(profile.longest_streak()))
        .bind(profile.last_active_date())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, display_name, total_xp, current_streak, longest_streak, last_active_date
            FROM profiles WHERE user_id = ?1
            ",
        )
        .bind(user.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_profile_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn profiles_last_active_before(
        &self,
        cutoff: NaiveDate,
    ) -> Result<Vec<Profile>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT user_id, display_name, total_xp, current_streak, longest_streak, last_active_date
            FROM profiles
            WHERE last_active_date IS NOT NULL AND last_active_date < ?1
            ORDER BY user_id ASC
            ",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            profiles.push(map_profile_row(&row)?);
        }
        Ok(profiles)
    }
}
