use chrono::NaiveDate;
use journey_core::model::{Day, DayId, UserId, WeekId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_day_row};
use crate::repository::{DayRepository, StorageError};

const DAY_COLUMNS: &str = "id, user_id, week_id, day_number, date, title, status, completion_type, \
     xp_modifier, xp_reward, xp_earned, notes, completed_at, created_at";

#[async_trait::async_trait]
impl DayRepository for SqliteRepository {
    async fn upsert_day(&self, day: &Day) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO days (id, user_id, week_id, day_number, date, title, status, completion_type,
                              xp_modifier, xp_reward, xp_earned, notes, completed_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id, user_id) DO UPDATE SET
                week_id = excluded.week_id,
                day_number = excluded.day_number,
                date = excluded.date,
                title = excluded.title,
                status = excluded.status,
                completion_type = excluded.completion_type,
                xp_modifier = excluded.xp_modifier,
                xp_reward = excluded.xp_reward,
                xp_earned = excluded.xp_earned,
                notes = excluded.notes,
                completed_at = excluded.completed_at
            ",
        )
        .bind(id_to_i64("id", day.id().value())?)
        .bind(day.user_id().to_string())
        .bind(id_to_i64("week_id", day.week_id().value())?)
        .bind(i64::from(day.day_number()))
        .bind(day.date())
        .bind(day.title())
        .bind(day.status().as_str())
        .bind(day.completion_type().as_str())
        .bind(day.xp_modifier())
        .bind(i64::from(day.xp_reward()))
        .bind(i64::from(day.xp_earned()))
        .bind(day.notes())
        .bind(day.completed_at())
        .bind(day.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_day(&self, user: UserId, id: DayId) -> Result<Day, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM days WHERE id = ?1 AND user_id = ?2"
        ))
        .bind(id_to_i64("id", id.value())?)
        .bind(user.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_day_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn day_on_date(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Option<Day>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM days WHERE user_id = ?1 AND date = ?2 \
             ORDER BY day_number ASC LIMIT 1"
        ))
        .bind(user.to_string())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|row| map_day_row(&row)).transpose()
    }

    async fn days_in_week(&self, user: UserId, week: WeekId) -> Result<Vec<Day>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM days WHERE user_id = ?1 AND week_id = ?2 \
             ORDER BY day_number ASC"
        ))
        .bind(user.to_string())
        .bind(id_to_i64("week_id", week.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            days.push(map_day_row(&row)?);
        }
        Ok(days)
    }

    async fn list_days(&self, user: UserId) -> Result<Vec<Day>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {DAY_COLUMNS} FROM days WHERE user_id = ?1 ORDER BY day_number ASC"
        ))
        .bind(user.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            days.push(map_day_row(&row)?);
        }
        Ok(days)
    }
}
