use journey_core::model::{UserId, Week, WeekId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_week_row};
use crate::repository::{StorageError, WeekRepository};

#[async_trait::async_trait]
impl WeekRepository for SqliteRepository {
    async fn upsert_week(&self, week: &Week) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO weeks (id, user_id, week_number, title, theme, color_accent, bonus_awarded, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id, user_id) DO UPDATE SET
                week_number = excluded.week_number,
                title = excluded.title,
                theme = excluded.theme,
                color_accent = excluded.color_accent,
                bonus_awarded = excluded.bonus_awarded
            ",
        )
        .bind(id_to_i64("id", week.id().value())?)
        .bind(week.user_id().to_string())
        .bind(i64::from(week.week_number()))
        .bind(week.title())
        .bind(week.theme())
        .bind(week.color_accent())
        .bind(i64::from(week.bonus_awarded()))
        .bind(week.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_week(&self, user: UserId, id: WeekId) -> Result<Week, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, week_number, title, theme, color_accent, bonus_awarded, created_at
            FROM weeks WHERE id = ?1 AND user_id = ?2
            ",
        )
        .bind(id_to_i64("id", id.value())?)
        .bind(user.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_week_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn list_weeks(&self, user: UserId) -> Result<Vec<Week>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, week_number, title, theme, color_accent, bonus_awarded, created_at
            FROM weeks
            WHERE user_id = ?1
            ORDER BY week_number ASC
            ",
        )
        .bind(user.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut weeks = Vec::with_capacity(rows.len());
        for row in rows {
            weeks.push(map_week_row(&row)?);
        }
        Ok(weeks)
    }

    async fn delete_weeks(&self, user: UserId) -> Result<(), StorageError> {
        // Days, tasks and checks go with the weeks via ON DELETE CASCADE.
        sqlx::query("DELETE FROM weeks WHERE user_id = ?1")
            .bind(user.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
