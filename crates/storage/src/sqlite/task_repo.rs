use journey_core::model::{Task, TaskId, UserId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_task_row};
use crate::repository::{StorageError, TaskRepository};

#[async_trait::async_trait]
impl TaskRepository for SqliteRepository {
    async fn upsert_task(&self, user: UserId, task: &Task) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO tasks (id, user_id, day_id, title, description, difficulty, xp_value, sort_order, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id, user_id) DO UPDATE SET
                day_id = excluded.day_id,
                title = excluded.title,
                description = excluded.description,
                difficulty = excluded.difficulty,
                xp_value = excluded.xp_value,
                sort_order = excluded.sort_order,
                completed_at = excluded.completed_at
            ",
        )
        .bind(id_to_i64("id", task.id().value())?)
        .bind(user.to_string())
        .bind(id_to_i64("day_id", task.day_id().value())?)
        .bind(task.title())
        .bind(task.description())
        .bind(task.difficulty().as_str())
        .bind(i64::from(task.xp_value()))
        .bind(i64::from(task.order()))
        .bind(task.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_task(&self, user: UserId, id: TaskId) -> Result<Task, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, day_id, title, description, difficulty, xp_value, sort_order, completed_at
            FROM tasks WHERE id = ?1 AND user_id = ?2
            ",
        )
        .bind(id_to_i64("id", id.value())?)
        .bind(user.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_task_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn tasks_for_day(
        &self,
        user: UserId,
        day: journey_core::model::DayId,
    ) -> Result<Vec<Task>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, day_id, title, description, difficulty, xp_value, sort_order, completed_at
            FROM tasks
            WHERE user_id = ?1 AND day_id = ?2
            ORDER BY sort_order ASC, id ASC
            ",
        )
        .bind(user.to_string())
        .bind(id_to_i64("day_id", day.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            tasks.push(map_task_row(&row)?);
        }
        Ok(tasks)
    }
}
