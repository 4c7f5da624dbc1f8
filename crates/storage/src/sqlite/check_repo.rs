use journey_core::model::{CheckId, DayId, KnowledgeCheck, UserId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_check_row};
use crate::repository::{KnowledgeCheckRepository, StorageError};

#[async_trait::async_trait]
impl KnowledgeCheckRepository for SqliteRepository {
    async fn upsert_check(
        &self,
        user: UserId,
        check: &KnowledgeCheck,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO knowledge_checks (id, user_id, day_id, question, answer_notes, sort_order, is_answered)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id, user_id) DO UPDATE SET
                day_id = excluded.day_id,
                question = excluded.question,
                answer_notes = excluded.answer_notes,
                sort_order = excluded.sort_order,
                is_answered = excluded.is_answered
            ",
        )
        .bind(id_to_i64("id", check.id().value())?)
        .bind(user.to_string())
        .bind(id_to_i64("day_id", check.day_id().value())?)
        .bind(check.question())
        .bind(check.answer_notes())
        .bind(i64::from(check.order()))
        .bind(i64::from(check.is_answered()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_check(&self, user: UserId, id: CheckId) -> Result<KnowledgeCheck, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, day_id, question, answer_notes, sort_order, is_answered
            FROM knowledge_checks WHERE id = ?1 AND user_id = ?2
            ",
        )
        .bind(id_to_i64("id", id.value())?)
        .bind(user.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_check_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn checks_for_day(
        &self,
        user: UserId,
        day: DayId,
    ) -> Result<Vec<KnowledgeCheck>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, day_id, question, answer_notes, sort_order, is_answered
            FROM knowledge_checks
            WHERE user_id = ?1 AND day_id = ?2
            ORDER BY sort_order ASC, id ASC
            ",
        )
        .bind(user.to_string())
        .bind(id_to_i64("day_id", day.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut checks = Vec::with_capacity(rows.len());
        for row in rows {
            checks.push(map_check_row(&row)?);
        }
        Ok(checks)
    }
}
