use quiz_core::model::AttemptRecord;

use super::SqliteRepository;
use super::mapping::{db_err, id_i64, map_attempt_row};
use crate::repository::{AttemptRepository, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &AttemptRecord) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_attempts (
                    id, completed_at, score, total_questions,
                    time_spent, category, difficulty, percentage
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(id) DO NOTHING
            ",
        )
        .bind(attempt.id().to_string())
        .bind(attempt.completed_at())
        .bind(i64::from(attempt.score()))
        .bind(i64::from(attempt.total_questions()))
        .bind(id_i64("time_spent", attempt.time_spent_secs())?)
        .bind(attempt.category())
        .bind(attempt.difficulty())
        .bind(i64::from(attempt.percentage()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn list_attempts(&self, limit: u32) -> Result<Vec<AttemptRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, completed_at, score, total_questions,
                    time_spent, category, difficulty, percentage
                FROM quiz_attempts
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}
