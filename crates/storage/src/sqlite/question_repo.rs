use quiz_core::model::{Question, QuestionId, ValidatedQuestion};

use super::SqliteRepository;
use super::mapping::{
    db_err, encode_options, map_question_row, question_id_from_i64, ser, u32_from_i64,
};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_questions(
        &self,
        questions: &[ValidatedQuestion],
    ) -> Result<Vec<QuestionId>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let mut ids = Vec::with_capacity(questions.len());

        for question in questions {
            let correct = i64::try_from(question.correct_answer).map_err(ser)?;
            let res = sqlx::query(
                r"
                    INSERT INTO questions (
                        question, options, correct_answer, explanation,
                        category, difficulty, is_active, created_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)
                ",
            )
            .bind(&question.prompt)
            .bind(encode_options(&question.options)?)
            .bind(correct)
            .bind(&question.explanation)
            .bind(&question.category)
            .bind(question.difficulty.as_str())
            .bind(question.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            ids.push(question_id_from_i64(res.last_insert_rowid())?);
        }

        // Dropping the transaction on an early return rolls the batch back.
        tx.commit().await.map_err(db_err)?;
        Ok(ids)
    }

    async fn list_active_questions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, question, options, correct_answer, explanation, category, difficulty
                FROM questions
                WHERE is_active = 1
                ORDER BY id ASC
                LIMIT ?1
            ",
        )
        .bind(limit.map_or(-1_i64, i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn count_active_questions(&self) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        u32_from_i64("count", count)
    }
}
