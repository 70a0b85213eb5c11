use quiz_core::model::{AttemptId, AttemptRecord, Difficulty, Question, QuestionId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Constraint and statement failures keep the backend message; everything
/// else is treated as a connection problem.
pub(crate) fn db_err(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::Database(db) => StorageError::Database(db.message().to_string()),
        other => StorageError::Connection(other.to_string()),
    }
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn encode_options(options: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(options).map_err(ser)
}

fn decode_options(raw: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let options = decode_options(&row.try_get::<String, _>("options").map_err(ser)?)?;
    let correct_answer = usize::try_from(row.try_get::<i64, _>("correct_answer").map_err(ser)?)
        .map_err(ser)?;
    let difficulty: Difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    Question::from_persisted(
        id,
        row.try_get("question").map_err(ser)?,
        options,
        correct_answer,
        row.try_get("explanation").map_err(ser)?,
        row.try_get("category").map_err(ser)?,
        difficulty,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRecord, StorageError> {
    let id: AttemptId = row
        .try_get::<String, _>("id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let time_spent = i64_to_u64("time_spent", row.try_get::<i64, _>("time_spent").map_err(ser)?)?;

    AttemptRecord::from_persisted(
        id,
        row.try_get("completed_at").map_err(ser)?,
        u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
        u32_from_i64(
            "total_questions",
            row.try_get::<i64, _>("total_questions").map_err(ser)?,
        )?,
        time_spent,
        row.try_get("category").map_err(ser)?,
        row.try_get("difficulty").map_err(ser)?,
        u32_from_i64("percentage", row.try_get::<i64, _>("percentage").map_err(ser)?)?,
    )
    .map_err(ser)
}
