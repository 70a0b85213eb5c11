use async_trait::async_trait;
use quiz_core::model::{AttemptRecord, Question, QuestionId, ValidatedQuestion};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    /// Statement rejected by the database, carrying the backend's message as is.
    #[error("{0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Source of quiz questions and sink for newly authored ones.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist a batch of validated questions in one atomic step.
    ///
    /// Either every question is stored or none is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch cannot be stored.
    async fn insert_questions(
        &self,
        questions: &[ValidatedQuestion],
    ) -> Result<Vec<QuestionId>, StorageError>;

    /// Fetch active questions in insertion order, optionally capped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_active_questions(&self, limit: Option<u32>)
    -> Result<Vec<Question>, StorageError>;

    /// Count active questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_active_questions(&self) -> Result<u32, StorageError>;
}

/// Store of completed quiz attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an attempt with the same id exists.
    async fn append_attempt(&self, attempt: &AttemptRecord) -> Result<(), StorageError>;

    /// List attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_attempts(&self, limit: u32) -> Result<Vec<AttemptRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    attempts: Arc<Mutex<Vec<AttemptRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_questions(
        &self,
        questions: &[ValidatedQuestion],
    ) -> Result<Vec<QuestionId>, StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        let next = guard.iter().map(|q| q.id().value()).max().unwrap_or(0) + 1;

        let staged: Vec<Question> = questions
            .iter()
            .cloned()
            .zip(next..)
            .map(|(q, id)| q.assign_id(QuestionId::new(id)))
            .collect();
        let ids = staged.iter().map(Question::id).collect();
        guard.extend(staged);
        Ok(ids)
    }

    async fn list_active_questions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(guard.iter().take(take).cloned().collect())
    }

    async fn count_active_questions(&self) -> Result<u32, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        u32::try_from(guard.len()).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &AttemptRecord) -> Result<(), StorageError> {
        let mut guard = self.attempts.lock().map_err(poisoned)?;
        if guard.iter().any(|a| a.id() == attempt.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(attempt.clone());
        Ok(())
    }

    async fn list_attempts(&self, limit: u32) -> Result<Vec<AttemptRecord>, StorageError> {
        let guard = self.attempts.lock().map_err(poisoned)?;
        let mut out: Vec<AttemptRecord> = guard.clone();
        out.sort_by_key(|a| std::cmp::Reverse(a.completed_at()));
        out.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(out)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo);
        Self {
            questions,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{AttemptId, Difficulty, QuestionDraft};
    use quiz_core::time::fixed_now;

    fn validated(prompt: &str) -> ValidatedQuestion {
        QuestionDraft {
            prompt: prompt.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 2,
            explanation: String::new(),
            category: "General".into(),
            difficulty: Difficulty::Medium,
        }
        .validate(fixed_now())
        .unwrap()
    }

    #[tokio::test]
    async fn inserted_questions_get_sequential_ids() {
        let repo = InMemoryRepository::new();
        let first = repo
            .insert_questions(&[validated("Q1"), validated("Q2")])
            .await
            .unwrap();
        let second = repo.insert_questions(&[validated("Q3")]).await.unwrap();

        assert_eq!(first, vec![QuestionId::new(1), QuestionId::new(2)]);
        assert_eq!(second, vec![QuestionId::new(3)]);
        assert_eq!(repo.count_active_questions().await.unwrap(), 3);

        let limited = repo.list_active_questions(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].prompt(), "Q1");
    }

    #[tokio::test]
    async fn attempts_list_newest_first_and_reject_duplicates() {
        let repo = InMemoryRepository::new();
        let older = AttemptRecord::new(
            AttemptId::generate(),
            fixed_now() - Duration::days(1),
            5,
            10,
            300,
            "General",
            "easy",
        )
        .unwrap();
        let newer =
            AttemptRecord::new(AttemptId::generate(), fixed_now(), 9, 10, 200, "General", "hard")
                .unwrap();

        repo.append_attempt(&older).await.unwrap();
        repo.append_attempt(&newer).await.unwrap();
        assert!(matches!(
            repo.append_attempt(&newer).await,
            Err(StorageError::Conflict)
        ));

        let listed = repo.list_attempts(10).await.unwrap();
        assert_eq!(listed, vec![newer, older.clone()]);
        assert_eq!(repo.list_attempts(1).await.unwrap().len(), 1);
    }
}
