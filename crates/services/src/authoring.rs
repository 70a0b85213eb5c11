use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::model::{QuestionDraft, QuestionId, ValidatedQuestion};
use storage::repository::QuestionRepository;

use crate::Clock;
use crate::error::AuthoringError;

/// Staging area for administrative question entry.
///
/// Drafts are validated as they are added and saved together in one atomic
/// repository call. A failed save leaves the batch intact for a retry.
pub struct QuestionBatch {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    staged: Vec<ValidatedQuestion>,
}

impl QuestionBatch {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            clock,
            questions,
            staged: Vec::new(),
        }
    }

    #[must_use]
    pub fn staged(&self) -> &[ValidatedQuestion] {
        &self.staged
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Validate `draft` and stage it. Returns the new batch size.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Draft` if validation fails; the batch is unchanged.
    pub fn add(&mut self, draft: QuestionDraft) -> Result<usize, AuthoringError> {
        let validated = draft.validate(self.clock.now())?;
        self.staged.push(validated);
        Ok(self.staged.len())
    }

    /// Drop the staged draft at `index`.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NoSuchDraft` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<ValidatedQuestion, AuthoringError> {
        if index >= self.staged.len() {
            return Err(AuthoringError::NoSuchDraft {
                index,
                len: self.staged.len(),
            });
        }
        Ok(self.staged.remove(index))
    }

    /// Persist every staged question at once and clear the batch.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::EmptyBatch` when nothing is staged and
    /// `AuthoringError::Save` with the repository message when the store
    /// refuses the batch. Staged questions are kept on error.
    pub async fn save_all(&mut self) -> Result<Vec<QuestionId>, AuthoringError> {
        if self.staged.is_empty() {
            return Err(AuthoringError::EmptyBatch);
        }

        match self.questions.insert_questions(&self.staged).await {
            Ok(ids) => {
                info!(count = ids.len(), "question batch saved");
                self.staged.clear();
                Ok(ids)
            }
            Err(err) => {
                warn!(error = %err, staged = self.staged.len(), "question batch rejected");
                Err(AuthoringError::Save(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{Difficulty, Question, QuestionError};
    use quiz_core::time::fixed_clock;
    use storage::repository::{InMemoryRepository, StorageError};

    fn draft(prompt: &str) -> QuestionDraft {
        QuestionDraft {
            prompt: prompt.into(),
            options: vec!["Japan".into(), "France".into(), "UK".into(), "Australia".into()],
            correct_answer: 1,
            explanation: "Paris 2024.".into(),
            category: "Sports".into(),
            difficulty: Difficulty::Easy,
        }
    }

    struct RejectingRepo(&'static str);

    #[async_trait]
    impl QuestionRepository for RejectingRepo {
        async fn insert_questions(
            &self,
            _questions: &[ValidatedQuestion],
        ) -> Result<Vec<QuestionId>, StorageError> {
            Err(StorageError::Database(self.0.to_string()))
        }

        async fn list_active_questions(
            &self,
            _limit: Option<u32>,
        ) -> Result<Vec<Question>, StorageError> {
            Ok(Vec::new())
        }

        async fn count_active_questions(&self) -> Result<u32, StorageError> {
            Ok(0)
        }
    }

    #[test]
    fn invalid_draft_is_not_staged() {
        let mut batch = QuestionBatch::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let mut bad = draft("Who hosted?");
        bad.options[3] = String::new();

        let err = batch.add(bad).unwrap_err();
        assert!(matches!(err, AuthoringError::Draft(QuestionError::EmptyOption(3))));
        assert!(batch.is_empty());
    }

    #[test]
    fn remove_checks_bounds() {
        let mut batch = QuestionBatch::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        batch.add(draft("One")).unwrap();
        batch.add(draft("Two")).unwrap();

        let removed = batch.remove(0).unwrap();
        assert_eq!(removed.prompt, "One");
        assert_eq!(batch.staged()[0].prompt, "Two");
        assert!(matches!(
            batch.remove(5),
            Err(AuthoringError::NoSuchDraft { index: 5, len: 1 })
        ));
    }

    #[tokio::test]
    async fn empty_batch_cannot_be_saved() {
        let mut batch = QuestionBatch::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        assert!(matches!(
            batch.save_all().await,
            Err(AuthoringError::EmptyBatch)
        ));
    }

    #[tokio::test]
    async fn save_all_persists_and_clears() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut batch = QuestionBatch::new(fixed_clock(), repo.clone());
        batch.add(draft("One")).unwrap();
        assert_eq!(batch.add(draft("Two")).unwrap(), 2);

        let ids = batch.save_all().await.unwrap();
        assert_eq!(ids.len(), 2);
        assert!(batch.is_empty());
        assert_eq!(repo.count_active_questions().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_save_surfaces_message_and_keeps_batch() {
        let mut batch = QuestionBatch::new(
            fixed_clock(),
            Arc::new(RejectingRepo("CHECK constraint failed: correct_answer BETWEEN 0 AND 3")),
        );
        batch.add(draft("One")).unwrap();
        batch.add(draft("Two")).unwrap();

        let err = batch.save_all().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to save questions: CHECK constraint failed: correct_answer BETWEEN 0 AND 3"
        );
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.staged()[1].prompt, "Two");
    }
}
