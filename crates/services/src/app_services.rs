use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::authoring::QuestionBatch;
use crate::error::AppServicesError;
use crate::history::HistoryService;
use crate::quiz::QuizLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    storage: Storage,
    quiz_loop: Arc<QuizLoopService>,
    history: Arc<HistoryService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, clock, settings))
    }

    #[must_use]
    pub fn in_memory(clock: Clock, settings: QuizSettings) -> Self {
        Self::from_storage(Storage::in_memory(), clock, settings)
    }

    #[must_use]
    pub fn from_storage(storage: Storage, clock: Clock, settings: QuizSettings) -> Self {
        let quiz_loop = Arc::new(
            QuizLoopService::new(
                clock,
                Arc::clone(&storage.questions),
                Arc::clone(&storage.attempts),
            )
            .with_settings(settings),
        );
        let history = Arc::new(HistoryService::new(Arc::clone(&storage.attempts)));

        Self {
            clock,
            storage,
            quiz_loop,
            history,
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    /// Fresh, empty authoring batch writing to the question store.
    #[must_use]
    pub fn question_batch(&self) -> QuestionBatch {
        QuestionBatch::new(self.clock, Arc::clone(&self.storage.questions))
    }

    /// Number of questions a quiz can currently draw from.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` on repository failures.
    pub async fn question_count(&self) -> Result<u32, AppServicesError> {
        Ok(self.storage.questions.count_active_questions().await?)
    }
}
