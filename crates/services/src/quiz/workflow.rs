use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::info;

use quiz_core::model::{AttemptId, AttemptRecord, MIXED_LABEL, Question, QuizSettings};
use storage::repository::{AttemptRepository, QuestionRepository};

use super::run::QuizRun;
use super::session::QuizSession;
use crate::Clock;
use crate::error::{QuizServiceError, SessionError};

/// Orchestrates loading questions, running quizzes and recording attempts.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRepository>,
    settings: QuizSettings,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            attempts,
            settings: QuizSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Load the question list for the next quiz, honoring limit and shuffle.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` on repository failures.
    pub async fn load_questions(&self) -> Result<Vec<Question>, QuizServiceError> {
        let mut questions = self
            .questions
            .list_active_questions(self.settings.question_limit())
            .await?;
        if self.settings.shuffle() {
            questions.shuffle(&mut rand::rng());
        }
        Ok(questions)
    }

    /// Build an idle session for the next quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` (wrapped) if the question bank is empty.
    pub async fn prepare_session(&self) -> Result<QuizSession, QuizServiceError> {
        let questions = self.load_questions().await?;
        Ok(QuizSession::new(questions, self.settings.time_limit_secs())?)
    }

    /// Prepare a session and start it with its countdown.
    ///
    /// # Errors
    ///
    /// Same as [`QuizLoopService::prepare_session`].
    pub async fn start_quiz(&self) -> Result<QuizRun, QuizServiceError> {
        let session = self.prepare_session().await?;
        info!(
            questions = session.total_questions(),
            time_limit_secs = session.time_limit_secs(),
            "starting quiz"
        );
        Ok(QuizRun::start(session, self.clock)?)
    }

    /// Persist the attempt of a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotCompleted` (wrapped) if the session is still
    /// running, or storage errors from the attempt repository.
    pub async fn record_attempt(
        &self,
        session: &QuizSession,
    ) -> Result<AttemptRecord, QuizServiceError> {
        let result = session.result().ok_or(SessionError::NotCompleted)?;
        let (category, difficulty) = attempt_labels(session.questions());
        let record = AttemptRecord::from_completion(
            AttemptId::generate(),
            self.clock.now(),
            result,
            category,
            difficulty,
        )?;
        self.attempts.append_attempt(&record).await?;
        info!(
            attempt = %record.id(),
            score = record.score(),
            percentage = record.percentage(),
            "attempt recorded"
        );
        Ok(record)
    }
}

/// Category and difficulty labels for an attempt over `questions`.
///
/// A label is the shared value when every question agrees, otherwise `"Mixed"`.
#[must_use]
pub fn attempt_labels(questions: &[Question]) -> (String, String) {
    fn shared<'a>(mut values: impl Iterator<Item = &'a str>) -> String {
        match values.next() {
            Some(first) if values.all(|v| v == first) => first.to_string(),
            _ => MIXED_LABEL.to_string(),
        }
    }

    (
        shared(questions.iter().map(Question::category)),
        shared(questions.iter().map(|q| q.difficulty().as_str())),
    )
}
