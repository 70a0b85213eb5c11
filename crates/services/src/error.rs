//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AttemptError, QuestionError, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::shell::Screen;

/// Errors emitted by the quiz session state machine.
///
/// Every variant except `Empty` is a validation condition: the session is
/// left unchanged and the message is meant for display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for quiz")]
    Empty,
    #[error("time limit must be > 0")]
    InvalidTimeLimit,
    #[error("quiz has not started")]
    NotStarted,
    #[error("quiz already started")]
    AlreadyStarted,
    #[error("quiz is not completed yet")]
    NotCompleted,
    #[error("option {option} is out of range (question has {options} options)")]
    OptionOutOfRange { option: usize, options: usize },
    #[error("question {index} is out of range (quiz has {total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },
    #[error("answer at least one question before submitting")]
    NothingAnswered,
}

/// Errors emitted by `QuizLoopService` and `HistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuestionBatch`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error(transparent)]
    Draft(#[from] QuestionError),
    #[error("add some questions before saving")]
    EmptyBatch,
    #[error("no staged question at index {index} (batch has {len})")]
    NoSuchDraft { index: usize, len: usize },
    #[error("failed to save questions: {0}")]
    Save(#[source] StorageError),
}

/// Errors emitted by an `Authenticator`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("{0}")]
    Rejected(String),
}

/// Errors emitted by `AppShell` transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShellError {
    #[error("sign in first")]
    NotSignedIn,
    #[error("cannot {action} from the {from:?} screen")]
    InvalidTransition { from: Screen, action: &'static str },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
