#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod authoring;
pub mod error;
pub mod history;
pub mod quiz;
pub mod shell;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use auth::{Authenticator, GuestAuthenticator};
pub use authoring::QuestionBatch;
pub use error::{
    AppServicesError, AuthError, AuthoringError, QuizServiceError, SessionError, ShellError,
};
pub use history::{AttemptListItem, HistoryOverview, HistoryService, summarize};
pub use quiz::{
    Countdown, QuestionReview, QuestionStatus, QuizLoopService, QuizRun, QuizSession,
    ResultsReport, SessionPhase, SessionProgress, Tick, TickOutcome,
};
pub use shell::{AppShell, Notice, NoticeLevel, Screen};
