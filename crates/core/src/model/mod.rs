mod answer;
mod attempt;
mod completion;
mod history;
mod ids;
mod question;
mod settings;
mod user;

pub use ids::{AttemptId, ParseIdError, QuestionId};

pub use answer::AnswerSet;
pub use attempt::{AttemptError, AttemptRecord, MIXED_LABEL};
pub use completion::{CompletionResult, CompletionTrigger, Performance, percentage};
pub use history::HistorySummary;
pub use question::{
    Difficulty, OPTION_COUNT, Question, QuestionDraft, QuestionError, ValidatedQuestion,
    option_label,
};
pub use settings::{DEFAULT_TIME_LIMIT_SECS, QuizSettings, SettingsError};
pub use user::{STREAK_THRESHOLD, UserProfile, UserStats};
