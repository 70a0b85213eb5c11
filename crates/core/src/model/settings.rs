use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default quiz time limit: fifteen minutes.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 15 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be > 0")]
    InvalidTimeLimit,

    #[error("question limit must be > 0")]
    InvalidQuestionLimit,
}

/// Configuration for how a quiz is assembled and timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    time_limit_secs: u32,
    question_limit: Option<u32>,
    shuffle: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            question_limit: None,
            shuffle: false,
        }
    }
}

impl QuizSettings {
    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the time limit is zero or the question limit is `Some(0)`.
    pub fn new(
        time_limit_secs: u32,
        question_limit: Option<u32>,
        shuffle: bool,
    ) -> Result<Self, SettingsError> {
        if time_limit_secs == 0 {
            return Err(SettingsError::InvalidTimeLimit);
        }
        if question_limit == Some(0) {
            return Err(SettingsError::InvalidQuestionLimit);
        }
        Ok(Self {
            time_limit_secs,
            question_limit,
            shuffle,
        })
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn question_limit(&self) -> Option<u32> {
        self.question_limit
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }
}
