use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::completion::{CompletionResult, percentage};
use crate::model::ids::AttemptId;

/// Label used when an attempt spans more than one category or difficulty.
pub const MIXED_LABEL: &str = "Mixed";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt must cover at least one question")]
    NoQuestions,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreOutOfRange { score: u32, total: u32 },

    #[error("stored percentage ({stored}) does not match score ({expected})")]
    PercentageMismatch { stored: u32, expected: u32 },
}

/// Persisted summary of one completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    id: AttemptId,
    completed_at: DateTime<Utc>,
    score: u32,
    total_questions: u32,
    time_spent_secs: u64,
    category: String,
    difficulty: String,
    percentage: u32,
}

impl AttemptRecord {
    /// Build a new record, deriving the percentage from the score.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoQuestions` if `total_questions` is zero.
    /// Returns `AttemptError::ScoreOutOfRange` if `score > total_questions`.
    pub fn new(
        id: AttemptId,
        completed_at: DateTime<Utc>,
        score: u32,
        total_questions: u32,
        time_spent_secs: u64,
        category: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, AttemptError> {
        if total_questions == 0 {
            return Err(AttemptError::NoQuestions);
        }
        if score > total_questions {
            return Err(AttemptError::ScoreOutOfRange {
                score,
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            completed_at,
            score,
            total_questions,
            time_spent_secs,
            category: category.into(),
            difficulty: difficulty.into(),
            percentage: percentage(score, total_questions),
        })
    }

    /// Build a record for a finished session.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if the result covers no questions.
    pub fn from_completion(
        id: AttemptId,
        completed_at: DateTime<Utc>,
        result: &CompletionResult,
        category: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, AttemptError> {
        Self::new(
            id,
            completed_at,
            result.score,
            result.total_questions,
            result.elapsed_secs,
            category,
            difficulty,
        )
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::PercentageMismatch` if the stored percentage
    /// disagrees with the stored score, plus the errors of [`AttemptRecord::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: AttemptId,
        completed_at: DateTime<Utc>,
        score: u32,
        total_questions: u32,
        time_spent_secs: u64,
        category: String,
        difficulty: String,
        stored_percentage: u32,
    ) -> Result<Self, AttemptError> {
        let record = Self::new(
            id,
            completed_at,
            score,
            total_questions,
            time_spent_secs,
            category,
            difficulty,
        )?;
        if record.percentage != stored_percentage {
            return Err(AttemptError::PercentageMismatch {
                stored: stored_percentage,
                expected: record.percentage,
            });
        }
        Ok(record)
    }

    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerSet, CompletionTrigger};
    use crate::time::fixed_now;

    #[test]
    fn new_derives_percentage() {
        let record =
            AttemptRecord::new(AttemptId::generate(), fixed_now(), 8, 10, 420, "Sports", "easy")
                .unwrap();
        assert_eq!(record.percentage(), 80);
        assert_eq!(record.category(), "Sports");
    }

    #[test]
    fn rejects_empty_and_overflowing_scores() {
        let id = AttemptId::generate();
        assert_eq!(
            AttemptRecord::new(id, fixed_now(), 0, 0, 0, "x", "y").unwrap_err(),
            AttemptError::NoQuestions
        );
        assert_eq!(
            AttemptRecord::new(id, fixed_now(), 11, 10, 0, "x", "y").unwrap_err(),
            AttemptError::ScoreOutOfRange {
                score: 11,
                total: 10
            }
        );
    }

    #[test]
    fn from_persisted_checks_percentage() {
        let err = AttemptRecord::from_persisted(
            AttemptId::generate(),
            fixed_now(),
            5,
            10,
            60,
            "General".into(),
            MIXED_LABEL.into(),
            70,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AttemptError::PercentageMismatch {
                stored: 70,
                expected: 50
            }
        );
    }

    #[test]
    fn from_completion_carries_elapsed_time() {
        let result = CompletionResult {
            score: 2,
            answers: AnswerSet::unanswered(4),
            elapsed_secs: 95,
            total_questions: 4,
            trigger: CompletionTrigger::Timeout,
        };
        let record = AttemptRecord::from_completion(
            AttemptId::generate(),
            fixed_now(),
            &result,
            MIXED_LABEL,
            "medium",
        )
        .unwrap();
        assert_eq!(record.time_spent_secs(), 95);
        assert_eq!(record.percentage(), 50);
    }
}
