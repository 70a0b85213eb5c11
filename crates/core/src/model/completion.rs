use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::answer::AnswerSet;

/// What ended a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionTrigger {
    /// The user submitted the quiz.
    Manual,
    /// The countdown ran out.
    Timeout,
}

/// Outcome of a finished quiz session, produced exactly once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub score: u32,
    pub answers: AnswerSet,
    pub elapsed_secs: u64,
    pub total_questions: u32,
    pub trigger: CompletionTrigger,
}

impl CompletionResult {
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total_questions.saturating_sub(self.score)
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.percentage())
    }
}

/// `round(score / total * 100)` with halves rounded up. Zero when `total` is zero.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    u32::try_from((200 * score + total) / (2 * total)).unwrap_or(u32::MAX)
}

/// Performance band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Performance {
    Poor,
    Average,
    Good,
    Excellent,
}

impl Performance {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            75..=89 => Self::Good,
            60..=74 => Self::Average,
            _ => Self::Poor,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Performance::Excellent => "Excellent",
            Performance::Good => "Good",
            Performance::Average => "Average",
            Performance::Poor => "Poor",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
