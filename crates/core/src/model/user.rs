use serde::{Deserialize, Serialize};

use crate::model::completion::{CompletionResult, percentage};

/// Percentage a quiz must reach to extend the streak.
pub const STREAK_THRESHOLD: u32 = 70;

/// Running totals across every quiz a user has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub streak: u32,
    pub average_score: u32,
}

impl UserStats {
    /// Fold a finished quiz into the totals.
    pub fn record(&mut self, result: &CompletionResult) {
        self.total_questions = self.total_questions.saturating_add(result.total_questions);
        self.correct_answers = self.correct_answers.saturating_add(result.score);
        self.streak = if result.percentage() >= STREAK_THRESHOLD {
            self.streak.saturating_add(1)
        } else {
            0
        };
        self.average_score = percentage(self.correct_answers, self.total_questions);
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.total_questions.saturating_sub(self.correct_answers)
    }
}

/// Signed-in user as returned by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub stats: UserStats,
}

impl UserProfile {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            stats: UserStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerSet, CompletionTrigger};

    fn result(score: u32, total: u32) -> CompletionResult {
        CompletionResult {
            score,
            answers: AnswerSet::unanswered(total as usize),
            elapsed_secs: 60,
            total_questions: total,
            trigger: CompletionTrigger::Manual,
        }
    }

    #[test]
    fn record_accumulates_and_tracks_streak() {
        let mut stats = UserStats::default();
        stats.record(&result(8, 10));
        stats.record(&result(7, 10));
        assert_eq!(stats.total_questions, 20);
        assert_eq!(stats.correct_answers, 15);
        assert_eq!(stats.streak, 2);
        assert_eq!(stats.average_score, 75);
        assert_eq!(stats.incorrect_answers(), 5);

        stats.record(&result(3, 10));
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.average_score, 60);
    }
}
