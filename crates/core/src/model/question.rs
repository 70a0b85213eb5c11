use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("expected {OPTION_COUNT} options, got {0}")]
    WrongOptionCount(usize),

    #[error("option {} cannot be empty", option_label(*.0))]
    EmptyOption(usize),

    #[error("correct answer index {0} is out of range")]
    CorrectAnswerOutOfRange(usize),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

/// Letter shown next to an option (`A` for index 0).
#[must_use]
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Author-entered question that has not been validated or stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl QuestionDraft {
    /// Blank draft with four empty options, matching a fresh entry form.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            prompt: String::new(),
            options: vec![String::new(); OPTION_COUNT],
            correct_answer: 0,
            explanation: String::new(),
            category: String::new(),
            difficulty: Difficulty::Easy,
        }
    }

    /// Check the draft and trim its text fields.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or category is blank, when the
    /// option count is not four, when any option is blank, or when the correct
    /// answer does not point at an option.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedQuestion, QuestionError> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(QuestionError::EmptyCategory);
        }

        let options = normalize_options(self.options)?;
        if self.correct_answer >= OPTION_COUNT {
            return Err(QuestionError::CorrectAnswerOutOfRange(self.correct_answer));
        }

        Ok(ValidatedQuestion {
            prompt,
            options,
            correct_answer: self.correct_answer,
            explanation: self.explanation.trim().to_string(),
            category,
            difficulty: self.difficulty,
            created_at: now,
        })
    }
}

fn normalize_options(options: Vec<String>) -> Result<[String; OPTION_COUNT], QuestionError> {
    let len = options.len();
    let trimmed: Vec<String> = options.into_iter().map(|o| o.trim().to_string()).collect();
    if let Some(blank) = trimmed.iter().position(String::is_empty) {
        if len == OPTION_COUNT {
            return Err(QuestionError::EmptyOption(blank));
        }
    }
    let options: [String; OPTION_COUNT] = trimmed
        .try_into()
        .map_err(|_| QuestionError::WrongOptionCount(len))?;
    Ok(options)
}

/// A draft that passed validation but has no storage identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: usize,
    pub explanation: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            prompt: self.prompt,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// An immutable multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_answer: usize,
    explanation: String,
    category: String,
    difficulty: Difficulty,
}

impl Question {
    /// Rehydrate a question from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored fields would not pass draft validation.
    pub fn from_persisted(
        id: QuestionId,
        prompt: String,
        options: Vec<String>,
        correct_answer: usize,
        explanation: String,
        category: String,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let draft = QuestionDraft {
            prompt,
            options,
            correct_answer,
            explanation,
            category,
            difficulty,
        };
        // created_at is not part of the question itself
        Ok(draft.validate(DateTime::<Utc>::UNIX_EPOCH)?.assign_id(id))
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// True when `choice` selects the correct option. `None` never matches.
    #[must_use]
    pub fn is_correct(&self, choice: Option<usize>) -> bool {
        choice == Some(self.correct_answer)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
