use serde::{Deserialize, Serialize};

use crate::model::question::Question;

/// Selected option per question, one slot per question.
///
/// The length is fixed when the set is created; slots start unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    slots: Vec<Option<usize>>,
}

impl AnswerSet {
    #[must_use]
    pub fn unanswered(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Selection at `index`, `None` when unanswered or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied().flatten()
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Record `choice` for slot `index`. Returns false if the slot does not exist.
    pub fn set(&mut self, index: usize, choice: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(choice);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.slots.iter().copied()
    }

    /// Number of slots whose selection matches the question's correct option.
    ///
    /// Pairs are matched by position; unanswered slots never count.
    #[must_use]
    pub fn score_against(&self, questions: &[Question]) -> u32 {
        let correct = self
            .slots
            .iter()
            .zip(questions)
            .filter(|(slot, question)| question.is_correct(**slot))
            .count();
        u32::try_from(correct).unwrap_or(u32::MAX)
    }
}
