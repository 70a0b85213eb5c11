/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub time_left_secs: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Position of the pointer through the quiz, as a whole percentage.
    #[must_use]
    pub fn percent_through(&self) -> u32 {
        let position = u32::try_from(self.current + 1).unwrap_or(u32::MAX);
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        quiz_core::model::percentage(position, total)
    }
}

/// State of one entry in the question navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Unanswered,
}
