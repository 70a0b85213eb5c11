use serde::{Deserialize, Serialize};

use crate::model::attempt::AttemptRecord;

/// Summary metrics over a collection of past attempts.
///
/// Every field is an order-independent reduction, so any permutation of the
/// same attempts yields the same summary. Empty input yields all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_attempts: u32,
    pub average_score: u32,
    pub best_score: u32,
    pub total_time_secs: u64,
}

impl HistorySummary {
    #[must_use]
    pub fn from_attempts(attempts: &[AttemptRecord]) -> Self {
        let mut sum = 0_u64;
        let mut best = 0_u32;
        let mut total_time = 0_u64;

        for attempt in attempts {
            sum += u64::from(attempt.percentage());
            best = best.max(attempt.percentage());
            total_time = total_time.saturating_add(attempt.time_spent_secs());
        }

        let count = u64::try_from(attempts.len()).unwrap_or(u64::MAX);
        let average = if count == 0 {
            0
        } else {
            // round half up
            (2 * sum + count) / (2 * count)
        };

        Self {
            total_attempts: u32::try_from(attempts.len()).unwrap_or(u32::MAX),
            average_score: u32::try_from(average).unwrap_or(u32::MAX),
            best_score: best,
            total_time_secs: total_time,
        }
    }
}
