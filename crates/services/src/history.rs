use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::{AttemptId, AttemptRecord, HistorySummary, Performance};
use storage::repository::AttemptRepository;

use crate::error::QuizServiceError;

/// Presentation-agnostic list item for a past attempt.
///
/// Carries raw values only; the front end formats dates and durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptListItem {
    pub id: AttemptId,
    pub completed_at: DateTime<Utc>,
    pub score: u32,
    pub total: u32,
    pub time_spent_secs: u64,
    pub category: String,
    pub difficulty: String,
    pub percentage: u32,
    pub performance: Performance,
}

impl AttemptListItem {
    #[must_use]
    pub fn from_record(record: &AttemptRecord) -> Self {
        Self {
            id: record.id(),
            completed_at: record.completed_at(),
            score: record.score(),
            total: record.total_questions(),
            time_spent_secs: record.time_spent_secs(),
            category: record.category().to_string(),
            difficulty: record.difficulty().to_string(),
            percentage: record.percentage(),
            performance: Performance::from_percentage(record.percentage()),
        }
    }
}

/// Attempts plus the summary computed over exactly those attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOverview {
    pub summary: HistorySummary,
    pub attempts: Vec<AttemptListItem>,
}

/// Reduce attempts to summary metrics. Empty input yields zeros.
#[must_use]
pub fn summarize(attempts: &[AttemptRecord]) -> HistorySummary {
    HistorySummary::from_attempts(attempts)
}

/// Read-side facade over the attempt store.
#[derive(Clone)]
pub struct HistoryService {
    attempts: Arc<dyn AttemptRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    /// Load the most recent attempts with their summary.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` on repository failures.
    pub async fn overview(&self, limit: u32) -> Result<HistoryOverview, QuizServiceError> {
        let records = self.attempts.list_attempts(limit).await?;
        Ok(HistoryOverview {
            summary: summarize(&records),
            attempts: records.iter().map(AttemptListItem::from_record).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn overview_of_empty_history_is_zero() {
        let service = HistoryService::new(Arc::new(InMemoryRepository::new()));
        let overview = service.overview(50).await.unwrap();
        assert!(overview.attempts.is_empty());
        assert_eq!(overview.summary, HistorySummary::default());
    }

    #[tokio::test]
    async fn overview_summarizes_listed_attempts() {
        let repo = Arc::new(InMemoryRepository::new());
        for (days_ago, score, secs) in [(3, 8, 420), (2, 9, 380), (1, 6, 510)] {
            let record = AttemptRecord::new(
                AttemptId::generate(),
                fixed_now() - Duration::days(days_ago),
                score,
                10,
                secs,
                "Mixed",
                "Mixed",
            )
            .unwrap();
            repo.append_attempt(&record).await.unwrap();
        }

        let service = HistoryService::new(repo);
        let overview = service.overview(50).await.unwrap();

        assert_eq!(overview.summary.total_attempts, 3);
        assert_eq!(overview.summary.average_score, 77);
        assert_eq!(overview.summary.best_score, 90);
        assert_eq!(overview.summary.total_time_secs, 1310);
        assert_eq!(overview.attempts[0].percentage, 60);
        assert_eq!(overview.attempts[0].performance, Performance::Average);
        assert_eq!(overview.attempts[1].performance, Performance::Excellent);
    }
}
