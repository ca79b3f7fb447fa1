//! Score persistence delegate
//!
//! The engine does not own durable storage. It hands each computed score to
//! a `ScoreStore` and reads the candidate pool for recommendations back out
//! of it. The in-memory implementation keeps the latest score per key and is
//! sufficient for a single process.

use crate::models::CapacityScore;
use dashmap::DashMap;

/// Delegate owning the latest computed score per (region, SKU)
pub trait ScoreStore: Send + Sync {
    /// Record a score, superseding any previous value for the same key
    fn put(&self, score: CapacityScore);

    /// Latest score for one combination
    fn latest(&self, region: &str, sku: &str) -> Option<CapacityScore>;

    /// Most recently calculated scores across all combinations, newest first
    fn recent(&self, limit: usize) -> Vec<CapacityScore>;
}

/// DashMap-backed store keeping the latest score per combination
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    scores: DashMap<(String, String), CapacityScore>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn put(&self, score: CapacityScore) {
        let key = (score.region.clone(), score.sku.clone());
        self.scores.insert(key, score);
    }

    fn latest(&self, region: &str, sku: &str) -> Option<CapacityScore> {
        self.scores
            .get(&(region.to_string(), sku.to_string()))
            .map(|entry| entry.value().clone())
    }

    fn recent(&self, limit: usize) -> Vec<CapacityScore> {
        let mut all: Vec<CapacityScore> = self
            .scores
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| b.calculated_at.cmp(&a.calculated_at));
        all.truncate(limit);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilityLabel;
    use chrono::{Duration, Utc};

    fn score_for(region: &str, sku: &str, score: u8, age_secs: i64) -> CapacityScore {
        let now = Utc::now();
        CapacityScore {
            region: region.to_string(),
            sku: sku.to_string(),
            score,
            label: AvailabilityLabel::Limited,
            confidence: 0.5,
            success_rate: 0.5,
            avg_provision_millis: 5_000.0,
            error_rate: 0.1,
            market_stress: 0.2,
            sample_count: 10,
            data_freshness: 0.9,
            window_start: now - Duration::hours(24),
            window_end: now,
            calculated_at: now - Duration::seconds(age_secs),
            recommendation_text: None,
            alternative_hints: None,
        }
    }

    #[test]
    fn test_put_supersedes_previous() {
        let store = InMemoryScoreStore::new();
        store.put(score_for("eastus", "nc6", 40, 60));
        store.put(score_for("eastus", "nc6", 80, 0));

        let latest = store.latest("eastus", "nc6").unwrap();
        assert_eq!(latest.score, 80);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let store = InMemoryScoreStore::new();
        store.put(score_for("eastus", "nc6", 40, 300));
        store.put(score_for("westus2", "nc6", 70, 10));
        store.put(score_for("westeurope", "nc6", 60, 100));

        let recent = store.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].region, "westus2");
        assert_eq!(recent[1].region, "westeurope");
    }

    #[test]
    fn test_latest_missing_key() {
        let store = InMemoryScoreStore::new();
        assert!(store.latest("eastus", "nc6").is_none());
    }
}
