//! Evaluation store: injected persistence for finished evaluations.
//!
//! The engine itself never persists anything. Callers hand a store to the
//! pipeline, which consults [`freshness::decide_reevaluation`] before scoring.

pub mod freshness;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::feedback::AdjustedEvaluation;

pub use freshness::{decide_reevaluation, CandidateStatus, ReevaluationDecision, SkipReason};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("candidate {candidate_id} is rejected and has no previous evaluation")]
    RejectedWithoutEvaluation { candidate_id: String },
}

/// A finished evaluation as persisted, stamped with the rubric version that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvaluation {
    pub evaluation: AdjustedEvaluation,
    pub config_version: String,
    pub stored_at: DateTime<Utc>,
}

impl StoredEvaluation {
    pub fn new(evaluation: AdjustedEvaluation, stored_at: DateTime<Utc>) -> Self {
        Self {
            config_version: evaluation.result.config_version.clone(),
            evaluation,
            stored_at,
        }
    }
}

/// Key-value store for evaluations, keyed by candidate id.
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Returns the live entry, if any. Expired entries are reported as absent.
    async fn get(&self, candidate_id: &str) -> Result<Option<StoredEvaluation>, StoreError>;

    async fn put(&self, candidate_id: &str, evaluation: StoredEvaluation) -> Result<(), StoreError>;

    /// No-op if absent.
    async fn remove(&self, candidate_id: &str) -> Result<(), StoreError>;
}

/// Roughly a century.
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

/// Process-local store with a fixed time-to-live per entry.
pub struct InMemoryEvaluationStore {
    entries: RwLock<HashMap<String, StoredEvaluation>>,
    ttl: Duration,
}

impl InMemoryEvaluationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Hours beyond `MAX_TTL_HOURS` are clamped.
    pub fn with_ttl_hours(hours: u64) -> Self {
        Self::new(Duration::hours(hours.min(MAX_TTL_HOURS) as i64))
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_expired(&self, entry: &StoredEvaluation, now: DateTime<Utc>) -> bool {
        entry
            .stored_at
            .checked_add_signed(self.ttl)
            .is_some_and(|expires_at| expires_at <= now)
    }
}

#[async_trait]
impl EvaluationStore for InMemoryEvaluationStore {
    async fn get(&self, candidate_id: &str) -> Result<Option<StoredEvaluation>, StoreError> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(candidate_id) {
                None => return Ok(None),
                Some(entry) if !self.is_expired(entry, now) => {
                    debug!("Evaluation store hit for {}", candidate_id);
                    return Ok(Some(entry.clone()));
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // Re-check under the write lock; a concurrent put may have refreshed it.
        if entries
            .get(candidate_id)
            .is_some_and(|entry| self.is_expired(entry, now))
        {
            entries.remove(candidate_id);
            debug!("Evaluation for {} expired", candidate_id);
            return Ok(None);
        }
        Ok(entries.get(candidate_id).cloned())
    }

    async fn put(&self, candidate_id: &str, evaluation: StoredEvaluation) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(candidate_id.to_string(), evaluation);
        Ok(())
    }

    async fn remove(&self, candidate_id: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(candidate_id);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::feedback::apply_directives;
    use crate::feedback::AdjustmentDirective;
    use crate::rubric::EvaluationConfig;
    use crate::scoring::evaluate;

    pub(crate) fn stored_at(stored_at: DateTime<Utc>) -> StoredEvaluation {
        let result = evaluate("jefe de finanzas", &EvaluationConfig::default_finance(), None);
        let none = AdjustmentDirective::default();
        StoredEvaluation::new(apply_directives(result, &none, &none), stored_at)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryEvaluationStore::with_ttl_hours(1);
        let entry = stored_at(Utc::now());
        store.put("rec1", entry.clone()).await.unwrap();
        assert_eq!(store.get("rec1").await.unwrap(), Some(entry));
        assert_eq!(store.get("rec2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let store = InMemoryEvaluationStore::with_ttl_hours(1);
        store
            .put("rec1", stored_at(Utc::now() - Duration::hours(2)))
            .await
            .unwrap();
        assert_eq!(store.get("rec1").await.unwrap(), None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryEvaluationStore::with_ttl_hours(1);
        store.put("rec1", stored_at(Utc::now())).await.unwrap();
        store.remove("rec1").await.unwrap();
        store.remove("missing").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_stored_evaluation_carries_config_version() {
        assert_eq!(stored_at(Utc::now()).config_version, "1.0");
    }
}
