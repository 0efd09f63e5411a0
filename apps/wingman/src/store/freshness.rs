//! When to reuse a stored evaluation and when to score again.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::review::ReviewComment;

use super::{StoreError, StoredEvaluation};

/// Pipeline status of a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    #[serde(alias = "nuevo", alias = "activo")]
    Active,
    #[serde(alias = "rechazado")]
    Rejected,
    #[serde(alias = "descartado")]
    Discarded,
}

impl CandidateStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, CandidateStatus::Rejected | CandidateStatus::Discarded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Rejected or discarded candidates keep their last evaluation.
    Rejected,
    /// Not forced and the stored evaluation is current.
    Cached,
    /// Forced, but there are no comments to merge.
    NoComments,
    /// Forced, but no comment is newer than the stored evaluation.
    UpToDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReevaluationDecision {
    Reuse(SkipReason),
    Recompute,
}

/// Decides whether `existing` can be served as-is.
///
/// Order: closed candidates first, then a rubric version change always
/// recomputes, then the cache and comment checks.
pub fn decide_reevaluation(
    candidate_id: &str,
    existing: Option<&StoredEvaluation>,
    status: CandidateStatus,
    comments: &[ReviewComment],
    active_config_version: &str,
    force: bool,
) -> Result<ReevaluationDecision, StoreError> {
    if status.is_closed() {
        return match existing {
            Some(_) => Ok(ReevaluationDecision::Reuse(SkipReason::Rejected)),
            None => Err(StoreError::RejectedWithoutEvaluation {
                candidate_id: candidate_id.to_string(),
            }),
        };
    }

    let Some(existing) = existing else {
        return Ok(ReevaluationDecision::Recompute);
    };

    if existing.config_version != active_config_version {
        info!(
            "Rubric changed for {} (v{} -> v{}), recomputing",
            candidate_id, existing.config_version, active_config_version
        );
        return Ok(ReevaluationDecision::Recompute);
    }

    if !force {
        return Ok(ReevaluationDecision::Reuse(SkipReason::Cached));
    }

    let Some(latest_comment) = comments.iter().map(|c| c.timestamp).max() else {
        return Ok(ReevaluationDecision::Reuse(SkipReason::NoComments));
    };

    if existing.stored_at > latest_comment {
        return Ok(ReevaluationDecision::Reuse(SkipReason::UpToDate));
    }

    info!("New comments for {}, recomputing", candidate_id);
    Ok(ReevaluationDecision::Recompute)
}
