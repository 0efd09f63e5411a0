//! Evaluation pipeline: freshness check, scoring, comment merge, persistence.
//!
//! `EvaluationService` holds its collaborators behind `Arc` so one instance can
//! be shared across tasks. Swap the store or advisor at construction time.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::feedback::{merge_adjustments, AdjustedEvaluation, AdjustmentAdvisor};
use crate::models::company::CompanyContext;
use crate::models::review::ReviewComment;
use crate::rubric::EvaluationConfig;
use crate::scoring::{evaluate, resolve_companies};
use crate::store::{
    decide_reevaluation, CandidateStatus, EvaluationStore, ReevaluationDecision, SkipReason,
    StoredEvaluation,
};

const NOTES_HEADER: &str = "=== NOTAS DE EVALUADORES ===";

#[derive(Debug, Clone)]
pub struct EvaluationRequest<'a> {
    pub candidate_id: &'a str,
    pub cv_text: &'a str,
    pub status: CandidateStatus,
    pub comments: &'a [ReviewComment],
    /// Re-evaluate even when a current evaluation is stored.
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub evaluation: AdjustedEvaluation,
    pub cached: bool,
    pub skip_reason: Option<SkipReason>,
}

/// Résumé text with reviewer notes appended, so comment vocabulary also
/// counts toward keyword matches. Notes land after the recency window.
pub fn compose_evaluation_text(cv_text: &str, comments: &[ReviewComment]) -> String {
    if comments.is_empty() {
        return cv_text.to_string();
    }
    let notes: String = comments
        .iter()
        .map(|c| format!("- {}: {}\n", c.author, c.text))
        .collect();
    format!("{cv_text}\n\n{NOTES_HEADER}\n{notes}")
}

#[derive(Clone)]
pub struct EvaluationService {
    pub config: Arc<EvaluationConfig>,
    pub knowledge_base: Arc<CompanyContext>,
    pub store: Arc<dyn EvaluationStore>,
    pub advisor: Option<Arc<dyn AdjustmentAdvisor>>,
}

impl EvaluationService {
    pub async fn run(&self, request: EvaluationRequest<'_>) -> Result<PipelineOutcome, AppError> {
        let existing = self.store.get(request.candidate_id).await?;

        let decision = decide_reevaluation(
            request.candidate_id,
            existing.as_ref(),
            request.status,
            request.comments,
            self.config.version(),
            request.force,
        )?;

        if let ReevaluationDecision::Reuse(reason) = decision {
            let stored = existing.ok_or_else(|| {
                AppError::Validation(format!(
                    "no stored evaluation to reuse for {}",
                    request.candidate_id
                ))
            })?;
            info!("Reusing evaluation for {} ({:?})", request.candidate_id, reason);
            return Ok(PipelineOutcome {
                evaluation: stored.evaluation,
                cached: true,
                skip_reason: Some(reason),
            });
        }

        let text = compose_evaluation_text(request.cv_text, request.comments);
        let companies = resolve_companies(&text, &self.knowledge_base);
        if !companies.is_empty() {
            info!(
                "Known companies in résumé: {}",
                companies.keys().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        let result = evaluate(&text, &self.config, Some(&companies));
        let evaluation =
            merge_adjustments(result, request.comments, self.advisor.as_deref()).await;

        self.store
            .put(
                request.candidate_id,
                StoredEvaluation::new(evaluation.clone(), Utc::now()),
            )
            .await?;

        Ok(PipelineOutcome {
            evaluation,
            cached: false,
            skip_reason: None,
        })
    }
}
