//! Adjustment advisor: turns free-text interview feedback into a suggested
//! `AdjustmentDirective`.
//!
//! The merger holds it as `Option<&dyn AdjustmentAdvisor>` and treats every
//! error as "no AI adjustment".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{prompts::JSON_ONLY_SYSTEM, LlmClient, LlmError};
use crate::models::evaluation::RetentionRisk;

use super::directives::AdjustmentDirective;
use super::prompts::{build_advisor_prompt, ADVISOR_SYSTEM};

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("advisor unavailable: {0}")]
    Unavailable(String),
}

/// Raw advisor answer. Numbers arrive as JSON numbers of any shape and are
/// validated field by field in [`AdvisorVerdict::into_directive`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorVerdict {
    #[serde(default)]
    pub score_promedio: Option<f64>,
    #[serde(default)]
    pub hands_on_index: Option<f64>,
    #[serde(default)]
    pub potential_score: Option<f64>,
    #[serde(default)]
    pub retention_risk: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

fn bounded_score(field: &str, value: Option<f64>) -> Option<u32> {
    let value = value?;
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Some(value as u32)
    } else {
        warn!("Dropping advisor {} out of range: {}", field, value);
        None
    }
}

impl AdvisorVerdict {
    /// Converts to a directive, dropping out-of-range numbers and unknown labels.
    pub fn into_directive(self) -> (AdjustmentDirective, Option<String>) {
        let retention_risk = self.retention_risk.as_deref().and_then(|label| {
            let risk = RetentionRisk::parse_label(label);
            if risk.is_none() {
                warn!("Dropping unknown advisor retention label '{}'", label);
            }
            risk
        });

        let directive = AdjustmentDirective {
            score_promedio: bounded_score("score_promedio", self.score_promedio),
            hands_on_index: bounded_score("hands_on_index", self.hands_on_index),
            potential_score: bounded_score("potential_score", self.potential_score),
            retention_risk,
            ..Default::default()
        };
        let reasoning = self.reasoning.filter(|r| !r.trim().is_empty());
        (directive, reasoning)
    }
}

/// Implement this to swap the advisor backend without touching the merger.
#[async_trait]
pub trait AdjustmentAdvisor: Send + Sync {
    /// `Ok(None)` means the advisor had nothing to say.
    async fn advise(&self, feedback: &str) -> Result<Option<AdvisorVerdict>, AdvisorError>;
}

/// Advisor backed by the Claude client.
pub struct LlmAdjustmentAdvisor(pub LlmClient);

#[async_trait]
impl AdjustmentAdvisor for LlmAdjustmentAdvisor {
    async fn advise(&self, feedback: &str) -> Result<Option<AdvisorVerdict>, AdvisorError> {
        let system = format!("{ADVISOR_SYSTEM} {JSON_ONLY_SYSTEM}");
        let prompt = build_advisor_prompt(feedback);

        let verdict: AdvisorVerdict = self.0.call_json(&prompt, &system).await?;
        debug!("Advisor verdict: {:?}", verdict);

        if verdict == AdvisorVerdict::default() {
            return Ok(None);
        }
        Ok(Some(verdict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parses_from_model_json() {
        let verdict: AdvisorVerdict = crate::llm_client::parse_json_text(
            r#"{"score_promedio": 42.7, "hands_on_index": null, "retention_risk": "Alto", "reasoning": "No match cultural"}"#,
        )
        .unwrap();
        let (directive, reasoning) = verdict.into_directive();
        assert_eq!(directive.score_promedio, Some(42));
        assert_eq!(directive.hands_on_index, None);
        assert_eq!(directive.retention_risk, Some(RetentionRisk::High));
        assert_eq!(reasoning.as_deref(), Some("No match cultural"));
    }

    #[test]
    fn test_out_of_range_and_unknown_fields_dropped_individually() {
        let verdict = AdvisorVerdict {
            score_promedio: Some(140.0),
            hands_on_index: Some(-5.0),
            potential_score: Some(35.0),
            retention_risk: Some("Crítico".to_string()),
            reasoning: Some("  ".to_string()),
        };
        let (directive, reasoning) = verdict.into_directive();
        assert_eq!(directive.score_promedio, None);
        assert_eq!(directive.hands_on_index, None);
        assert_eq!(directive.potential_score, Some(35));
        assert_eq!(directive.retention_risk, None);
        assert_eq!(reasoning, None);
    }

    #[test]
    fn test_advisor_never_sets_category_scores() {
        let (directive, _) = AdvisorVerdict {
            score_promedio: Some(50.0),
            ..Default::default()
        }
        .into_directive();
        assert_eq!(directive.score_admin, None);
        assert_eq!(directive.score_ops, None);
        assert_eq!(directive.score_biz, None);
    }
}
