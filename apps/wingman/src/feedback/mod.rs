//! Adjustment merger: reconciles an automatic evaluation with review comments.
//!
//! Two sources feed one directive: the optional AI advisor reads the rendered
//! comments, then manual directives parsed from the same comments are laid on
//! top, field by field. A `score_promedio` override rescales the category
//! scores proportionally unless a category has its own directive.

pub mod advisor;
pub mod directives;
pub mod prompts;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::evaluation::{EvaluationResult, PotentialLevel, RetentionRisk};
use crate::models::review::ReviewComment;

pub use advisor::{AdjustmentAdvisor, AdvisorError, AdvisorVerdict, LlmAdjustmentAdvisor};
pub use directives::{parse_manual_directives, AdjustmentDirective};

/// Rendered feedback shorter than this is not worth an advisor call.
pub const MIN_ADVISOR_FEEDBACK_CHARS: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Audit trail
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentField {
    AverageScore,
    /// Category score, by category key.
    Category(String),
    HandsOnIndex,
    PotentialScore,
    RetentionRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSource {
    Manual,
    Advisor,
    /// Proportional rescale after an average-score override.
    Rescale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Score(u32),
    Risk(RetentionRisk),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOverride {
    pub field: AdjustmentField,
    pub source: AdjustmentSource,
    pub previous: FieldValue,
    pub value: FieldValue,
}

/// Result of the merge plus a record of what changed and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedEvaluation {
    pub result: EvaluationResult,
    /// Automatic average before any override.
    pub original_average: u32,
    /// Effective directive after manual entries overrode advisor entries.
    pub applied: AdjustmentDirective,
    pub overrides: Vec<AppliedOverride>,
    pub advisor_reasoning: Option<String>,
}

impl AdjustedEvaluation {
    fn unchanged(result: EvaluationResult) -> Self {
        Self {
            original_average: result.average_score,
            result,
            applied: AdjustmentDirective::default(),
            overrides: Vec::new(),
            advisor_reasoning: None,
        }
    }

    pub fn is_adjusted(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// System note listing the applied adjustments in directive syntax. Read
    /// back, it restores score, hands-on and retention exactly; potential is
    /// written as its level word, so it comes back as that level's fixed value.
    /// `None` when no headline field (score, hands-on, potential, retention)
    /// was adjusted.
    pub fn summary_comment(&self, date: NaiveDate) -> Option<String> {
        let applied = &self.applied;
        let mut items = Vec::new();
        if let Some(score) = applied.score_promedio {
            items.push(format!("score: {score}%"));
        }
        if let Some(hands_on) = applied.hands_on_index {
            items.push(format!("hands on: {hands_on}%"));
        }
        if let Some(potential) = applied.potential_score {
            items.push(format!(
                "potencial: {}",
                PotentialLevel::from_score(potential).directive_label()
            ));
        }
        if let Some(risk) = applied.retention_risk {
            items.push(format!("retención: {}", risk.directive_label()));
        }
        if items.is_empty() {
            return None;
        }

        Some(format!(
            "AJUSTES AUTOMÁTICOS ({}):\n\n\
             Basado en análisis de notas de entrevista:\n\
             - Score ajustado de {}% a {}%\n\
             - Admin/Ops/Biz ajustados proporcionalmente\n\n\
             SCORES APLICADOS:\n{}",
            date.format("%d/%m/%Y"),
            self.original_average,
            self.result.average_score,
            items.join(", ")
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Merge
// ────────────────────────────────────────────────────────────────────────────

/// Renders comments the way the advisor expects them: `**author** (time):\ntext`,
/// separated by blank lines.
pub fn render_feedback(comments: &[ReviewComment]) -> String {
    comments
        .iter()
        .map(|c| {
            format!(
                "**{}** ({}):\n{}",
                c.author,
                c.timestamp.format("%Y-%m-%d %H:%M"),
                c.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

async fn consult_advisor(
    comments: &[ReviewComment],
    advisor: Option<&dyn AdjustmentAdvisor>,
) -> (AdjustmentDirective, Option<String>) {
    let Some(advisor) = advisor else {
        return (AdjustmentDirective::default(), None);
    };

    let feedback = render_feedback(comments);
    if feedback.trim().chars().count() < MIN_ADVISOR_FEEDBACK_CHARS {
        debug!("Feedback too short for the advisor, skipping");
        return (AdjustmentDirective::default(), None);
    }

    match advisor.advise(&feedback).await {
        Ok(Some(verdict)) => verdict.into_directive(),
        Ok(None) => (AdjustmentDirective::default(), None),
        Err(e) => {
            warn!("Adjustment advisor failed, continuing without AI adjustments: {e}");
            (AdjustmentDirective::default(), None)
        }
    }
}

/// Merges review comments into an automatic evaluation.
///
/// Without comments the result passes through untouched. Advisor failures
/// never fail the merge.
pub async fn merge_adjustments(
    result: EvaluationResult,
    comments: &[ReviewComment],
    advisor: Option<&dyn AdjustmentAdvisor>,
) -> AdjustedEvaluation {
    if comments.is_empty() {
        return AdjustedEvaluation::unchanged(result);
    }

    let (ai, advisor_reasoning) = consult_advisor(comments, advisor).await;
    let manual = parse_manual_directives(comments);
    if !manual.is_empty() {
        info!("Manual directives from {} comments: {:?}", comments.len(), manual);
    }

    let mut adjusted = apply_directives(result, &ai, &manual);
    adjusted.advisor_reasoning = advisor_reasoning;
    adjusted
}

/// Overlays `manual` on `ai` and applies the result. Synchronous core of
/// [`merge_adjustments`].
pub fn apply_directives(
    mut result: EvaluationResult,
    ai: &AdjustmentDirective,
    manual: &AdjustmentDirective,
) -> AdjustedEvaluation {
    let mut merged = ai.clone();
    merged.overlay(manual);

    let source = |manual_set: bool| {
        if manual_set {
            AdjustmentSource::Manual
        } else {
            AdjustmentSource::Advisor
        }
    };

    let original_average = result.average_score;
    let mut overrides = Vec::new();

    if let Some(average) = merged.score_promedio {
        overrides.push(AppliedOverride {
            field: AdjustmentField::AverageScore,
            source: source(manual.score_promedio.is_some()),
            previous: FieldValue::Score(original_average),
            value: FieldValue::Score(average),
        });
        result.average_score = average;

        if original_average > 0 {
            for (key, fit) in result.fits.iter_mut() {
                if merged.category_score(key).is_some() {
                    continue;
                }
                let previous = fit.score;
                let rescaled =
                    (previous as u64 * average as u64 / original_average as u64).min(100) as u32;
                if rescaled != previous {
                    fit.score = rescaled;
                    overrides.push(AppliedOverride {
                        field: AdjustmentField::Category(key.clone()),
                        source: AdjustmentSource::Rescale,
                        previous: FieldValue::Score(previous),
                        value: FieldValue::Score(rescaled),
                    });
                }
            }
        } else {
            debug!("Automatic average is 0, category scores not rescaled");
        }
    }

    for (key, fit) in result.fits.iter_mut() {
        if let Some(score) = merged.category_score(key) {
            overrides.push(AppliedOverride {
                field: AdjustmentField::Category(key.clone()),
                source: source(manual.category_score(key).is_some()),
                previous: FieldValue::Score(fit.score),
                value: FieldValue::Score(score),
            });
            fit.score = score;
        }
    }

    let inference = &mut result.inference;
    if let Some(hands_on) = merged.hands_on_index {
        overrides.push(AppliedOverride {
            field: AdjustmentField::HandsOnIndex,
            source: source(manual.hands_on_index.is_some()),
            previous: FieldValue::Score(inference.hands_on_index),
            value: FieldValue::Score(hands_on),
        });
        inference.hands_on_index = hands_on;
    }
    if let Some(potential) = merged.potential_score {
        overrides.push(AppliedOverride {
            field: AdjustmentField::PotentialScore,
            source: source(manual.potential_score.is_some()),
            previous: FieldValue::Score(inference.potential_score),
            value: FieldValue::Score(potential),
        });
        inference.potential_score = potential;
    }
    if let Some(risk) = merged.retention_risk {
        overrides.push(AppliedOverride {
            field: AdjustmentField::RetentionRisk,
            source: source(manual.retention_risk.is_some()),
            previous: FieldValue::Risk(inference.retention_risk),
            value: FieldValue::Risk(risk),
        });
        inference.retention_risk = risk;
    }

    if !overrides.is_empty() {
        info!(
            "Applied {} overrides, average {} -> {}",
            overrides.len(),
            original_average,
            result.average_score
        );
    }

    AdjustedEvaluation {
        result,
        original_average,
        applied: merged,
        overrides,
        advisor_reasoning: None,
    }
}
