//! Scoring engine: keyword categories, industry tier and profile inference.
//!
//! `evaluate` is a pure function of its inputs. The configuration is only read,
//! and every call builds a fresh result.

pub mod category;
pub mod industry;
pub mod inference;
pub mod questions;

use std::collections::BTreeMap;

use tracing::info;

use crate::models::company::CompanyContext;
use crate::models::evaluation::EvaluationResult;
use crate::rubric::EvaluationConfig;

pub use category::{recency_window, score_category, ScoringInput};
pub use industry::{classify_industry, resolve_companies, IndustryClassification};
pub use inference::infer_profile;

/// Scores `text` against every category of `config` and infers the profile.
///
/// `company_context` is the set of known companies detected in the text (see
/// [`resolve_companies`]). When it is `None` or empty the industry tier falls
/// back to keyword detection.
pub fn evaluate(
    text: &str,
    config: &EvaluationConfig,
    company_context: Option<&CompanyContext>,
) -> EvaluationResult {
    let text_lower = text.to_lowercase();

    let industry = classify_industry(company_context, &text_lower, config.industry_multipliers());
    let action_verb_count = inference::count_action_verbs(config.action_verbs(), &text_lower);
    let input = ScoringInput::new(&text_lower, &industry, action_verb_count);

    let mut fits: BTreeMap<_, _> = config
        .categories()
        .iter()
        .map(|(key, category)| {
            let result = score_category(&input, category, config.question_rules(key));
            (key.clone(), result)
        })
        .collect();

    let inference = infer_profile(&text_lower, config, &mut fits, industry.tier, action_verb_count);
    let average_score = EvaluationResult::mean_score(&fits);

    info!(
        "Evaluated résumé against rubric v{}: average {} ({:?}, {:?})",
        config.version(),
        average_score,
        inference.profile_type,
        industry.tier
    );

    EvaluationResult {
        fits,
        inference,
        average_score,
        config_version: config.version().to_string(),
    }
}
