//! Per-category keyword scoring.
//!
//! final = min(min(base × booster + recency_bonus, 100) × multiplier, 100), truncated,
//! where base = 100 × |found| / max_expected.

use crate::models::evaluation::CategoryResult;
use crate::rubric::{CategoryConfig, QuestionRule};

use super::industry::IndustryClassification;
use super::questions::generate_questions;

const RECENCY_SHARE_PERCENT: usize = 35;
const CULTURE_BOOSTER: f64 = 1.25;
const RECENCY_POINTS: f64 = 5.0;
const SENIOR_THRESHOLD: u32 = 90;
const MAX_RECENT_IN_REASONING: usize = 3;

/// Leading slice of the text covering the first 35% of its characters.
///
/// Counts chars rather than bytes so the cut always lands on a boundary.
pub fn recency_window(text_lower: &str) -> &str {
    let limit = text_lower.chars().count() * RECENCY_SHARE_PERCENT / 100;
    match text_lower.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text_lower[..byte_idx],
        None => text_lower,
    }
}

/// Text-derived inputs shared by every category of one evaluation.
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    pub text_lower: &'a str,
    pub recent_text: &'a str,
    pub industry: &'a IndustryClassification,
    pub action_verb_count: u32,
}

impl<'a> ScoringInput<'a> {
    pub fn new(text_lower: &'a str, industry: &'a IndustryClassification, action_verb_count: u32) -> Self {
        Self {
            text_lower,
            recent_text: recency_window(text_lower),
            industry,
            action_verb_count,
        }
    }
}

pub fn score_category(
    input: &ScoringInput<'_>,
    category: &CategoryConfig,
    rules: &[QuestionRule],
) -> CategoryResult {
    let (found, missing): (Vec<String>, Vec<String>) = category
        .keywords()
        .iter()
        .cloned()
        .partition(|kw| input.text_lower.contains(kw.to_lowercase().as_str()));

    let recent: Vec<&String> = found
        .iter()
        .filter(|kw| input.recent_text.contains(kw.to_lowercase().as_str()))
        .collect();

    let booster = if category
        .culture_booster_keywords()
        .iter()
        .any(|kw| input.text_lower.contains(kw.to_lowercase().as_str()))
    {
        CULTURE_BOOSTER
    } else {
        1.0
    };

    let base = found.len() as f64 / category.max_expected() as f64 * 100.0;
    let raw = base * booster + RECENCY_POINTS * recent.len() as f64;
    let capped = raw.min(100.0);
    let score = (capped * input.industry.multiplier).min(100.0) as u32;

    let mut reasoning = format!("Detected {}/{} concepts.", found.len(), category.max_expected());
    if input.industry.multiplier != 1.0 {
        reasoning.push_str(&input.industry.reasoning);
    }
    if !recent.is_empty() {
        let names: Vec<&str> = recent
            .iter()
            .take(MAX_RECENT_IN_REASONING)
            .map(|kw| kw.as_str())
            .collect();
        reasoning.push_str(&format!(" **Recent experience:** {}.", names.join(", ")));
    } else if !found.is_empty() {
        reasoning.push_str(" **Alert:** matching experience appears only in older roles.");
    }
    if score > SENIOR_THRESHOLD {
        reasoning.push_str(" **Senior:** exceeds the expected level for this area.");
    }

    let questions = generate_questions(rules, &found, &missing, input.action_verb_count);

    CategoryResult {
        score,
        found,
        missing,
        reasoning,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::IndustryTier;

    fn general() -> IndustryClassification {
        IndustryClassification {
            tier: IndustryTier::General,
            multiplier: 1.0,
            reasoning: String::new(),
        }
    }

    fn with_multiplier(multiplier: f64) -> IndustryClassification {
        IndustryClassification {
            tier: IndustryTier::Fintech,
            multiplier,
            reasoning: " industry note.".to_string(),
        }
    }

    fn six_keyword_category() -> CategoryConfig {
        let keywords = ["alfa", "bravo", "charlie", "delta", "echo", "foxtrot"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        CategoryConfig::new("Test", keywords, 6).unwrap()
    }

    /// Places `early` at the start of the text and `late` past the 35% mark.
    fn layout(early: &str, late: &str) -> String {
        format!("{early}{}{late}", " ".repeat(200))
    }

    #[test]
    fn test_recency_window_is_35_percent_of_chars() {
        let text = "a".repeat(100);
        assert_eq!(recency_window(&text).len(), 35);
        assert_eq!(recency_window(""), "");
    }

    #[test]
    fn test_recency_window_respects_multibyte_chars() {
        let text = "ñ".repeat(20);
        // 7 chars × 2 bytes
        assert_eq!(recency_window(&text).len(), 14);
    }

    #[test]
    fn test_scenario_a_three_of_six_outside_window() {
        let text = layout("", "alfa bravo charlie");
        let industry = general();
        let input = ScoringInput::new(&text, &industry, 0);
        let result = score_category(&input, &six_keyword_category(), &[]);
        assert_eq!(result.score, 50);
        assert_eq!(result.found, vec!["alfa", "bravo", "charlie"]);
        assert_eq!(result.missing, vec!["delta", "echo", "foxtrot"]);
        assert!(result.reasoning.contains("older roles"));
    }

    #[test]
    fn test_scenario_b_three_of_six_inside_window() {
        let text = layout("alfa bravo charlie", "");
        let industry = general();
        let input = ScoringInput::new(&text, &industry, 0);
        let result = score_category(&input, &six_keyword_category(), &[]);
        assert_eq!(result.score, 65);
        assert!(result.reasoning.contains("**Recent experience:** alfa, bravo, charlie."));
    }

    #[test]
    fn test_found_and_missing_partition_keywords() {
        let text = layout("delta", "alfa foxtrot");
        let industry = general();
        let input = ScoringInput::new(&text, &industry, 0);
        let category = six_keyword_category();
        let result = score_category(&input, &category, &[]);
        let mut all: Vec<String> = result.found.iter().chain(&result.missing).cloned().collect();
        all.sort();
        let mut expected = category.keywords().to_vec();
        expected.sort();
        assert_eq!(all, expected);
        assert!(result.found.iter().all(|k| !result.missing.contains(k)));
    }

    #[test]
    fn test_score_capped_before_and_after_multiplier() {
        let text = layout("alfa bravo charlie delta echo foxtrot", "");
        let industry = with_multiplier(1.5);
        let input = ScoringInput::new(&text, &industry, 0);
        let result = score_category(&input, &six_keyword_category(), &[]);
        assert_eq!(result.score, 100);
        assert!(result.reasoning.contains("industry note"));
        assert!(result.reasoning.contains("**Senior:**"));
    }

    #[test]
    fn test_multiplier_below_one_scales_capped_value() {
        let text = layout("alfa bravo charlie delta echo foxtrot", "");
        let industry = with_multiplier(0.7);
        let input = ScoringInput::new(&text, &industry, 0);
        let result = score_category(&input, &six_keyword_category(), &[]);
        assert_eq!(result.score, 70);
    }

    #[test]
    fn test_culture_booster_applies() {
        let keywords = vec!["banco".to_string(), "pagos".to_string()];
        let category = CategoryConfig::new("Ops", keywords, 4)
            .unwrap()
            .with_culture_boosters(vec!["fintech".to_string()]);
        let text = layout("", "banco y pagos en una fintech");
        let industry = general();
        let input = ScoringInput::new(&text, &industry, 0);
        // 50 × 1.25
        assert_eq!(score_category(&input, &category, &[]).score, 62);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let industry = general();
        let input = ScoringInput::new("", &industry, 0);
        let result = score_category(&input, &six_keyword_category(), &[]);
        assert_eq!(result.score, 0);
        assert!(result.found.is_empty());
        assert_eq!(result.missing.len(), 6);
        assert_eq!(result.reasoning, "Detected 0/6 concepts.");
    }

    #[test]
    fn test_recent_keyword_never_decreases_score() {
        let industry = general();
        let category = six_keyword_category();
        let before_text = layout("alfa", "bravo");
        let after_text = layout("alfa delta", "bravo");
        let before = score_category(&ScoringInput::new(&before_text, &industry, 0), &category, &[]);
        let after = score_category(&ScoringInput::new(&after_text, &industry, 0), &category, &[]);
        assert!(after.score >= before.score);
    }

    #[test]
    fn test_recent_note_lists_at_most_three() {
        let text = layout("alfa bravo charlie delta", "");
        let industry = general();
        let input = ScoringInput::new(&text, &industry, 0);
        let result = score_category(&input, &six_keyword_category(), &[]);
        assert!(result.reasoning.contains("alfa, bravo, charlie."));
        assert!(!result.reasoning.contains("delta."));
    }
}
