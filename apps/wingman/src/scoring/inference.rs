//! Profile inference: hands-on index, corporate scope, seniority and the
//! profile cascade that may penalize the admin category.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::models::evaluation::{
    CategoryResult, IndustryTier, InferenceResult, ProfileType, RetentionRisk,
};
use crate::rubric::{EvaluationConfig, TitleRank};

/// Technical keyword count that earns a full hands-on index.
const HANDS_ON_FULL_CREDIT: u32 = 5;
/// Adaptability keyword count that earns a full potential score.
const POTENTIAL_FULL_CREDIT: u32 = 4;

const DELEGATOR_PENALTY_PERCENT: u32 = 80;
const PENALIZED_CATEGORY: &str = "admin";

fn matches<'a>(keywords: &'a [String], text_lower: &str) -> Vec<&'a String> {
    keywords
        .iter()
        .filter(|kw| text_lower.contains(kw.to_lowercase().as_str()))
        .collect()
}

fn percent_of(count: u32, full_credit: u32) -> u32 {
    (count * 100 / full_credit).min(100)
}

/// Highest rank among titles present in the text (0 when none) and the titles found.
pub fn highest_title_rank<'a>(ranks: &'a [TitleRank], text_lower: &str) -> (u8, Vec<&'a str>) {
    let found: Vec<&TitleRank> = ranks
        .iter()
        .filter(|t| text_lower.contains(t.title.to_lowercase().as_str()))
        .collect();
    let highest = found.iter().map(|t| t.rank).max().unwrap_or(0);
    (highest, found.into_iter().map(|t| t.title.as_str()).collect())
}

pub fn count_action_verbs(verbs: &[String], text_lower: &str) -> u32 {
    matches(verbs, text_lower).len() as u32
}

/// Signals the profile cascade decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSignals {
    pub highest_rank: u8,
    pub hands_on_index: u32,
    pub scope_intensity: u32,
}

struct ProfileRule {
    profile: ProfileType,
    applies: fn(&ProfileSignals) -> bool,
    retention_risk: RetentionRisk,
    warning: &'static str,
    penalize_admin: bool,
}

/// Evaluated in order; the first rule whose predicate holds decides the profile.
const PROFILE_CASCADE: [ProfileRule; 3] = [
    ProfileRule {
        profile: ProfileType::Delegator,
        applies: |s| s.highest_rank >= 3 && s.hands_on_index < 60,
        retention_risk: RetentionRisk::Low,
        warning: "Risk: desk profile, hands-on index below 60%.",
        penalize_admin: true,
    },
    ProfileRule {
        profile: ProfileType::Corporate,
        applies: |s| s.highest_rank >= 3 && s.scope_intensity >= 3,
        retention_risk: RetentionRisk::High,
        warning: "Alert: used to regional/global scope, overqualification and boredom risk.",
        penalize_admin: false,
    },
    ProfileRule {
        profile: ProfileType::HandsOn,
        applies: |s| s.hands_on_index > 60,
        retention_risk: RetentionRisk::Low,
        warning: "Ideal match: knows how to operate.",
        penalize_admin: false,
    },
];

const BALANCED_WARNING: &str = "Balanced profile.";

/// Applies the cascade. Returns the profile, its retention risk, the warning
/// and whether the delegator penalty must be applied.
pub fn classify_profile(signals: &ProfileSignals) -> (ProfileType, RetentionRisk, &'static str, bool) {
    PROFILE_CASCADE
        .iter()
        .find(|rule| (rule.applies)(signals))
        .map(|rule| (rule.profile, rule.retention_risk, rule.warning, rule.penalize_admin))
        .unwrap_or((ProfileType::Hybrid, RetentionRisk::Low, BALANCED_WARNING, false))
}

fn apply_delegator_penalty(fits: &mut BTreeMap<String, CategoryResult>) {
    if let Some(admin) = fits.get_mut(PENALIZED_CATEGORY) {
        let before = admin.score;
        admin.score = admin.score * DELEGATOR_PENALTY_PERCENT / 100;
        admin.reasoning.push_str(" Penalty: delegator profile.");
        info!("Delegator penalty applied to admin: {} -> {}", before, admin.score);
    }
}

/// Infers the behavioral profile. The delegator branch rewrites the `admin`
/// entry of `fits` in place.
pub fn infer_profile(
    text_lower: &str,
    config: &EvaluationConfig,
    fits: &mut BTreeMap<String, CategoryResult>,
    industry_tier: IndustryTier,
    action_verb_count: u32,
) -> InferenceResult {
    let inference = config.inference();

    let technical = matches(&inference.technical_keywords, text_lower).len() as u32;
    let hands_on_index = percent_of(technical, HANDS_ON_FULL_CREDIT);
    let scope_intensity = matches(&inference.corporate_scope_keywords, text_lower).len() as u32;
    let strategic_signals: Vec<String> = matches(&inference.strategic_keywords, text_lower)
        .into_iter()
        .cloned()
        .collect();

    let (highest_rank, titles) = highest_title_rank(config.title_ranks(), text_lower);

    let signals = ProfileSignals {
        highest_rank,
        hands_on_index,
        scope_intensity,
    };
    let (profile_type, retention_risk, warning, penalize_admin) = classify_profile(&signals);
    debug!("Profile signals {:?} -> {:?}", signals, profile_type);

    if penalize_admin {
        apply_delegator_penalty(fits);
    }

    let adaptability = matches(config.adaptability_keywords(), text_lower).len() as u32;

    InferenceResult {
        profile_type,
        hands_on_index,
        scope_intensity,
        retention_risk,
        potential_score: percent_of(adaptability, POTENTIAL_FULL_CREDIT),
        risk_warning: warning.to_string(),
        industry_tier,
        detected_titles: titles.into_iter().map(str::to_string).collect(),
        strategic_signals,
        action_verb_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_fit(score: u32) -> BTreeMap<String, CategoryResult> {
        BTreeMap::from([(
            "admin".to_string(),
            CategoryResult {
                score,
                found: vec![],
                missing: vec![],
                reasoning: "Detected 5/6 concepts.".to_string(),
                questions: vec![],
            },
        )])
    }

    fn signals(highest_rank: u8, hands_on_index: u32, scope_intensity: u32) -> ProfileSignals {
        ProfileSignals {
            highest_rank,
            hands_on_index,
            scope_intensity,
        }
    }

    #[test]
    fn test_cascade_delegator_wins_over_corporate() {
        let (profile, risk, _, penalize) = classify_profile(&signals(4, 40, 5));
        assert_eq!(profile, ProfileType::Delegator);
        assert_eq!(risk, RetentionRisk::Low);
        assert!(penalize);
    }

    #[test]
    fn test_cascade_corporate_when_hands_on_high() {
        let (profile, risk, warning, penalize) = classify_profile(&signals(4, 60, 3));
        assert_eq!(profile, ProfileType::Corporate);
        assert_eq!(risk, RetentionRisk::High);
        assert!(warning.contains("overqualification"));
        assert!(!penalize);
    }

    #[test]
    fn test_cascade_hands_on_requires_strictly_above_60() {
        assert_eq!(classify_profile(&signals(0, 80, 0)).0, ProfileType::HandsOn);
        assert_eq!(classify_profile(&signals(0, 60, 0)).0, ProfileType::Hybrid);
    }

    #[test]
    fn test_cascade_default_is_hybrid_low() {
        let (profile, risk, warning, _) = classify_profile(&signals(2, 20, 10));
        assert_eq!(profile, ProfileType::Hybrid);
        assert_eq!(risk, RetentionRisk::Low);
        assert_eq!(warning, BALANCED_WARNING);
    }

    #[test]
    fn test_hands_on_index_is_floor_and_capped() {
        assert_eq!(percent_of(2, HANDS_ON_FULL_CREDIT), 40);
        assert_eq!(percent_of(7, HANDS_ON_FULL_CREDIT), 100);
        assert_eq!(percent_of(1, 3), 33);
    }

    #[test]
    fn test_highest_title_rank_and_titles() {
        let config = EvaluationConfig::default_finance();
        let (rank, titles) = highest_title_rank(config.title_ranks(), "jefe de finanzas y gerente general");
        assert_eq!(rank, 4);
        assert_eq!(titles, vec!["jefe", "gerente"]);
        assert_eq!(highest_title_rank(config.title_ranks(), "analista").0, 0);
    }

    #[test]
    fn test_scenario_c_gerente_with_low_hands_on_penalizes_admin() {
        let config = EvaluationConfig::default_finance();
        // two technical keywords -> hands-on 40
        let text = "gerente de finanzas. sap y erp.";
        let mut fits = admin_fit(83);
        let inference = infer_profile(text, &config, &mut fits, IndustryTier::General, 0);
        assert_eq!(inference.hands_on_index, 40);
        assert_eq!(inference.profile_type, ProfileType::Delegator);
        assert_eq!(fits["admin"].score, 83 * 80 / 100);
        assert!(fits["admin"].reasoning.ends_with("Penalty: delegator profile."));
    }

    #[test]
    fn test_scenario_d_director_with_scope_and_hands_on() {
        let config = EvaluationConfig::default_finance();
        let text = "director regional latam holding. sap erp sql macros conciliación facturación";
        let mut fits = admin_fit(70);
        let inference = infer_profile(text, &config, &mut fits, IndustryTier::General, 0);
        assert_eq!(inference.hands_on_index, 100);
        assert_eq!(inference.scope_intensity, 3);
        assert_eq!(inference.profile_type, ProfileType::Corporate);
        assert_eq!(inference.retention_risk, RetentionRisk::High);
        assert_eq!(fits["admin"].score, 70);
    }

    #[test]
    fn test_potential_score_and_signals() {
        let config = EvaluationConfig::default_finance();
        let text = "aprendizaje continuo, perfil flexible. estrategia y negociación.";
        let mut fits = BTreeMap::new();
        let inference = infer_profile(text, &config, &mut fits, IndustryTier::Tech, 3);
        assert_eq!(inference.potential_score, 50);
        assert_eq!(inference.strategic_signals, vec!["estrategia", "negociación"]);
        assert_eq!(inference.action_verb_count, 3);
        assert_eq!(inference.industry_tier, IndustryTier::Tech);
    }

    #[test]
    fn test_delegator_without_admin_category_is_noop() {
        let config = EvaluationConfig::default_finance();
        let mut fits = BTreeMap::new();
        let inference = infer_profile("director", &config, &mut fits, IndustryTier::General, 0);
        assert_eq!(inference.profile_type, ProfileType::Delegator);
        assert!(fits.is_empty());
    }

    #[test]
    fn test_count_action_verbs() {
        let config = EvaluationConfig::default_finance();
        assert_eq!(count_action_verbs(config.action_verbs(), "lideré el equipo e implementé sap"), 2);
    }
}
