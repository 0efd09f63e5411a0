use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Classification enums
// ────────────────────────────────────────────────────────────────────────────

/// Behavioral profile inferred from seniority titles and task vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileType {
    /// Manages and still operates.
    #[default]
    Hybrid,
    HandsOn,
    /// Senior title with little operational vocabulary.
    Delegator,
    /// Senior title used to regional/global scope.
    Corporate,
}

impl ProfileType {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileType::Hybrid => "Hybrid (management + operations)",
            ProfileType::HandsOn => "Hands-on executor",
            ProfileType::Delegator => "Strategic / delegator",
            ProfileType::Corporate => "Senior corporate / overqualified",
        }
    }
}

/// Likelihood the candidate disengages if hired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RetentionRisk {
    #[default]
    #[serde(alias = "Bajo", alias = "bajo", alias = "low")]
    Low,
    #[serde(alias = "Medio", alias = "medio", alias = "medium")]
    Medium,
    #[serde(alias = "Alto", alias = "alto", alias = "high")]
    High,
}

impl RetentionRisk {
    /// Accepts English and Spanish labels in any case.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "bajo" => Some(RetentionRisk::Low),
            "medium" | "medio" => Some(RetentionRisk::Medium),
            "high" | "alto" => Some(RetentionRisk::High),
            _ => None,
        }
    }

    /// Spanish label used by reviewers when writing directives.
    pub fn directive_label(&self) -> &'static str {
        match self {
            RetentionRisk::Low => "bajo",
            RetentionRisk::Medium => "medio",
            RetentionRisk::High => "alto",
        }
    }
}

/// Industry background inferred from companies or keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndustryTier {
    Fintech,
    Tech,
    #[default]
    General,
    Traditional,
}

impl IndustryTier {
    pub fn label(&self) -> &'static str {
        match self {
            IndustryTier::Fintech => "Fintech (ideal)",
            IndustryTier::Tech => "Tech / Digital",
            IndustryTier::General => "General",
            IndustryTier::Traditional => "Traditional",
        }
    }
}

/// Coarse bucket over `potential_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotentialLevel {
    Low,
    Medium,
    High,
}

impl PotentialLevel {
    /// High ≥ 70, Medium ≥ 40, otherwise Low.
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            PotentialLevel::High
        } else if score >= 40 {
            PotentialLevel::Medium
        } else {
            PotentialLevel::Low
        }
    }

    pub fn directive_label(&self) -> &'static str {
        match self {
            PotentialLevel::Low => "bajo",
            PotentialLevel::Medium => "medio",
            PotentialLevel::High => "alto",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result aggregates
// ────────────────────────────────────────────────────────────────────────────

/// Score and evidence for one rubric category.
///
/// `found` and `missing` partition the configured keyword list and keep its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub score: u32, // 0 – 100
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub reasoning: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub profile_type: ProfileType,
    pub hands_on_index: u32, // 0 – 100
    pub scope_intensity: u32,
    pub retention_risk: RetentionRisk,
    pub potential_score: u32, // 0 – 100
    pub risk_warning: String,
    pub industry_tier: IndustryTier,
    /// Seniority titles present in the text, in rank-table order.
    pub detected_titles: Vec<String>,
    /// Strategic keywords present in the text. Informational only.
    pub strategic_signals: Vec<String>,
    pub action_verb_count: u32,
}

impl InferenceResult {
    pub fn potential_level(&self) -> PotentialLevel {
        PotentialLevel::from_score(self.potential_score)
    }

    /// One-line human summary for terminal output.
    pub fn headline(&self) -> String {
        format!(
            "Profile: {} | Industry: {} | Hands-on: {}% | Potential: {} ({:?}) | Retention risk: {:?}",
            self.profile_type.label(),
            self.industry_tier.label(),
            self.hands_on_index,
            self.potential_score,
            self.potential_level(),
            self.retention_risk,
        )
    }
}

/// Full evaluation of one résumé against one rubric version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub fits: BTreeMap<String, CategoryResult>,
    pub inference: InferenceResult,
    pub average_score: u32,
    pub config_version: String,
}

impl EvaluationResult {
    /// Truncated mean of the category scores; 0 when there are no categories.
    pub fn mean_score(fits: &BTreeMap<String, CategoryResult>) -> u32 {
        if fits.is_empty() {
            return 0;
        }
        let total: u32 = fits.values().map(|c| c.score).sum();
        total / fits.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(score: u32) -> CategoryResult {
        CategoryResult {
            score,
            found: vec![],
            missing: vec![],
            reasoning: String::new(),
            questions: vec![],
        }
    }

    #[test]
    fn test_mean_score_truncates() {
        let fits = BTreeMap::from([
            ("admin".to_string(), category(50)),
            ("ops".to_string(), category(65)),
            ("biz".to_string(), category(66)),
        ]);
        // 181 / 3 = 60.33
        assert_eq!(EvaluationResult::mean_score(&fits), 60);
    }

    #[test]
    fn test_mean_score_empty_is_zero() {
        assert_eq!(EvaluationResult::mean_score(&BTreeMap::new()), 0);
    }

    #[test]
    fn test_potential_level_thresholds() {
        assert_eq!(PotentialLevel::from_score(70), PotentialLevel::High);
        assert_eq!(PotentialLevel::from_score(69), PotentialLevel::Medium);
        assert_eq!(PotentialLevel::from_score(40), PotentialLevel::Medium);
        assert_eq!(PotentialLevel::from_score(39), PotentialLevel::Low);
    }

    #[test]
    fn test_inference_headline() {
        let inference = InferenceResult {
            profile_type: ProfileType::Delegator,
            hands_on_index: 20,
            scope_intensity: 1,
            retention_risk: RetentionRisk::High,
            potential_score: 75,
            risk_warning: String::new(),
            industry_tier: IndustryTier::Fintech,
            detected_titles: vec!["gerente".to_string()],
            strategic_signals: vec![],
            action_verb_count: 0,
        };
        assert_eq!(
            inference.headline(),
            "Profile: Strategic / delegator | Industry: Fintech (ideal) | Hands-on: 20% \
             | Potential: 75 (High) | Retention risk: High"
        );
    }

    #[test]
    fn test_retention_risk_accepts_spanish_labels() {
        let risk: RetentionRisk = serde_json::from_str(r#""Alto""#).unwrap();
        assert_eq!(risk, RetentionRisk::High);
        assert_eq!(RetentionRisk::parse_label("Medio"), Some(RetentionRisk::Medium));
        assert_eq!(RetentionRisk::parse_label("LOW"), Some(RetentionRisk::Low));
        assert_eq!(RetentionRisk::parse_label("unknown"), None);
    }

    #[test]
    fn test_profile_default_is_hybrid() {
        assert_eq!(ProfileType::default(), ProfileType::Hybrid);
    }
}
