//! Company detection and industry tier classification.
//!
//! Tier selection is a short-circuit cascade over `TIER_RULES`: the first rule
//! that matches wins and later rules are never consulted.

use tracing::debug;

use crate::models::company::{CompanyContext, CompanyTier};
use crate::models::evaluation::IndustryTier;
use crate::rubric::IndustryMultipliers;

/// Tier chosen for a résumé, with the multiplier applied to category scores.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryClassification {
    pub tier: IndustryTier,
    pub multiplier: f64,
    /// Sentence fragment appended to category reasoning; starts with a space.
    pub reasoning: String,
}

struct TierRule {
    tier: IndustryTier,
    matches_company: fn(CompanyTier) -> bool,
    fallback_keywords: &'static [&'static str],
    company_note: &'static str,
    keyword_note: &'static str,
}

const TIER_RULES: [TierRule; 3] = [
    TierRule {
        tier: IndustryTier::Fintech,
        matches_company: |t| t == CompanyTier::Fintech,
        fallback_keywords: &["fintech", "fintoc", "mercadopago", "rappi", "klarna", "stripe"],
        company_note: " **Fintech bonus:** direct fintech experience detected.",
        keyword_note: " **Fintech bonus:** fintech industry keywords detected.",
    },
    TierRule {
        tier: IndustryTier::Tech,
        matches_company: |t| t == CompanyTier::Tech,
        fallback_keywords: &["startup", "software", "tech", "saas", "platform"],
        company_note: " **Tech bonus:** experience at technology companies.",
        keyword_note: " **Tech bonus:** technology industry keywords detected.",
    },
    TierRule {
        tier: IndustryTier::Traditional,
        matches_company: |t| t.is_traditional(),
        fallback_keywords: &["minería", "construcción", "educación", "retail", "manufactura"],
        company_note: " **Traditional-industry alert:** main experience in a traditional industry.",
        keyword_note: " **Traditional-industry alert:** traditional industry keywords detected.",
    },
];

impl IndustryTier {
    pub fn multiplier(&self, multipliers: &IndustryMultipliers) -> f64 {
        match self {
            IndustryTier::Fintech => multipliers.fintech,
            IndustryTier::Tech => multipliers.tech,
            IndustryTier::General => multipliers.general,
            IndustryTier::Traditional => multipliers.traditional,
        }
    }
}

/// Returns the knowledge-base entries whose name occurs in `text`.
///
/// Plain case-insensitive containment: a short name can match inside a longer word.
pub fn resolve_companies(text: &str, knowledge_base: &CompanyContext) -> CompanyContext {
    let text_lower = text.to_lowercase();
    knowledge_base
        .iter()
        .filter(|(name, _)| {
            let name = name.trim().to_lowercase();
            !name.is_empty() && text_lower.contains(&name)
        })
        .map(|(name, info)| (name.clone(), info.clone()))
        .collect()
}

/// Picks the industry tier from detected companies, falling back to text
/// keywords only when no company context was supplied (`None` or empty).
pub fn classify_industry(
    companies: Option<&CompanyContext>,
    text_lower: &str,
    multipliers: &IndustryMultipliers,
) -> IndustryClassification {
    let classification = match companies.filter(|c| !c.is_empty()) {
        Some(companies) => TIER_RULES
            .iter()
            .find(|rule| companies.values().any(|info| (rule.matches_company)(info.tier)))
            .map(|rule| (rule.tier, rule.company_note)),
        None => TIER_RULES
            .iter()
            .find(|rule| rule.fallback_keywords.iter().any(|kw| text_lower.contains(kw)))
            .map(|rule| (rule.tier, rule.keyword_note)),
    };

    let (tier, reasoning) = classification.unwrap_or((IndustryTier::General, ""));
    debug!("Industry tier classified as {:?}", tier);

    IndustryClassification {
        tier,
        multiplier: tier.multiplier(multipliers),
        reasoning: reasoning.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::company::CompanyInfo;

    fn kb(entries: &[(&str, CompanyTier)]) -> CompanyContext {
        entries
            .iter()
            .map(|(name, tier)| {
                (
                    name.to_string(),
                    CompanyInfo {
                        description: format!("{name} description"),
                        tier: *tier,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_resolve_companies_is_case_insensitive() {
        let knowledge = kb(&[("Fintoc", CompanyTier::Fintech), ("Codelco", CompanyTier::Mining)]);
        let found = resolve_companies("Trabajé en FINTOC como analista", &knowledge);
        assert_eq!(found.len(), 1);
        assert!(found.contains_key("Fintoc"));
    }

    #[test]
    fn test_resolve_companies_matches_inside_longer_words() {
        let knowledge = kb(&[("BCI", CompanyTier::Other)]);
        let found = resolve_companies("Experiencia en abcide consultores", &knowledge);
        assert!(found.contains_key("BCI"));
    }

    #[test]
    fn test_fintech_company_wins_over_traditional() {
        let companies = kb(&[("Codelco", CompanyTier::Mining), ("Fintoc", CompanyTier::Fintech)]);
        let c = classify_industry(Some(&companies), "", &IndustryMultipliers::default());
        assert_eq!(c.tier, IndustryTier::Fintech);
        assert_eq!(c.multiplier, 1.5);
        assert!(c.reasoning.contains("direct fintech experience"));
    }

    #[test]
    fn test_tech_company_beats_traditional() {
        let companies = kb(&[("Codelco", CompanyTier::Mining), ("Globant", CompanyTier::Tech)]);
        let c = classify_industry(Some(&companies), "", &IndustryMultipliers::default());
        assert_eq!(c.tier, IndustryTier::Tech);
        assert_eq!(c.multiplier, 1.2);
    }

    #[test]
    fn test_real_estate_is_traditional() {
        let companies = kb(&[("Inmobiliaria X", CompanyTier::RealEstate)]);
        let c = classify_industry(Some(&companies), "", &IndustryMultipliers::default());
        assert_eq!(c.tier, IndustryTier::Traditional);
        assert_eq!(c.multiplier, 0.7);
        assert!(c.reasoning.contains("Traditional-industry alert"));
    }

    #[test]
    fn test_other_companies_give_general_without_keyword_fallback() {
        let companies = kb(&[("Consultora Y", CompanyTier::Other)]);
        // Keywords would say fintech, but context was supplied so no fallback.
        let c = classify_industry(Some(&companies), "fintech startup", &IndustryMultipliers::default());
        assert_eq!(c.tier, IndustryTier::General);
        assert_eq!(c.multiplier, 1.0);
        assert!(c.reasoning.is_empty());
    }

    #[test]
    fn test_keyword_fallback_without_context() {
        let m = IndustryMultipliers::default();
        assert_eq!(classify_industry(None, "pagos en stripe", &m).tier, IndustryTier::Fintech);
        assert_eq!(classify_industry(None, "empresa saas", &m).tier, IndustryTier::Tech);
        assert_eq!(classify_industry(None, "sector minería", &m).tier, IndustryTier::Traditional);
        assert_eq!(classify_industry(None, "banca tradicional", &m).tier, IndustryTier::General);
    }

    #[test]
    fn test_fallback_priority_fintech_before_tech() {
        let c = classify_industry(None, "startup fintech", &IndustryMultipliers::default());
        assert_eq!(c.tier, IndustryTier::Fintech);
        assert!(c.reasoning.contains("keywords"));
    }

    #[test]
    fn test_empty_context_behaves_like_none() {
        let empty = CompanyContext::new();
        let c = classify_industry(Some(&empty), "software", &IndustryMultipliers::default());
        assert_eq!(c.tier, IndustryTier::Tech);
    }

    #[test]
    fn test_custom_multipliers_are_used() {
        let m = IndustryMultipliers {
            fintech: 2.0,
            ..IndustryMultipliers::default()
        };
        assert_eq!(classify_industry(None, "klarna", &m).multiplier, 2.0);
    }
}
