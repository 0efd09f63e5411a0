use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Known companies keyed by display name. Used both for the knowledge base
/// and for the subset of it detected in a résumé.
pub type CompanyContext = BTreeMap<String, CompanyInfo>;

/// Industry a known company operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompanyTier {
    Fintech,
    Tech,
    Mining,
    Industrial,
    Education,
    Construction,
    RealEstate,
    Logistics,
    Other,
}

impl CompanyTier {
    /// Parses a knowledge-base tier label. Unknown labels map to `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "fintech" => CompanyTier::Fintech,
            "tech" => CompanyTier::Tech,
            "mining" => CompanyTier::Mining,
            "industrial" => CompanyTier::Industrial,
            "education" => CompanyTier::Education,
            "construction" => CompanyTier::Construction,
            "realestate" => CompanyTier::RealEstate,
            "logistics" => CompanyTier::Logistics,
            _ => CompanyTier::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyTier::Fintech => "Fintech",
            CompanyTier::Tech => "Tech",
            CompanyTier::Mining => "Mining",
            CompanyTier::Industrial => "Industrial",
            CompanyTier::Education => "Education",
            CompanyTier::Construction => "Construction",
            CompanyTier::RealEstate => "Real Estate",
            CompanyTier::Logistics => "Logistics",
            CompanyTier::Other => "Other",
        }
    }

    /// Mining, industrial, education, construction, real estate and logistics.
    pub fn is_traditional(&self) -> bool {
        matches!(
            self,
            CompanyTier::Mining
                | CompanyTier::Industrial
                | CompanyTier::Education
                | CompanyTier::Construction
                | CompanyTier::RealEstate
                | CompanyTier::Logistics
        )
    }
}

impl From<String> for CompanyTier {
    fn from(value: String) -> Self {
        CompanyTier::parse(&value)
    }
}

impl From<CompanyTier> for String {
    fn from(value: CompanyTier) -> Self {
        value.as_str().to_string()
    }
}

/// Knowledge-base entry for a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(alias = "desc")]
    pub description: String,
    pub tier: CompanyTier,
}
