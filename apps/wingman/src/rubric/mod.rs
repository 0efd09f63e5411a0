//! Rubric: the versioned scoring configuration.
//!
//! Every constructor and the serde entry point validate, so a value of type
//! `EvaluationConfig` can be scored without further checks.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub mod defaults;

#[derive(Debug, Error)]
pub enum RubricError {
    #[error("rubric version must not be empty")]
    EmptyVersion,

    #[error("rubric must define at least one category")]
    NoCategories,

    #[error("category '{category}' has no keywords")]
    NoKeywords { category: String },

    #[error("category '{category}' has a blank keyword")]
    BlankKeyword { category: String },

    #[error("category '{category}' lists keyword '{keyword}' more than once")]
    DuplicateKeyword { category: String, keyword: String },

    #[error("category '{category}' has max_expected {value}; it must be greater than 0")]
    InvalidMaxExpected { category: String, value: i64 },

    #[error("industry multiplier '{tier}' must be a finite number >= 0, got {value}")]
    InvalidMultiplier { tier: &'static str, value: f64 },

    #[error("{table} has a blank entry")]
    BlankEntry { table: &'static str },

    #[error("title '{title}' has rank {rank}; ranks must be between 1 and 4")]
    InvalidTitleRank { title: String, rank: u8 },

    #[error("failed to read rubric {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid rubric document: {0}")]
    Parse(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Categories
// ────────────────────────────────────────────────────────────────────────────

const DEFAULT_MAX_EXPECTED: i64 = 5;

fn default_max_expected() -> i64 {
    DEFAULT_MAX_EXPECTED
}

#[derive(Debug, Deserialize)]
struct CategoryConfigDef {
    name: String,
    keywords: Vec<String>,
    #[serde(default = "default_max_expected")]
    max_expected: i64,
    #[serde(default)]
    culture_booster_keywords: Option<Vec<String>>,
}

/// A rubric dimension scored independently from the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CategoryConfigDef")]
pub struct CategoryConfig {
    name: String,
    keywords: Vec<String>,
    max_expected: u32,
    culture_booster_keywords: Vec<String>,
}

impl CategoryConfig {
    pub fn new(
        name: impl Into<String>,
        keywords: Vec<String>,
        max_expected: i64,
    ) -> Result<Self, RubricError> {
        let name = name.into();

        if keywords.is_empty() {
            return Err(RubricError::NoKeywords { category: name });
        }

        let mut seen = HashSet::new();
        for keyword in &keywords {
            if keyword.trim().is_empty() {
                return Err(RubricError::BlankKeyword { category: name });
            }
            if !seen.insert(keyword.to_lowercase()) {
                return Err(RubricError::DuplicateKeyword {
                    category: name,
                    keyword: keyword.clone(),
                });
            }
        }

        if max_expected <= 0 || max_expected > u32::MAX as i64 {
            return Err(RubricError::InvalidMaxExpected {
                category: name,
                value: max_expected,
            });
        }

        Ok(Self {
            name,
            keywords,
            max_expected: max_expected as u32,
            culture_booster_keywords: Vec::new(),
        })
    }

    pub fn with_culture_boosters(mut self, keywords: Vec<String>) -> Self {
        self.culture_booster_keywords = keywords
            .into_iter()
            .filter(|k| !k.trim().is_empty())
            .collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Always > 0.
    pub fn max_expected(&self) -> u32 {
        self.max_expected
    }

    pub fn culture_booster_keywords(&self) -> &[String] {
        &self.culture_booster_keywords
    }
}

impl TryFrom<CategoryConfigDef> for CategoryConfig {
    type Error = RubricError;

    fn try_from(def: CategoryConfigDef) -> Result<Self, Self::Error> {
        let config = CategoryConfig::new(def.name, def.keywords, def.max_expected)?;
        Ok(config.with_culture_boosters(def.culture_booster_keywords.unwrap_or_default()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inference inputs, multipliers, lookup tables
// ────────────────────────────────────────────────────────────────────────────

/// Keyword lists feeding the profile inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default)]
    pub technical_keywords: Vec<String>,
    /// Tracked and reported, not used in any score yet.
    #[serde(default)]
    pub strategic_keywords: Vec<String>,
    #[serde(default)]
    pub corporate_scope_keywords: Vec<String>,
}

impl InferenceConfig {
    fn validate(&self) -> Result<(), RubricError> {
        reject_blank("inference.technical_keywords", &self.technical_keywords)?;
        reject_blank("inference.strategic_keywords", &self.strategic_keywords)?;
        reject_blank(
            "inference.corporate_scope_keywords",
            &self.corporate_scope_keywords,
        )
    }
}

fn default_fintech() -> f64 {
    1.5
}
fn default_tech() -> f64 {
    1.2
}
fn default_general() -> f64 {
    1.0
}
fn default_traditional() -> f64 {
    0.7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryMultipliers {
    #[serde(default = "default_fintech")]
    pub fintech: f64,
    #[serde(default = "default_tech")]
    pub tech: f64,
    #[serde(default = "default_general")]
    pub general: f64,
    #[serde(default = "default_traditional")]
    pub traditional: f64,
}

impl Default for IndustryMultipliers {
    fn default() -> Self {
        Self {
            fintech: default_fintech(),
            tech: default_tech(),
            general: default_general(),
            traditional: default_traditional(),
        }
    }
}

impl IndustryMultipliers {
    fn validate(&self) -> Result<(), RubricError> {
        for (tier, value) in [
            ("fintech", self.fintech),
            ("tech", self.tech),
            ("general", self.general),
            ("traditional", self.traditional),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RubricError::InvalidMultiplier { tier, value });
            }
        }
        Ok(())
    }
}

/// A seniority title and its rank (1 = junior lead … 4 = head of area).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRank {
    pub title: String,
    pub rank: u8,
}

impl TitleRank {
    pub fn new(title: impl Into<String>, rank: u8) -> Self {
        Self {
            title: title.into(),
            rank,
        }
    }
}

/// Follow-up question rule attached to a category key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionRule {
    /// Ask `question` when `keyword` was not found.
    MissingKeyword { keyword: String, question: String },
    /// Ask about the first `limit` missing keywords, if any are missing.
    MissingSummary { limit: usize },
    /// Ask `question` when fewer than `threshold` action verbs were found.
    LowExecution { threshold: u32, question: String },
}

// ────────────────────────────────────────────────────────────────────────────
// EvaluationConfig
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EvaluationConfigDef {
    #[serde(default = "defaults::default_version")]
    version: String,
    categories: BTreeMap<String, CategoryConfig>,
    #[serde(default)]
    inference: InferenceConfig,
    #[serde(default)]
    industry_multipliers: IndustryMultipliers,
    #[serde(default)]
    title_ranks: Option<Vec<TitleRank>>,
    #[serde(default)]
    adaptability_keywords: Option<Vec<String>>,
    #[serde(default)]
    action_verbs: Option<Vec<String>>,
    #[serde(default)]
    question_rules: Option<BTreeMap<String, Vec<QuestionRule>>>,
}

/// Versioned rubric. Owned by the caller and only ever read by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvaluationConfigDef")]
pub struct EvaluationConfig {
    version: String,
    categories: BTreeMap<String, CategoryConfig>,
    inference: InferenceConfig,
    industry_multipliers: IndustryMultipliers,
    title_ranks: Vec<TitleRank>,
    adaptability_keywords: Vec<String>,
    action_verbs: Vec<String>,
    question_rules: BTreeMap<String, Vec<QuestionRule>>,
}

impl EvaluationConfig {
    /// Builds a rubric from categories, taking every other table from the defaults.
    pub fn new(
        version: impl Into<String>,
        categories: BTreeMap<String, CategoryConfig>,
    ) -> Result<Self, RubricError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(RubricError::EmptyVersion);
        }
        if categories.is_empty() {
            return Err(RubricError::NoCategories);
        }

        Ok(Self {
            version,
            categories,
            inference: InferenceConfig::default(),
            industry_multipliers: IndustryMultipliers::default(),
            title_ranks: defaults::title_ranks(),
            adaptability_keywords: defaults::adaptability_keywords(),
            action_verbs: defaults::action_verbs(),
            question_rules: defaults::question_rules(),
        })
    }

    /// Built-in Senior Finance rubric.
    pub fn default_finance() -> Self {
        defaults::finance_rubric()
    }

    pub fn from_json_str(json: &str) -> Result<Self, RubricError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(
            "Loaded rubric v{} with {} categories from {}",
            config.version,
            config.categories.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn with_inference(mut self, inference: InferenceConfig) -> Result<Self, RubricError> {
        inference.validate()?;
        self.inference = inference;
        Ok(self)
    }

    pub fn with_multipliers(mut self, multipliers: IndustryMultipliers) -> Result<Self, RubricError> {
        multipliers.validate()?;
        self.industry_multipliers = multipliers;
        Ok(self)
    }

    pub fn with_title_ranks(mut self, ranks: Vec<TitleRank>) -> Result<Self, RubricError> {
        validate_title_ranks(&ranks)?;
        self.title_ranks = ranks;
        Ok(self)
    }

    pub fn with_adaptability_keywords(mut self, keywords: Vec<String>) -> Result<Self, RubricError> {
        reject_blank("adaptability_keywords", &keywords)?;
        self.adaptability_keywords = keywords;
        Ok(self)
    }

    pub fn with_action_verbs(mut self, verbs: Vec<String>) -> Result<Self, RubricError> {
        reject_blank("action_verbs", &verbs)?;
        self.action_verbs = verbs;
        Ok(self)
    }

    pub fn with_question_rules(
        mut self,
        rules: BTreeMap<String, Vec<QuestionRule>>,
    ) -> Result<Self, RubricError> {
        let blank_keyword = rules.values().flatten().any(|rule| {
            matches!(rule, QuestionRule::MissingKeyword { keyword, .. } if keyword.trim().is_empty())
        });
        if blank_keyword {
            return Err(RubricError::BlankEntry {
                table: "question_rules",
            });
        }
        self.question_rules = rules;
        Ok(self)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn categories(&self) -> &BTreeMap<String, CategoryConfig> {
        &self.categories
    }

    pub fn inference(&self) -> &InferenceConfig {
        &self.inference
    }

    pub fn industry_multipliers(&self) -> &IndustryMultipliers {
        &self.industry_multipliers
    }

    pub fn title_ranks(&self) -> &[TitleRank] {
        &self.title_ranks
    }

    pub fn adaptability_keywords(&self) -> &[String] {
        &self.adaptability_keywords
    }

    pub fn action_verbs(&self) -> &[String] {
        &self.action_verbs
    }

    /// Question rules for a category key. Unknown keys have none.
    pub fn question_rules(&self, category_key: &str) -> &[QuestionRule] {
        self.question_rules
            .get(category_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl TryFrom<EvaluationConfigDef> for EvaluationConfig {
    type Error = RubricError;

    fn try_from(def: EvaluationConfigDef) -> Result<Self, Self::Error> {
        let mut config = EvaluationConfig::new(def.version, def.categories)?
            .with_inference(def.inference)?
            .with_multipliers(def.industry_multipliers)?;

        if let Some(ranks) = def.title_ranks {
            config = config.with_title_ranks(ranks)?;
        }
        if let Some(keywords) = def.adaptability_keywords {
            config = config.with_adaptability_keywords(keywords)?;
        }
        if let Some(verbs) = def.action_verbs {
            config = config.with_action_verbs(verbs)?;
        }
        if let Some(rules) = def.question_rules {
            config = config.with_question_rules(rules)?;
        }
        Ok(config)
    }
}

/// Substring matching treats an empty needle as present everywhere.
fn reject_blank(table: &'static str, entries: &[String]) -> Result<(), RubricError> {
    if entries.iter().any(|entry| entry.trim().is_empty()) {
        return Err(RubricError::BlankEntry { table });
    }
    Ok(())
}

fn validate_title_ranks(ranks: &[TitleRank]) -> Result<(), RubricError> {
    for rank in ranks {
        if rank.title.trim().is_empty() {
            return Err(RubricError::BlankEntry {
                table: "title_ranks",
            });
        }
        if !(1..=4).contains(&rank.rank) {
            return Err(RubricError::InvalidTitleRank {
                title: rank.title.clone(),
                rank: rank.rank,
            });
        }
    }
    Ok(())
}
