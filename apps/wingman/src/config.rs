use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::errors::AppError;
use crate::models::company::CompanyContext;
use crate::rubric::EvaluationConfig;

const DEFAULT_TTL_HOURS: u64 = 168;

/// Process configuration loaded from environment variables.
/// Everything is optional: without an API key the advisor is disabled, and
/// without a rubric path the built-in finance rubric is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub rubric_path: Option<PathBuf>,
    pub company_kb_path: Option<PathBuf>,
    pub evaluation_ttl_hours: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            rubric_path: get("RUBRIC_PATH").map(PathBuf::from),
            company_kb_path: get("COMPANY_KB_PATH").map(PathBuf::from),
            evaluation_ttl_hours: get("EVALUATION_TTL_HOURS")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("EVALUATION_TTL_HOURS must be a whole number of hours")?
                .unwrap_or(DEFAULT_TTL_HOURS),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The rubric at `RUBRIC_PATH`, or the built-in finance rubric.
    pub fn load_rubric(&self) -> Result<EvaluationConfig, AppError> {
        match &self.rubric_path {
            Some(path) => Ok(EvaluationConfig::load(path)?),
            None => {
                info!("RUBRIC_PATH not set, using the built-in finance rubric");
                Ok(EvaluationConfig::default_finance())
            }
        }
    }

    /// The company knowledge base at `COMPANY_KB_PATH`, if configured.
    pub fn load_knowledge_base(&self) -> Result<Option<CompanyContext>, AppError> {
        self.company_kb_path
            .as_deref()
            .map(load_knowledge_base)
            .transpose()
    }
}

/// Reads a JSON object of company name → `{description, tier}`.
pub fn load_knowledge_base(path: &Path) -> Result<CompanyContext, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let knowledge: CompanyContext = serde_json::from_str(&raw)?;
    info!("Loaded {} known companies from {}", knowledge.len(), path.display());
    Ok(knowledge)
}
