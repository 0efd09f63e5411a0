use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wingman::config::Config;
use wingman::feedback::{AdjustmentAdvisor, LlmAdjustmentAdvisor};
use wingman::llm_client::{self, LlmClient};
use wingman::models::review::ReviewComment;
use wingman::pipeline::{EvaluationRequest, EvaluationService};
use wingman::store::{CandidateStatus, InMemoryEvaluationStore};

#[derive(Parser, Debug)]
#[command(
    name = "wingman",
    about = "Score a résumé against the rubric and merge reviewer comments",
    version
)]
struct Cli {
    /// Plain-text résumé
    cv: PathBuf,
    /// JSON array of review comments ({author, text, timestamp})
    comments: Option<PathBuf>,
    #[arg(long, default_value = "local")]
    candidate_id: String,
    /// Skip the AI advisor even when ANTHROPIC_API_KEY is set
    #[arg(long)]
    no_advisor: bool,
    /// Print a one-line profile summary and the automatic-adjustments note after the JSON
    #[arg(long)]
    summary: bool,
}

fn read_comments(path: &Path) -> Result<Vec<ReviewComment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read comments from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid comments JSON in {}", path.display()))
}

fn build_advisor(config: &Config, disabled: bool) -> Result<Option<Arc<dyn AdjustmentAdvisor>>> {
    if disabled {
        return Ok(None);
    }
    let Some(key) = config.anthropic_api_key.as_deref() else {
        warn!("ANTHROPIC_API_KEY not set, merging manual directives only");
        return Ok(None);
    };
    let llm = LlmClient::new(key)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let advisor: Arc<dyn AdjustmentAdvisor> = Arc::new(LlmAdjustmentAdvisor(llm));
    Ok(Some(advisor))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Wingman v{}", env!("CARGO_PKG_VERSION"));

    let rubric = config.load_rubric()?;
    let knowledge_base = config.load_knowledge_base()?.unwrap_or_default();

    let cv_text = std::fs::read_to_string(&cli.cv)
        .with_context(|| format!("Failed to read résumé {}", cli.cv.display()))?;
    let comments = match &cli.comments {
        Some(path) => read_comments(path)?,
        None => Vec::new(),
    };

    let service = EvaluationService {
        config: Arc::new(rubric),
        knowledge_base: Arc::new(knowledge_base),
        store: Arc::new(InMemoryEvaluationStore::with_ttl_hours(
            config.evaluation_ttl_hours,
        )),
        advisor: build_advisor(&config, cli.no_advisor)?,
    };

    let outcome = service
        .run(EvaluationRequest {
            candidate_id: &cli.candidate_id,
            cv_text: &cv_text,
            status: CandidateStatus::Active,
            comments: &comments,
            force: false,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if cli.summary {
        println!("\n{}", outcome.evaluation.result.inference.headline());
        if let Some(note) = outcome.evaluation.summary_comment(Utc::now().date_naive()) {
            println!("\n{note}");
        }
    }

    Ok(())
}
