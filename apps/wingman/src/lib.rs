//! Wingman: résumé scoring, profile inference and review-adjustment engine.
//!
//! `scoring::evaluate` is the pure core. `feedback::merge_adjustments` layers
//! reviewer comments on top, and `pipeline::EvaluationService` adds the store
//! and freshness policy around both.

pub mod config;
pub mod errors;
pub mod feedback;
pub mod llm_client;
pub mod models;
pub mod pipeline;
pub mod rubric;
pub mod scoring;
pub mod store;

pub use feedback::{merge_adjustments, AdjustedEvaluation};
pub use models::evaluation::EvaluationResult;
pub use rubric::EvaluationConfig;
pub use scoring::{evaluate, resolve_companies};
