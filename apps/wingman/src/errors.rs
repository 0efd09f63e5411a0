use thiserror::Error;

use crate::rubric::RubricError;
use crate::store::StoreError;

/// Application-level error for the pipeline and the driver.
///
/// Scoring itself cannot fail; everything here comes from loading inputs or
/// from the store.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Rubric error: {0}")]
    Rubric(#[from] RubricError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
