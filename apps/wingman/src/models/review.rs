use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text review or interview note left on a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(alias = "autor")]
    pub author: String,
    #[serde(alias = "comentario")]
    pub text: String,
    #[serde(alias = "created_at")]
    pub timestamp: DateTime<Utc>,
}

impl ReviewComment {
    pub fn new(author: impl Into<String>, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            timestamp,
        }
    }
}
