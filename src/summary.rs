//! Request and response bodies of the summarize operation.

use serde::{Deserialize, Serialize};

/// `{"url": "..."}`; a missing or null field reads as an empty URL
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl SummarizeRequest {
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// Successful result: `{"summary": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub summary: String,
}

impl Summary {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }
}

/// Failure result: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
