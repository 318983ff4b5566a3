//! Wire types for the search service
//!
//! Field names follow the service's JSON exactly.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/search`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
}

/// One matched chunk of source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub code: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub language: String,
    pub score: f32,
    #[serde(default)]
    pub function_name: Option<String>,
}

/// Response from `POST /api/search`
///
/// `results` keeps the server's relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub query: String,
    pub total_results: usize,
    pub search_time: f64,
}

/// Response from `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_documents_indexed: u64,
    /// Whatever else the service chooses to report.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExplainRequest<'a> {
    pub code: &'a str,
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExplainResponse {
    pub explanation: String,
}

/// Indexing statistics returned by `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub files_indexed: u64,
    pub chunks_created: u64,
    pub time_taken: f64,
}

impl UploadOutcome {
    pub fn summary(&self) -> String {
        format!(
            "Indexed {} files, {} chunks in {:.2}s",
            self.files_indexed, self.chunks_created, self.time_taken
        )
    }
}

/// Request body for `POST /api/index`
#[derive(Debug, Serialize)]
pub(crate) struct IndexRequest<'a> {
    pub repo_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<&'a [String]>,
}

/// Response from `POST /api/index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexOutcome {
    pub status: String,
    pub files_indexed: u64,
    pub chunks_created: u64,
    pub time_taken: f64,
}

/// Error body sent with non-2xx responses.
///
/// `detail` is usually a string, but validation errors carry a list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
