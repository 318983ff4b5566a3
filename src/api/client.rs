//! Search service gateway
//!
//! One method per backend capability. Methods never touch UI state; they
//! return typed results and leave reconciliation to the caller.

use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ApiError;
use super::types::{
    ErrorBody, ExplainRequest, ExplainResponse, IndexOutcome, IndexRequest, SearchOutcome,
    SearchRequest, StatsSnapshot, UploadOutcome,
};
use crate::config::ApiConfig;

/// Local development endpoint used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Returned by [`ApiClient::explain_code`] whenever the service cannot explain
pub const EXPLAIN_PLACEHOLDER: &str = "Failed to get explanation.";

/// HTTP client for the semantic search service.
///
/// Build it once and share it behind an `Arc`; the base URL is fixed for the
/// lifetime of the client.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `url` with the given request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("codescout/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness probe. The payload is opaque to the client.
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let response = self.client.get(self.url("/health")).send().await?;
        read_json(response).await
    }

    /// Run a search; `request` carries the query and the active filters
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, ApiError> {
        debug!(query = %request.query, top_k = request.top_k, "POST /api/search");
        let response = self
            .client
            .post(self.url("/api/search"))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    /// Aggregate index metrics
    pub async fn get_stats(&self) -> Result<StatsSnapshot, ApiError> {
        let response = self.client.get(self.url("/api/stats")).send().await?;
        read_json(response).await
    }

    /// Ask the service to explain `code` in the context of `query`.
    ///
    /// Never fails: any error yields [`EXPLAIN_PLACEHOLDER`].
    pub async fn explain_code(&self, code: &str, query: &str) -> String {
        match self.try_explain(code, query).await {
            Ok(explanation) => explanation,
            Err(err) => {
                warn!("Explanation failed: {err}");
                EXPLAIN_PLACEHOLDER.to_string()
            }
        }
    }

    async fn try_explain(&self, code: &str, query: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/api/explain"))
            .json(&ExplainRequest { code, query })
            .send()
            .await?;
        let body: ExplainResponse = read_json(response).await?;
        Ok(body.explanation)
    }

    /// Upload a zipped codebase for indexing.
    ///
    /// `language_hints` are sent comma-joined in the `languages` field.
    pub async fn index_upload(
        &self,
        archive: &Path,
        language_hints: &[String],
    ) -> Result<UploadOutcome, ApiError> {
        let bytes = tokio::fs::read(archive).await.map_err(|source| ApiError::Io {
            path: archive.to_path_buf(),
            source,
        })?;
        let file_name = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.zip".to_string());

        debug!(file = %file_name, size = bytes.len(), "POST /api/upload");

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/zip")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("languages", language_hints.join(","));

        let response = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    /// Index a repository path that lives on the server's filesystem
    pub async fn index_repository(
        &self,
        repo_path: &str,
        languages: Option<&[String]>,
    ) -> Result<IndexOutcome, ApiError> {
        let response = self
            .client
            .post(self.url("/api/index"))
            .json(&IndexRequest {
                repo_path,
                languages,
            })
            .send()
            .await?;
        read_json(response).await
    }
}

/// Decode a 2xx body, or turn anything else into `ServerRejected`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        return Err(ApiError::ServerRejected {
            status: status.as_u16(),
            detail,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
