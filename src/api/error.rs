//! Domain errors for the search service gateway

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single gateway operation.
///
/// Transport details stay inside the variants; anything shown to a user
/// should go through [`ApiError::user_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response at all: DNS, refused connection, reset, TLS...
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("server rejected request ({status}){}", fmt_detail(.detail))]
    ServerRejected { status: u16, detail: Option<String> },

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// A local file needed for the request could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

impl ApiError {
    /// Whether the backend could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout)
    }

    /// Server-supplied reason, if the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::ServerRejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for an inline error panel.
    ///
    /// `action` completes the sentence "Failed to ...", e.g. "perform search".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApiError::Network(_) | ApiError::Timeout => {
                format!("Failed to {action}. Is the backend running?")
            }
            ApiError::ServerRejected {
                detail: Some(detail),
                ..
            } => format!("Failed to {action}: {detail}"),
            ApiError::ServerRejected { status, detail: None } => {
                format!("Failed to {action}: the server responded with status {status}. Check the backend logs.")
            }
            ApiError::Decode(_) => {
                format!("Failed to {action}: unexpected response. Is the API URL pointing at the search service?")
            }
            ApiError::Io { path, .. } => {
                format!("Failed to {action}: could not read {}", path.display())
            }
        }
    }
}
