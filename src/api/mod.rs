//! Gateway to the remote semantic code search service

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::ApiError;
pub use types::{SearchOutcome, SearchRequest, SearchResult, StatsSnapshot, UploadOutcome};
