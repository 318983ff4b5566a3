//! Archive upload lifecycle

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::status::{RequestStatus, Sequencer};
use crate::api::{ApiError, UploadOutcome};

const NETWORK_FAILURE: &str = "Network error. Is the backend running?";
const GENERIC_FAILURE: &str = "Upload failed";

/// Result shown under the upload panel
#[derive(Debug, Clone, PartialEq)]
pub enum UploadReport {
    Indexed(UploadOutcome),
    Failed(String),
}

impl UploadReport {
    pub fn message(&self) -> String {
        match self {
            UploadReport::Indexed(outcome) => {
                format!("Code indexed successfully! {}", outcome.summary())
            }
            UploadReport::Failed(reason) => reason.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadReport::Indexed(_))
    }
}

/// Everything the driver needs to perform one upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub seq: u64,
    pub archive: PathBuf,
    pub languages: Vec<String>,
}

/// Single-file upload coordinator. At most one upload is in flight.
#[derive(Debug)]
pub struct UploadCoordinator {
    languages: Vec<String>,
    selected: Option<PathBuf>,
    sequencer: Sequencer,
    status: RequestStatus,
    report: Option<UploadReport>,
}

impl UploadCoordinator {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            selected: None,
            sequencer: Sequencer::default(),
            status: RequestStatus::Idle,
            report: None,
        }
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn report(&self) -> Option<&UploadReport> {
        self.report.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Choose the archive to upload. Clears the previous report.
    ///
    /// Returns `false` (and changes nothing) while an upload is running.
    pub fn select(&mut self, archive: impl Into<PathBuf>) -> bool {
        if self.is_uploading() {
            return false;
        }
        self.selected = Some(archive.into());
        self.report = None;
        true
    }

    /// Start uploading the selected archive.
    ///
    /// No-op without a selection or while another upload is running.
    pub fn upload(&mut self) -> Option<UploadRequest> {
        if self.is_uploading() {
            return None;
        }
        let archive = self.selected.clone()?;

        self.status = RequestStatus::Loading;
        self.report = None;
        let seq = self.sequencer.next();
        info!(seq, archive = %archive.display(), "Uploading archive");
        Some(UploadRequest {
            seq,
            archive,
            languages: self.languages.clone(),
        })
    }

    pub fn complete(&mut self, seq: u64, result: Result<UploadOutcome, ApiError>) {
        if !self.sequencer.is_current(seq) {
            debug!(seq, "Dropping stale upload response");
            return;
        }

        match result {
            Ok(outcome) => {
                self.selected = None;
                self.status = RequestStatus::Success;
                self.report = Some(UploadReport::Indexed(outcome));
            }
            Err(err) => {
                let reason = failure_message(&err);
                self.status = RequestStatus::Failed(reason.clone());
                self.report = Some(UploadReport::Failed(reason));
            }
        }
    }
}

fn failure_message(err: &ApiError) -> String {
    if err.is_connectivity() {
        return NETWORK_FAILURE.to_string();
    }
    if let ApiError::Io { .. } = err {
        return err.user_message("upload");
    }
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> UploadCoordinator {
        UploadCoordinator::new(vec!["python".to_string(), "rust".to_string()])
    }

    #[test]
    fn test_upload_without_selection_is_noop() {
        let mut upload = coordinator();
        assert!(upload.upload().is_none());
        assert!(!upload.is_uploading());
    }

    #[test]
    fn test_no_concurrent_uploads() {
        let mut upload = coordinator();
        upload.select("repo.zip");
        let request = upload.upload().unwrap();
        assert_eq!(request.languages, vec!["python", "rust"]);

        assert!(upload.upload().is_none());
        assert!(!upload.select("other.zip"));
        assert_eq!(upload.selected(), Some(Path::new("repo.zip")));
    }

    #[test]
    fn test_success_clears_selection() {
        let mut upload = coordinator();
        upload.select("repo.zip");
        let request = upload.upload().unwrap();
        upload.complete(
            request.seq,
            Ok(UploadOutcome {
                files_indexed: 0,
                chunks_created: 0,
                time_taken: 0.25,
            }),
        );

        assert!(upload.selected().is_none());
        let report = upload.report().unwrap();
        assert!(report.is_success());
        assert!(report.message().contains("Indexed 0 files, 0 chunks in 0.25s"));
    }

    #[test]
    fn test_failure_keeps_selection_for_retry() {
        let mut upload = coordinator();
        upload.select("repo.zip");
        let request = upload.upload().unwrap();
        upload.complete(
            request.seq,
            Err(ApiError::ServerRejected {
                status: 400,
                detail: Some("Only ZIP files are supported".to_string()),
            }),
        );

        assert_eq!(upload.selected(), Some(Path::new("repo.zip")));
        assert_eq!(
            upload.report(),
            Some(&UploadReport::Failed("Only ZIP files are supported".to_string()))
        );
        assert!(upload.upload().is_some());
    }

    #[test]
    fn test_failure_messages_fall_back() {
        let mut upload = coordinator();
        upload.select("repo.zip");
        let request = upload.upload().unwrap();
        upload.complete(request.seq, Err(ApiError::ServerRejected { status: 500, detail: None }));
        assert_eq!(upload.report().unwrap().message(), "Upload failed");

        let request = upload.upload().unwrap();
        upload.complete(request.seq, Err(ApiError::Timeout));
        assert_eq!(
            upload.report().unwrap().message(),
            "Network error. Is the backend running?"
        );
    }

    #[test]
    fn test_selecting_clears_previous_report() {
        let mut upload = coordinator();
        upload.select("a.zip");
        let request = upload.upload().unwrap();
        upload.complete(request.seq, Err(ApiError::Timeout));
        assert!(upload.report().is_some());

        upload.select("b.zip");
        assert!(upload.report().is_none());
    }
}
