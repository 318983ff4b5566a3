//! Upload command - send a zipped codebase to be indexed

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::output::{print_header, print_success, spinner};
use crate::api::ApiClient;
use crate::config::Config;
use crate::core::{UploadCoordinator, UploadReport};
use crate::ui::theme::symbols;

pub async fn run(config: Config, archive: &str, languages: Option<Vec<String>>) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
    let hints = languages
        .filter(|langs| !langs.is_empty())
        .unwrap_or_else(|| config.upload.languages.clone());
    let mut upload = UploadCoordinator::new(hints);

    upload.select(PathBuf::from(archive));
    let Some(request) = upload.upload() else {
        return Ok(());
    };

    print_header(
        symbols::UPLOAD,
        "Upload",
        Some(&format!("{} ({})", archive, request.languages.join(","))),
    );

    let pb = spinner("Uploading and indexing...");
    let result = client.index_upload(&request.archive, &request.languages).await;
    pb.finish_and_clear();
    upload.complete(request.seq, result);

    match upload.report() {
        Some(report @ UploadReport::Indexed(_)) => {
            print_success(&report.message());
            println!();
            Ok(())
        }
        Some(report @ UploadReport::Failed(_)) => anyhow::bail!("{}", report.message()),
        None => Ok(()),
    }
}
