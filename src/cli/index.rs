//! Index command - have the service index a repository on its own disk

use anyhow::{Context, Result};

use super::output::{print_field, print_header, print_success, spinner};
use crate::api::ApiClient;
use crate::config::Config;
use crate::ui::theme::symbols;

pub async fn run(config: Config, repo_path: &str, languages: &[String]) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
    let languages = (!languages.is_empty()).then_some(languages);

    print_header(symbols::UPLOAD, "Index Repository", Some(repo_path));

    let pb = spinner("Indexing...");
    let result = client.index_repository(repo_path, languages).await;
    pb.finish_and_clear();

    let outcome = result.map_err(|err| anyhow::anyhow!(err.user_message("index repository")))?;
    print_success(&format!(
        "Indexed {} files, {} chunks in {:.2}s",
        outcome.files_indexed, outcome.chunks_created, outcome.time_taken
    ));
    print_field("Status", &outcome.status);
    println!();
    Ok(())
}
