//! Health command - check that the search service answers

use anyhow::{Context, Result};

use super::output::{print_field, print_success, spinner};
use crate::api::ApiClient;
use crate::config::Config;

pub async fn run(config: Config) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;

    let pb = spinner(format!("Contacting {}...", client.base_url()));
    let result = client.health().await;
    pb.finish_and_clear();

    let body = result.map_err(|err| anyhow::anyhow!(err.user_message("reach the backend")))?;
    print_success(&format!("Backend is up at {}", client.base_url()));
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            print_field(key, &rendered);
        }
    }
    Ok(())
}
