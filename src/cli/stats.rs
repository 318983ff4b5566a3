//! Stats command - show what the search service has indexed

use anyhow::{Context, Result};
use chrono::Local;

use super::output::{print_field, print_header, spinner};
use crate::api::ApiClient;
use crate::config::Config;
use crate::core::StatsPoller;
use crate::ui::theme::symbols;

pub async fn run(config: Config) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
    let mut poller = StatsPoller::new();

    let seq = poller.request();
    let pb = spinner("Loading stats...");
    let result = client.get_stats().await;
    pb.finish_and_clear();
    poller.complete(seq, result, Local::now());

    if let Some(message) = poller.visible_error() {
        anyhow::bail!("{message}");
    }
    let Some(snapshot) = poller.snapshot() else {
        return Ok(());
    };

    print_header(symbols::STATS, "Index Statistics", Some(client.base_url()));
    print_field(
        "Indexed chunks",
        &snapshot.total_documents_indexed.to_string(),
    );
    for (key, value) in &snapshot.extra {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        print_field(key, &rendered);
    }
    if let Some(at) = poller.fetched_at() {
        print_field("Fetched at", &at.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    println!();

    Ok(())
}
