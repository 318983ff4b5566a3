//! Info command - show version, paths and the configured backend

use anyhow::Result;

use crate::config::{self, Config};

pub fn run(config: &Config) -> Result<()> {
    println!("codescout v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    println!();
    println!("Configuration:");
    let config_file = config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!("  Config file: {}", config_file);
    println!("  Log dir: {}", config::log_dir().display());

    println!();
    println!("Search service:");
    println!("  API URL: {}", config.api.base_url);
    println!("  Results per search: {}", config.search.top_k);
    println!("  Upload languages: {}", config.upload.languages.join(", "));

    Ok(())
}
