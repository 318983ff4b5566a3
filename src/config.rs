//! Configuration management for codescout

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_API_URL;

/// Languages the search service knows how to index
pub const SUPPORTED_LANGUAGES: [&str; 8] = [
    "python",
    "javascript",
    "typescript",
    "go",
    "java",
    "rust",
    "cpp",
    "c",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub stats: StatsConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: usize,
    /// Quiet period before a typed query is sent
    pub debounce_ms: u64,
    /// Languages offered in the filter panel
    pub available_languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Language hints sent along with every uploaded archive
    pub languages: Vec<String>,
}

fn supported_languages() -> Vec<String> {
    SUPPORTED_LANGUAGES.iter().map(|s| s.to_string()).collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            debounce_ms: 500,
            available_languages: supported_languages(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { refresh_secs: 30 }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            languages: vec![
                "python".to_string(),
                "javascript".to_string(),
                "typescript".to_string(),
                "go".to_string(),
                "java".to_string(),
                "cpp".to_string(),
                "c".to_string(),
                "rust".to_string(),
            ],
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl StatsConfig {
    /// Refresh interval, never shorter than one second
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "codescout", "codescout")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = project_dirs()
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

/// Directory for the TUI log file
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".codescout"))
}

/// Load configuration from file or use defaults.
///
/// `api_url` (from `--api-url` or `CODESCOUT_API_URL`) wins over the file.
pub fn load_config(custom_path: Option<&str>, api_url: Option<&str>) -> Result<Config> {
    let path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => config_path()?,
    };

    let mut config = if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?
    } else {
        Config::default()
    };

    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }

    Ok(config)
}

/// Write `config` to `path` (or the default location).
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn save_config(config: &Config, path: Option<&str>, force: bool) -> Result<Option<PathBuf>> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => config_path()?,
    };

    if path.exists() && !force {
        return Ok(None);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    Ok(Some(path))
}

/// Initialize configuration file with defaults
pub fn init_config(path: Option<&str>) -> Result<()> {
    match save_config(&Config::default(), path, false)? {
        Some(written) => println!("Configuration initialized at {:?}", written),
        None => println!("Configuration file already exists"),
    }
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}
