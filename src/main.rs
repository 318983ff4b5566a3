//! codescout - semantic code search from the terminal
//!
//! A client for a code search service: type a question in natural language,
//! get ranked, highlighted code snippets back.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod config;
mod core;
mod render;
mod ui;

/// codescout - Semantic code search
#[derive(Parser)]
#[command(name = "codescout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search your codebase by meaning, from the terminal", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Search service base URL (overrides the config file)
    #[arg(long, global = true, env = "CODESCOUT_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive search UI (default)
    Tui,

    /// Search the indexed code
    Search {
        /// What to look for, in plain words
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Only return results in this language (repeatable)
        #[arg(short, long = "lang")]
        lang: Vec<String>,

        /// Minimum relevance score between 0 and 1
        #[arg(short, long)]
        min_score: Option<f32>,

        /// Maximum number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Show long snippets in full
        #[arg(short, long)]
        expand: bool,
    },

    /// Show index statistics
    Stats,

    /// Explain a file or a range of lines
    Explain {
        /// File to explain
        file: String,

        /// Line range, e.g. 10-42
        #[arg(short, long)]
        lines: Option<String>,

        /// Question to focus the explanation on
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Upload a zipped codebase for indexing
    Upload {
        /// Path to a .zip archive
        archive: String,

        /// Languages to index, comma separated (defaults to the config)
        #[arg(short, long, value_delimiter = ',')]
        languages: Option<Vec<String>>,
    },

    /// Index a repository path on the server's filesystem
    Index {
        /// Repository path as seen by the server
        repo_path: String,

        /// Only index these languages (repeatable)
        #[arg(short, long = "lang")]
        lang: Vec<String>,
    },

    /// Check that the search service is reachable
    Health,

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },

    /// Show version and system info
    Info,

    /// Interactive setup wizard
    Init,
}

/// The TUI owns the terminal, so its logs go to a file instead of stderr
fn init_logging(verbose: bool, tui: bool) -> Result<()> {
    let fallback = match (verbose, tui) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    if tui {
        let dir = config::log_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory {:?}", dir))?;
        let path = dir.join("codescout.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tui = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(cli.verbose, tui)?;

    let config = config::load_config(cli.config.as_deref(), cli.api_url.as_deref())?;

    debug!("codescout v{} against {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    match cli.command {
        None | Some(Commands::Tui) => {
            ui::run(config).await?;
        }
        Some(Commands::Search {
            query,
            lang,
            min_score,
            top_k,
            expand,
        }) => {
            let args = cli::search::SearchArgs {
                query: query.join(" "),
                languages: lang,
                min_score,
                top_k,
                expand,
            };
            cli::search::run(config, args).await?;
        }
        Some(Commands::Stats) => {
            cli::stats::run(config).await?;
        }
        Some(Commands::Explain { file, lines, query }) => {
            cli::explain::run(config, &file, lines.as_deref(), query.as_deref()).await?;
        }
        Some(Commands::Upload { archive, languages }) => {
            cli::upload::run(config, &archive, languages).await?;
        }
        Some(Commands::Index { repo_path, lang }) => {
            cli::index::run(config, &repo_path, &lang).await?;
        }
        Some(Commands::Health) => {
            cli::health::run(config).await?;
        }
        Some(Commands::Config { show, init }) => {
            if init {
                config::init_config(cli.config.as_deref())?;
            } else if show {
                config::show_config(&config)?;
            }
        }
        Some(Commands::Info) => {
            cli::info::run(&config)?;
        }
        Some(Commands::Init) => {
            cli::init::run(config, cli.config.as_deref()).await?;
        }
    }

    Ok(())
}
