//! Init command - interactive setup wizard
//!
//! Asks for the search service URL, checks it answers, picks the language
//! lists and writes the config file.

use std::time::Duration;

use anyhow::Result;

use super::output::{print_field, print_success, print_warning, spinner};
use crate::api::ApiClient;
use crate::config::{self, Config, SUPPORTED_LANGUAGES};
use crate::ui::theme::{ansi, symbols};
use crate::ui::{FormOption, FormResult, ScoutForm};

pub async fn run(mut config: Config, config_path: Option<&str>) -> Result<()> {
    print_banner();
    let form = ScoutForm::new();

    // Step 1: where the service lives
    let base_url = match form.input(
        "Search service URL",
        &config.api.base_url,
        validate_url,
    )? {
        FormResult::Text(url) => url,
        _ => return cancelled(),
    };
    config.api.base_url = base_url.trim_end_matches('/').to_string();
    check_backend(&config).await;

    // Step 2: result count
    match form.input(
        "Results per search",
        &config.search.top_k.to_string(),
        validate_top_k,
    )? {
        FormResult::Text(value) => {
            if let Ok(top_k) = value.parse() {
                config.search.top_k = top_k;
            }
        }
        _ => return cancelled(),
    }

    // Step 3: languages offered as search filters
    let filter_options = language_options(&config.search.available_languages);
    match form.multi_select("Which languages should the filter panel offer?", &filter_options)? {
        FormResult::Multiple(idxs) if !idxs.is_empty() => {
            config.search.available_languages = pick(&idxs);
        }
        FormResult::Multiple(_) => {
            print_warning("No languages picked, keeping the current list");
        }
        _ => return cancelled(),
    }

    // Step 4: hints sent with uploaded archives
    let upload_options = language_options(&config.upload.languages);
    match form.multi_select("Which languages should uploads be indexed for?", &upload_options)? {
        FormResult::Multiple(idxs) if !idxs.is_empty() => {
            config.upload.languages = pick(&idxs);
        }
        FormResult::Multiple(_) => {
            print_warning("No languages picked, keeping the current list");
        }
        _ => return cancelled(),
    }

    // Step 5: write it out
    let written = match config::save_config(&config, config_path, false)? {
        Some(path) => Some(path),
        None => match form.confirm("A config file already exists. Overwrite it?", false)? {
            FormResult::Confirmed(true) => config::save_config(&config, config_path, true)?,
            _ => None,
        },
    };

    match written {
        Some(path) => print_setup_complete(&path.display().to_string()),
        None => print_warning("Kept the existing configuration"),
    }
    Ok(())
}

fn validate_url(input: &String) -> std::result::Result<(), String> {
    let url = input.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err("URL must start with http:// or https://".to_string())
    }
}

fn validate_top_k(input: &String) -> std::result::Result<(), String> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=100).contains(&n) => Ok(()),
        _ => Err("Enter a number between 1 and 100".to_string()),
    }
}

fn language_options(current: &[String]) -> Vec<FormOption> {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|lang| FormOption::new(*lang).checked(current.iter().any(|c| c == lang)))
        .collect()
}

fn pick(idxs: &[usize]) -> Vec<String> {
    idxs.iter()
        .filter_map(|&i| SUPPORTED_LANGUAGES.get(i))
        .map(|lang| lang.to_string())
        .collect()
}

async fn check_backend(config: &Config) {
    let client = match ApiClient::new(&config.api.base_url, Duration::from_secs(5)) {
        Ok(client) => client,
        Err(err) => {
            print_warning(&format!("Could not build a client for that URL: {err}"));
            return;
        }
    };

    let pb = spinner("Checking the service...");
    let result = client.health().await;
    pb.finish_and_clear();

    match result {
        Ok(_) => print_success("Search service is reachable"),
        Err(err) => print_warning(&format!(
            "{} You can still save this URL and start the service later.",
            err.user_message("reach the backend")
        )),
    }
}

fn cancelled() -> Result<()> {
    print_warning("Setup cancelled, nothing was written");
    Ok(())
}

fn print_banner() {
    println!();
    println!(
        "{}{}╭─────────────────────────────────────────────────────╮{}",
        ansi::PRIMARY,
        ansi::BOLD,
        ansi::RESET
    );
    println!(
        "{}{}│  {} codescout setup                                 │{}",
        ansi::PRIMARY,
        ansi::BOLD,
        symbols::SEARCH,
        ansi::RESET
    );
    println!(
        "{}{}╰─────────────────────────────────────────────────────╯{}",
        ansi::PRIMARY,
        ansi::BOLD,
        ansi::RESET
    );
    println!();
}

fn print_setup_complete(path: &str) {
    println!();
    print_success("Setup complete");
    print_field("Config written to", path);
    println!();
    println!("{}  Quick Start:{}", ansi::MUTED, ansi::RESET);
    println!();
    println!(
        "{}  {}codescout{}                     Open the search UI{}",
        ansi::MUTED,
        ansi::FG,
        ansi::MUTED,
        ansi::RESET
    );
    println!(
        "{}  {}codescout search \"query\"{}      Search from the shell{}",
        ansi::MUTED,
        ansi::FG,
        ansi::MUTED,
        ansi::RESET
    );
    println!(
        "{}  {}codescout upload repo.zip{}     Index a zipped codebase{}",
        ansi::MUTED,
        ansi::FG,
        ansi::MUTED,
        ansi::RESET
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validators() {
        assert!(validate_url(&"http://localhost:8000".to_string()).is_ok());
        assert!(validate_url(&"localhost:8000".to_string()).is_err());
        assert!(validate_top_k(&"20".to_string()).is_ok());
        assert!(validate_top_k(&"0".to_string()).is_err());
        assert!(validate_top_k(&"many".to_string()).is_err());
    }

    #[test]
    fn test_language_options_follow_current_list() {
        let options = language_options(&["go".to_string(), "rust".to_string()]);
        let checked: Vec<&str> = options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(checked, vec!["go", "rust"]);
        assert_eq!(pick(&[0, 7]).len(), 2);
    }
}
