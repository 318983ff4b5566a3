//! Explain command - ask the search service to explain a snippet
//!
//! The service never makes this fail: when it cannot answer, a placeholder
//! is printed instead.

use std::path::Path;

use anyhow::{Context, Result};

use super::output::{print_header, spinner};
use crate::api::ApiClient;
use crate::config::Config;
use crate::ui::theme::{ansi, symbols};

/// Parse `"10-20"` (1-based, inclusive) into a line range
pub fn parse_line_range(range: &str) -> Result<(usize, usize)> {
    let (start, end) = range
        .split_once('-')
        .with_context(|| format!("Invalid line range '{range}', expected START-END"))?;
    let start: usize = start
        .trim()
        .parse()
        .with_context(|| format!("Invalid start line in '{range}'"))?;
    let end: usize = end
        .trim()
        .parse()
        .with_context(|| format!("Invalid end line in '{range}'"))?;
    if start == 0 || end < start {
        anyhow::bail!("Invalid line range '{range}': lines start at 1 and END must be >= START");
    }
    Ok((start, end))
}

/// Cut `[start, end]` out of `content`, clamping to the file length
pub fn slice_lines(content: &str, range: Option<(usize, usize)>) -> String {
    match range {
        Some((start, end)) => content
            .split('\n')
            .skip(start.saturating_sub(1))
            .take(end.saturating_sub(start).saturating_add(1))
            .collect::<Vec<_>>()
            .join("\n"),
        None => content.to_string(),
    }
}

pub async fn run(config: Config, file: &str, lines: Option<&str>, query: Option<&str>) -> Result<()> {
    let range = lines.map(parse_line_range).transpose()?;
    let content = tokio::fs::read_to_string(Path::new(file))
        .await
        .with_context(|| format!("Failed to read {file}"))?;
    let code = slice_lines(&content, range);
    if code.trim().is_empty() {
        anyhow::bail!("Nothing to explain: the selected lines of {file} are empty");
    }

    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
    let title = match range {
        Some((start, end)) => format!("{file}:{start}-{end}"),
        None => file.to_string(),
    };
    print_header(symbols::FILE, "Explain", Some(&title));

    let pb = spinner("Asking the model...");
    let explanation = client.explain_code(&code, query.unwrap_or_default()).await;
    pb.finish_and_clear();

    println!("{}{}{}", ansi::FG, explanation, ansi::RESET);
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_range() {
        assert_eq!(parse_line_range("10-20").unwrap(), (10, 20));
        assert_eq!(parse_line_range(" 3 - 3 ").unwrap(), (3, 3));
        assert!(parse_line_range("0-4").is_err());
        assert!(parse_line_range("9-2").is_err());
        assert!(parse_line_range("12").is_err());
    }

    #[test]
    fn test_slice_lines_clamps() {
        let content = "a\nb\nc\nd";
        assert_eq!(slice_lines(content, Some((2, 3))), "b\nc");
        assert_eq!(slice_lines(content, Some((3, 99))), "c\nd");
        assert_eq!(slice_lines(content, None), content);
        assert_eq!(slice_lines(content, Some((7, 9))), "");
    }

    #[test]
    fn test_slice_lines_huge_end() {
        let range = parse_line_range("2-18446744073709551615").unwrap();
        assert_eq!(slice_lines("a\nb\nc", Some(range)), "b\nc");
    }
}
