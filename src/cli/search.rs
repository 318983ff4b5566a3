//! Search command - one query against the search service
//!
//! Runs the same orchestrator as the TUI, submitting immediately instead of
//! waiting out the debounce.

use anyhow::{Context, Result};

use super::output::{print_field, print_header, print_warning, spinner};
use crate::api::ApiClient;
use crate::config::Config;
use crate::core::{FilterState, SearchEffect, SearchEvent, SearchOrchestrator};
use crate::render::card::{showing_line, summary_line};
use crate::render::{ResultCard, ResultView};
use crate::ui::theme::{ansi, symbols, tier_ansi, token_ansi};

#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: String,
    pub languages: Vec<String>,
    pub min_score: Option<f32>,
    pub top_k: Option<usize>,
    pub expand: bool,
}

pub async fn run(config: Config, args: SearchArgs) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
    let filters = FilterState::from_parts(args.languages, args.min_score);
    let top_k = args.top_k.unwrap_or(config.search.top_k);
    let mut search =
        SearchOrchestrator::new(top_k, config.search.debounce()).with_filters(filters);

    search.handle(SearchEvent::InputChanged(args.query.clone()));
    let effects = search.handle(SearchEvent::Submit);
    if effects.is_empty() {
        print_warning("Nothing to search for. Pass a query, e.g. \"Find authentication functions\"");
        return Ok(());
    }

    print_header(symbols::SEARCH, "Semantic Search", Some(&format!("\"{}\"", args.query.trim())));
    print_active_filters(search.filters());

    for effect in effects {
        if let SearchEffect::Issue { seq, request } = effect {
            let pb = spinner("Searching...");
            let result = client.search(&request).await;
            pb.finish_and_clear();
            search.handle(SearchEvent::Completed { seq, result });
        }
    }

    if let Some(message) = search.error() {
        anyhow::bail!("{message}");
    }

    let mut view = ResultView::new();
    view.sync(search.revision(), search.results());
    if view.is_empty() {
        print_warning("No results found. Try different keywords or loosen the filters.");
        return Ok(());
    }

    println!(
        "{}{}  {} {}{}  {}{}{}",
        ansi::SUCCESS,
        ansi::BOLD,
        symbols::MATCH,
        summary_line(search.total_results(), search.search_time()),
        ansi::RESET,
        ansi::MUTED,
        showing_line(view.len()),
        ansi::RESET
    );
    println!();

    for index in 0..view.len() {
        if let Some(card) = view.card_mut(index) {
            if args.expand {
                card.toggle_expanded();
            }
            print_card(index + 1, card);
        }
    }

    Ok(())
}

fn print_active_filters(filters: &FilterState) {
    if let Some(languages) = filters.languages() {
        print_field("Languages", &languages.join(", "));
    }
    if filters.effective_min_score().is_some() {
        print_field("Min score", &filters.min_score_label());
    }
}

fn print_card(position: usize, card: &ResultCard) {
    let result = card.result();
    println!(
        "{}  {}. {} {}{}{}{}  {}{}  {}{}{}{}",
        ansi::MUTED,
        position,
        symbols::FILE,
        ansi::FG,
        ansi::BOLD,
        result.file_path,
        ansi::RESET,
        ansi::MUTED,
        card.mode(),
        tier_ansi(card.tier()),
        ansi::BOLD,
        card.score_label(),
        ansi::RESET
    );

    for line in card.visible_lines() {
        let code: String = line
            .tokens
            .iter()
            .map(|token| {
                format!(
                    "{}{}",
                    token_ansi(token.class),
                    token.text.trim_end_matches('\r')
                )
            })
            .collect();
        println!(
            "{}  {:>6} │ {}{}",
            ansi::MUTED,
            line.number,
            code,
            ansi::RESET
        );
    }

    if let Some(label) = card.toggle_label() {
        if !card.is_expanded() {
            println!(
                "{}         ⋯ {} (use --expand){}",
                ansi::PRIMARY,
                label,
                ansi::RESET
            );
        }
    }

    let function = card
        .function_name()
        .map(|name| format!("  {} {}", symbols::FUNCTION, name))
        .unwrap_or_default();
    println!(
        "{}         {}{}{}{}",
        ansi::MUTED,
        card.footer(),
        ansi::PRIMARY,
        function,
        ansi::RESET
    );
    println!();
}
