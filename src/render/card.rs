//! Per-result code cards

use std::time::{Duration, Instant};

use tracing::debug;

use super::clipboard::Clipboard;
use super::syntax::{Highlighter, SyntaxMode, Token};
use crate::api::SearchResult;

/// Lines visible while a card is collapsed
pub const COLLAPSED_LINES: usize = 10;

/// How long "Copied!" stays on a card
pub const COPY_CONFIRMATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

impl MatchTier {
    pub fn from_score(score: f32) -> Self {
        if score > 0.7 {
            MatchTier::High
        } else if score > 0.5 {
            MatchTier::Medium
        } else {
            MatchTier::Low
        }
    }
}

/// Score as a rounded percentage, e.g. `0.816` → `82`
pub fn score_percent(score: f32) -> i64 {
    (score * 100.0).round() as i64
}

pub fn summary_line(total: usize, secs: f64) -> String {
    format!("Found {total} results ({secs:.3}s)")
}

pub fn showing_line(shown: usize) -> String {
    format!("Showing top {shown}")
}

/// Pair each physical line of `code` with its label `start_line + i`.
///
/// `end_line` plays no part; the server's range and the snippet may disagree.
pub fn number_lines(start_line: u32, code: &str) -> Vec<(u64, &str)> {
    code.split('\n')
        .enumerate()
        .map(|(i, line)| (u64::from(start_line) + i as u64, line))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedLine {
    pub number: u64,
    pub tokens: Vec<Token>,
}

/// A search result plus the view state the user controls on it
#[derive(Debug)]
pub struct ResultCard {
    result: SearchResult,
    mode: SyntaxMode,
    lines: Vec<NumberedLine>,
    expanded: bool,
    copied_at: Option<Instant>,
}

impl ResultCard {
    pub fn new(result: SearchResult, highlighter: &mut Highlighter) -> Self {
        let mode = SyntaxMode::from_language(&result.language);
        let highlighted = highlighter.highlight(&result.code, mode);
        let lines = number_lines(result.start_line, &result.code)
            .into_iter()
            .zip(highlighted)
            .map(|((number, _), tokens)| NumberedLine { number, tokens })
            .collect();

        Self {
            result,
            mode,
            lines,
            expanded: false,
            copied_at: None,
        }
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn mode(&self) -> SyntaxMode {
        self.mode
    }

    pub fn tier(&self) -> MatchTier {
        MatchTier::from_score(self.result.score)
    }

    pub fn score_label(&self) -> String {
        format!("{}% Match", score_percent(self.result.score))
    }

    pub fn footer(&self) -> String {
        format!("Lines {}-{}", self.result.start_line, self.result.end_line)
    }

    pub fn function_name(&self) -> Option<&str> {
        self.result.function_name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_collapsible(&self) -> bool {
        self.lines.len() > COLLAPSED_LINES
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip between the collapsed viewport and the full snippet
    pub fn toggle_expanded(&mut self) {
        if self.is_collapsible() {
            self.expanded = !self.expanded;
        }
    }

    pub fn visible_lines(&self) -> &[NumberedLine] {
        if self.is_collapsible() && !self.expanded {
            &self.lines[..COLLAPSED_LINES]
        } else {
            &self.lines
        }
    }

    /// Label for the expand toggle, `None` when the snippet fits
    pub fn toggle_label(&self) -> Option<String> {
        if !self.is_collapsible() {
            return None;
        }
        Some(if self.expanded {
            "Show less".to_string()
        } else {
            format!("Show {} more lines", self.lines.len() - COLLAPSED_LINES)
        })
    }

    /// Copy the snippet verbatim. Clipboard failures are swallowed.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> bool {
        match clipboard.set_text(&self.result.code) {
            Ok(()) => {
                self.copied_at = Some(now);
                true
            }
            Err(err) => {
                debug!("Copy failed for {}: {err:#}", self.result.file_path);
                false
            }
        }
    }

    pub fn shows_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_CONFIRMATION)
    }
}

/// Cards for the current result set.
///
/// Rebuilt (and so reset) whenever the orchestrator's revision moves.
pub struct ResultView {
    highlighter: Highlighter,
    revision: Option<u64>,
    cards: Vec<ResultCard>,
}

impl Default for ResultView {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultView {
    pub fn new() -> Self {
        Self {
            highlighter: Highlighter::new(),
            revision: None,
            cards: Vec::new(),
        }
    }

    /// Returns `true` when the cards were rebuilt
    pub fn sync(&mut self, revision: u64, results: &[SearchResult]) -> bool {
        if self.revision == Some(revision) {
            return false;
        }
        self.revision = Some(revision);
        self.cards = results
            .iter()
            .cloned()
            .map(|result| ResultCard::new(result, &mut self.highlighter))
            .collect();
        true
    }

    pub fn cards(&self) -> &[ResultCard] {
        &self.cards
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut ResultCard> {
        self.cards.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
