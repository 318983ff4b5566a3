//! Interactive prompts for the setup wizard
//!
//! Thin wrapper over dialoguer with the codescout theme. Every prompt
//! returns `FormResult::Cancelled` on Esc instead of an error.

use anyhow::Result;
use console::Term;
use dialoguer::{Confirm, Input, MultiSelect};

use super::theme::{ansi, symbols, ScoutTheme};

/// One choice in a multi-select
#[derive(Debug, Clone)]
pub struct FormOption {
    pub label: String,
    pub checked: bool,
}

impl FormOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

#[derive(Debug, PartialEq)]
pub enum FormResult {
    Multiple(Vec<usize>),
    Confirmed(bool),
    Text(String),
    Cancelled,
}

pub struct ScoutForm {
    theme: ScoutTheme,
}

impl Default for ScoutForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutForm {
    pub fn new() -> Self {
        Self {
            theme: ScoutTheme::new(),
        }
    }

    pub fn multi_select(&self, question: &str, options: &[FormOption]) -> Result<FormResult> {
        print_question_header(question);

        let items: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        let defaults: Vec<bool> = options.iter().map(|o| o.checked).collect();

        let selections = MultiSelect::with_theme(&self.theme)
            .items(&items)
            .defaults(&defaults)
            .interact_on_opt(&Term::stderr())?;

        Ok(match selections {
            Some(idxs) => FormResult::Multiple(idxs),
            None => FormResult::Cancelled,
        })
    }

    pub fn confirm(&self, question: &str, default: bool) -> Result<FormResult> {
        println!();

        let result = Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(default)
            .interact_on_opt(&Term::stderr())?;

        Ok(match result {
            Some(confirmed) => FormResult::Confirmed(confirmed),
            None => FormResult::Cancelled,
        })
    }

    /// Free text, re-prompting until `validate` accepts it
    pub fn input(
        &self,
        question: &str,
        default: &str,
        validate: fn(&String) -> std::result::Result<(), String>,
    ) -> Result<FormResult> {
        println!();

        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .default(default.to_string())
            .validate_with(validate)
            .interact_text();

        Ok(match result {
            Ok(text) => FormResult::Text(text.trim().to_string()),
            Err(_) => FormResult::Cancelled,
        })
    }
}

fn print_question_header(question: &str) {
    println!();
    println!(
        "{}{}{} {}{}",
        ansi::PRIMARY,
        ansi::BOLD,
        symbols::SEARCH,
        question,
        ansi::RESET
    );
    println!("{}  ╭{}─{}", ansi::MUTED, "─".repeat(50), ansi::RESET);
}
