//! codescout theme
//!
//! One palette, three renderings: ratatui styles for the TUI, ANSI escapes
//! for one-shot commands and a dialoguer theme for the setup wizard.

use console::Style as ConsoleStyle;
use dialoguer::theme::Theme;
use ratatui::style::{Color, Modifier, Style};
use std::fmt;

use crate::render::{MatchTier, TokenClass};

/// Design system colors
pub mod colors {
    pub const PRIMARY: (u8, u8, u8) = (100, 181, 246); // #64B5F6
    pub const SUCCESS: (u8, u8, u8) = (165, 214, 167); // #A5D6A7
    pub const WARNING: (u8, u8, u8) = (255, 202, 40); // #FFCA28
    pub const ERROR: (u8, u8, u8) = (239, 154, 154); // #EF9A9A
    pub const MUTED: (u8, u8, u8) = (84, 110, 122); // #546E7A
    pub const FG: (u8, u8, u8) = (212, 212, 215); // #D4D4D7
    pub const BG_HIGHLIGHT: (u8, u8, u8) = (38, 50, 56); // #263238
    pub const KEYWORD: (u8, u8, u8) = (199, 146, 234); // #C792EA
    pub const STRING: (u8, u8, u8) = (195, 232, 141); // #C3E88D
    pub const NUMBER: (u8, u8, u8) = (247, 140, 108); // #F78C6C
}

/// The same palette as ANSI escapes for plain terminal output
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";
    pub const WARNING: &str = "\x1b[38;2;255;202;40m";
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";
    pub const FG: &str = "\x1b[38;2;212;212;215m";
    pub const KEYWORD: &str = "\x1b[38;2;199;146;234m";
    pub const STRING: &str = "\x1b[38;2;195;232;141m";
    pub const NUMBER: &str = "\x1b[38;2;247;140;108m";
}

pub mod symbols {
    pub const SEARCH: &str = "󰍉";
    pub const FILE: &str = "󰈙";
    pub const FUNCTION: &str = "󰊕";
    pub const MATCH: &str = "󰄬";
    pub const ERROR: &str = "󰅚";
    pub const UPLOAD: &str = "󰕒";
    pub const STATS: &str = "󰄨";
    pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

pub fn rgb(color: (u8, u8, u8)) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

pub fn tier_color(tier: MatchTier) -> Color {
    match tier {
        MatchTier::High => rgb(colors::SUCCESS),
        MatchTier::Medium => rgb(colors::WARNING),
        MatchTier::Low => rgb(colors::MUTED),
    }
}

pub fn tier_ansi(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::High => ansi::SUCCESS,
        MatchTier::Medium => ansi::WARNING,
        MatchTier::Low => ansi::MUTED,
    }
}

pub fn token_style(class: TokenClass) -> Style {
    match class {
        TokenClass::Plain => Style::default().fg(rgb(colors::FG)),
        TokenClass::Keyword => Style::default()
            .fg(rgb(colors::KEYWORD))
            .add_modifier(Modifier::BOLD),
        TokenClass::String => Style::default().fg(rgb(colors::STRING)),
        TokenClass::Comment => Style::default()
            .fg(rgb(colors::MUTED))
            .add_modifier(Modifier::ITALIC),
        TokenClass::Number => Style::default().fg(rgb(colors::NUMBER)),
    }
}

pub fn token_ansi(class: TokenClass) -> &'static str {
    match class {
        TokenClass::Plain => ansi::FG,
        TokenClass::Keyword => ansi::KEYWORD,
        TokenClass::String => ansi::STRING,
        TokenClass::Comment => ansi::MUTED,
        TokenClass::Number => ansi::NUMBER,
    }
}

/// Border style for a panel, brighter when it has focus
pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(rgb(colors::PRIMARY))
    } else {
        Style::default().fg(rgb(colors::MUTED))
    }
}

pub fn selected_row() -> Style {
    Style::default()
        .bg(rgb(colors::BG_HIGHLIGHT))
        .add_modifier(Modifier::BOLD)
}

/// dialoguer theme for the setup wizard
pub struct ScoutTheme {
    pub prompt_style: ConsoleStyle,
    pub active_style: ConsoleStyle,
    pub inactive_style: ConsoleStyle,
    pub hint_style: ConsoleStyle,
    pub success_style: ConsoleStyle,
    pub error_style: ConsoleStyle,
    pub active_prefix: String,
    pub inactive_prefix: String,
    pub prompt_prefix: String,
    pub success_prefix: String,
}

impl Default for ScoutTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutTheme {
    pub fn new() -> Self {
        // Color256 approximations: PRIMARY 117, WARNING 220, FG 252,
        // MUTED 242, SUCCESS 114, ERROR 210
        Self {
            prompt_style: ConsoleStyle::new().fg(console::Color::Color256(117)).bold(),
            active_style: ConsoleStyle::new().fg(console::Color::Color256(220)).bold(),
            inactive_style: ConsoleStyle::new().fg(console::Color::Color256(252)),
            hint_style: ConsoleStyle::new().fg(console::Color::Color256(242)),
            success_style: ConsoleStyle::new().fg(console::Color::Color256(114)),
            error_style: ConsoleStyle::new().fg(console::Color::Color256(210)),
            active_prefix: "❯ ".to_string(),
            inactive_prefix: "  ".to_string(),
            prompt_prefix: format!("{} ", symbols::SEARCH),
            success_prefix: "✓ ".to_string(),
        }
    }
}

impl Theme for ScoutTheme {
    fn format_prompt(&self, f: &mut dyn fmt::Write, prompt: &str) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.prompt_style.apply_to(&self.prompt_prefix),
            self.prompt_style.apply_to(prompt)
        )
    }

    fn format_error(&self, f: &mut dyn fmt::Write, err: &str) -> fmt::Result {
        write!(f, "{}", self.error_style.apply_to(err))
    }

    fn format_confirm_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        default: Option<bool>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.prompt_prefix, self.prompt_style.apply_to(prompt))?;
        match default {
            Some(true) => write!(f, " {}", self.hint_style.apply_to("[Y/n]")),
            Some(false) => write!(f, " {}", self.hint_style.apply_to("[y/N]")),
            None => write!(f, " {}", self.hint_style.apply_to("[y/n]")),
        }
    }

    fn format_confirm_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        selection: Option<bool>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.prompt_prefix, self.prompt_style.apply_to(prompt))?;
        match selection {
            Some(true) => write!(f, " {}", self.success_style.apply_to("Yes")),
            Some(false) => write!(f, " {}", self.error_style.apply_to("No")),
            None => Ok(()),
        }
    }

    fn format_input_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        default: Option<&str>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.prompt_prefix, self.prompt_style.apply_to(prompt))?;
        if let Some(default) = default {
            write!(f, " {}", self.hint_style.apply_to(format!("[{}]", default)))?;
        }
        write!(f, ": ")
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        write!(
            f,
            "{}{}: {}",
            self.success_style.apply_to(&self.success_prefix),
            self.prompt_style.apply_to(prompt),
            self.success_style.apply_to(sel)
        )
    }

    fn format_multi_select_prompt(&self, f: &mut dyn fmt::Write, prompt: &str) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.prompt_style.apply_to(&self.prompt_prefix),
            self.prompt_style.apply_to(prompt),
            self.hint_style.apply_to("(space toggles, enter confirms)")
        )
    }

    fn format_multi_select_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        selections: &[&str],
    ) -> fmt::Result {
        write!(
            f,
            "{}{}: {}",
            self.success_style.apply_to(&self.success_prefix),
            self.prompt_style.apply_to(prompt),
            self.success_style.apply_to(selections.join(", "))
        )
    }

    fn format_multi_select_prompt_item(
        &self,
        f: &mut dyn fmt::Write,
        text: &str,
        checked: bool,
        active: bool,
    ) -> fmt::Result {
        let checkbox = if checked { "◉" } else { "○" };
        let prefix = if active {
            &self.active_prefix
        } else {
            &self.inactive_prefix
        };
        let style = if active {
            &self.active_style
        } else {
            &self.inactive_style
        };
        let box_style = if checked && !active {
            &self.success_style
        } else {
            style
        };

        write!(
            f,
            "{}{} {}",
            style.apply_to(prefix),
            box_style.apply_to(checkbox),
            style.apply_to(text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_use_distinct_colors() {
        assert_ne!(tier_color(MatchTier::High), tier_color(MatchTier::Medium));
        assert_ne!(tier_color(MatchTier::Medium), tier_color(MatchTier::Low));
        assert_eq!(tier_ansi(MatchTier::High), ansi::SUCCESS);
    }

    #[test]
    fn test_confirm_prompt_hint() {
        let theme = ScoutTheme::new();
        let mut out = String::new();
        theme
            .format_confirm_prompt(&mut out, "Overwrite?", Some(false))
            .unwrap();
        assert!(out.contains("Overwrite?"));
        assert!(out.contains("[y/N]"));
    }
}
