//! Shared terminal output for one-shot commands

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::theme::{ansi, symbols};

/// Spinner on stderr while a request is in flight
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&symbols::SPINNER);
    pb.set_style(style);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn print_header(icon: &str, title: &str, detail: Option<&str>) {
    println!();
    println!(
        "{}{}  {} {}{}",
        ansi::PRIMARY,
        ansi::BOLD,
        icon,
        title,
        ansi::RESET
    );
    if let Some(detail) = detail {
        println!("{}  │ {}{}{}", ansi::MUTED, ansi::FG, detail, ansi::RESET);
    }
    println!("{}  ╰{}─{}", ansi::MUTED, "─".repeat(50), ansi::RESET);
    println!();
}

pub fn print_success(message: &str) {
    println!("{}  ✓ {}{}", ansi::SUCCESS, message, ansi::RESET);
}

pub fn print_warning(message: &str) {
    println!("{}  {}{}", ansi::WARNING, message, ansi::RESET);
}

pub fn print_field(label: &str, value: &str) {
    println!(
        "{}  {:<18}{}{}{}",
        ansi::MUTED,
        label,
        ansi::FG,
        value,
        ansi::RESET
    );
}
