//! Drawing the TUI

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, Focus};
use super::theme::{colors, panel_border, rgb, selected_row, symbols, tier_color, token_style};
use crate::core::RequestStatus;
use crate::render::card::{showing_line, summary_line};
use crate::render::ResultCard;

const EXAMPLE_QUERIES: [&str; 3] = [
    "Find authentication functions",
    "Show error handling patterns",
    "Where are database queries?",
];

/// Filter panel width in columns
const FILTER_WIDTH: u16 = 28;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(4), // Stats + upload
            Constraint::Length(3), // Query
            Constraint::Min(0),    // Filters + results
            Constraint::Length(1), // Key hints
        ])
        .split(size);

    draw_title(f, rows[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);
    draw_stats(f, app, top[0]);
    draw_upload(f, app, top[1]);

    draw_query(f, app, rows[2]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILTER_WIDTH), Constraint::Min(0)])
        .split(rows[3]);
    draw_filters(f, app, main[0]);
    draw_results(f, app, main[1]);

    draw_hints(f, app, rows[4]);

    if app.explain.is_open() {
        draw_explain(f, app, size);
    }
}

fn spinner(app: &App) -> &'static str {
    symbols::SPINNER[app.spinner_frame % symbols::SPINNER.len()]
}

fn muted() -> Style {
    Style::default().fg(rgb(colors::MUTED))
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} codescout", symbols::SEARCH),
            Style::default()
                .fg(rgb(colors::PRIMARY))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  semantic code search",
            muted(),
        ),
    ]));
    f.render_widget(title, area);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = &app.stats;
    let lines = if let Some(snapshot) = stats.snapshot() {
        let mut lines = vec![Line::from(vec![
            Span::styled("Indexed chunks: ", muted()),
            Span::styled(
                snapshot.total_documents_indexed.to_string(),
                Style::default()
                    .fg(rgb(colors::FG))
                    .add_modifier(Modifier::BOLD),
            ),
        ])];
        if let Some(at) = stats.fetched_at() {
            let refreshing = if stats.is_loading() { spinner(app) } else { "" };
            lines.push(Line::from(Span::styled(
                format!("Updated {} {refreshing}", at.format("%H:%M:%S")),
                muted(),
            )));
        }
        lines
    } else if let Some(error) = stats.visible_error() {
        vec![Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(rgb(colors::ERROR)),
        ))]
    } else {
        vec![Line::from(Span::styled(
            format!("{} Loading stats...", spinner(app)),
            muted(),
        ))]
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(false))
        .title(format!(" {} Index ", symbols::STATS));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_upload(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Upload;
    let mut path_spans = vec![Span::styled("ZIP: ", muted())];
    if app.upload_path.is_empty() && !focused {
        path_spans.push(Span::styled("Tab here and type a path to a .zip archive", muted()));
    } else {
        path_spans.push(Span::styled(
            app.upload_path.clone(),
            Style::default().fg(rgb(colors::FG)),
        ));
        if focused {
            path_spans.push(Span::styled("▏", Style::default().fg(rgb(colors::PRIMARY))));
        }
    }

    let status = if app.upload.is_uploading() {
        Line::from(Span::styled(
            format!("{} Uploading and indexing...", spinner(app)),
            Style::default().fg(rgb(colors::WARNING)),
        ))
    } else {
        match app.upload.report() {
            Some(report) => {
                let color = if report.is_success() {
                    colors::SUCCESS
                } else {
                    colors::ERROR
                };
                Line::from(Span::styled(report.message(), Style::default().fg(rgb(color))))
            }
            None => Line::from(Span::styled(
                format!("Languages: {}", app.upload.languages().join(", ")),
                muted(),
            )),
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title(format!(" {} Upload ", symbols::UPLOAD));
    f.render_widget(
        Paragraph::new(vec![Line::from(path_spans), status])
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_query(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Query;
    let query = app.search.query();

    let mut spans = vec![Span::styled(
        format!("{} ", symbols::SEARCH),
        Style::default().fg(rgb(colors::PRIMARY)),
    )];
    if query.is_empty() {
        spans.push(Span::styled(
            "Search your code with natural language...",
            muted(),
        ));
    } else {
        spans.push(Span::styled(
            query.to_string(),
            Style::default().fg(rgb(colors::FG)),
        ));
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(rgb(colors::PRIMARY))));
    }
    if app.search.is_loading() {
        spans.push(Span::styled(format!("  {}", spinner(app)), muted()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title(" Search ");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Filters;
    let filters = app.search.filters();

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled("Languages", muted())));
    for (i, lang) in app.languages.iter().enumerate() {
        let mark = if filters.is_selected(lang) { "◉" } else { "○" };
        let mut style = Style::default().fg(if filters.is_selected(lang) {
            rgb(colors::SUCCESS)
        } else {
            rgb(colors::FG)
        });
        if focused && app.filter_cursor == i {
            style = style.patch(selected_row());
        }
        lines.push(Line::from(Span::styled(format!(" {mark} {lang}"), style)));
    }

    lines.push(Line::from(""));
    let label = filters.min_score_label();
    let value = if label.is_empty() { "any".to_string() } else { label };
    let mut score_style = Style::default().fg(rgb(colors::FG));
    if focused && app.filter_cursor == app.languages.len() {
        score_style = score_style.patch(selected_row());
    }
    lines.push(Line::from(Span::styled(
        format!(" Min score ◂ {value} ▸"),
        score_style,
    )));

    let title = match filters.active_count() {
        0 => " Filters ".to_string(),
        n => format!(" Filters ({n}) "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title(title);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Results;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title(" Results ");

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_offset = 0u16;

    if let Some(error) = app.search.error() {
        lines.push(Line::from(Span::styled(
            format!("{} {error}", symbols::ERROR),
            Style::default().fg(rgb(colors::ERROR)),
        )));
    } else if app.search.query().trim().is_empty() {
        lines.push(Line::from(Span::styled("Try asking:", muted())));
        for example in EXAMPLE_QUERIES {
            lines.push(Line::from(Span::styled(
                format!("  • {example}"),
                Style::default().fg(rgb(colors::FG)),
            )));
        }
    } else if app.search.is_loading() && app.results.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("{} Searching...", spinner(app)),
            muted(),
        )));
    } else if app.results.is_empty() {
        if *app.search.status() == RequestStatus::Success {
            lines.push(Line::from(Span::styled(
                "No results found. Try different keywords or loosen the filters.",
                muted(),
            )));
        }
    } else {
        lines.push(Line::from(vec![
            Span::styled(
                summary_line(app.search.total_results(), app.search.search_time()),
                Style::default()
                    .fg(rgb(colors::SUCCESS))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", showing_line(app.results.len())), muted()),
        ]));
        lines.push(Line::from(""));

        let now = Instant::now();
        for (i, card) in app.results.cards().iter().enumerate() {
            let is_selected = focused && i == app.selected;
            if i == app.selected {
                selected_offset = u16::try_from(lines.len()).unwrap_or(u16::MAX);
            }
            card_lines(card, is_selected, now, &mut lines);
        }
    }

    // Keep the selected card's header at the top once it would scroll away
    let inner_height = area.height.saturating_sub(2);
    let scroll = if selected_offset + 2 > inner_height {
        selected_offset
    } else {
        0
    };

    f.render_widget(
        Paragraph::new(lines).block(block).scroll((scroll, 0)),
        area,
    );
}

fn card_lines<'a>(card: &'a ResultCard, selected: bool, now: Instant, out: &mut Vec<Line<'a>>) {
    let result = card.result();
    let mut header_style = Style::default()
        .fg(rgb(colors::FG))
        .add_modifier(Modifier::BOLD);
    if selected {
        header_style = header_style.patch(selected_row());
    }

    let mut header = vec![
        Span::styled(format!("{} {}", symbols::FILE, result.file_path), header_style),
        Span::styled(format!("  {}", card.mode()), muted()),
        Span::styled(
            format!("  {}", card.score_label()),
            Style::default()
                .fg(tier_color(card.tier()))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if card.shows_copied(now) {
        header.push(Span::styled(
            "  Copied!",
            Style::default().fg(rgb(colors::SUCCESS)),
        ));
    }
    out.push(Line::from(header));

    for line in card.visible_lines() {
        let mut spans = vec![Span::styled(format!("{:>5} │ ", line.number), muted())];
        spans.extend(line.tokens.iter().map(|token| {
            Span::styled(
                token.text.trim_end_matches('\r'),
                token_style(token.class),
            )
        }));
        out.push(Line::from(spans));
    }

    if let Some(label) = card.toggle_label() {
        out.push(Line::from(Span::styled(
            format!("      ⋯ {label}"),
            Style::default().fg(rgb(colors::PRIMARY)),
        )));
    }

    let mut footer = vec![Span::styled(card.footer(), muted())];
    if let Some(name) = card.function_name() {
        footer.push(Span::styled(
            format!("  {} {name}", symbols::FUNCTION),
            Style::default().fg(rgb(colors::PRIMARY)),
        ));
    }
    out.push(Line::from(footer));
    out.push(Line::from(""));
}

fn draw_hints(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = if app.explain.is_open() {
        &[("Esc", "Close")]
    } else {
        match app.focus {
            Focus::Query => &[("Enter", "Search"), ("Tab", "Next panel"), ("Ctrl+U", "Clear"), ("Esc", "Quit")],
            Focus::Filters => &[("↑↓", "Move"), ("Space", "Toggle"), ("←→", "Min score"), ("c", "Clear")],
            Focus::Results => &[("↑↓", "Select"), ("Enter", "Expand"), ("y", "Copy"), ("e", "Explain")],
            Focus::Upload => &[("Enter", "Upload"), ("Tab", "Next panel"), ("Ctrl+R", "Refresh stats")],
        }
    };

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", muted()));
        }
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(rgb(colors::PRIMARY))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(": {action}")));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .style(muted())
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_explain(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(70, 60, area);
    let title = format!(" Explain: {} ", app.explain.title().unwrap_or_default());
    let body = match app.explain.text() {
        Some(text) if !app.explain.is_loading() => {
            Paragraph::new(text.to_string()).style(Style::default().fg(rgb(colors::FG)))
        }
        _ => Paragraph::new(format!("{} Asking the model...", spinner(app))).style(muted()),
    };

    f.render_widget(Clear, popup);
    f.render_widget(
        body.wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(rgb(colors::WARNING)))
                .title(title),
        ),
        popup,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(70, 60, area);
        assert!(popup.width <= 70 && popup.width >= 68);
        assert!(popup.x >= 14);
        assert!(popup.bottom() <= area.bottom());
    }
}
