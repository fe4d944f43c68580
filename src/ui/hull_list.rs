//! Hull list screen rendering
//!
//! Renders the main list view showing every insurable hull with its
//! entry-level premium and best payout, plus a status line describing the
//! freshness of the cached table.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::cache::{CacheStatus, KeyValueStore};

/// Formats an ISK amount compactly (1_500_000 -> "1.5M")
pub fn format_isk(amount: f64) -> String {
    if amount >= 1e9 {
        format!("{:.1}B", amount / 1e9)
    } else if amount >= 1e6 {
        format!("{:.1}M", amount / 1e6)
    } else if amount >= 1e3 {
        format!("{:.1}K", amount / 1e3)
    } else {
        format!("{:.0}", amount)
    }
}

/// Describes how long ago the table was fetched
pub fn format_age(last_updated_ms: i64, now_ms: i64) -> String {
    if last_updated_ms == 0 {
        return "never fetched".to_string();
    }
    let age_secs = ((now_ms - last_updated_ms).max(0)) / 1000;
    if age_secs < 60 {
        format!("updated {}s ago", age_secs)
    } else if age_secs < 3600 {
        format!("updated {}m ago", age_secs / 60)
    } else {
        format!("updated {}h ago", age_secs / 3600)
    }
}

/// Badge text and color for the cache status
fn status_badge(status: CacheStatus) -> (&'static str, Color) {
    match status {
        CacheStatus::Fresh => ("FRESH", Color::Green),
        CacheStatus::StalePending => ("STALE", Color::Yellow),
        CacheStatus::Refreshing => ("REFRESHING", Color::Cyan),
        CacheStatus::FailedRetained => ("REFRESH FAILED", Color::Red),
    }
}

/// Renders the hull list view
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, chunks[0]);
    render_rows(frame, app, chunks[1]);
    render_status_line(frame, app, chunks[2]);
}

/// Renders the title bar
fn render_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " hullwatch ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "- ship insurance valuations",
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(title, area);
}

/// Renders one line per hull, highlighting the selection
fn render_rows<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Hulls ");

    let Some(prices) = app.cache.current_value() else {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No price data available yet - press r to retry",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = Vec::with_capacity(prices.len());
    for (i, (type_id, quote)) in prices.hulls.iter().enumerate() {
        let selected = i == app.selected_index;

        let marker = if selected { "> " } else { "  " };
        let row_style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let basic = quote
            .cheapest_tier()
            .map(|t| format_isk(t.cost))
            .unwrap_or_else(|| "-".to_string());
        let best = quote
            .best_tier()
            .map(|t| format_isk(t.payout))
            .unwrap_or_else(|| "-".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "{}{:<24} #{:<8} {} tiers   from {:>8}   up to {:>8}",
                marker,
                quote.hull_name,
                type_id,
                quote.tiers.len(),
                basic,
                best,
            ),
            row_style,
        )));
    }

    let list = Paragraph::new(lines).block(block);
    frame.render_widget(list, area);
}

/// Renders the freshness status line and key hints
fn render_status_line<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let now_ms = Utc::now().timestamp_millis();
    let freshness = app.cache.freshness();
    let (badge, badge_color) = status_badge(app.cache.status(now_ms));

    let mut spans = vec![
        Span::styled(
            format!(" {} ", badge),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| {} ", format_age(freshness.last_updated_ms, now_ms)),
            Style::default().fg(Color::Gray),
        ),
    ];

    if let Some(ref reason) = app.last_error {
        spans.push(Span::styled(
            format!("| {} ", reason),
            Style::default().fg(Color::Red),
        ));
    }

    spans.push(Span::styled(
        "| r refresh  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    ));

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}
