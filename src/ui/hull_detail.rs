//! Hull detail screen rendering
//!
//! Shows every coverage tier for one hull: premium, payout, and payout per
//! ISK of premium.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::hull_list::format_isk;
use crate::app::App;
use crate::cache::KeyValueStore;

/// Renders the coverage detail view for the given hull type id
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, type_id: u32) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    render_tiers(frame, app, type_id, chunks[0]);
    render_hints(frame, chunks[1]);
}

/// Renders the tier table for one hull
fn render_tiers<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, type_id: u32, area: Rect) {
    let quote = app.cache.current_value().and_then(|p| p.get(type_id));

    let Some(quote) = quote else {
        let block = Block::default().borders(Borders::ALL).title(" Coverage ");
        let missing = Paragraph::new(Line::from(Span::styled(
            format!("No quote for hull #{}", type_id),
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(missing, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} (#{}) ", quote.hull_name, type_id));

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:<12} {:>12} {:>12} {:>10}", "Level", "Premium", "Payout", "Ratio"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for tier in &quote.tiers {
        let ratio = tier
            .payout_ratio()
            .map(|r| format!("{:.2}x", r))
            .unwrap_or_else(|| "-".to_string());

        lines.push(Line::from(Span::styled(
            format!(
                "{:<12} {:>12} {:>12} {:>10}",
                tier.level,
                format_isk(tier.cost),
                format_isk(tier.payout),
                ratio,
            ),
            Style::default().fg(Color::Gray),
        )));
    }

    if quote.tiers.is_empty() {
        lines.push(Line::from(Span::styled(
            "No coverage tiers offered",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let table = Paragraph::new(lines)
        .block(block)
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(table, area);
}

/// Renders the key hints line
fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(Span::styled(
        " Esc back  j/k scroll  r refresh  q quit",
        Style::default().fg(Color::DarkGray),
    )))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(hints, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, PersistenceBridge, PriceCache};
    use crate::data::{CoverageTier, HullQuote, InsurancePrices};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn app_with_quote() -> App<MemoryStore> {
        let mut cache = PriceCache::new(
            PersistenceBridge::new(MemoryStore::new()),
            Duration::from_secs(3600),
        );
        cache.initialize();
        assert!(cache.begin_refresh());

        let mut prices = InsurancePrices::default();
        prices.hulls.insert(
            24692,
            HullQuote {
                hull_name: "Abaddon".to_string(),
                tiers: vec![
                    CoverageTier {
                        level: "Basic".to_string(),
                        cost: 14_000_000.0,
                        payout: 46_000_000.0,
                    },
                    CoverageTier {
                        level: "Platinum".to_string(),
                        cost: 140_000_000.0,
                        payout: 460_000_000.0,
                    },
                ],
            },
        );
        cache.complete_refresh(prices);

        App::new(cache)
    }

    #[test]
    fn test_detail_renders_tiers() {
        let app = app_with_quote();
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app, 24692)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("Abaddon"), "Should show the hull name");
        assert!(content.contains("Basic"), "Should list the basic tier");
        assert!(content.contains("Platinum"), "Should list the platinum tier");
    }

    #[test]
    fn test_detail_renders_missing_quote_placeholder() {
        let app = app_with_quote();
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app, 99999)).unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("No quote"), "Should show the missing-quote message");
    }
}
