//! hullwatch - view EVE Online ship insurance valuations
//!
//! A terminal UI application that displays insurance coverage tiers for
//! every insurable hull, backed by a disk-persisted cache so prices
//! survive restarts and the remote service is only polled when the cached
//! copy has gone stale.

mod app;
mod cache;
mod cli;
mod data;
mod refresh;
mod ui;

use std::io;
use std::panic;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use app::{App, AppState};
use cache::{controller::DEFAULT_INTERVAL_MS, FileStore, KeyValueStore, PersistenceBridge, PriceCache};
use cli::{Cli, StartupConfig};
use data::InsuranceClient;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui<S: KeyValueStore>(frame: &mut ratatui::Frame, app: &App<S>) {
    match &app.state {
        AppState::Loading => {
            render_loading(frame);
        }
        AppState::HullList => {
            ui::render_hull_list(frame, app);
        }
        AppState::HullDetail(type_id) => {
            ui::render_hull_detail(frame, app, *type_id);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while the first fetch is in flight
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Fetching insurance prices...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Builds the disk-backed store, falling back to a temp directory when no
/// home directory can be resolved
fn open_store() -> FileStore {
    FileStore::new().unwrap_or_else(|| FileStore::with_dir(std::env::temp_dir().join("hullwatch")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli);

    let store = open_store();
    if config.clear_cache {
        store.clear();
    }

    let bridge = PersistenceBridge::new(store);
    let mut cache = PriceCache::new(
        bridge,
        Duration::from_millis(DEFAULT_INTERVAL_MS as u64),
    );
    cache.initialize();

    let client = InsuranceClient::new();

    if config.json_output {
        return print_json(cache, &client, config.force_refresh).await;
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cache);
    let (tx, mut rx) = mpsc::channel(8);

    // Kick off the initial refresh when the cached copy is missing, stale,
    // or explicitly bypassed.
    let now = Utc::now().timestamp_millis();
    if (config.force_refresh || app.cache.needs_refresh(now)) && app.cache.begin_refresh() {
        refresh::spawn_refresh(client.clone(), tx.clone());
    } else if app.state == AppState::Loading {
        // Nothing to wait for; show the (empty) list
        app.state = AppState::HullList;
    }

    // Main event loop
    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Apply any finished background fetch
        while let Some(message) = refresh::try_recv(&mut rx) {
            app.apply_refresh_message(message);
        }

        // Lazy staleness check: a session that outlives the freshness
        // window refreshes once, and the r key forces an attempt.
        let now = Utc::now().timestamp_millis();
        if (app.refresh_requested || app.cache.needs_refresh(now)) && app.cache.begin_refresh() {
            refresh::spawn_refresh(client.clone(), tx.clone());
        }
        app.refresh_requested = false;

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

/// Prints the price table as pretty JSON and exits
///
/// Refreshes first when the cached copy is stale or `--refresh` was given;
/// a failed refresh still prints the retained table when one exists.
async fn print_json(
    mut cache: PriceCache<FileStore>,
    client: &InsuranceClient,
    force_refresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now().timestamp_millis();
    if force_refresh || !cache.is_fresh(now) {
        cache.refresh_with(client).await;
    }

    match cache.current_value() {
        Some(prices) => {
            println!("{}", serde_json::to_string_pretty(prices)?);
            Ok(())
        }
        None => {
            eprintln!("hullwatch: no insurance price data available (fetch failed and nothing cached)");
            std::process::exit(1);
        }
    }
}
