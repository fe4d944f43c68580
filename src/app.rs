//! Application state management for hullwatch
//!
//! Contains the main application state, handling keyboard input, refresh
//! outcomes, and state transitions between the hull list and the coverage
//! detail view. The app owns the price cache; all network results reach it
//! through [`App::apply_refresh_message`].

use crossterm::event::{KeyCode, KeyEvent};

use crate::cache::{KeyValueStore, PriceCache};
use crate::refresh::RefreshMessage;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while the first fetch runs
    Loading,
    /// List view showing all insurable hulls
    HullList,
    /// Detail view for a specific hull type id
    HullDetail(u32),
}

/// Main application struct managing state and cached data
pub struct App<S: KeyValueStore> {
    /// Current application state/view
    pub state: AppState,
    /// Index of currently selected hull in the list view
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a manual refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the hull detail view
    pub detail_scroll_offset: u16,
    /// Reason the most recent refresh failed, for the status line
    pub last_error: Option<String>,
    /// The staleness-aware price cache
    pub cache: PriceCache<S>,
}

impl<S: KeyValueStore> App<S> {
    /// Creates a new App owning the given cache
    ///
    /// Starts in `Loading` when the cache holds no usable value yet,
    /// otherwise goes straight to the list and lets any refresh run in the
    /// background (stale-while-revalidate).
    pub fn new(cache: PriceCache<S>) -> Self {
        let state = if cache.view().is_usable() {
            AppState::HullList
        } else {
            AppState::Loading
        };
        Self {
            state,
            selected_index: 0,
            should_quit: false,
            refresh_requested: false,
            show_help: false,
            detail_scroll_offset: 0,
            last_error: None,
            cache,
        }
    }

    /// Returns the number of hulls currently in the price table
    pub fn hull_count(&self) -> usize {
        self.cache.current_value().map_or(0, |p| p.len())
    }

    /// Returns the type id of the currently selected hull, if any
    pub fn selected_type_id(&self) -> Option<u32> {
        self.cache
            .current_value()?
            .hulls
            .keys()
            .nth(self.selected_index)
            .copied()
    }

    /// Applies a background refresh outcome to the cache
    ///
    /// A success replaces the table and leaves the loading screen; a
    /// failure retains whatever was cached and records the reason for the
    /// status line.
    pub fn apply_refresh_message(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::PricesFetched(prices) => {
                self.cache.complete_refresh(prices);
                self.last_error = None;
            }
            RefreshMessage::FetchFailed(reason) => {
                self.cache.fail_refresh();
                self.last_error = Some(reason);
            }
        }

        // Either way the first attempt is over; show whatever we have.
        if self.state == AppState::Loading {
            self.state = AppState::HullList;
        }

        // A shorter table can leave the selection dangling.
        let count = self.hull_count();
        if count > 0 && self.selected_index >= count {
            self.selected_index = count - 1;
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc` (in HullList): Quit the application
    /// - `Up`/`k`, `Down`/`j`: Move selection / scroll
    /// - `Enter`: Open coverage details for the selected hull
    /// - `Esc` (in HullDetail): Go back to the list
    /// - `r`: Request a refresh
    /// - `?`: Toggle the help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::HullList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection_down();
                }
                KeyCode::Enter => {
                    if let Some(type_id) = self.selected_type_id() {
                        self.state = AppState::HullDetail(type_id);
                    }
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
            AppState::HullDetail(_) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    self.detail_scroll_offset = 0;
                    self.state = AppState::HullList;
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.scroll_down();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.scroll_up();
                }
                KeyCode::Char('g') => {
                    self.detail_scroll_offset = 0;
                }
                KeyCode::Char('G') => {
                    self.detail_scroll_offset = 100;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.hull_count();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.hull_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Scrolls up in the detail view, stopping at 0
    fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view with a reasonable upper bound
    fn scroll_down(&mut self) {
        const MAX_SCROLL: u16 = 100;
        if self.detail_scroll_offset < MAX_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }
}
