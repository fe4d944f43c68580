//! UI rendering module for hullwatch
//!
//! Contains the rendering logic for the terminal user interface, using the
//! ratatui library. The views are a thin read-only surface over the app
//! state; nothing in here mutates the cache or triggers a fetch.

pub mod help_overlay;
pub mod hull_detail;
pub mod hull_list;

pub use help_overlay::render as render_help_overlay;
pub use hull_detail::render as render_hull_detail;
pub use hull_list::render as render_hull_list;
