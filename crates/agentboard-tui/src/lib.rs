//! Terminal UI for agentboard.
//!
//! Ratatui dashboard over the issue workflow backend: live alert counts, a
//! per-stage summary chart and one card per tracked issue.
//!
//! ## Hotkeys
//!
//! - `o` - Overview (alerts, summary, issue cards)
//! - `i` - Issues view with detail pane
//! - `s` - Stage summary chart
//! - `1`..`4` - Filter: All, PR Ready, Test Failures, Low Sonar
//! - `f` - Next filter
//! - `r` - Refresh now
//! - `C` - Cycle theme
//! - `?` or `h` - Help
//! - `q` - Quit
//! - `Tab` - Cycle views
//! - `Esc` - Cancel/back

pub mod alert_panel;
pub mod app;
pub mod data;
pub mod event;
pub mod issue_card;
pub mod summary_panel;
pub mod theme;
pub mod view;
pub mod widget;

pub use app::{App, AppResult};
pub use data::DashboardData;
pub use theme::{ThemeManager, ThemeName};
pub use view::View;
