//! Champstat Dashboard: configuration, selector options, tab views, export.
//!
//! This crate builds on `champstat-core` to provide:
//! - TOML configuration with validated defaults
//! - Selector options and initial selections in store order
//! - The stat chart, win/pick table, and matchup table views
//! - JSON, CSV, and Markdown export of every view

pub mod config;
pub mod dashboard;
pub mod export;
pub mod matchup_view;
pub mod options;
pub mod stat_view;
pub mod win_pick_view;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardError, DashboardInfo};
pub use matchup_view::{matchup_view, MatchupRequest, MatchupView, RoleTable, NO_MATCHUP_DATA};
pub use options::{SelectionDefaults, SelectorOptions, SortOption};
pub use stat_view::{stat_view, StatRequest, StatView, NO_SELECTION, NO_SERIES_DATA};
pub use win_pick_view::{win_pick_view, WinPickRequest, WinPickView};
