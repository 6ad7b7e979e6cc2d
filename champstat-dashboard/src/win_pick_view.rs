//! Win/pick tab: per-position table of champion win and pick rates.

use serde::Serialize;

use champstat_core::domain::{PICK_RATE, WIN_RATE};
use champstat_core::{render, DataStore, FormattedTable, RateFilter, SortMode, TableError, TableQuery};

use crate::config::DashboardConfig;

/// Display labels of the rendered columns.
pub const WIN_PICK_HEADERS: [&str; 3] = ["Champion", "Win rate", "Pick rate"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinPickRequest {
    /// `None` opens the first position.
    pub position: Option<String>,
    pub sort: Option<SortMode>,
    pub min_pick_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinPickView {
    pub position: Option<String>,
    pub sort: SortMode,
    pub min_pick_rate: f64,
    pub table: Option<FormattedTable>,
    /// Rows hidden by the pick-rate filter.
    pub hidden: usize,
    pub message: Option<String>,
}

pub fn win_pick_view(
    store: &DataStore,
    config: &DashboardConfig,
    request: &WinPickRequest,
) -> Result<WinPickView, TableError> {
    let sort = request.sort.unwrap_or(config.default_sort);
    let min_pick_rate = request.min_pick_rate.unwrap_or(config.min_pick_rate);
    let position = request
        .position
        .clone()
        .or_else(|| store.win_pick().keys().next().map(str::to_string));

    let mut view = WinPickView {
        position: position.clone(),
        sort,
        min_pick_rate,
        table: None,
        hidden: 0,
        message: None,
    };

    let Some(position) = position else {
        view.message = Some("No positions in the data store.".into());
        return Ok(view);
    };
    let Some(source) = store.win_pick_table(&position) else {
        view.message = Some(format!("No data for position '{position}'."));
        return Ok(view);
    };

    let query = TableQuery {
        filter: Some(RateFilter::new(PICK_RATE, min_pick_rate)),
        sort_column: WIN_RATE.into(),
        sort,
        no_data: config.no_data_marker.clone(),
    };
    let mut table = render(source, &query)?;
    table.key_label = WIN_PICK_HEADERS[0].into();
    table.columns = WIN_PICK_HEADERS[1..].iter().map(|h| h.to_string()).collect();

    view.hidden = source.len() - table.len();
    tracing::debug!(position = %position, rows = table.len(), hidden = view.hidden, "rendered win/pick table");
    view.table = Some(table);
    Ok(view)
}
