//! Matchup tab: for one champion, a win-rate row per opposing role, with
//! one column per opponent count.

use serde::Serialize;

use champstat_core::domain::WIN_RATE;
use champstat_core::{
    format_table, lookup, sort_rows, Cell, DataStore, MatchupLookup, SortMode, TableError,
};

use crate::config::DashboardConfig;

pub const NO_MATCHUP_DATA: &str = "No data for the selected champion.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchupRequest {
    /// `None` opens the first champion with matchup data.
    pub entity: Option<String>,
    /// Narrow the view to one opposing role.
    pub role: Option<String>,
    pub sort: Option<SortMode>,
}

/// One role's table: a header row of opponent-count labels and one body row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleTable {
    pub role: String,
    /// `"1 opp"`, `"2 opp"`, ... in the same order as `cells`.
    pub headers: Vec<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchupView {
    pub entity: Option<String>,
    pub sort: SortMode,
    pub tables: Vec<RoleTable>,
    pub message: Option<String>,
}

pub fn opponent_label(count: &str) -> String {
    format!("{count} opp")
}

fn role_table(
    role: &str,
    found: MatchupLookup<'_>,
    sort: SortMode,
    no_data: &str,
) -> Result<Option<RoleTable>, TableError> {
    let Some(table) = found.rate_table() else {
        return Ok(None);
    };
    // Sorting reorders the count labels together with their rates.
    let formatted = format_table(&sort_rows(&table, WIN_RATE, sort)?, no_data);
    let (headers, cells): (Vec<String>, Vec<Cell>) = formatted
        .rows
        .into_iter()
        .filter_map(|row| {
            let cell = row.cells.into_iter().next()?;
            Some((opponent_label(&row.key), cell))
        })
        .unzip();
    Ok(Some(RoleTable {
        role: role.to_string(),
        headers,
        cells,
    }))
}

pub fn matchup_view(
    store: &DataStore,
    config: &DashboardConfig,
    request: &MatchupRequest,
) -> Result<MatchupView, TableError> {
    let sort = request.sort.unwrap_or(config.default_sort);
    let matchups = store.matchups();
    let entity = request
        .entity
        .clone()
        .or_else(|| matchups.entities().next().map(str::to_string));

    let mut view = MatchupView {
        entity: entity.clone(),
        sort,
        tables: Vec::new(),
        message: None,
    };

    let Some(roles) = entity.as_deref().and_then(|e| matchups.roles(e)) else {
        view.message = Some(NO_MATCHUP_DATA.into());
        return Ok(view);
    };
    let entity = entity.unwrap_or_default();

    let selected: Vec<&str> = match &request.role {
        Some(role) => vec![role.as_str()],
        None => roles.keys().collect(),
    };
    for role in selected {
        let found = lookup(matchups, &entity, role);
        match role_table(role, found, sort, &config.no_data_marker)? {
            Some(table) => view.tables.push(table),
            None => view.message = Some(format!("No data for {entity} against {role}.")),
        }
    }
    Ok(view)
}
