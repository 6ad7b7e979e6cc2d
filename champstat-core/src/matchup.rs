//! Matchup lookup by (entity, opposing role). Never fails: an unknown pair is
//! an explicit [`MatchupLookup::NoData`].

use crate::domain::{matchup_rate_table, MatchupRow, MatchupTable, RateTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupLookup<'a> {
    /// Rows ordered by opponent count ascending.
    Found(&'a [MatchupRow]),
    NoData,
}

impl<'a> MatchupLookup<'a> {
    pub fn rows(&self) -> &'a [MatchupRow] {
        match self {
            MatchupLookup::Found(rows) => rows,
            MatchupLookup::NoData => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, MatchupLookup::NoData)
    }

    /// The rows as a single-column rate table keyed by opponent count.
    pub fn rate_table(&self) -> Option<RateTable> {
        match self {
            MatchupLookup::Found(rows) => Some(matchup_rate_table(rows)),
            MatchupLookup::NoData => None,
        }
    }
}

pub fn lookup<'a>(table: &'a MatchupTable, entity: &str, role: &str) -> MatchupLookup<'a> {
    match table.rows(entity, role) {
        Some(rows) => MatchupLookup::Found(rows),
        None => {
            tracing::debug!(entity, role, "no matchup data");
            MatchupLookup::NoData
        }
    }
}
