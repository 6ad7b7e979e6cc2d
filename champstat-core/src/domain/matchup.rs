//! Matchup win rates keyed by (entity, opposing role, opponent count).

use serde::Serialize;

use super::{Keyed, Rate, RateRow, RateTable, ShapeError, WIN_RATE};

/// Win rate of an entity against `opponent_count` opponents of one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchupRow {
    pub opponent_count: u8,
    pub win_rate: Option<Rate>,
}

/// Key label used when a role's matchup rows are viewed as a [`RateTable`].
pub const OPPONENT_COUNT: &str = "opponent_count";

/// entity → role → rows ordered by opponent count ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchupTable {
    by_entity: Keyed<Keyed<Vec<MatchupRow>>>,
}

impl MatchupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one matchup cell. Rows stay ordered by opponent count.
    pub fn insert(
        &mut self,
        entity: &str,
        role: &str,
        opponent_count: u8,
        win_rate: Option<Rate>,
    ) -> Result<(), ShapeError> {
        let rows = self
            .by_entity
            .get_or_insert_with(entity, Keyed::new)
            .get_or_insert_with(role, Vec::new);
        match rows.binary_search_by_key(&opponent_count, |r| r.opponent_count) {
            Ok(_) => Err(ShapeError::DuplicateMatchup {
                entity: entity.to_string(),
                role: role.to_string(),
                opponent_count,
            }),
            Err(pos) => {
                rows.insert(
                    pos,
                    MatchupRow {
                        opponent_count,
                        win_rate,
                    },
                );
                Ok(())
            }
        }
    }

    /// Rows for one (entity, role) pair, ordered by opponent count.
    pub fn rows(&self, entity: &str, role: &str) -> Option<&[MatchupRow]> {
        self.by_entity
            .get(entity)?
            .get(role)
            .map(|rows| rows.as_slice())
    }

    /// Roles recorded for an entity, in store order.
    pub fn roles(&self, entity: &str) -> Option<&Keyed<Vec<MatchupRow>>> {
        self.by_entity.get(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.by_entity.keys()
    }

    /// Every role that appears for any entity, in first-seen order.
    pub fn all_roles(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for roles in self.by_entity.values() {
            for role in roles.keys() {
                if !seen.contains(&role) {
                    seen.push(role);
                }
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Keyed<Vec<MatchupRow>>)> {
        self.by_entity.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Total number of (entity, role, opponent count) cells.
    pub fn cell_count(&self) -> usize {
        self.by_entity
            .values()
            .flat_map(|roles| roles.values())
            .map(Vec::len)
            .sum()
    }
}

/// View matchup rows as a single-column rate table keyed by opponent count.
pub fn matchup_rate_table(rows: &[MatchupRow]) -> RateTable {
    let rows = rows
        .iter()
        .map(|r| RateRow::new(r.opponent_count.to_string(), vec![r.win_rate]))
        .collect();
    RateTable::from_parts(OPPONENT_COUNT, vec![WIN_RATE.to_string()], rows)
}
