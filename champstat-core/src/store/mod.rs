//! The data store: an immutable snapshot of the four keyed tables.
//!
//! Layout on disk (long-form Parquet, one file per table):
//! - `entity_stats.parquet`: `entity`, `minute`, metric columns
//! - `group_avg_stats.parquet`: `group`, `minute`, metric columns
//! - `win_pick_rates.parquet`: `position`, `entity`, `win_rate`, `pick_rate`
//! - `matchup_win_rates.parquet`: `entity`, `role`, `opponent_count`, `win_rate`
//!
//! The store is loaded once at startup and only ever read afterwards. Every
//! view over it is a new derived value.

pub mod error;
pub mod manifest;
mod parquet;

pub use error::StoreError;
pub use manifest::{StoreManifest, MANIFEST_FILE};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{Keyed, MatchupTable, RateTable, TimeSeriesTable};

/// Key column of the entity time series file.
pub const ENTITY: &str = "entity";
/// Key column of the group-average time series file.
pub const GROUP: &str = "group";
/// Key column of the win/pick file.
pub const POSITION: &str = "position";
/// Opposing-role column of the matchup file.
pub const ROLE: &str = "role";
/// Time index column (minutes elapsed).
pub const MINUTE: &str = "minute";

/// File names of the four store tables, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub entity_series: String,
    pub group_series: String,
    pub win_pick: String,
    pub matchups: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            entity_series: "entity_stats.parquet".into(),
            group_series: "group_avg_stats.parquet".into(),
            win_pick: "win_pick_rates.parquet".into(),
            matchups: "matchup_win_rates.parquet".into(),
        }
    }
}

/// Resolved paths of the four store files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub dir: PathBuf,
    pub entity_series: PathBuf,
    pub group_series: PathBuf,
    pub win_pick: PathBuf,
    pub matchups: PathBuf,
}

impl DataFiles {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_names(dir, &FileNames::default())
    }

    pub fn with_names(dir: impl Into<PathBuf>, names: &FileNames) -> Self {
        let dir = dir.into();
        Self {
            entity_series: dir.join(&names.entity_series),
            group_series: dir.join(&names.group_series),
            win_pick: dir.join(&names.win_pick),
            matchups: dir.join(&names.matchups),
            dir,
        }
    }

    /// The four table files, labelled, in load order.
    pub fn tables(&self) -> [(&'static str, &Path); 4] {
        [
            ("entity series", self.entity_series.as_path()),
            ("group series", self.group_series.as_path()),
            ("win/pick rates", self.win_pick.as_path()),
            ("matchups", self.matchups.as_path()),
        ]
    }

    pub fn manifest(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }
}

/// Immutable snapshot of every table the dashboard reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    entity_series: Keyed<TimeSeriesTable>,
    group_series: Keyed<TimeSeriesTable>,
    win_pick: Keyed<RateTable>,
    matchups: MatchupTable,
}

/// Table counts for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub entities: usize,
    pub groups: usize,
    pub positions: usize,
    pub matchup_entities: usize,
    pub matchup_cells: usize,
    pub series_rows: usize,
}

impl DataStore {
    pub fn new(
        entity_series: Keyed<TimeSeriesTable>,
        group_series: Keyed<TimeSeriesTable>,
        win_pick: Keyed<RateTable>,
        matchups: MatchupTable,
    ) -> Self {
        Self {
            entity_series,
            group_series,
            win_pick,
            matchups,
        }
    }

    /// Load all four tables. Any failure aborts the load and names the file.
    pub fn load(files: &DataFiles) -> Result<Self, StoreError> {
        let entity_series = parquet::read_series(&files.entity_series, ENTITY)?;
        let group_series = parquet::read_series(&files.group_series, GROUP)?;
        let win_pick = parquet::read_win_pick(&files.win_pick)?;
        let matchups = parquet::read_matchups(&files.matchups)?;

        let store = Self::new(entity_series, group_series, win_pick, matchups);
        let summary = store.summary();
        tracing::info!(
            dir = %files.dir.display(),
            entities = summary.entities,
            groups = summary.groups,
            positions = summary.positions,
            matchup_cells = summary.matchup_cells,
            "loaded data store"
        );
        Ok(store)
    }

    /// Write all four tables (atomic per file).
    pub fn write(&self, files: &DataFiles) -> Result<(), StoreError> {
        parquet::write_series(&files.entity_series, ENTITY, &self.entity_series)?;
        parquet::write_series(&files.group_series, GROUP, &self.group_series)?;
        parquet::write_win_pick(&files.win_pick, &self.win_pick)?;
        parquet::write_matchups(&files.matchups, &self.matchups)?;
        tracing::info!(dir = %files.dir.display(), "wrote data store");
        Ok(())
    }

    pub fn entity_series(&self) -> &Keyed<TimeSeriesTable> {
        &self.entity_series
    }

    pub fn group_series(&self) -> &Keyed<TimeSeriesTable> {
        &self.group_series
    }

    pub fn win_pick(&self) -> &Keyed<RateTable> {
        &self.win_pick
    }

    pub fn matchups(&self) -> &MatchupTable {
        &self.matchups
    }

    pub fn entity(&self, name: &str) -> Option<&TimeSeriesTable> {
        self.entity_series.get(name)
    }

    pub fn group(&self, name: &str) -> Option<&TimeSeriesTable> {
        self.group_series.get(name)
    }

    pub fn win_pick_table(&self, position: &str) -> Option<&RateTable> {
        self.win_pick.get(position)
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            entities: self.entity_series.len(),
            groups: self.group_series.len(),
            positions: self.win_pick.len(),
            matchup_entities: self.matchups.entities().count(),
            matchup_cells: self.matchups.cell_count(),
            series_rows: self
                .entity_series
                .values()
                .chain(self.group_series.values())
                .map(TimeSeriesTable::len)
                .sum(),
        }
    }
}
