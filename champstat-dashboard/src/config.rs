//! Dashboard configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Example:
//!
//! ```toml
//! data_dir = "/srv/champstat/data"
//! default_metric = "gold_earned"
//! min_pick_rate = 0.01
//! default_sort = "descending"
//!
//! [files]
//! matchups = "matchup_win_rates_v2.parquet"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use champstat_core::aggregate::DEFAULT_GROUP_SUFFIX;
use champstat_core::{DataFiles, FileNames, SortMode, DEFAULT_NO_DATA};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Directory holding the four store files.
    pub data_dir: PathBuf,
    pub files: FileNames,
    /// Metric the stat tab opens on.
    pub default_metric: String,
    /// Win/pick rows with a lower pick rate are hidden.
    pub min_pick_rate: f64,
    /// Rendered in place of an absent rate.
    pub no_data_marker: String,
    pub default_sort: SortMode,
    pub group_label_suffix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            files: FileNames::default(),
            default_metric: "damage_to_champions".into(),
            min_pick_rate: 0.005,
            no_data_marker: DEFAULT_NO_DATA.into(),
            default_sort: SortMode::ByCount,
            group_label_suffix: DEFAULT_GROUP_SUFFIX.into(),
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_pick_rate) {
            return Err(ConfigError::Invalid {
                field: "min_pick_rate",
                reason: format!("must lie in [0, 1], got {}", self.min_pick_rate),
            });
        }
        if self.no_data_marker.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "no_data_marker",
                reason: "must not be empty".into(),
            });
        }
        let names = [
            ("files.entity_series", &self.files.entity_series),
            ("files.group_series", &self.files.group_series),
            ("files.win_pick", &self.files.win_pick),
            ("files.matchups", &self.files.matchups),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Resolved paths of the store files.
    pub fn data_files(&self) -> DataFiles {
        DataFiles::with_names(&self.data_dir, &self.files)
    }
}
