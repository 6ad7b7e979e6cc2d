//! The dashboard: configuration plus one loaded store snapshot, and the
//! per-tab entry points the presentation layer (or CLI) calls.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use champstat_core::{DataStore, DatasetFingerprint, StoreError, StoreManifest, StoreSummary, TableError};

use crate::config::{ConfigError, DashboardConfig};
use crate::matchup_view::{matchup_view, MatchupRequest, MatchupView};
use crate::options::SelectorOptions;
use crate::stat_view::{stat_view, StatRequest, StatView};
use crate::win_pick_view::{win_pick_view, WinPickRequest, WinPickView};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data store error: {0}")]
    Store(#[from] StoreError),
    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// Status of the loaded data, for `info` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardInfo {
    pub data_dir: PathBuf,
    pub files: Vec<(String, PathBuf)>,
    pub summary: StoreSummary,
    pub fingerprint: DatasetFingerprint,
    pub manifest: Option<StoreManifest>,
    /// Manifest exists and its fingerprint differs from the loaded data.
    pub manifest_stale: bool,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    store: DataStore,
    fingerprint: DatasetFingerprint,
    manifest: Option<StoreManifest>,
}

impl Dashboard {
    /// Validate the config and load the store it points at. A failed load is
    /// fatal; the error names the failing file.
    pub fn open(config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let files = config.data_files();
        let store = DataStore::load(&files)?;
        let manifest = StoreManifest::read(&files.manifest())?;
        Ok(Self::with_manifest(config, store, manifest))
    }

    /// Wrap an already-built store (tests, sample data).
    pub fn from_store(config: DashboardConfig, store: DataStore) -> Self {
        Self::with_manifest(config, store, None)
    }

    fn with_manifest(
        config: DashboardConfig,
        store: DataStore,
        manifest: Option<StoreManifest>,
    ) -> Self {
        let fingerprint = DatasetFingerprint::of(&store);
        tracing::info!(fingerprint = %fingerprint.short(), "dashboard ready");
        if let Some(m) = &manifest {
            if m.fingerprint != fingerprint.0 {
                tracing::warn!(
                    manifest = %m.fingerprint,
                    loaded = %fingerprint.0,
                    "manifest fingerprint does not match loaded data"
                );
            }
        }
        Self {
            config,
            store,
            fingerprint,
            manifest,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn fingerprint(&self) -> &DatasetFingerprint {
        &self.fingerprint
    }

    pub fn options(&self) -> SelectorOptions {
        SelectorOptions::from_store(&self.store, &self.config)
    }

    pub fn stat(&self, request: &StatRequest) -> StatView {
        stat_view(&self.store, &self.config, request)
    }

    pub fn win_pick(&self, request: &WinPickRequest) -> Result<WinPickView, DashboardError> {
        Ok(win_pick_view(&self.store, &self.config, request)?)
    }

    pub fn matchups(&self, request: &MatchupRequest) -> Result<MatchupView, DashboardError> {
        Ok(matchup_view(&self.store, &self.config, request)?)
    }

    pub fn info(&self) -> DashboardInfo {
        let files = self.config.data_files();
        DashboardInfo {
            data_dir: files.dir.clone(),
            files: files
                .tables()
                .iter()
                .map(|(label, path)| (label.to_string(), path.to_path_buf()))
                .collect(),
            summary: self.store.summary(),
            fingerprint: self.fingerprint.clone(),
            manifest_stale: self
                .manifest
                .as_ref()
                .is_some_and(|m| m.fingerprint != self.fingerprint.0),
            manifest: self.manifest.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use champstat_core::sample::{generate, SampleSpec};

    #[test]
    fn from_store_serves_every_tab() {
        let dashboard = Dashboard::from_store(DashboardConfig::default(), generate(&SampleSpec::default()));

        let options = dashboard.options();
        assert_eq!(options.entities.len(), 12);

        let stat = dashboard.stat(&StatRequest {
            selection: champstat_core::SeriesSelection::new(["Ahri"], Vec::<String>::new()),
            metric: None,
        });
        assert_eq!(stat.series.rows.len(), 30);

        let win_pick = dashboard.win_pick(&WinPickRequest::default()).unwrap();
        assert_eq!(win_pick.position.as_deref(), Some("TOP"));

        let matchups = dashboard.matchups(&MatchupRequest::default()).unwrap();
        assert_eq!(matchups.entity.as_deref(), Some("Ahri"));
        assert_eq!(matchups.tables.len(), options.roles.len());
    }

    #[test]
    fn info_without_manifest_is_not_stale() {
        let dashboard = Dashboard::from_store(DashboardConfig::default(), DataStore::default());
        let info = dashboard.info();
        assert!(info.manifest.is_none());
        assert!(!info.manifest_stale);
        assert_eq!(info.files.len(), 4);
        assert_eq!(info.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn invalid_config_fails_before_loading() {
        let config = DashboardConfig {
            min_pick_rate: -0.1,
            ..DashboardConfig::default()
        };
        let err = Dashboard::open(config).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
