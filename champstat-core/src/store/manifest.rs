//! Optional `manifest.json` sidecar describing how a data directory was produced.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::StoreError;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Producer of the files (e.g. `champstat sample`).
    pub generator: String,
    /// RNG seed, for synthetic stores.
    #[serde(default)]
    pub seed: Option<u64>,
    pub generated_at: NaiveDateTime,
    pub entities: usize,
    pub groups: usize,
    pub positions: usize,
    pub matchup_cells: usize,
    /// BLAKE3 fingerprint of the store contents at generation time.
    pub fingerprint: String,
}

impl StoreManifest {
    /// Read a manifest if one exists. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Manifest {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn write(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| StoreError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|e| StoreError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_manifest_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let read = StoreManifest::read(&dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn malformed_manifest_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, "{ not json").unwrap();
        let err = StoreManifest::read(&path).unwrap_err();
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn written_manifest_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let manifest = StoreManifest {
            generator: "champstat sample".into(),
            seed: Some(7),
            generated_at: chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            entities: 12,
            groups: 6,
            positions: 5,
            matchup_cells: 300,
            fingerprint: "abc".into(),
        };
        manifest.write(&path).unwrap();
        assert_eq!(StoreManifest::read(&path).unwrap(), Some(manifest));
    }
}
