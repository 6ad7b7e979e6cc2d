//! Dataset fingerprinting: a stable content hash of a loaded Data Store.
//!
//! The hash walks every table in key order and feeds length-prefixed keys and
//! little-endian values into BLAKE3, so two stores hash equal exactly when
//! they hold the same keys, in the same order, with the same values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Rate, TimeSeriesTable};
use crate::store::DataStore;

/// Hex-encoded BLAKE3 hash of a store's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetFingerprint(pub String);

impl DatasetFingerprint {
    /// Compute the fingerprint of a store snapshot.
    pub fn of(store: &DataStore) -> Self {
        let mut h = FingerprintHasher::default();

        h.tag(b"entity_series");
        for (key, table) in store.entity_series().iter() {
            h.str(key);
            h.series(table);
        }
        h.tag(b"group_series");
        for (key, table) in store.group_series().iter() {
            h.str(key);
            h.series(table);
        }
        h.tag(b"win_pick");
        for (position, table) in store.win_pick().iter() {
            h.str(position);
            for column in table.columns() {
                h.str(column);
            }
            for row in table.rows() {
                h.str(&row.key);
                for rate in &row.rates {
                    h.rate(*rate);
                }
            }
        }
        h.tag(b"matchups");
        for (entity, roles) in store.matchups().iter() {
            h.str(entity);
            for (role, rows) in roles.iter() {
                h.str(role);
                for row in rows {
                    h.inner.update(&[row.opponent_count]);
                    h.rate(row.win_rate);
                }
            }
        }

        Self(h.inner.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct FingerprintHasher {
    inner: blake3::Hasher,
}

impl FingerprintHasher {
    fn tag(&mut self, tag: &[u8]) {
        self.inner.update(&(tag.len() as u64).to_le_bytes());
        self.inner.update(tag);
    }

    fn str(&mut self, s: &str) {
        self.tag(s.as_bytes());
    }

    fn opt_f64(&mut self, value: Option<f64>) {
        match value {
            None => {
                self.inner.update(&[0]);
            }
            Some(v) => {
                self.inner.update(&[1]);
                self.inner.update(&v.to_le_bytes());
            }
        }
    }

    fn rate(&mut self, rate: Option<Rate>) {
        self.opt_f64(rate.map(Rate::value));
    }

    fn series(&mut self, table: &TimeSeriesTable) {
        self.inner.update(&(table.len() as u64).to_le_bytes());
        for minute in table.minutes() {
            self.inner.update(&minute.to_le_bytes());
        }
        for column in table.metrics() {
            self.str(&column.name);
            for value in &column.values {
                self.opt_f64(*value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Keyed, MatchupTable, MetricColumn};

    fn store_with(entity: &str, gold: f64) -> DataStore {
        let table =
            TimeSeriesTable::new(vec![1], vec![MetricColumn::dense("gold_earned", [gold])]).unwrap();
        let entities: Keyed<TimeSeriesTable> = [(entity, table)].into_iter().collect();
        DataStore::new(entities, Keyed::new(), Keyed::new(), MatchupTable::new())
    }

    #[test]
    fn identical_stores_share_a_fingerprint() {
        let a = DatasetFingerprint::of(&store_with("Ahri", 500.0));
        let b = DatasetFingerprint::of(&store_with("Ahri", 500.0));
        assert_eq!(a, b);
        assert_eq!(a.0.len(), 64);
        assert_eq!(a.short().len(), 12);
    }

    #[test]
    fn any_value_change_alters_the_fingerprint() {
        let base = DatasetFingerprint::of(&store_with("Ahri", 500.0));
        assert_ne!(base, DatasetFingerprint::of(&store_with("Ahri", 501.0)));
        assert_ne!(base, DatasetFingerprint::of(&store_with("Zed", 500.0)));
    }

    #[test]
    fn absent_matchup_rate_differs_from_zero() {
        let mut absent = MatchupTable::new();
        absent.insert("Ahri", "Tank", 1, None).unwrap();
        let mut zero = MatchupTable::new();
        zero.insert("Ahri", "Tank", 1, Some(Rate::ZERO)).unwrap();

        let a = DataStore::new(Keyed::new(), Keyed::new(), Keyed::new(), absent);
        let z = DataStore::new(Keyed::new(), Keyed::new(), Keyed::new(), zero);
        assert_ne!(DatasetFingerprint::of(&a), DatasetFingerprint::of(&z));
    }
}
