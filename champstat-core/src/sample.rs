//! Deterministic synthetic Data Store for demos and tests.
//!
//! The same seed always yields the same store (and so the same fingerprint).
//! The roster is fixed; only the numbers are drawn from the seeded RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Keyed, MatchupTable, MetricColumn, Rate, RateRow, RateTable, TimeSeriesTable};
use crate::domain::{PICK_RATE, WIN_RATE};
use crate::fingerprint::DatasetFingerprint;
use crate::store::{DataFiles, DataStore, StoreError, StoreManifest, ENTITY};

/// Lane positions of the win/pick tables, in selector order.
pub const POSITIONS: [&str; 5] = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"];

/// Per-minute growth of each generated metric.
const METRICS: [(&str, f64); 4] = [
    ("damage_to_champions", 620.0),
    ("gold_earned", 410.0),
    ("minions_killed", 7.5),
    ("experience", 520.0),
];

/// Support-only metric, so some tables lack a column.
const HEALING: (&str, f64) = ("healing_done", 180.0);

struct Champion {
    name: &'static str,
    tags: &'static [&'static str],
    positions: &'static [&'static str],
}

const ROSTER: [Champion; 12] = [
    Champion { name: "Ahri", tags: &["Mage", "Assassin"], positions: &["MIDDLE"] },
    Champion { name: "Garen", tags: &["Fighter", "Tank"], positions: &["TOP"] },
    Champion { name: "Lee Sin", tags: &["Fighter", "Assassin"], positions: &["JUNGLE", "TOP"] },
    Champion { name: "Jinx", tags: &["Marksman"], positions: &["BOTTOM"] },
    Champion { name: "Thresh", tags: &["Support", "Tank"], positions: &["UTILITY"] },
    Champion { name: "Lux", tags: &["Mage", "Support"], positions: &["MIDDLE", "UTILITY"] },
    Champion { name: "Darius", tags: &["Fighter"], positions: &["TOP"] },
    Champion { name: "Ezreal", tags: &["Marksman", "Mage"], positions: &["BOTTOM"] },
    Champion { name: "Leona", tags: &["Tank", "Support"], positions: &["UTILITY"] },
    Champion { name: "Zed", tags: &["Assassin"], positions: &["MIDDLE"] },
    Champion { name: "Vi", tags: &["Fighter"], positions: &["JUNGLE"] },
    Champion { name: "Malphite", tags: &["Tank"], positions: &["TOP", "MIDDLE"] },
];

/// Parameters of a generated store.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSpec {
    pub seed: u64,
    /// Minutes per time series (1..=minutes).
    pub minutes: u32,
    /// Largest opponent count in matchup tables.
    pub max_opponents: u8,
    /// Chance that any one rate is recorded as "no data".
    pub no_data_probability: f64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            seed: 42,
            minutes: 30,
            max_opponents: 5,
            no_data_probability: 0.1,
        }
    }
}

impl SampleSpec {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

fn jitter(rng: &mut StdRng, spread: f64) -> f64 {
    1.0 + rng.gen_range(-spread..spread)
}

fn maybe_rate(rng: &mut StdRng, lo: f64, hi: f64, no_data: f64) -> Option<Rate> {
    if rng.gen_bool(no_data) {
        return None;
    }
    Rate::new(rng.gen_range(lo..hi)).ok()
}

fn entity_series(rng: &mut StdRng, champion: &Champion, minutes: u32) -> TimeSeriesTable {
    let mins: Vec<u32> = (1..=minutes).collect();
    let skill = jitter(rng, 0.25);
    let mut columns: Vec<MetricColumn> = METRICS
        .iter()
        .map(|&(name, per_minute)| {
            let values = mins
                .iter()
                .map(|&m| (per_minute * skill * f64::from(m) * jitter(rng, 0.08)).round())
                .collect::<Vec<f64>>();
            MetricColumn::dense(name, values)
        })
        .collect();
    if champion.tags.contains(&"Support") {
        let (name, per_minute) = HEALING;
        let values = mins
            .iter()
            .map(|&m| (per_minute * f64::from(m) * jitter(rng, 0.15)).round())
            .collect::<Vec<f64>>();
        columns.push(MetricColumn::dense(name, values));
    }
    TimeSeriesTable::from_parts(mins, columns)
}

/// Per-minute mean over members that have the metric; metrics no member has are left out.
fn group_average(members: &[&TimeSeriesTable], minutes: u32) -> TimeSeriesTable {
    let mins: Vec<u32> = (1..=minutes).collect();
    let mut names: Vec<&str> = Vec::new();
    for table in members {
        for name in table.metric_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    let columns = names
        .iter()
        .map(|name| {
            let values = (0..mins.len())
                .map(|row| {
                    let present: Vec<f64> = members
                        .iter()
                        .filter_map(|t| t.metric(name).and_then(|v| v.get(row).copied().flatten()))
                        .collect();
                    (!present.is_empty())
                        .then(|| present.iter().sum::<f64>() / present.len() as f64)
                })
                .collect();
            MetricColumn::new(*name, values)
        })
        .collect();
    TimeSeriesTable::from_parts(mins, columns)
}

/// Generate a complete store from `spec`.
pub fn generate(spec: &SampleSpec) -> DataStore {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let no_data = spec.no_data_probability.clamp(0.0, 1.0);

    let mut entities: Keyed<TimeSeriesTable> = Keyed::new();
    for champion in &ROSTER {
        let table = entity_series(&mut rng, champion, spec.minutes);
        entities.insert(champion.name, table);
    }

    let mut groups: Keyed<TimeSeriesTable> = Keyed::new();
    for champion in &ROSTER {
        for &tag in champion.tags {
            if groups.contains_key(tag) {
                continue;
            }
            let members: Vec<&TimeSeriesTable> = ROSTER
                .iter()
                .filter(|c| c.tags.contains(&tag))
                .filter_map(|c| entities.get(c.name))
                .collect();
            groups.insert(tag, group_average(&members, spec.minutes));
        }
    }

    let mut win_pick: Keyed<RateTable> = Keyed::new();
    for position in POSITIONS {
        let mut rows: Vec<RateRow> = Vec::new();
        for champion in &ROSTER {
            // Off-position picks are rare; they give the pick-rate filter something to drop.
            let main = champion.positions.contains(&position);
            if !main && !rng.gen_bool(0.15) {
                continue;
            }
            let win = maybe_rate(&mut rng, 0.42, 0.58, no_data);
            let pick = if main {
                maybe_rate(&mut rng, 0.02, 0.16, no_data)
            } else {
                maybe_rate(&mut rng, 0.0005, 0.008, no_data)
            };
            rows.push(RateRow::new(champion.name, vec![win, pick]));
        }
        let columns = vec![WIN_RATE.to_string(), PICK_RATE.to_string()];
        win_pick.insert(position, RateTable::from_parts(ENTITY, columns, rows));
    }

    let roles: Vec<&str> = groups.keys().collect();
    let mut matchups = MatchupTable::new();
    for champion in &ROSTER {
        for &role in &roles {
            let base = rng.gen_range(0.44..0.56);
            for count in 1..=spec.max_opponents {
                // More opponents of one role means fewer games and noisier rates.
                let sparse = no_data * f64::from(count);
                let rate = if rng.gen_bool(sparse.min(1.0)) {
                    None
                } else {
                    let shift = rng.gen_range(-0.03..0.03) * f64::from(count);
                    Rate::new((base + shift).clamp(0.0, 1.0)).ok()
                };
                // Keys are unique by construction.
                let _ = matchups.insert(champion.name, role, count, rate);
            }
        }
    }

    DataStore::new(entities, groups, win_pick, matchups)
}

/// Generate a store, write it to `files`, and write its manifest alongside.
pub fn write_sample(
    files: &DataFiles,
    spec: &SampleSpec,
) -> Result<(DataStore, StoreManifest), StoreError> {
    let store = generate(spec);
    store.write(files)?;

    let summary = store.summary();
    let fingerprint = DatasetFingerprint::of(&store);
    let manifest = StoreManifest {
        generator: format!("champstat-core {}", env!("CARGO_PKG_VERSION")),
        seed: Some(spec.seed),
        generated_at: chrono::Utc::now().naive_utc(),
        entities: summary.entities,
        groups: summary.groups,
        positions: summary.positions,
        matchup_cells: summary.matchup_cells,
        fingerprint: fingerprint.0,
    };
    manifest.write(&files.manifest())?;
    tracing::info!(
        dir = %files.dir.display(),
        seed = spec.seed,
        fingerprint = %manifest.fingerprint,
        "wrote sample data store"
    );
    Ok((store, manifest))
}
