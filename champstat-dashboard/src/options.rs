//! Selector options: what each dropdown offers, in store order, plus the
//! initial selection of each tab.

use serde::Serialize;

use champstat_core::{available_metrics, DataStore, SeriesSelection, SortMode};

use crate::config::DashboardConfig;

/// One sort-mode dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub value: SortMode,
    pub label: &'static str,
}

/// Initial selection of every tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionDefaults {
    /// First entity, if the store has any.
    pub entities: Vec<String>,
    pub groups: Vec<String>,
    /// Configured default metric when the default selection has it, else its first metric.
    pub metric: Option<String>,
    pub position: Option<String>,
    pub matchup_entity: Option<String>,
    pub sort: SortMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    pub entities: Vec<String>,
    pub groups: Vec<String>,
    /// Metrics offered for the default selection.
    pub metrics: Vec<String>,
    pub positions: Vec<String>,
    pub matchup_entities: Vec<String>,
    pub roles: Vec<String>,
    pub sort_modes: Vec<SortOption>,
    pub defaults: SelectionDefaults,
}

fn owned<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    keys.map(str::to_string).collect()
}

impl SelectorOptions {
    pub fn from_store(store: &DataStore, config: &DashboardConfig) -> Self {
        let entities = owned(store.entity_series().keys());
        let groups = owned(store.group_series().keys());
        let positions = owned(store.win_pick().keys());
        let matchup_entities = owned(store.matchups().entities());
        let roles = owned(store.matchups().all_roles().into_iter());

        let default_entities: Vec<String> = entities.first().cloned().into_iter().collect();
        let selection = SeriesSelection::new(default_entities.clone(), Vec::<String>::new());
        let metrics = available_metrics(store, &selection);
        let metric = if metrics.contains(&config.default_metric) {
            Some(config.default_metric.clone())
        } else {
            metrics.first().cloned()
        };

        let defaults = SelectionDefaults {
            entities: default_entities,
            groups: Vec::new(),
            metric,
            position: positions.first().cloned(),
            matchup_entity: matchup_entities.first().cloned(),
            sort: config.default_sort,
        };

        Self {
            entities,
            groups,
            metrics,
            positions,
            matchup_entities,
            roles,
            sort_modes: SortMode::ALL
                .into_iter()
                .map(|value| SortOption {
                    value,
                    label: value.label(),
                })
                .collect(),
            defaults,
        }
    }
}
