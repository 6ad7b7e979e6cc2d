//! Parquet I/O for the four long-form store files.
//!
//! Every table is stored long-form: one key column (entity, group, position
//! or role) repeated per row. Keys are regrouped here in first-appearance
//! order. Writes are atomic (write `.tmp`, then rename into place).

use polars::prelude::*;
use std::fs;
use std::path::Path;

use super::error::StoreError;
use super::{ENTITY, MINUTE, POSITION, ROLE};
use crate::domain::{
    Keyed, MatchupTable, MetricColumn, Rate, RateRow, RateTable, TimeSeriesTable,
    OPPONENT_COUNT, PICK_RATE, WIN_RATE,
};

// ── Reading ─────────────────────────────────────────────────────────

/// Load a Parquet file into a DataFrame.
fn read_frame(path: &Path) -> Result<DataFrame, StoreError> {
    let file = fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| StoreError::parquet(path, format!("read: {e}")))
}

fn is_integer(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32
    )
}

fn is_numeric(dtype: &DataType) -> bool {
    is_integer(dtype) || matches!(dtype, DataType::Float64 | DataType::Float32)
}

/// A DataFrame paired with its source path, for typed column access.
struct Frame<'a> {
    df: &'a DataFrame,
    path: &'a Path,
}

impl<'a> Frame<'a> {
    fn column(&self, name: &str) -> Result<&'a Column, StoreError> {
        self.df
            .column(name)
            .map_err(|_| StoreError::MissingColumn {
                path: self.path.to_path_buf(),
                column: name.to_string(),
            })
    }

    fn type_error(&self, name: &str, dtype: &DataType) -> StoreError {
        StoreError::ColumnType {
            path: self.path.to_path_buf(),
            column: name.to_string(),
            dtype: dtype.to_string(),
        }
    }

    fn invalid_row(&self, row: usize, reason: impl Into<String>) -> StoreError {
        StoreError::InvalidRow {
            path: self.path.to_path_buf(),
            row,
            reason: reason.into(),
        }
    }

    fn strings(&self, name: &str) -> Result<&'a StringChunked, StoreError> {
        let col = self.column(name)?;
        col.str().map_err(|_| self.type_error(name, col.dtype()))
    }

    fn integers(&self, name: &str) -> Result<Int64Chunked, StoreError> {
        let col = self.column(name)?;
        if !is_integer(col.dtype()) {
            return Err(self.type_error(name, col.dtype()));
        }
        let cast = col
            .cast(&DataType::Int64)
            .map_err(|e| StoreError::parquet(self.path, format!("cast {name}: {e}")))?;
        cast.i64()
            .cloned()
            .map_err(|_| self.type_error(name, cast.dtype()))
    }

    fn floats(&self, name: &str) -> Result<Float64Chunked, StoreError> {
        let col = self.column(name)?;
        if !is_numeric(col.dtype()) {
            return Err(self.type_error(name, col.dtype()));
        }
        let cast = col
            .cast(&DataType::Float64)
            .map_err(|e| StoreError::parquet(self.path, format!("cast {name}: {e}")))?;
        cast.f64()
            .cloned()
            .map_err(|_| self.type_error(name, cast.dtype()))
    }

    fn key<'s>(&self, ca: &'s StringChunked, name: &str, row: usize) -> Result<&'s str, StoreError> {
        ca.get(row)
            .ok_or_else(|| self.invalid_row(row, format!("null '{name}'")))
    }

    fn rate(&self, ca: &Float64Chunked, name: &str, row: usize) -> Result<Option<Rate>, StoreError> {
        Rate::from_stored(ca.get(row)).map_err(|source| StoreError::InvalidRate {
            path: self.path.to_path_buf(),
            row,
            column: name.to_string(),
            source,
        })
    }
}

/// Accumulates one key's rows before the metric set is known to be final.
struct SeriesBuilder {
    minutes: Vec<u32>,
    values: Vec<Vec<Option<f64>>>,
}

impl SeriesBuilder {
    fn new(metric_count: usize) -> Self {
        Self {
            minutes: Vec::new(),
            values: vec![Vec::new(); metric_count],
        }
    }

    /// Drop metric columns that are entirely null for this key.
    fn finish(self, metric_names: &[String], path: &Path) -> Result<TimeSeriesTable, StoreError> {
        let metrics = metric_names
            .iter()
            .zip(self.values)
            .filter(|(_, values)| values.iter().any(Option::is_some))
            .map(|(name, values)| MetricColumn::new(name.clone(), values))
            .collect();
        TimeSeriesTable::new(self.minutes, metrics).map_err(|source| StoreError::Shape {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read an entity or group time series file keyed by `key_column`.
pub(super) fn read_series(
    path: &Path,
    key_column: &str,
) -> Result<Keyed<TimeSeriesTable>, StoreError> {
    let df = read_frame(path)?;
    let frame = Frame { df: &df, path };

    let keys = frame.strings(key_column)?;
    let minutes = frame.integers(MINUTE)?;
    let metric_names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| {
            let name = c.name().as_str();
            name != key_column && name != MINUTE && is_numeric(c.dtype())
        })
        .map(|c| c.name().to_string())
        .collect();
    let metric_values = metric_names
        .iter()
        .map(|name| frame.floats(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builders: Keyed<SeriesBuilder> = Keyed::new();
    for row in 0..df.height() {
        let key = frame.key(keys, key_column, row)?;
        let minute = minutes
            .get(row)
            .ok_or_else(|| frame.invalid_row(row, format!("null '{MINUTE}'")))?;
        let minute = u32::try_from(minute)
            .map_err(|_| frame.invalid_row(row, format!("{MINUTE} {minute} out of range")))?;

        let builder =
            builders.get_or_insert_with(key, || SeriesBuilder::new(metric_names.len()));
        builder.minutes.push(minute);
        for (out, values) in builder.values.iter_mut().zip(&metric_values) {
            out.push(values.get(row).filter(|v| !v.is_nan()));
        }
    }

    let mut tables = Keyed::new();
    for (key, builder) in builders {
        tables.insert(key, builder.finish(&metric_names, path)?);
    }
    tracing::debug!(
        file = %path.display(),
        rows = df.height(),
        keys = tables.len(),
        metrics = metric_names.len(),
        "read time series"
    );
    Ok(tables)
}

/// Read the win/pick file into one rate table per position.
pub(super) fn read_win_pick(path: &Path) -> Result<Keyed<RateTable>, StoreError> {
    let df = read_frame(path)?;
    let frame = Frame { df: &df, path };

    let positions = frame.strings(POSITION)?;
    let entities = frame.strings(ENTITY)?;
    let win = frame.floats(WIN_RATE)?;
    let pick = frame.floats(PICK_RATE)?;

    let mut rows: Keyed<Vec<RateRow>> = Keyed::new();
    for row in 0..df.height() {
        let position = frame.key(positions, POSITION, row)?;
        let entity = frame.key(entities, ENTITY, row)?;
        let win_rate = frame.rate(&win, WIN_RATE, row)?;
        let pick_rate = frame.rate(&pick, PICK_RATE, row)?;

        let bucket = rows.get_or_insert_with(position, Vec::new);
        if bucket.iter().any(|r| r.key == entity) {
            return Err(frame.invalid_row(
                row,
                format!("duplicate {ENTITY} '{entity}' for {POSITION} '{position}'"),
            ));
        }
        bucket.push(RateRow::new(entity, vec![win_rate, pick_rate]));
    }

    let mut tables = Keyed::new();
    for (position, rows) in rows {
        let table = RateTable::new(ENTITY, vec![WIN_RATE.into(), PICK_RATE.into()], rows)
            .map_err(|source| StoreError::Shape {
                path: path.to_path_buf(),
                source,
            })?;
        tables.insert(position, table);
    }
    tracing::debug!(file = %path.display(), rows = df.height(), positions = tables.len(), "read win/pick rates");
    Ok(tables)
}

/// Read the matchup file.
pub(super) fn read_matchups(path: &Path) -> Result<MatchupTable, StoreError> {
    let df = read_frame(path)?;
    let frame = Frame { df: &df, path };

    let entities = frame.strings(ENTITY)?;
    let roles = frame.strings(ROLE)?;
    let counts = frame.integers(OPPONENT_COUNT)?;
    let win = frame.floats(WIN_RATE)?;

    let mut table = MatchupTable::new();
    for row in 0..df.height() {
        let entity = frame.key(entities, ENTITY, row)?;
        let role = frame.key(roles, ROLE, row)?;
        let count = counts
            .get(row)
            .ok_or_else(|| frame.invalid_row(row, format!("null '{OPPONENT_COUNT}'")))?;
        let count = u8::try_from(count)
            .ok()
            .filter(|c| *c >= 1)
            .ok_or_else(|| {
                frame.invalid_row(row, format!("{OPPONENT_COUNT} {count} out of range"))
            })?;
        let win_rate = frame.rate(&win, WIN_RATE, row)?;

        table
            .insert(entity, role, count, win_rate)
            .map_err(|source| StoreError::Shape {
                path: path.to_path_buf(),
                source,
            })?;
    }
    tracing::debug!(file = %path.display(), rows = df.height(), cells = table.cell_count(), "read matchups");
    Ok(table)
}

// ── Writing ─────────────────────────────────────────────────────────

/// Write a DataFrame atomically: `.tmp` first, then rename into place.
fn write_frame(path: &Path, mut df: DataFrame) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
    }
    let tmp_path = path.with_extension("parquet.tmp");
    let file = fs::File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| StoreError::parquet(path, format!("write: {e}")))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::io(path, e)
    })
}

fn frame_error(path: &Path) -> impl Fn(PolarsError) -> StoreError + '_ {
    move |e| StoreError::parquet(path, format!("dataframe creation: {e}"))
}

/// Write time series tables long-form. Metrics a table lacks are written as nulls.
pub(super) fn write_series(
    path: &Path,
    key_column: &str,
    tables: &Keyed<TimeSeriesTable>,
) -> Result<(), StoreError> {
    let mut metric_names: Vec<&str> = Vec::new();
    for table in tables.values() {
        for name in table.metric_names() {
            if !metric_names.contains(&name) {
                metric_names.push(name);
            }
        }
    }

    let mut keys: Vec<&str> = Vec::new();
    let mut minutes: Vec<i64> = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); metric_names.len()];
    for (key, table) in tables.iter() {
        for (row, &minute) in table.minutes().iter().enumerate() {
            keys.push(key);
            minutes.push(i64::from(minute));
            for (name, out) in metric_names.iter().zip(values.iter_mut()) {
                out.push(table.metric(name).and_then(|v| v[row]));
            }
        }
    }

    let mut columns = vec![
        Column::new(key_column.into(), keys),
        Column::new(MINUTE.into(), minutes),
    ];
    for (name, vals) in metric_names.iter().zip(values) {
        columns.push(Column::new((*name).into(), vals));
    }
    let df = DataFrame::new(columns).map_err(frame_error(path))?;
    write_frame(path, df)
}

pub(super) fn write_win_pick(path: &Path, tables: &Keyed<RateTable>) -> Result<(), StoreError> {
    let mut positions: Vec<&str> = Vec::new();
    let mut entities: Vec<&str> = Vec::new();
    let mut win: Vec<Option<f64>> = Vec::new();
    let mut pick: Vec<Option<f64>> = Vec::new();

    for (position, table) in tables.iter() {
        let win_idx = table.column_index(WIN_RATE);
        let pick_idx = table.column_index(PICK_RATE);
        for row in table.rows() {
            positions.push(position);
            entities.push(&row.key);
            win.push(win_idx.and_then(|i| row.rates[i]).map(Rate::value));
            pick.push(pick_idx.and_then(|i| row.rates[i]).map(Rate::value));
        }
    }

    let df = DataFrame::new(vec![
        Column::new(POSITION.into(), positions),
        Column::new(ENTITY.into(), entities),
        Column::new(WIN_RATE.into(), win),
        Column::new(PICK_RATE.into(), pick),
    ])
    .map_err(frame_error(path))?;
    write_frame(path, df)
}

pub(super) fn write_matchups(path: &Path, table: &MatchupTable) -> Result<(), StoreError> {
    let mut entities: Vec<&str> = Vec::new();
    let mut roles: Vec<&str> = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    let mut win: Vec<Option<f64>> = Vec::new();

    for (entity, by_role) in table.iter() {
        for (role, rows) in by_role.iter() {
            for row in rows {
                entities.push(entity);
                roles.push(role);
                counts.push(i64::from(row.opponent_count));
                win.push(row.win_rate.map(Rate::value));
            }
        }
    }

    let df = DataFrame::new(vec![
        Column::new(ENTITY.into(), entities),
        Column::new(ROLE.into(), roles),
        Column::new(OPPONENT_COUNT.into(), counts),
        Column::new(WIN_RATE.into(), win),
    ])
    .map_err(frame_error(path))?;
    write_frame(path, df)
}
