//! Export: JSON, CSV, and Markdown renderings of the dashboard views.
//!
//! - **JSON**: any view, pretty-printed via serde
//! - **CSV**: chart rows and formatted tables for spreadsheets
//! - **Markdown**: tables for reports and pasting into issues

use anyhow::{Context, Result};
use serde::Serialize;

use champstat_core::{AggregatedSeries, FormattedTable};

use crate::matchup_view::MatchupView;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json<T: Serialize>(view: &T) -> Result<String> {
    serde_json::to_string_pretty(view).context("failed to serialize view to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Chart rows as `minute,value,series`. Absent values are empty fields.
pub fn series_csv(series: &AggregatedSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["minute", series.metric.as_str(), "series"])?;
    for row in &series.rows {
        let value = row.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([row.minute.to_string().as_str(), value.as_str(), row.series.as_str()])?;
    }
    finish_csv(wtr)
}

pub fn table_csv(table: &FormattedTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let header: Vec<&str> = std::iter::once(table.key_label.as_str())
        .chain(table.columns.iter().map(String::as_str))
        .collect();
    wtr.write_record(&header)?;
    for row in &table.rows {
        let record: Vec<&str> = std::iter::once(row.key.as_str())
            .chain(row.cells.iter().map(|c| c.as_str()))
            .collect();
        wtr.write_record(&record)?;
    }
    finish_csv(wtr)
}

/// Matchup tables long-form: `role,opponents,win_rate`.
pub fn matchups_csv(view: &MatchupView) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["role", "opponents", "win_rate"])?;
    for table in &view.tables {
        for (header, cell) in table.headers.iter().zip(&table.cells) {
            wtr.write_record([table.role.as_str(), header.as_str(), cell.as_str()])?;
        }
    }
    finish_csv(wtr)
}

// ─── Markdown ───────────────────────────────────────────────────────

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

fn markdown_table<'a>(header: impl Iterator<Item = &'a str>, rows: &[Vec<&str>]) -> String {
    let header: Vec<String> = header.map(escape).collect();
    let mut md = String::with_capacity(64 * (rows.len() + 2));
    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!("|{}\n", " --- |".repeat(header.len())));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape(c)).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    md
}

pub fn table_markdown(table: &FormattedTable) -> String {
    let rows: Vec<Vec<&str>> = table
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.key.as_str())
                .chain(row.cells.iter().map(|c| c.as_str()))
                .collect()
        })
        .collect();
    let header = std::iter::once(table.key_label.as_str()).chain(table.columns.iter().map(String::as_str));
    markdown_table(header, &rows)
}

/// One section per role, header row = opponent counts.
pub fn matchups_markdown(view: &MatchupView) -> String {
    let mut md = String::new();
    if let Some(entity) = &view.entity {
        md.push_str(&format!("# {entity} matchups\n\n"));
    }
    if let Some(message) = &view.message {
        md.push_str(&format!("_{message}_\n\n"));
    }
    for table in &view.tables {
        md.push_str(&format!("## vs {}\n\n", table.role));
        let row: Vec<&str> = std::iter::once(table.role.as_str())
            .chain(table.cells.iter().map(|c| c.as_str()))
            .collect();
        let header = std::iter::once("Role").chain(table.headers.iter().map(String::as_str));
        md.push_str(&markdown_table(header, &[row]));
        md.push('\n');
    }
    md
}

/// Chart rows pivoted: one line per minute, one column per series.
pub fn series_markdown(series: &AggregatedSeries) -> String {
    let labels = series.labels();
    let mut minutes: Vec<u32> = Vec::new();
    for row in &series.rows {
        if !minutes.contains(&row.minute) {
            minutes.push(row.minute);
        }
    }
    let grid: Vec<Vec<String>> = minutes
        .iter()
        .map(|&minute| {
            std::iter::once(minute.to_string())
                .chain(labels.iter().map(|label| {
                    series
                        .rows
                        .iter()
                        .find(|r| r.minute == minute && r.series == *label)
                        .and_then(|r| r.value)
                        .map(|v| format!("{v:.1}"))
                        .unwrap_or_default()
                }))
                .collect()
        })
        .collect();
    let rows: Vec<Vec<&str>> = grid
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    let mut md = format!("# {}\n\n", series.metric);
    md.push_str(&markdown_table(std::iter::once("Minute").chain(labels), &rows));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use champstat_core::{format_rate, Cell, FormattedRow, SeriesRow};

    use crate::matchup_view::RoleTable;
    use champstat_core::SortMode;

    fn table() -> FormattedTable {
        FormattedTable {
            key_label: "Champion".into(),
            columns: vec!["Win rate".into(), "Pick rate".into()],
            rows: vec![
                FormattedRow {
                    key: "Ahri".into(),
                    cells: vec![Cell::Percent("51.00%".into()), Cell::Percent("9.00%".into())],
                },
                FormattedRow {
                    key: "Lux".into(),
                    cells: vec![format_rate(None, "no data available"), Cell::Percent("5.00%".into())],
                },
            ],
        }
    }

    fn series() -> AggregatedSeries {
        let row = |minute, value, series: &str| SeriesRow {
            minute,
            value,
            series: series.into(),
        };
        AggregatedSeries {
            metric: "gold_earned".into(),
            rows: vec![
                row(1, Some(400.0), "Ahri"),
                row(2, None, "Ahri"),
                row(1, Some(380.5), "Mage (Avg)"),
            ],
            available_metrics: vec!["gold_earned".into()],
            suggested_metric: None,
        }
    }

    #[test]
    fn table_csv_has_header_and_marker() {
        let csv = table_csv(&table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Champion,Win rate,Pick rate");
        assert_eq!(lines[1], "Ahri,51.00%,9.00%");
        assert_eq!(lines[2], "Lux,no data available,5.00%");
    }

    #[test]
    fn series_csv_leaves_absent_values_empty() {
        let csv = series_csv(&series()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "minute,gold_earned,series");
        assert_eq!(lines[1], "1,400,Ahri");
        assert_eq!(lines[2], "2,,Ahri");
        assert_eq!(lines[3], "1,380.5,Mage (Avg)");
    }

    #[test]
    fn table_markdown_renders_pipes() {
        let md = table_markdown(&table());
        assert!(md.starts_with("| Champion | Win rate | Pick rate |\n| --- | --- | --- |\n"));
        assert!(md.contains("| Lux | no data available | 5.00% |"));
    }

    #[test]
    fn series_markdown_pivots_by_minute() {
        let md = series_markdown(&series());
        assert!(md.contains("| Minute | Ahri | Mage (Avg) |"));
        assert!(md.contains("| 1 | 400.0 | 380.5 |"));
        assert!(md.contains("| 2 |  |  |"));
    }

    #[test]
    fn matchups_render_per_role() {
        let view = MatchupView {
            entity: Some("Ahri".into()),
            sort: SortMode::ByCount,
            tables: vec![RoleTable {
                role: "Tank".into(),
                headers: vec!["1 opp".into(), "2 opp".into()],
                cells: vec![Cell::Percent("52.00%".into()), Cell::NoData("-".into())],
            }],
            message: None,
        };
        let csv = matchups_csv(&view).unwrap();
        assert_eq!(csv.lines().nth(2), Some("Tank,2 opp,-"));

        let md = matchups_markdown(&view);
        assert!(md.contains("## vs Tank"));
        assert!(md.contains("| Role | 1 opp | 2 opp |"));
        assert!(md.contains("| Tank | 52.00% | - |"));
    }

    #[test]
    fn json_export_uses_display_strings() {
        let json = export_json(&table()).unwrap();
        assert!(json.contains("\"51.00%\""));
        assert!(json.contains("\"no data available\""));
    }
}
