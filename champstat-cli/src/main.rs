//! Champstat CLI: browse champion stats, win/pick rates and matchups.
//!
//! Commands:
//! - `options`: selector options, metric names and initial selections
//! - `series`: per-minute metric rows for selected champions and groups
//! - `win-pick`: win/pick rate table for one position
//! - `matchups`: win rate by opponent count, one table per opposing role
//! - `info`: data files, table counts, fingerprint and manifest
//! - `sample`: write a seeded synthetic data store

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use champstat_core::sample::{write_sample, SampleSpec};
use champstat_core::{SeriesSelection, SortMode};
use champstat_dashboard::export::{
    export_json, matchups_csv, matchups_markdown, series_csv, series_markdown, table_csv,
    table_markdown,
};
use champstat_dashboard::{
    Dashboard, DashboardConfig, DashboardInfo, MatchupRequest, MatchupView, SelectorOptions,
    StatRequest, StatView, WinPickRequest, WinPickView,
};

const LOCAL_CONFIG: &str = "champstat.toml";

#[derive(Parser)]
#[command(
    name = "champstat",
    version,
    about = "Champstat CLI: champion statistics, win/pick rates and matchups"
)]
struct Cli {
    /// TOML config file. Defaults to ./champstat.toml, then the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the config).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Debug logging on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// List selector options and the initial selection of each tab.
    Options,
    /// Per-minute metric rows for selected champions and groups.
    Series {
        /// Champion to chart (repeatable).
        #[arg(long = "entity")]
        entities: Vec<String>,

        /// Group average to chart (repeatable).
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Metric column. Defaults to the configured default metric.
        #[arg(long)]
        metric: Option<String>,
    },
    /// Win/pick rate table for one position.
    WinPick {
        /// Position (e.g. MIDDLE). Defaults to the first position.
        #[arg(long)]
        position: Option<String>,

        /// by-count, ascending, or descending (by win rate).
        #[arg(long)]
        sort: Option<SortMode>,

        /// Hide champions picked less often than this (0..=1).
        #[arg(long)]
        min_pick_rate: Option<f64>,
    },
    /// Win rate by opponent count, one table per opposing role.
    Matchups {
        /// Champion. Defaults to the first champion with matchup data.
        #[arg(long)]
        entity: Option<String>,

        /// Only this opposing role.
        #[arg(long)]
        role: Option<String>,

        /// by-count, ascending, or descending (by win rate).
        #[arg(long)]
        sort: Option<SortMode>,
    },
    /// Report data files, table counts, fingerprint and manifest.
    Info,
    /// Write a seeded synthetic data store.
    Sample {
        /// Output directory.
        #[arg(long)]
        out: PathBuf,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Minutes per time series.
        #[arg(long, default_value_t = 30)]
        minutes: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let format = cli.format;

    match cli.command {
        Commands::Sample { out, seed, minutes } => run_sample(&config, out, seed, minutes, format),
        command => {
            let dashboard = Dashboard::open(config).context("failed to open dashboard")?;
            run_view(&dashboard, command, format)
        }
    }
}

fn init_logging(verbose: bool) {
    let directives = |level: &str| {
        format!("champstat={level},champstat_core={level},champstat_dashboard={level}")
    };
    let filter = if verbose {
        EnvFilter::new(directives("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives("info")))
    };

    // stdout carries the command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<DashboardConfig> {
    if let Some(path) = explicit {
        return DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("champstat").join("config.toml"));
    }
    for path in candidates {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "using config file");
            return DashboardConfig::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()));
        }
    }
    Ok(DashboardConfig::default())
}

fn run_view(dashboard: &Dashboard, command: Commands, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Options => print_options(&dashboard.options(), format),
        Commands::Series {
            entities,
            groups,
            metric,
        } => {
            let view = dashboard.stat(&StatRequest {
                selection: SeriesSelection::new(entities, groups),
                metric,
            });
            print_series(&view, format)
        }
        Commands::WinPick {
            position,
            sort,
            min_pick_rate,
        } => {
            let view = dashboard.win_pick(&WinPickRequest {
                position,
                sort,
                min_pick_rate,
            })?;
            print_win_pick(&view, format)
        }
        Commands::Matchups { entity, role, sort } => {
            let view = dashboard.matchups(&MatchupRequest { entity, role, sort })?;
            print_matchups(&view, format)
        }
        Commands::Info => print_info(&dashboard.info(), format),
        Commands::Sample { .. } => bail!("sample does not read a data store"),
    }
}

fn run_sample(
    config: &DashboardConfig,
    out: PathBuf,
    seed: u64,
    minutes: u32,
    format: OutputFormat,
) -> Result<()> {
    if minutes == 0 {
        bail!("--minutes must be at least 1");
    }
    let files = champstat_core::DataFiles::with_names(out, &config.files);
    let spec = SampleSpec {
        seed,
        minutes,
        ..SampleSpec::default()
    };
    let (_, manifest) = write_sample(&files, &spec)
        .with_context(|| format!("failed to write sample store to {}", files.dir.display()))?;

    match format {
        OutputFormat::Json => println!("{}", export_json(&manifest)?),
        _ => {
            println!("Sample data store written to: {}", files.dir.display());
            println!("Seed:        {seed}");
            println!("Champions:   {}", manifest.entities);
            println!("Groups:      {}", manifest.groups);
            println!("Positions:   {}", manifest.positions);
            println!("Matchups:    {} cells", manifest.matchup_cells);
            println!("Fingerprint: {}", manifest.fingerprint);
        }
    }
    Ok(())
}

// ─── Output ─────────────────────────────────────────────────────────

fn unsupported(format: OutputFormat, what: &str) -> Result<()> {
    let name = format!("{format:?}").to_lowercase();
    bail!("--format {name} is not supported for {what}; use text or json")
}

/// Print left-aligned columns sized to their widest cell.
fn print_columns(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };
    line(header.to_vec());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        line(row.iter().map(String::as_str).collect());
    }
}

fn print_options(options: &SelectorOptions, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", export_json(options)?),
        OutputFormat::Text => {
            println!("Champions: {}", options.entities.join(", "));
            println!("Groups:    {}", options.groups.join(", "));
            println!("Metrics:   {}", options.metrics.join(", "));
            println!("Positions: {}", options.positions.join(", "));
            println!("Roles:     {}", options.roles.join(", "));
            let sorts: Vec<String> = options
                .sort_modes
                .iter()
                .map(|o| format!("{} ({})", o.value, o.label))
                .collect();
            println!("Sort:      {}", sorts.join(", "));
            let d = &options.defaults;
            println!();
            println!("Defaults:");
            println!("  champions: {}", d.entities.join(", "));
            println!("  metric:    {}", d.metric.as_deref().unwrap_or("-"));
            println!("  position:  {}", d.position.as_deref().unwrap_or("-"));
            println!("  matchups:  {}", d.matchup_entity.as_deref().unwrap_or("-"));
            println!("  sort:      {}", d.sort);
        }
        other => return unsupported(other, "options"),
    }
    Ok(())
}

fn print_series(view: &StatView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", export_json(view)?),
        OutputFormat::Csv => print!("{}", series_csv(&view.series)?),
        OutputFormat::Markdown => print!("{}", series_markdown(&view.series)),
        OutputFormat::Text => {
            if view.fell_back() {
                println!(
                    "Metric '{}' not available for this selection; showing '{}'.",
                    view.requested_metric, view.series.metric
                );
            }
            if let Some(message) = view.message {
                println!("{message}");
                return Ok(());
            }
            println!("Metric: {}", view.series.metric);
            println!("Available: {}", view.series.available_metrics.join(", "));
            println!();
            let rows: Vec<Vec<String>> = view
                .series
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.minute.to_string(),
                        r.value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into()),
                        r.series.clone(),
                    ]
                })
                .collect();
            print_columns(&["Minute", "Value", "Series"], &rows);
        }
    }
    Ok(())
}

fn print_win_pick(view: &WinPickView, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", export_json(view)?);
        return Ok(());
    }
    let Some(table) = &view.table else {
        if let Some(message) = &view.message {
            println!("{message}");
        }
        return Ok(());
    };
    match format {
        OutputFormat::Csv => print!("{}", table_csv(table)?),
        OutputFormat::Markdown => print!("{}", table_markdown(table)),
        _ => {
            println!(
                "Position: {}  (sort: {}, min pick rate: {:.2}%)",
                view.position.as_deref().unwrap_or("-"),
                view.sort,
                view.min_pick_rate * 100.0
            );
            println!();
            let header: Vec<&str> = std::iter::once(table.key_label.as_str())
                .chain(table.columns.iter().map(String::as_str))
                .collect();
            let rows: Vec<Vec<String>> = table
                .rows
                .iter()
                .map(|r| {
                    std::iter::once(r.key.clone())
                        .chain(r.cells.iter().map(|c| c.to_string()))
                        .collect()
                })
                .collect();
            print_columns(&header, &rows);
            if view.hidden > 0 {
                println!();
                println!("{} champion(s) below the minimum pick rate hidden.", view.hidden);
            }
        }
    }
    Ok(())
}

fn print_matchups(view: &MatchupView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", export_json(view)?),
        OutputFormat::Csv => print!("{}", matchups_csv(view)?),
        OutputFormat::Markdown => print!("{}", matchups_markdown(view)),
        OutputFormat::Text => {
            if let Some(entity) = &view.entity {
                println!("Champion: {entity}  (sort: {})", view.sort);
            }
            if let Some(message) = &view.message {
                println!("{message}");
            }
            for table in &view.tables {
                println!();
                let header: Vec<&str> = std::iter::once("Role")
                    .chain(table.headers.iter().map(String::as_str))
                    .collect();
                let row: Vec<String> = std::iter::once(table.role.clone())
                    .chain(table.cells.iter().map(|c| c.to_string()))
                    .collect();
                print_columns(&header, &[row]);
            }
        }
    }
    Ok(())
}

fn print_info(info: &DashboardInfo, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", export_json(info)?),
        OutputFormat::Text => {
            println!("Data dir: {}", info.data_dir.display());
            for (label, path) in &info.files {
                println!("  {label:<15} {}", path.display());
            }
            println!();
            let s = &info.summary;
            println!("Champions:      {}", s.entities);
            println!("Groups:         {}", s.groups);
            println!("Positions:      {}", s.positions);
            println!("Matchups:       {} champions, {} cells", s.matchup_entities, s.matchup_cells);
            println!("Series rows:    {}", s.series_rows);
            println!("Fingerprint:    {}", info.fingerprint);
            match &info.manifest {
                Some(m) => {
                    println!(
                        "Manifest:       {} at {}{}",
                        m.generator,
                        m.generated_at.format("%Y-%m-%d %H:%M:%S"),
                        m.seed.map(|s| format!(" (seed {s})")).unwrap_or_default()
                    );
                    if info.manifest_stale {
                        println!("                fingerprint differs from loaded data");
                    }
                }
                None => println!("Manifest:       (none)"),
            }
        }
        other => return unsupported(other, "info"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_selection_flags() {
        let cli = Cli::try_parse_from([
            "champstat", "series", "--entity", "Jinx", "--entity", "Ezreal", "--group",
            "Marksman", "--metric", "gold_earned",
        ])
        .unwrap();
        match cli.command {
            Commands::Series {
                entities,
                groups,
                metric,
            } => {
                assert_eq!(entities, vec!["Jinx", "Ezreal"]);
                assert_eq!(groups, vec!["Marksman"]);
                assert_eq!(metric.as_deref(), Some("gold_earned"));
            }
            _ => panic!("expected series"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "champstat", "win-pick", "--sort", "desc", "--format", "csv", "--data-dir", "/tmp/d",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/d")));
        match cli.command {
            Commands::WinPick { sort, .. } => assert_eq!(sort, Some(SortMode::Descending)),
            _ => panic!("expected win-pick"),
        }
    }

    #[test]
    fn rejects_unknown_sort_mode() {
        assert!(Cli::try_parse_from(["champstat", "matchups", "--sort", "sideways"]).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/champstat.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/champstat.toml"));
    }
}
