//! ContestLab CLI — collect and aggregate daily contest results.
//!
//! Methods:
//! - `download` — fetch one results CSV per business day into the data directory
//! - `aggregate` — consolidate the daily files into one CSV, compute winnings,
//!   and optionally write the dashboard snapshot

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use contestlab_core::dashboard::{snapshot, write_snapshot};
use contestlab_core::data::{
    business_days, download_days, DailyStore, HttpResultsSource, LogProgress,
};
use contestlab_core::{aggregate, build_view, load_aggregate, ContestConfig, QuantRanking};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "contestlab",
    about = "ContestLab CLI — daily contest results collector and aggregator"
)]
struct Cli {
    /// What to run.
    #[arg(value_enum)]
    method: Method,

    /// Path to a TOML config file. Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Fetch missing daily results files.
    Download,
    /// Consolidate daily files and compute winnings.
    Aggregate,
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    match cli.method {
        Method::Download => run_download(&config),
        Method::Aggregate => run_aggregate(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ContestConfig> {
    match path {
        Some(path) => ContestConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ContestConfig::default()),
    }
}

fn run_download(config: &ContestConfig) -> Result<()> {
    let source = HttpResultsSource::new(config)?;
    let store = DailyStore::new(&config.data_dir);
    let dates = business_days(config.start_date, config.end_date);

    info!(
        start = %config.start_date,
        end = %config.end_date,
        days = dates.len(),
        dir = %config.data_dir.display(),
        "starting download"
    );

    let summary = download_days(
        &source,
        &store,
        &dates,
        config.failure_threshold,
        &LogProgress,
    );

    println!(
        "Download: {} day(s), {} already present, {} downloaded, {} failed",
        summary.total,
        summary.skipped,
        summary.downloaded,
        summary.failures.len()
    );

    if summary.aborted() {
        for (date, err) in &summary.failures {
            eprintln!("Error for {date}: {err}");
        }
    }
    summary.into_result()?;
    Ok(())
}

fn run_aggregate(config: &ContestConfig) -> Result<()> {
    let summary = aggregate(&config.data_dir, &config.aggregate_path)?;
    println!(
        "Aggregated {} file(s), {} row(s) into {}",
        summary.files,
        summary.rows,
        summary.output.display()
    );

    let table = load_aggregate(&config.aggregate_path)?;
    let view = build_view(&table).context("failed to compute winnings")?;
    print_ranking(&view.ranking, config.dashboard.top_n);

    if let Some(output) = &config.dashboard.output {
        if view.table.column_index(&config.dashboard.column).is_none() {
            bail!(
                "dashboard column '{}' is not in the aggregate",
                config.dashboard.column
            );
        }
        let snap = snapshot(&view, &config.dashboard.column, config.dashboard.top_n);
        write_snapshot(&snap, output)?;
        println!("Dashboard snapshot written to: {}", output.display());
    }

    Ok(())
}

fn print_ranking(ranking: &QuantRanking, top_n: usize) {
    println!();
    println!("=== Top {} of {} quants ===", top_n.min(ranking.len()), ranking.len());
    println!("{:<4} {:<30} {:>10}", "#", "Quant", "Winnings");
    println!("{}", "-".repeat(46));
    for (i, entry) in ranking.entries().iter().take(top_n).enumerate() {
        println!("{:<4} {:<30} {:>10}", i + 1, entry.name, entry.total);
    }
}

/// Log to stderr; stdout carries the run summaries.
fn init_tracing() -> Result<()> {
    use std::io::IsTerminal;
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("contestlab=info,contestlab_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
