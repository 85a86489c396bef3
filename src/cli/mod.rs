//! EduAutoFE CLI Module
//!
//! Command-line interface for running a feature search on a data file or on
//! a generated sample dataset.

mod samples;

pub use samples::{classification_dataset, regression_dataset};

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::AutoFeError;
use crate::search::{FeatureSearch, SearchConfig, SearchReport};

// ─── Styling helpers ───────────────────────────────────────────────────────────

pub(crate) fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
pub(crate) fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
pub(crate) fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
pub(crate) fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "eduautofe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Educational automated feature engineering")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for transformed features that improve a linear baseline
    Search {
        /// Input data file (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Number of improving features to report
        #[arg(long, default_value = "5")]
        max_results: usize,

        /// Time budget in minutes (exhaustive when omitted)
        #[arg(long)]
        max_minutes: Option<f64>,

        /// Seed for the candidate order
        #[arg(long)]
        seed: Option<u64>,

        /// Write the result table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a search on a generated sample dataset
    Demo {
        /// Which kind of sample data to generate
        #[arg(long, value_enum, default_value = "regression")]
        task: DemoTask,

        /// Seed for the sample data and the candidate order
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoTask {
    Regression,
    Classification,
}

// ─── Data loading ──────────────────────────────────────────────────────────────

pub fn load_data(path: &Path) -> anyhow::Result<DataFrame> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let df = match ext {
        "csv" => CsvReadOptions::default()
            .with_infer_schema_length(Some(1000))
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()?,
        _ => anyhow::bail!("Unsupported file format: {}", ext),
    };

    Ok(df)
}

/// Separate the target column from the features
pub fn split_target(df: &DataFrame, target: &str) -> anyhow::Result<(DataFrame, Series)> {
    let y = df
        .column(target)
        .map_err(|_| anyhow::anyhow!("Target column '{}' not found", target))?
        .as_materialized_series()
        .clone();
    let x = df.drop(target)?;
    Ok((x, y))
}

/// Write the result table as CSV
pub fn write_results(report: &SearchReport, path: &Path) -> anyhow::Result<()> {
    let mut df = report.to_dataframe()?;
    let mut file = std::fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_search(
    data_path: &Path,
    target: &str,
    max_results: usize,
    max_minutes: Option<f64>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Search");

    step_run("Loading data");
    let start = Instant::now();
    let df = load_data(data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    let (x, y) = split_target(&df, target)?;

    let mut config = SearchConfig::new().with_max_results(max_results);
    if let Some(minutes) = max_minutes {
        config = config.with_max_minutes(minutes);
    }
    if let Some(seed) = seed {
        config = config.with_random_state(seed);
    }

    let report = run_search(config, &x, &y)?;

    if let Some(path) = output {
        step_run(&format!("Writing {}", path.display()));
        write_results(&report, path)?;
        step_done("");
    }

    Ok(())
}

pub fn cmd_demo(task: DemoTask, seed: Option<u64>) -> anyhow::Result<()> {
    let (title, df, config) = match task {
        DemoTask::Regression => (
            "Demo · regression",
            regression_dataset(300, seed)?,
            SearchConfig::new().with_max_results(5).with_max_minutes(1.0),
        ),
        DemoTask::Classification => (
            "Demo · classification",
            classification_dataset(300, seed)?,
            SearchConfig::new().with_max_results(3),
        ),
    };
    let config = match seed {
        Some(seed) => config.with_random_state(seed),
        None => config,
    };

    section(title);
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width() - 1);

    let (x, y) = split_target(&df, "target")?;
    run_search(config, &x, &y)?;
    Ok(())
}

fn run_search(config: SearchConfig, x: &DataFrame, y: &Series) -> anyhow::Result<SearchReport> {
    let start = Instant::now();
    let mut search = FeatureSearch::new(config)?;

    let report = match search.fit(x, y) {
        Ok(report) => report,
        Err(AutoFeError::Validation(e)) => {
            println!();
            println!("{}", e.to_string().yellow());
            anyhow::bail!("input data failed validation ({:?})", e.kind());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("  {:<16} {}", muted("Task"), report.task_type.to_string().white());
    println!(
        "  {:<16} {} of {}",
        muted("Tested"),
        report.candidates_tested.to_string().white().bold(),
        report.candidates_generated
    );
    if !report.skipped.is_empty() {
        println!("  {:<16} {}", muted("Skipped"), report.skipped.len().to_string().yellow());
    }
    if report.time_limit_reached {
        println!("  {:<16} {}", muted("Time limit"), "reached".yellow());
    }
    if report.results.is_empty() {
        println!("  {:<16} {}", muted("Result"), "no improvement over baseline".yellow());
    }
    println!("  {:<16} {}", muted("Time"), format!("{:.3}s", start.elapsed().as_secs_f64()).white());
    println!();

    Ok(report)
}
