use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

mod assemble;
mod config;
mod constants;
mod error;
mod extractors;
mod header;
mod logging;
mod mapper;
mod month;
mod parsing;
mod profile;
mod reader;
mod schema;
mod types;

use crate::config::Settings;
use crate::error::{IngestError, Result};
use crate::extractors::ExtractorRegistry;
use crate::schema::CanonicalRecord;

#[derive(Parser)]
#[command(name = "tj_payroll")]
#[command(about = "Unified ingestion of Brazilian court payroll exports")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the settings file
    #[arg(long, default_value = config::DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw monthly files into canonical records
    Ingest {
        /// Specific sources to run (comma-separated). Available: TJRS, TJPI, TJTO
        #[arg(long)]
        tjs: Option<String>,
        /// Single month to process ("YYYY-MM"); defaults to the configured window
        #[arg(long)]
        month: Option<String>,
        /// Override the configured raw data root
        #[arg(long)]
        raw_root: Option<PathBuf>,
        /// Override the configured processed output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report which column names appear in the raw files, per source and month
    Profile {
        /// Override the configured raw data root
        #[arg(long)]
        raw_root: Option<PathBuf>,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List registered sources
    Sources,
}

/// Inclusive "YYYY-MM" range. An unparseable bound yields just the start.
fn month_range(start: &str, end: &str) -> Vec<String> {
    let parse = |ym: &str| NaiveDate::parse_from_str(&format!("{ym}-01"), "%Y-%m-%d").ok();
    let (Some(mut cursor), Some(last)) = (parse(start), parse(end)) else {
        return vec![start.to_string()];
    };

    let mut months = Vec::new();
    while cursor <= last {
        months.push(cursor.format("%Y-%m").to_string());
        cursor = match cursor.checked_add_months(chrono::Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    months
}

fn persist_records(records: &[CanonicalRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}

fn run_ingest(
    settings: &Settings,
    tjs: Option<String>,
    month: Option<String>,
    raw_root: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let registry = ExtractorRegistry::new();

    let tj_codes: Vec<String> = match tjs {
        Some(list) => list.split(',').map(|s| s.trim().to_uppercase()).collect(),
        None => registry.list_sources().iter().map(|s| s.to_string()).collect(),
    };
    let months = match month {
        Some(ym) => vec![ym],
        None => month_range(&settings.start, &settings.end),
    };
    let raw_root = raw_root.unwrap_or_else(|| PathBuf::from(&settings.raw_dir));
    let processed_dir = output.unwrap_or_else(|| PathBuf::from(&settings.processed_dir));

    let mut unified: Vec<CanonicalRecord> = Vec::new();
    for tj_code in &tj_codes {
        let span = tracing::info_span!("ingesting source", tj = %tj_code);
        let _enter = span.enter();

        for ym in &months {
            match registry.fetch_month(tj_code, ym, &raw_root) {
                Ok(records) => {
                    if records.is_empty() {
                        continue;
                    }
                    let out_path = processed_dir.join(format!("{tj_code}_{ym}.json"));
                    persist_records(&records, &out_path)?;
                    info!(month = %ym, rows = records.len(), file = %out_path.display(), "month persisted");
                    println!("📊 {tj_code} {ym}: {} rows -> {}", records.len(), out_path.display());
                    unified.extend(records);
                }
                Err(IngestError::UnknownSource(code)) => {
                    warn!(source = %code, "unknown source requested");
                    println!("⚠️  Unknown source: {code}");
                    break;
                }
                Err(e) => {
                    error!(month = %ym, error = %e, "month failed");
                    println!("⚠️  {tj_code} {ym} failed: {e}");
                }
            }
        }
    }

    let unified_path = PathBuf::from(&settings.unified_output);
    persist_records(&unified, &unified_path)?;
    info!(rows = unified.len(), file = %unified_path.display(), "unified output written");
    println!("✅ Unified output: {} rows -> {}", unified.len(), unified_path.display());
    Ok(())
}

fn run_profile(settings: &Settings, raw_root: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let raw_root = raw_root.unwrap_or_else(|| PathBuf::from(&settings.raw_dir));
    let report = profile::profile_columns(&raw_root);
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, json)?;
            println!("✅ Column profile -> {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    match cli.command {
        Commands::Ingest {
            tjs,
            month,
            raw_root,
            output,
        } => {
            println!("🔄 Running payroll ingestion...");
            run_ingest(&settings, tjs, month, raw_root, output)
        }
        Commands::Profile { raw_root, output } => {
            println!("🔎 Profiling raw columns...");
            run_profile(&settings, raw_root, output)
        }
        Commands::Sources => {
            let registry = ExtractorRegistry::new();
            println!("Registered sources:");
            for source in registry.list_sources() {
                println!("  - {source}");
            }
            Ok(())
        }
    }
}
