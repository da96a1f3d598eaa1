//! Prism - merge handler data selections and project Substrate records.
//!
//! # Usage
//!
//! ```bash
//! # Print the merged catalog for a set of item files
//! prism --items items/balances.json --items items/evm.json
//!
//! # Project decoded records (JSON array) with the merged catalog
//! PRISM_ITEMS=items/balances.json prism --records block.json
//! ```

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use prism_core::ItemCatalog;
use prism_core::models::ItemRecord;
use prism_handlers::{BalancesBundle, BundleRegistry, FileBundle};

/// Prism CLI - Substrate data-selection inspector.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(about = "Prism - merge handler data selections and project Substrate records")]
#[command(version)]
struct Cli {
    /// Item spec files (JSON arrays of `{kind, name, request}`).
    #[arg(long = "items", env = "PRISM_ITEMS", value_delimiter = ',')]
    items: Vec<PathBuf>,

    /// Decoded records to project (JSON array of tagged records).
    #[arg(long, env = "PRISM_RECORDS")]
    records: Option<PathBuf>,

    /// Also register the built-in Balances bundle.
    #[arg(long)]
    balances: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);
    prism_core::metrics::init_metrics();

    // ─────────────────────────────────────────────────────────────────────────
    // 📦 HANDLER BUNDLES
    // ─────────────────────────────────────────────────────────────────────────
    let mut registry = BundleRegistry::new();
    if cli.balances {
        registry.register(Box::new(BalancesBundle::new()));
    }
    for path in &cli.items {
        let bundle = FileBundle::load(path)
            .with_context(|| format!("Failed to load item file {}", path.display()))?;
        registry.register(Box::new(bundle));
    }
    if registry.is_empty() {
        warn!("⚠️  No bundles registered, every record will carry identifying fields only");
    }

    let catalog = registry
        .into_catalog()
        .context("Failed to build item catalog")?;
    info!(items = catalog.len(), "✅ Catalog ready");

    // ─────────────────────────────────────────────────────────────────────────
    // 🔍 OUTPUT
    // ─────────────────────────────────────────────────────────────────────────
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &cli.records {
        None => {
            write_json(&mut out, &catalog.to_specs(), cli.pretty)?;
        }
        Some(path) => {
            let count = project_records(&catalog, path, &mut out, cli.pretty)?;
            info!(records = count, "🔍 Records projected");
        }
    }

    out.flush()?;
    Ok(())
}

/// Project every record of `path`, one JSON document per line.
fn project_records(
    catalog: &ItemCatalog,
    path: &Path,
    out: &mut impl Write,
    pretty: bool,
) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    let records: Vec<ItemRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file {}", path.display()))?;

    for record in &records {
        if !catalog.contains(record.kind(), record.name()) {
            debug!(kind = %record.kind(), name = record.name(), "No handler interest, identifying fields only");
        }
        write_json(out, &catalog.project(record), pretty)?;
    }

    Ok(records.len())
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Initialize tracing subscriber.
///
/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}
