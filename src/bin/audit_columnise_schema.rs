//! audit-columnise-schema: Print the columns an audit-log CSV would flatten into
//!
//! Runs the discovery pass only; nothing is written besides the JSON report.
//!
//! Usage:
//!   audit-columnise-schema audit.csv
//!   cat audit.csv | audit-columnise-schema --compact

use anyhow::Result;
use audit_columnise::{discover_records, sanitize_path, ColumnConfig, RecordReader};
use clap::Parser;
use std::io::{self, stdin};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "audit-columnise-schema")]
#[command(about = "Discover the flattened column schema of an audit-log CSV", long_about = None)]
struct Args {
    /// Input CSV file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = ColumnConfig::default();

    let discovery = if let Some(path) = &args.input {
        discover_records(RecordReader::open(sanitize_path(path))?, &config)?
    } else {
        discover_records(RecordReader::from_reader(stdin().lock())?, &config)?
    };

    if discovery.rows_scanned == 0 {
        eprintln!("Warning: No data rows found in input");
    }

    let output = if args.compact {
        serde_json::to_string(&discovery)?
    } else {
        serde_json::to_string_pretty(&discovery)?
    };

    println!("{}", output);

    Ok(())
}
