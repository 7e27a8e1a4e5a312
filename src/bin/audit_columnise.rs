//! audit-columnise: Flatten the AuditData payload of an audit-log CSV export
//!
//! Usage:
//!   # Prompt for the input path, write <name>_processed.csv beside it
//!   audit-columnise
//!
//!   # Pass the path directly (surrounding quotes are fine)
//!   audit-columnise "exports/AuditLog_2024-01-01.csv"
//!
//!   # Explicit output, different local offset, keep the first data row
//!   audit-columnise audit.csv -o flat.csv --offset-hours -5 --keep-first-row

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use audit_columnise::{columnise_file, derive_output_path, sanitize_path, ColumnConfig};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "audit-columnise")]
#[command(about = "Flatten audit-log payloads into CSV columns", long_about = None)]
struct Args {
    /// Input CSV file (prompted for if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output CSV file (default: input name with the suffix, as .csv)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Hours added to the UTC creation timestamp (default: 10)
    #[arg(long, allow_hyphen_values = true)]
    offset_hours: Option<i64>,

    /// Suffix for the derived output file name (default: "_processed")
    #[arg(long)]
    suffix: Option<String>,

    /// Also write the first data row (it is dropped by default)
    #[arg(long)]
    keep_first_row: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = ColumnConfig::default();
    if let Some(hours) = args.offset_hours {
        config.utc_offset_hours = hours;
    }
    if let Some(suffix) = args.suffix {
        config.output_suffix = suffix;
    }
    if args.keep_first_row {
        config.skip_first_data_row = false;
    }

    let raw_input = match args.input {
        Some(path) => path,
        None => prompt_for_input()?,
    };
    let input = PathBuf::from(sanitize_path(&raw_input));
    if input.as_os_str().is_empty() {
        bail!("No input file given");
    }
    let output = args
        .output
        .unwrap_or_else(|| derive_output_path(&input, &config.output_suffix));

    let summary = columnise_file(&input, &output, &config)?;

    if summary.timestamp_failures > 0 {
        eprintln!(
            "⚠ Warning: {} rows had an unreadable {} and were left without {}/{}",
            summary.timestamp_failures,
            config.creation_column,
            config.date_column,
            config.time_column
        );
    }
    println!(
        "Wrote {} rows with {} columns to {}",
        summary.rows_written,
        summary.columns.len(),
        output.display()
    );

    Ok(())
}

fn prompt_for_input() -> Result<String> {
    print!("Enter the path to the input CSV file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read input path")?;
    Ok(line)
}
