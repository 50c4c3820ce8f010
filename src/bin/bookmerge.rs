//! bookmerge
//!
//! Merge extractor output into a URL-keyed bookmark table, reduce it, and write the
//! table plus duplicate reports for review.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bookmerge_core::{
    MergeConfig, MergeRunOptions, WriteOptions, newest_snapshot, run_merge,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookmerge")]
#[command(author, version, about = "Merge and normalize browser bookmark exports")]
struct Cli {
    /// Raw record batch produced by the extractor (JSON)
    input: PathBuf,
    /// Directory for the merged table, reports, and override files
    output_dir: PathBuf,
    /// Existing table to merge into
    #[arg(short = 'j', long = "json")]
    existing: Option<PathBuf>,
    /// Merge into the newest table already in the output directory
    #[arg(long, conflicts_with = "existing")]
    latest: bool,
    /// YAML configuration with reduction rules
    #[arg(short = 'y', long = "config")]
    config: Option<PathBuf>,
    /// Do not timestamp output file names
    #[arg(short = 't', long = "no-timestamp")]
    no_timestamp: bool,
    /// Pretty-print the JSON tables
    #[arg(long)]
    pretty: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if !cli.input.exists() {
        bail!("input {} does not exist", cli.input.display());
    }

    let config = match &cli.config {
        Some(path) => MergeConfig::from_yaml_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MergeConfig::default(),
    };
    let output_dir = config.output_dir(&cli.output_dir);

    let existing = if cli.latest {
        if output_dir.is_dir() {
            newest_snapshot(&output_dir, &config.output_file)
                .context("failed to scan output directory for earlier tables")?
        } else {
            None
        }
    } else {
        cli.existing.clone()
    };
    if let Some(path) = &existing {
        tracing::info!(target = "bookmerge::store", path = %path.display(), "merging into existing table");
    }

    let options = MergeRunOptions {
        input: cli.input.clone(),
        output_dir,
        existing,
        config,
        timestamp: (!cli.no_timestamp).then(chrono::Local::now),
        write: if cli.pretty {
            WriteOptions::pretty(4)
        } else {
            WriteOptions::compact()
        },
    };

    let summary = run_merge(&options).context("merge run failed")?;
    println!(
        "merged {} records into {} addresses ({} failed files, {} malformed records)",
        summary.merge.records_seen,
        summary.addresses,
        summary.failed_files,
        summary.merge.malformed
    );
    println!(
        "{} addresses still have multiple locations, {} multiple labels, {} multiple descriptions",
        summary.reduction.duplicate_locations.len(),
        summary.reduction.duplicate_labels.len(),
        summary.reduction.duplicate_descriptions.len()
    );
    println!("original: {}", summary.original_path.display());
    println!("reduced:  {}", summary.output_path.display());
    Ok(())
}
