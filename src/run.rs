//! End-to-end merge run: raw batch in, reduced table and review reports out.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::constants::{DIRECTORY_LABEL_FILE, LABEL_OVERRIDE_FILE};
use crate::error::Result;
use crate::io::{
    DirectoryLabels, LabelOverrides, output_names, write_failed_files, write_reduction_reports,
};
use crate::reduce::{ReductionPipeline, ReductionReport};
use crate::table::{AddressTable, MergeStats, WriteOptions};
use crate::types::{MergeConfig, RawBatch};

/// Inputs for [`run_merge`].
#[derive(Debug, Clone)]
pub struct MergeRunOptions {
    /// Extractor output (JSON raw batch).
    pub input: PathBuf,
    /// Directory for snapshots, reports, and override files.
    pub output_dir: PathBuf,
    /// Earlier table to merge the batch into.
    pub existing: Option<PathBuf>,
    pub config: MergeConfig,
    /// Stamp appended to snapshot names; `None` writes plain names.
    pub timestamp: Option<DateTime<Local>>,
    pub write: WriteOptions,
}

impl MergeRunOptions {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            existing: None,
            config: MergeConfig::default(),
            timestamp: None,
            write: WriteOptions::compact(),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct MergeRunSummary {
    pub merge: MergeStats,
    pub reduction: ReductionReport,
    pub failed_files: usize,
    /// Table as merged, before reduction.
    pub original_path: PathBuf,
    pub output_path: PathBuf,
    pub addresses: usize,
}

/// Merge one raw batch and reduce the result.
///
/// Override files are read from the output directory when present, so a person can
/// review the duplicate reports of one run and add overrides for the next.
pub fn run_merge(options: &MergeRunOptions) -> Result<MergeRunSummary> {
    let rules = options.config.compile()?;
    let dir = options.output_dir.as_path();
    fs_err::create_dir_all(dir)?;

    let mut table = match &options.existing {
        Some(path) => AddressTable::read_json(path)?,
        None => AddressTable::new(),
    };

    let batch = read_batch(&options.input)?;
    write_failed_files(dir, &batch.failed_files)?;
    if !batch.failed_files.is_empty() {
        tracing::warn!(
            target = "bookmerge::merge",
            failed = batch.failed_files.len(),
            "extractor reported files it could not parse"
        );
    }

    let merge = table.merge_raw_records(batch.records);

    let names = output_names(&options.config.output_file, options.timestamp);
    let original_path = dir.join(&names.original);
    table.write_json(&original_path, options.write)?;

    let pipeline = ReductionPipeline::new(rules)
        .with_label_overrides(LabelOverrides::load_if_exists(dir.join(LABEL_OVERRIDE_FILE))?)
        .with_directory_labels(DirectoryLabels::load_if_exists(dir.join(DIRECTORY_LABEL_FILE))?);
    let reduction = pipeline.run(&mut table);
    write_reduction_reports(dir, &reduction)?;

    let output_path = dir.join(&names.reduced);
    table.write_json(&output_path, options.write)?;

    Ok(MergeRunSummary {
        merge,
        reduction,
        failed_files: batch.failed_files.len(),
        original_path,
        output_path,
        addresses: table.len(),
    })
}

fn read_batch(path: &Path) -> Result<RawBatch> {
    let text = fs_err::read_to_string(path)?;
    let batch = RawBatch::from_json_str(&text)?;
    log::info!("read {} raw records from {}", batch.records.len(), path.display());
    Ok(batch)
}
