//! Plain-text review reports written next to the merged table.
//!
//! Each multi-value report line is `key, value1:::value2`. The reports are meant to be
//! read by a person, who then edits the override files for the next run.

use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{
    DUPLICATE_DESCRIPTIONS_REPORT, DUPLICATE_LABELS_REPORT, DUPLICATE_LOCATION_SETS_REPORT,
    DUPLICATE_LOCATIONS_FLAT_REPORT, DUPLICATE_LOCATIONS_REPORT, FAILED_FILES_REPORT,
    VALUE_SEPARATOR,
};
use crate::error::Result;
use crate::reduce::ReductionReport;

/// Render `key, value1:::value2` lines.
#[must_use]
pub fn format_key_values(entries: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::new();
    for (key, values) in entries {
        out.push_str(&format!("{key}, {}\n", values.join(VALUE_SEPARATOR)));
    }
    out
}

fn format_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

pub fn write_key_values(path: impl AsRef<Path>, entries: &BTreeMap<String, Vec<String>>) -> Result<()> {
    fs_err::write(path.as_ref(), format_key_values(entries))?;
    Ok(())
}

pub fn write_lines<I, S>(path: impl AsRef<Path>, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fs_err::write(path.as_ref(), format_lines(lines))?;
    Ok(())
}

/// One line per input file that the extractor could not parse.
pub fn write_failed_files(output_dir: impl AsRef<Path>, failed: &[String]) -> Result<()> {
    write_lines(output_dir.as_ref().join(FAILED_FILES_REPORT), failed)
}

/// Write the location, label, and description reports for a pipeline run.
pub fn write_reduction_reports(output_dir: impl AsRef<Path>, report: &ReductionReport) -> Result<()> {
    let dir = output_dir.as_ref();
    write_key_values(dir.join(DUPLICATE_LOCATIONS_REPORT), &report.duplicate_locations)?;
    write_lines(
        dir.join(DUPLICATE_LOCATIONS_FLAT_REPORT),
        report.duplicate_location_values(),
    )?;
    write_lines(
        dir.join(DUPLICATE_LOCATION_SETS_REPORT),
        report
            .duplicate_location_sets()
            .iter()
            .map(|group| group.join(VALUE_SEPARATOR)),
    )?;
    write_key_values(dir.join(DUPLICATE_LABELS_REPORT), &report.duplicate_labels)?;
    write_key_values(
        dir.join(DUPLICATE_DESCRIPTIONS_REPORT),
        &report.duplicate_descriptions,
    )?;
    tracing::info!(
        target = "bookmerge::store",
        dir = %dir.display(),
        locations = report.duplicate_locations.len(),
        labels = report.duplicate_labels.len(),
        descriptions = report.duplicate_descriptions.len(),
        "wrote duplicate reports"
    );
    Ok(())
}
