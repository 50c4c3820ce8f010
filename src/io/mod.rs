//! File-facing helpers: override tables, review reports, snapshot naming, config.

pub mod config;
pub mod overrides;
pub mod report;
pub mod snapshot;

pub use overrides::{DirectoryLabels, LabelOverrides};
pub use report::{write_failed_files, write_reduction_reports};
pub use snapshot::{OutputNames, newest_snapshot, output_names};
