#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::cast_possible_wrap
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public APIs carry docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Timestamps are i64 seconds; JSON integral floats are range-checked before casting.
#![allow(clippy::cast_possible_truncation)]
//
// Pattern matching: these pedantic lints often reduce clarity.
#![allow(clippy::manual_let_else)]
#![allow(clippy::match_same_arms)]
//
// Builders and passes take owned values on purpose.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::format_push_string)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::unused_self)]
#![allow(clippy::should_implement_trait)]

//! Merge and normalization engine for browser bookmark exports.
//!
//! Raw per-link records from many export files are folded into one [`AddressTable`]
//! keyed by URL, then a [`ReductionPipeline`] cleans each attribute's value set so the
//! result can be reviewed and persisted.

/// The bookmerge-core crate version (matches `Cargo.toml`).
pub const BOOKMERGE_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod error;
pub mod io;
pub mod reduce;
pub mod run;
pub mod table;
pub mod types;

pub use constants::*;
pub use error::{BookmergeError, Result};
pub use io::{
    DirectoryLabels, LabelOverrides, OutputNames, newest_snapshot, output_names,
    write_failed_files, write_reduction_reports,
};
pub use reduce::{ReductionPipeline, ReductionReport, common_prefix_depth, reduce_filename};
pub use run::{MergeRunOptions, MergeRunSummary, run_merge};
pub use table::{AddressTable, MergeStats, WriteOptions};
pub use types::{
    ADDRESS_SENTINEL, AgeValue, AttributeRecord, CompiledRules, FIELDS, Field, FieldRef,
    MergeConfig, MergeConfigBuilder, MergeRule, RawBatch, RawRecord, RawShape, ReplaceRule,
    SearchField, SearchQuery, SearchRequest, TEXT_FIELDS, TableDiff, TextValues, field_to_list,
};
