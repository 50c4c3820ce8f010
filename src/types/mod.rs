//! Public types exposed by the `bookmerge-core` crate.

pub mod age;
pub mod field;
pub mod options;
pub mod raw;
pub mod record;
pub mod search;

pub use age::AgeValue;
pub use field::{FIELDS, Field, TEXT_FIELDS};
pub use options::{
    CompiledRules, MergeConfig, MergeConfigBuilder, ReplaceRule, TextValues,
};
pub use raw::{RawBatch, RawRecord, RawShape, field_to_list};
pub use record::{AttributeRecord, FieldRef};
pub use search::{
    ADDRESS_SENTINEL, MergeRule, SearchField, SearchQuery, SearchRequest, TableDiff,
};
