//! Flat records produced by the bookmark extractor, before merging.
//!
//! The extractor emits one positional tuple per link:
//! `[label, url, age, add_date, last_modified, charset, tag, location, description?, source_file]`.
//! Slots 3..=5 are legacy and ignored. Ten elements carry a description, nine do not.

use serde::Deserialize;
use serde_json::Value;

use super::age::AgeValue;
use super::field::Field;
use super::record::AttributeRecord;
use crate::constants::{RAW_RECORD_LEN_NO_DESCRIPTION, RAW_RECORD_LEN_WITH_DESCRIPTION};
use crate::error::{BookmergeError, Result};

const LABEL_SLOT: usize = 0;
const URL_SLOT: usize = 1;
const AGE_SLOT: usize = 2;
const TAG_SLOT: usize = 6;
const LOCATION_SLOT: usize = 7;

/// Which positional layout a raw tuple used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawShape {
    WithDescription,
    WithoutDescription,
    /// Any other length; description and source file are not read.
    Malformed { len: usize },
}

impl RawShape {
    #[must_use]
    pub fn from_len(len: usize) -> Self {
        match len {
            RAW_RECORD_LEN_WITH_DESCRIPTION => Self::WithDescription,
            RAW_RECORD_LEN_NO_DESCRIPTION => Self::WithoutDescription,
            len => Self::Malformed { len },
        }
    }
}

/// One extractor tuple with the unused slots discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub label: Option<String>,
    pub url: String,
    pub age: Option<AgeValue>,
    pub tag: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub source_file: Option<String>,
    pub shape: RawShape,
}

impl RawRecord {
    /// Ten-slot record with every attribute empty.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            label: None,
            url: url.into(),
            age: None,
            tag: None,
            location: None,
            description: None,
            source_file: None,
            shape: RawShape::WithDescription,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: impl Into<AgeValue>) -> Self {
        self.age = Some(age.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    #[must_use]
    pub fn with_shape(mut self, shape: RawShape) -> Self {
        self.shape = shape;
        self
    }

    /// Parse one positional tuple. Only a missing or non-string URL is fatal; an
    /// unparseable age is logged and dropped.
    pub fn from_values(values: &[Value]) -> Result<Self> {
        let url = match values.get(URL_SLOT) {
            Some(Value::String(url)) => url.trim().to_string(),
            other => {
                return Err(BookmergeError::InvalidBatch {
                    reason: format!("raw record has no url string in slot {URL_SLOT}: {other:?}"),
                });
            }
        };

        let age = match values.get(AGE_SLOT) {
            None | Some(Value::Null) => None,
            Some(value) => match AgeValue::from_json(value) {
                Ok(age) => Some(age),
                Err(err) => {
                    tracing::warn!(
                        target = "bookmerge::merge",
                        url = %url,
                        error = %err,
                        "dropping unparseable age from raw record"
                    );
                    None
                }
            },
        };

        let shape = RawShape::from_len(values.len());
        let (description, source_file) = match shape {
            RawShape::WithDescription => (slot_text(values, 8), slot_text(values, 9)),
            RawShape::WithoutDescription => (None, slot_text(values, 8)),
            RawShape::Malformed { .. } => (None, None),
        };

        Ok(Self {
            label: slot_text(values, LABEL_SLOT),
            url,
            age,
            tag: slot_text(values, TAG_SLOT),
            location: slot_text(values, LOCATION_SLOT),
            description,
            source_file,
            shape,
        })
    }

    /// Flatten a table entry back into a raw record using the first value of each
    /// attribute. Lets any stored record be replayed through the merge engine.
    #[must_use]
    pub fn from_record(url: impl Into<String>, record: &AttributeRecord) -> Self {
        let first = |field: Field| {
            record
                .text(field)
                .and_then(|values| values.first())
                .cloned()
        };
        Self {
            label: first(Field::Label),
            url: url.into(),
            age: record.first_age(),
            tag: first(Field::Tags),
            location: first(Field::Location),
            description: first(Field::Description),
            source_file: first(Field::SourceFile),
            shape: RawShape::WithDescription,
        }
    }
}

fn slot_text(values: &[Value], slot: usize) -> Option<String> {
    match values.get(slot)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Extractor output for one run: the raw tuples plus files that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBatch {
    pub records: Vec<RawRecord>,
    pub failed_files: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBatchWire {
    Bare(Vec<Vec<Value>>),
    Wrapped {
        records: Vec<Vec<Value>>,
        #[serde(default)]
        failed_files: Vec<String>,
    },
}

impl RawBatch {
    /// Accepts a bare array of tuples or `{ "records": [...], "failed_files": [...] }`.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let wire: RawBatchWire =
            serde_json::from_value(value).map_err(|err| BookmergeError::InvalidBatch {
                reason: err.to_string(),
            })?;
        let (tuples, failed_files) = match wire {
            RawBatchWire::Bare(tuples) => (tuples, Vec::new()),
            RawBatchWire::Wrapped {
                records,
                failed_files,
            } => (records, failed_files),
        };
        let records = tuples
            .iter()
            .map(|tuple| RawRecord::from_values(tuple))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            records,
            failed_files,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(text)?)
    }
}

/// Wrap a loosely-typed value as a list, dropping nulls and empty strings.
#[must_use]
pub fn field_to_list(value: &Value) -> Vec<Value> {
    let keep = |item: &&Value| !matches!(item, Value::Null) && item.as_str() != Some("");
    match value {
        Value::Array(items) => items.iter().filter(keep).cloned().collect(),
        scalar => std::iter::once(scalar).filter(keep).cloned().collect(),
    }
}
