//! Attribute field identifiers and the name/position lookup table.

use std::fmt;
use std::str::FromStr;

use crate::error::{BookmergeError, Result};

/// One of the six attributes stored per address, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Label,
    Age,
    Tags,
    Location,
    Description,
    SourceFile,
}

/// Forward table: position → field. Reverse lookups go through the same array.
pub const FIELDS: [Field; 6] = [
    Field::Label,
    Field::Age,
    Field::Tags,
    Field::Location,
    Field::Description,
    Field::SourceFile,
];

/// Fields holding trimmed strings (everything but `age`).
pub const TEXT_FIELDS: [Field; 5] = [
    Field::Label,
    Field::Tags,
    Field::Location,
    Field::Description,
    Field::SourceFile,
];

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Age => "age",
            Self::Tags => "tags",
            Self::Location => "location",
            Self::Description => "description",
            Self::SourceFile => "source_file",
        }
    }

    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Label => 0,
            Self::Age => 1,
            Self::Tags => 2,
            Self::Location => 3,
            Self::Description => 4,
            Self::SourceFile => 5,
        }
    }

    /// Resolve a field by name. `file location` is accepted for `source_file`
    /// because older snapshots and scripts used that spelling.
    pub fn from_name(name: &str) -> Result<Self> {
        let canonical = match name {
            "file location" | "file_location" => "source_file",
            other => other,
        };
        FIELDS
            .iter()
            .copied()
            .find(|field| field.name() == canonical)
            .ok_or_else(|| BookmergeError::UnknownField {
                name: name.to_string(),
            })
    }

    pub fn from_position(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|position| FIELDS.get(position).copied())
            .ok_or(BookmergeError::UnknownFieldIndex { index })
    }

    #[must_use]
    pub const fn is_age(self) -> bool {
        matches!(self, Self::Age)
    }
}

impl FromStr for Field {
    type Err = BookmergeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
