//! Search and table-comparison types exposed by the core library.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::Field;
use crate::error::Result;

/// Position sentinel that selects the URL key instead of an attribute.
pub const ADDRESS_SENTINEL: i64 = -1;

/// What a search pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SearchField {
    /// The URL key itself.
    Address,
    Attribute(Field),
}

impl SearchField {
    /// Resolve a position; `-1` selects the address.
    pub fn from_position(index: i64) -> Result<Self> {
        if index == ADDRESS_SENTINEL {
            Ok(Self::Address)
        } else {
            Field::from_position(index).map(Self::Attribute)
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "address" | "url" => Ok(Self::Address),
            other => Field::from_name(other).map(Self::Attribute),
        }
    }
}

impl From<Field> for SearchField {
    fn from(field: Field) -> Self {
        Self::Attribute(field)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Attribute(field) => field.fmt(f),
        }
    }
}

/// One pattern against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Regex, or `>value` / `<value` for age comparisons.
    pub pattern: String,
    pub field: SearchField,
    pub ignore_case: bool,
    /// Restrict the scan to these URLs; `None` scans the whole table.
    pub url_subset: Option<Vec<String>>,
}

impl SearchRequest {
    #[must_use]
    pub fn new(pattern: impl Into<String>, field: impl Into<SearchField>) -> Self {
        Self {
            pattern: pattern.into(),
            field: field.into(),
            ignore_case: false,
            url_subset: None,
        }
    }

    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    #[must_use]
    pub fn within<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_subset = Some(urls.into_iter().map(Into::into).collect());
        self
    }
}

/// Fan-out shapes accepted by `AddressTable::search_wrapper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Single {
        pattern: String,
        field: SearchField,
    },
    /// Every pattern against one field.
    PatternsInField {
        patterns: Vec<String>,
        field: SearchField,
    },
    /// One pattern against every field listed.
    PatternInFields {
        pattern: String,
        fields: Vec<SearchField>,
    },
    /// `patterns[i]` against `fields[i]`; lengths must match.
    Paired {
        patterns: Vec<String>,
        fields: Vec<SearchField>,
    },
    ByField(BTreeMap<SearchField, String>),
}

/// Result of comparing two tables key by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDiff {
    /// URLs present in both tables whose records differ.
    pub differing: Vec<String>,
    pub only_a: Vec<String>,
    pub only_b: Vec<String>,
}

impl TableDiff {
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.differing.is_empty() && self.only_a.is_empty() && self.only_b.is_empty()
    }
}

/// Conflict rule for URLs present in both tables of a table merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeRule {
    /// Position-wise union of both records, `a` first.
    #[default]
    Union,
    PreferA,
    PreferB,
}

impl MergeRule {
    /// Legacy numeric codes: 0 union, 1 prefer a, 2 prefer b.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Union),
            1 => Some(Self::PreferA),
            2 => Some(Self::PreferB),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_sentinel_resolves() {
        assert_eq!(SearchField::from_position(-1).unwrap(), SearchField::Address);
        assert_eq!(
            SearchField::from_position(2).unwrap(),
            SearchField::Attribute(Field::Tags)
        );
        assert!(SearchField::from_position(-2).is_err());
        assert_eq!(SearchField::from_name("url").unwrap(), SearchField::Address);
    }

    #[test]
    fn merge_rule_codes() {
        assert_eq!(MergeRule::from_code(0), Some(MergeRule::Union));
        assert_eq!(MergeRule::from_code(2), Some(MergeRule::PreferB));
        assert_eq!(MergeRule::from_code(3), None);
    }
}
