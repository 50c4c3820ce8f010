//! Merge-run configuration and its compiled, validated form.
//!
//! `MergeConfig` is what users write in YAML. Older configuration files used camelCase
//! keys (`replaceStringsAll`, `dropSetLeading`, ...), which are accepted as aliases.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{BOOKMARKS_MENU, DEFAULT_FILENAME_DROP, DEFAULT_OUTPUT_FILE};
use crate::error::{BookmergeError, Result};

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_filename_drop_strings() -> Vec<String> {
    vec![DEFAULT_FILENAME_DROP.to_string()]
}

fn default_location_drop_set() -> Vec<String> {
    vec![BOOKMARKS_MENU.to_string()]
}

/// `[pattern, replacement]` pair as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ReplaceRule {
    pub pattern: String,
    pub replacement: String,
}

impl ReplaceRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

impl From<(String, String)> for ReplaceRule {
    fn from((pattern, replacement): (String, String)) -> Self {
        Self {
            pattern,
            replacement,
        }
    }
}

impl From<ReplaceRule> for (String, String) {
    fn from(rule: ReplaceRule) -> Self {
        (rule.pattern, rule.replacement)
    }
}

/// A configuration value given either as one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValues {
    One(String),
    Many(Vec<String>),
}

impl TextValues {
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value.clone()],
            Self::Many(values) => values.clone(),
        }
    }
}

/// Knobs for one merge run. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Literal find/replace applied to every location, all occurrences.
    #[serde(alias = "replaceStringsAll")]
    pub replace_rules_all: Vec<ReplaceRule>,
    /// Regexes stripped once from the start of each location.
    #[serde(alias = "dropSetLeading")]
    pub drop_prefix_set: Vec<String>,
    /// Regex replacements applied once (leftmost match) to each location.
    #[serde(alias = "replaceStringsFirst")]
    pub replace_rules_first: Vec<ReplaceRule>,
    /// URLs whose descriptions are split on newlines, unioned, and rejoined.
    #[serde(alias = "desc_join_addrs")]
    pub description_join_urls: Vec<String>,
    /// URL to replacement description(s).
    #[serde(alias = "desc_dup_mod")]
    pub description_override_map: BTreeMap<String, TextValues>,
    /// Values removed from every text attribute at the end of a run. Nulls are
    /// accepted and ignored since stored records never hold them.
    #[serde(alias = "emptyContentDropSet")]
    pub empty_value_drop_set: Vec<Option<String>>,
    pub output_path: Option<PathBuf>,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Fragments removed from source-file basenames.
    #[serde(default = "default_filename_drop_strings")]
    pub filename_drop_strings: Vec<String>,
    /// Locations dropped outright before any rewriting.
    #[serde(default = "default_location_drop_set")]
    pub location_drop_set: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            replace_rules_all: Vec::new(),
            drop_prefix_set: Vec::new(),
            replace_rules_first: Vec::new(),
            description_join_urls: Vec::new(),
            description_override_map: BTreeMap::new(),
            empty_value_drop_set: Vec::new(),
            output_path: None,
            output_file: default_output_file(),
            filename_drop_strings: default_filename_drop_strings(),
            location_drop_set: default_location_drop_set(),
        }
    }
}

impl MergeConfig {
    #[must_use]
    pub fn builder() -> MergeConfigBuilder {
        MergeConfigBuilder::default()
    }

    /// Parse YAML text; an empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Validate and compile every pattern. Fails on the first invalid regex.
    pub fn compile(&self) -> Result<CompiledRules> {
        if self.output_file.trim().is_empty() {
            return Err(BookmergeError::InvalidConfig {
                reason: "output_file must not be empty".to_string(),
            });
        }

        let drop_prefixes = self
            .drop_prefix_set
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})"))
                    .map_err(|err| BookmergeError::invalid_pattern(pattern, err))
            })
            .collect::<Result<Vec<_>>>()?;

        let replace_first = self
            .replace_rules_first
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| (regex, rule.replacement.clone()))
                    .map_err(|err| BookmergeError::invalid_pattern(&rule.pattern, err))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledRules {
            replace_all: self.replace_rules_all.clone(),
            drop_prefixes,
            replace_first,
            location_drop_set: self.location_drop_set.iter().cloned().collect(),
            description_join_urls: self.description_join_urls.clone(),
            description_overrides: self
                .description_override_map
                .iter()
                .map(|(url, values)| (url.clone(), values.to_vec()))
                .collect(),
            empty_value_drop_set: self.empty_value_drop_set.iter().flatten().cloned().collect(),
            filename_drop_strings: self.filename_drop_strings.clone(),
        })
    }
}

/// Fluent builder for [`MergeConfig`].
#[derive(Debug, Clone, Default)]
pub struct MergeConfigBuilder {
    inner: MergeConfig,
}

impl MergeConfigBuilder {
    pub fn replace_all<P: Into<String>, R: Into<String>>(mut self, pattern: P, replacement: R) -> Self {
        self.inner
            .replace_rules_all
            .push(ReplaceRule::new(pattern, replacement));
        self
    }

    pub fn drop_prefix<S: Into<String>>(mut self, pattern: S) -> Self {
        self.inner.drop_prefix_set.push(pattern.into());
        self
    }

    pub fn replace_first<P: Into<String>, R: Into<String>>(
        mut self,
        pattern: P,
        replacement: R,
    ) -> Self {
        self.inner
            .replace_rules_first
            .push(ReplaceRule::new(pattern, replacement));
        self
    }

    pub fn join_descriptions<S: Into<String>>(mut self, url: S) -> Self {
        self.inner.description_join_urls.push(url.into());
        self
    }

    pub fn description_override<U: Into<String>, D: Into<String>>(
        mut self,
        url: U,
        description: D,
    ) -> Self {
        self.inner
            .description_override_map
            .insert(url.into(), TextValues::One(description.into()));
        self
    }

    pub fn drop_empty_value<S: Into<String>>(mut self, value: S) -> Self {
        self.inner.empty_value_drop_set.push(Some(value.into()));
        self
    }

    pub fn output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.inner.output_path = Some(path.into());
        self
    }

    pub fn output_file<S: Into<String>>(mut self, file: S) -> Self {
        self.inner.output_file = file.into();
        self
    }

    #[must_use]
    pub fn filename_drop_strings(mut self, drops: Vec<String>) -> Self {
        self.inner.filename_drop_strings = drops;
        self
    }

    #[must_use]
    pub fn build(self) -> MergeConfig {
        self.inner
    }
}

/// Validated rules consumed by the reduction pipeline.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub replace_all: Vec<ReplaceRule>,
    /// Each pattern anchored as `^(?:pattern)`.
    pub drop_prefixes: Vec<Regex>,
    pub replace_first: Vec<(Regex, String)>,
    pub location_drop_set: BTreeSet<String>,
    pub description_join_urls: Vec<String>,
    pub description_overrides: BTreeMap<String, Vec<String>>,
    pub empty_value_drop_set: BTreeSet<String>,
    pub filename_drop_strings: Vec<String>,
}

impl Default for CompiledRules {
    fn default() -> Self {
        Self {
            replace_all: Vec::new(),
            drop_prefixes: Vec::new(),
            replace_first: Vec::new(),
            location_drop_set: default_location_drop_set().into_iter().collect(),
            description_join_urls: Vec::new(),
            description_overrides: BTreeMap::new(),
            empty_value_drop_set: BTreeSet::new(),
            filename_drop_strings: default_filename_drop_strings(),
        }
    }
}
