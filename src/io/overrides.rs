//! Loaders for the hand-maintained override tables.
//!
//! Both files are tab-separated, one mapping per line. Lines without exactly one tab
//! are skipped. Every load returns a freshly owned map.
//!
//! - `duplicate_addr_labels.tab`: `url<TAB>label` or `url<TAB>label1:::label2`
//! - `location_set_mapping.tab`: `label<TAB>directory`

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::constants::VALUE_SEPARATOR;
use crate::error::Result;

fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut parts = line.split('\t');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => Some((left, right)),
        _ => None,
    }
}

fn read_lines<R: BufRead>(reader: R, mut accept: impl FnMut(&str, &str)) -> Result<(usize, usize)> {
    let (mut accepted, mut skipped) = (0, 0);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match split_line(&line) {
            Some((left, right)) => {
                accept(left, right);
                accepted += 1;
            }
            None => skipped += 1,
        }
    }
    Ok((accepted, skipped))
}

/// URL → replacement labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOverrides {
    by_url: BTreeMap<String, Vec<String>>,
}

impl LabelOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse override lines. The label column may hold several labels joined by `:::`.
    /// A later line for the same URL replaces an earlier one.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut overrides = Self::new();
        let (accepted, skipped) = read_lines(reader, |url, labels| {
            let labels = labels
                .split(VALUE_SEPARATOR)
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(ToString::to_string)
                .collect();
            overrides.by_url.insert(url.trim().to_string(), labels);
        })?;
        tracing::debug!(
            target = "bookmerge::overrides",
            accepted,
            skipped,
            "parsed label overrides"
        );
        Ok(overrides)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let overrides = Self::from_reader(BufReader::new(fs_err::File::open(path)?))?;
        tracing::info!(
            target = "bookmerge::overrides",
            path = %path.display(),
            urls = overrides.len(),
            "loaded label overrides"
        );
        Ok(overrides)
    }

    /// Load `path` when it exists; a missing file means no overrides.
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn insert<I, S>(&mut self, url: impl Into<String>, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_url
            .insert(url.into(), labels.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<&[String]> {
        self.by_url.get(url).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_url
            .iter()
            .map(|(url, labels)| (url.as_str(), labels.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

/// Source directory → labels used in place of the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryLabels {
    by_directory: BTreeMap<String, Vec<String>>,
}

impl DirectoryLabels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `label<TAB>directory` lines. Several lines for one directory give it
    /// several labels, in file order.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut labels = Self::new();
        let (accepted, skipped) = read_lines(reader, |label, directory| {
            labels.insert(directory, label.trim());
        })?;
        tracing::debug!(
            target = "bookmerge::overrides",
            accepted,
            skipped,
            "parsed directory labels"
        );
        Ok(labels)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let labels = Self::from_reader(BufReader::new(fs_err::File::open(path)?))?;
        tracing::info!(
            target = "bookmerge::overrides",
            path = %path.display(),
            directories = labels.len(),
            "loaded directory labels"
        );
        Ok(labels)
    }

    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn insert(&mut self, directory: impl Into<String>, label: impl Into<String>) {
        let label = label.into();
        let entry = self.by_directory.entry(directory.into()).or_default();
        if !entry.contains(&label) {
            entry.push(label);
        }
    }

    #[must_use]
    pub fn get(&self, directory: &str) -> Option<&[String]> {
        self.by_directory.get(directory).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_directory.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_directory.is_empty()
    }
}
