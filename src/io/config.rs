//! Loading [`MergeConfig`] from YAML files.

use std::path::{Path, PathBuf};

use crate::error::{BookmergeError, Result};
use crate::types::MergeConfig;

impl MergeConfig {
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs_err::read_to_string(path)?;
        let config = Self::from_yaml_str(&text).map_err(|err| match err {
            BookmergeError::Yaml(source) => BookmergeError::InvalidConfig {
                reason: format!("{}: {source}", path.display()),
            },
            other => other,
        })?;
        tracing::debug!(
            target = "bookmerge::overrides",
            path = %path.display(),
            "loaded merge configuration"
        );
        Ok(config)
    }

    /// Directory outputs go to: `output_path` from the file when set, else `fallback`.
    #[must_use]
    pub fn output_dir(&self, fallback: impl Into<PathBuf>) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| fallback.into())
    }
}
