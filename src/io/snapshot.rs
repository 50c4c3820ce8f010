//! Output naming and discovery of earlier merge results.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::constants::{ORIGINAL_SUFFIX, SNAPSHOT_STAMP_FORMAT};
use crate::error::Result;

/// File names for one run's two table snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Written straight after merging, before any reduction.
    pub original: String,
    /// The reduced table.
    pub reduced: String,
}

fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(index) if index > 0 => file_name.split_at(index),
        _ => (file_name, ""),
    }
}

/// `addr.json` becomes `addr_original.<stamp>.json` / `addr.<stamp>.json`, or
/// `addr_original.json` / `addr.json` without a stamp.
#[must_use]
pub fn output_names(base: &str, stamp: Option<DateTime<Local>>) -> OutputNames {
    let (stem, extension) = split_extension(base);
    match stamp {
        Some(stamp) => {
            let stamp = stamp.format(SNAPSHOT_STAMP_FORMAT);
            OutputNames {
                original: format!("{stem}{ORIGINAL_SUFFIX}.{stamp}{extension}"),
                reduced: format!("{stem}.{stamp}{extension}"),
            }
        }
        None => OutputNames {
            original: format!("{stem}{ORIGINAL_SUFFIX}{extension}"),
            reduced: base.to_string(),
        },
    }
}

/// Most recently modified reduced snapshot for `base` in `dir` (`addr*.json`,
/// excluding `_original` snapshots). `None` when nothing matches.
pub fn newest_snapshot(dir: impl AsRef<Path>, base: &str) -> Result<Option<PathBuf>> {
    let (stem, extension) = split_extension(base);
    let original_prefix = format!("{stem}{ORIGINAL_SUFFIX}");
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs_err::read_dir(dir.as_ref())? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(stem) || !name.ends_with(extension) || name.starts_with(&original_prefix) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified()?;
        if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
            newest = Some((modified, entry.path()));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn names_with_and_without_stamp() {
        let stamp = Local.with_ymd_and_hms(2024, 1, 31, 9, 15, 0).unwrap();
        let names = output_names("addr.json", Some(stamp));
        assert_eq!(names.original, "addr_original.2024-01-31_09-15-00.json");
        assert_eq!(names.reduced, "addr.2024-01-31_09-15-00.json");

        let names = output_names("merged.json", None);
        assert_eq!(names.original, "merged_original.json");
        assert_eq!(names.reduced, "merged.json");
    }

    #[test]
    fn newest_snapshot_by_modification_time() {
        let dir = TempDir::new().unwrap();
        assert_eq!(newest_snapshot(dir.path(), "addr.json").unwrap(), None);

        let older = dir.path().join("addr.2024-01-01_00-00-00.json");
        let newer = dir.path().join("addr.2024-02-01_00-00-00.json");
        std::fs::write(&older, "{}").unwrap();
        std::fs::write(&newer, "{}").unwrap();
        std::fs::write(dir.path().join("addr_original.2024-03-01_00-00-00.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        std::fs::File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(past)
            .unwrap();

        assert_eq!(newest_snapshot(dir.path(), "addr.json").unwrap(), Some(newer));
    }
}
