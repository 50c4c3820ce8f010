//! Fixed strings shared by the merge engine, reduction passes, and report writers.

/// Separator between folder levels in a bookmark location.
pub const LOCATION_SEPARATOR: &str = "::";

/// Separator joining multiple values in reports, override files, and composite
/// source-file values.
pub const VALUE_SEPARATOR: &str = ":::";

/// Browser root folder that carries no information once files are merged.
pub const BOOKMARKS_MENU: &str = "Bookmarks Menu";

/// Filename fragment removed by the filename reducer unless configured otherwise.
pub const DEFAULT_FILENAME_DROP: &str = "bookmarks";

/// Raw record length when the extractor emitted no description slot.
pub const RAW_RECORD_LEN_NO_DESCRIPTION: usize = 9;
/// Raw record length when the extractor emitted a description slot.
pub const RAW_RECORD_LEN_WITH_DESCRIPTION: usize = 10;

pub const DEFAULT_OUTPUT_FILE: &str = "addr.json";
pub const ORIGINAL_SUFFIX: &str = "_original";

pub const LABEL_OVERRIDE_FILE: &str = "duplicate_addr_labels.tab";
pub const DIRECTORY_LABEL_FILE: &str = "location_set_mapping.tab";

pub const DUPLICATE_LOCATIONS_REPORT: &str = "duplicate_addr_locations.txt";
pub const DUPLICATE_LOCATIONS_FLAT_REPORT: &str = "duplicate_addr_locations_flat.txt";
pub const DUPLICATE_LOCATION_SETS_REPORT: &str = "duplicate_addr_location_sets.txt";
pub const DUPLICATE_LABELS_REPORT: &str = "duplicate_addr_labels.txt";
pub const DUPLICATE_DESCRIPTIONS_REPORT: &str = "duplicate_addr_descriptions.txt";
pub const FAILED_FILES_REPORT: &str = "merge_process_failed.txt";

/// Timestamp format appended to output file stems (`addr.2024-01-31_09-15-00.json`).
pub const SNAPSHOT_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
