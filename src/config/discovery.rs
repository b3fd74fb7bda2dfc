//! Configuration file discovery.

use std::path::{Path, PathBuf};

/// Candidate file names, in lookup order within each directory.
pub const CONFIG_FILENAMES: [&str; 4] = [
    ".aicommit.yml",
    "aicommit.yml",
    ".aicommit.yaml",
    "aicommit.yaml",
];

/// Find the configuration file for `start_dir`.
///
/// Checks `start_dir` first and then each ancestor up to the filesystem root.
/// Within a directory the names in [`CONFIG_FILENAMES`] are tried in order and
/// the first regular file wins.
pub fn find_config_path(start_dir: &Path) -> Option<PathBuf> {
    start_dir.ancestors().find_map(|dir| {
        CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
