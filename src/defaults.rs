//! Default values and fixed names for addon-repo.
//!
//! This module provides centralized defaults and file names used across the
//! library and the CLI, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// File name of an addon descriptor inside an addon tree.
pub const DESCRIPTOR_FILE: &str = "addon.xml";

/// Base name of the aggregated repository index.
pub const INDEX_FILE: &str = "addons.xml";

/// Extension appended to the index file when it is gzip-compressed.
pub const COMPRESSED_SUFFIX: &str = ".gz";

/// Extension appended to an artifact path to name its checksum file.
pub const CHECKSUM_SUFFIX: &str = ".md5";

/// Default configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = ".addon-repo.yaml";

/// Suffix of temporary clone directories.
pub const CLONE_DIR_SUFFIX: &str = "-repo";

/// Returns the default output folder for a repository build.
///
/// This can be overridden by the `output` key of the configuration file or
/// the `--output` CLI flag.
pub fn default_output_folder() -> PathBuf {
    PathBuf::from("./repo")
}
