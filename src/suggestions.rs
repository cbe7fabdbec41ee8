//! # Error Suggestions
//!
//! Helpers for CLI errors that say what went wrong AND how to fix it.
//!
//! ```rust,ignore
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::defaults::{CONFIG_FILE, DESCRIPTOR_FILE};

/// The configuration file named with `-c/--config` does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a {CONFIG_FILE} file listing your sources\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set ADDON_REPO_CONFIG environment variable",
        path = path.display()
    )
}

/// Neither the command line nor a configuration file named any source.
pub fn no_sources() -> anyhow::Error {
    anyhow::anyhow!(
        "No addon sources given\n\n\
         hint: Pass sources as arguments: addon-repo build ./my.addon repo.git#main\n\
         hint: Or list them under 'sources:' in {CONFIG_FILE}"
    )
}

/// `validate` was pointed at something without an addon descriptor.
pub fn descriptor_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No {DESCRIPTOR_FILE} found at {path}\n\n\
         hint: Point to an addon folder or directly to its {DESCRIPTOR_FILE}",
        path = path.display()
    )
}
