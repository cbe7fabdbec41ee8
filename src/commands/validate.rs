//! # Validate Command Implementation
//!
//! Parses a single addon descriptor exactly the way a build would and prints
//! its identity. Read-only; nothing is written.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use addon_repo::defaults::DESCRIPTOR_FILE;
use addon_repo::metadata::{self, AddonMetadata};
use addon_repo::output::OutputConfig;
use addon_repo::suggestions;

/// Check an addon descriptor and print its id and version
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// An addon.xml file or a folder containing one
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,
}

/// Execute the `validate` command.
///
/// On success prints `<id> <version>` on stdout.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let addon = check(&args.path)?;

    println!("{}", out.addon(&addon.id, &addon.version));
    log::debug!(
        "{} is a valid addon descriptor",
        descriptor_path(&args.path).display()
    );
    Ok(())
}

fn descriptor_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DESCRIPTOR_FILE)
    } else {
        path.to_path_buf()
    }
}

fn check(path: &Path) -> Result<AddonMetadata> {
    let descriptor = descriptor_path(path);
    if !descriptor.is_file() {
        return Err(suggestions::descriptor_not_found(path));
    }
    Ok(metadata::parse(&descriptor)?)
}
