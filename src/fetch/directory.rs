//! Fetch an addon from a local directory.

use std::path::Path;

use log::debug;

use crate::archive;
use crate::defaults::DESCRIPTOR_FILE;
use crate::error::Result;
use crate::fsutil;
use crate::metadata::{self, AddonMetadata};

/// Package the addon tree at `addon_path` into `output_root`.
///
/// Sidecars are not copied when the addon folder in the output tree is the
/// source directory itself.
pub fn fetch(addon_path: &Path, output_root: &Path) -> Result<AddonMetadata> {
    let addon_path = fsutil::expand_user(addon_path);
    let metadata = metadata::parse(&addon_path.join(DESCRIPTOR_FILE))?;

    let archive_path = archive::write_archive(output_root, &metadata, &addon_path)?;
    archive::write_checksum(&archive_path, true, None)?;

    let target_folder = archive::addon_folder(output_root, &metadata);
    if fsutil::same_location(&addon_path, &target_folder) {
        debug!(
            "{} is already the output folder, not copying sidecars",
            addon_path.display()
        );
    } else {
        super::copy_sidecars(&addon_path, &target_folder, &metadata)?;
    }

    Ok(metadata)
}
