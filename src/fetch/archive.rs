//! Fetch an addon from a pre-built zip archive.
//!
//! The archive must contain exactly one top-level directory holding the
//! addon. It is reused as the repository archive rather than rebuilt, so its
//! members keep whatever prefix they already have.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use log::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::archive as writer;
use crate::defaults::DESCRIPTOR_FILE;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::metadata::{self, AddonMetadata};

/// Package the zip at `archive_path` into `output_root`.
pub fn fetch(archive_path: &Path, output_root: &Path) -> Result<AddonMetadata> {
    let archive_path = fsutil::expand_user(archive_path);
    let mut archive = ZipArchive::new(File::open(&archive_path)?).map_err(|e| {
        Error::MalformedArchive {
            path: archive_path.clone(),
            message: e.to_string(),
        }
    })?;

    let root = single_root(&archive, &archive_path)?;
    let descriptor_name = format!("{}/{}", root, DESCRIPTOR_FILE);
    let descriptor_origin = archive_path.join(&descriptor_name);
    let descriptor = read_entry(&mut archive, &descriptor_name)
        .map_err(|e| Error::MetadataUnreadable {
            path: descriptor_origin.clone(),
            message: e.to_string(),
        })?
        .ok_or_else(|| Error::MetadataUnreadable {
            path: descriptor_origin.clone(),
            message: "no such entry in archive".to_string(),
        })?;
    let metadata = metadata::parse_str(&descriptor, &descriptor_origin)?;

    let target_folder = writer::addon_folder(output_root, &metadata);
    fs::create_dir_all(&target_folder)?;

    for (source_name, target_name) in metadata.sidecar_files() {
        let entry_name = format!("{}/{}", root, source_name);
        match archive.by_name(&entry_name) {
            Ok(mut entry) => {
                let mut target = File::create(target_folder.join(&target_name))?;
                io::copy(&mut entry, &mut target)?;
            }
            Err(ZipError::FileNotFound) => {
                debug!("No {} in {}", entry_name, archive_path.display());
            }
            Err(e) => return Err(e.into()),
        }
    }
    drop(archive);

    let canonical_path = target_folder.join(metadata.archive_basename());
    if fsutil::same_location(&archive_path, &canonical_path) {
        debug!("{} is already in place", archive_path.display());
    } else {
        fs::copy(&archive_path, &canonical_path)?;
    }
    writer::write_checksum(&canonical_path, true, None)?;

    Ok(metadata)
}

/// The single top-level directory name shared by every entry.
fn single_root<R: io::Read + io::Seek>(archive: &ZipArchive<R>, path: &Path) -> Result<String> {
    let mut roots: BTreeSet<&str> = BTreeSet::new();
    for name in archive.file_names() {
        match name.split_once('/') {
            Some((root, _)) if !root.is_empty() => {
                roots.insert(root);
            }
            _ => {
                return Err(Error::MalformedArchive {
                    path: path.to_path_buf(),
                    message: format!("top-level entry {} is not inside a directory", name),
                })
            }
        }
    }

    if roots.len() != 1 {
        return Err(Error::MalformedArchive {
            path: path.to_path_buf(),
            message: format!(
                "archive should contain one directory, found {} top-level entries",
                roots.len()
            ),
        });
    }

    Ok(roots.into_iter().next().unwrap_or_default().to_string())
}

/// Read a UTF-8 entry, `None` if the archive has no such entry.
fn read_entry<R: io::Read + io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}
