//! # Archive and Checksum Writer
//!
//! Builds the versioned zip of an addon tree and the `.md5` signature file
//! that accompanies every artifact in the repository.
//!
//! ## Archive layout
//!
//! Every regular file under the source tree becomes one deflated entry named
//! `<id>/<relative/posix/path>`. The tree is walked sorted by file name, so
//! two builds over the same filesystem state list the same members in the
//! same order. Entries carry the zip epoch as their timestamp.
//!
//! ## Checksum format
//!
//! A checksum file holds exactly one line:
//!
//! ```text
//! <32 hex digits> <marker><relative path>\n
//! ```
//!
//! `marker` is `*` for binary artifacts and a space for text ones; the path is
//! relative to the checksum file's directory and uses `/` separators.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::debug;
use md5::{Digest, Md5};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::defaults::CHECKSUM_SUFFIX;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::metadata::AddonMetadata;

const CHUNK_SIZE: usize = 4096;

/// Directory under `output_root` that holds everything for one addon.
pub fn addon_folder(output_root: &Path, metadata: &AddonMetadata) -> PathBuf {
    output_root.join(&metadata.id)
}

/// Zip `source_tree` into `<output_root>/<id>/<id>-<version>.zip`.
///
/// Returns the archive path. The addon folder is created if needed and an
/// existing archive of the same name is overwritten.
pub fn write_archive(
    output_root: &Path,
    metadata: &AddonMetadata,
    source_tree: &Path,
) -> Result<PathBuf> {
    let target_folder = addon_folder(output_root, metadata);
    fs::create_dir_all(&target_folder)?;
    let archive_path = target_folder.join(metadata.archive_basename());

    let mut zip = ZipWriter::new(File::create(&archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut members = 0usize;

    for entry in WalkDir::new(source_tree).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Filesystem {
            path: e.path().unwrap_or(source_tree).to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_dir() || !path.is_file() {
            continue;
        }
        // The archive may live inside the tree it is built from.
        if is_archive_itself(path, &archive_path) {
            continue;
        }

        let relative = path.strip_prefix(source_tree).map_err(|e| Error::Filesystem {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = format!("{}/{}", metadata.id, fsutil::to_posix(relative));

        zip.start_file(name, options)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
        members += 1;
    }

    zip.finish()?;
    debug!("Wrote {} ({} members)", archive_path.display(), members);
    Ok(archive_path)
}

fn is_archive_itself(path: &Path, archive_path: &Path) -> bool {
    path.file_name() == archive_path.file_name() && fsutil::same_location(path, archive_path)
}

/// Hex MD5 digest of the file at `path`, read in fixed-size chunks.
pub fn md5_hex(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Default checksum location for an artifact: `<artifact>.md5`.
pub fn checksum_path_for(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(CHECKSUM_SUFFIX);
    PathBuf::from(name)
}

/// Format one checksum line.
pub fn checksum_line(digest: &str, is_binary: bool, relative_path: &str) -> String {
    let marker = if is_binary { '*' } else { ' ' };
    format!("{} {}{}\n", digest, marker, relative_path)
}

/// Write the checksum file for `artifact`.
///
/// `checksum_path` defaults to `<artifact>.md5`. Returns the path written.
pub fn write_checksum(
    artifact: &Path,
    is_binary: bool,
    checksum_path: Option<&Path>,
) -> Result<PathBuf> {
    let checksum_path = checksum_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| checksum_path_for(artifact));
    let checksum_dir = match checksum_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let digest = md5_hex(artifact)?;
    let relative = fsutil::relative_path(artifact, &checksum_dir)?;
    let line = checksum_line(&digest, is_binary, &fsutil::to_posix(&relative));

    fs::write(&checksum_path, line)?;
    debug!("Wrote {}", checksum_path.display());
    Ok(checksum_path)
}
