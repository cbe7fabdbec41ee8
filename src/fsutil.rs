//! Filesystem helpers shared by the fetchers.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Expand a leading `~` to the user's home directory.
pub fn expand_user(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Render a relative path with `/` separators.
pub fn to_posix(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns true if both paths resolve to the same filesystem location.
///
/// Paths that cannot be resolved are never the same location.
pub fn same_location(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Path of `target` relative to the directory `base`, both resolved first.
pub fn relative_path(target: &Path, base: &Path) -> Result<PathBuf> {
    let target = fs::canonicalize(target)?;
    let base = fs::canonicalize(base)?;

    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    Ok(relative)
}

/// Remove a directory tree, retrying once on entries that refuse deletion
/// because of access restrictions.
///
/// On `PermissionDenied` the entry and its parent directory are made writable
/// before the single retry. Any other failure, or a second failure, is
/// returned as `Error::Filesystem`.
pub fn remove_tree(root: &Path) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(root).contents_first(true) {
        let entry = entry.map_err(|e| Error::Filesystem {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            remove_with_retry(path, |p| fs::remove_dir(p))?;
        } else {
            remove_with_retry(path, |p| fs::remove_file(p))?;
        }
    }
    Ok(())
}

fn remove_with_retry(path: &Path, remove: impl Fn(&Path) -> io::Result<()>) -> Result<()> {
    match remove(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!("Clearing read-only flag on {} and retrying", path.display());
            make_writable(path);
            if let Some(parent) = path.parent() {
                make_writable(parent);
            }
            remove(path).map_err(|e| cleanup_error(path, e))
        }
        Err(e) => Err(cleanup_error(path, e)),
    }
}

/// Add the owner write bit to `path`.
#[cfg(unix)]
fn make_writable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::symlink_metadata(path) {
        let mut permissions = metadata.permissions();
        let mode = permissions.mode();
        if mode & 0o200 == 0 {
            permissions.set_mode(mode | 0o200);
            // The retry reports the real failure if this did not help.
            let _ = fs::set_permissions(path, permissions);
        }
    }
}

/// Clear the read-only attribute of `path`.
#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) {
    if let Ok(metadata) = fs::symlink_metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            let _ = fs::set_permissions(path, permissions);
        }
    }
}

fn cleanup_error(path: &Path, error: io::Error) -> Error {
    Error::Filesystem {
        path: path.to_path_buf(),
        message: format!("failed to remove: {}", error),
    }
}
