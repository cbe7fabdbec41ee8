//! Fetch an addon from a git repository.
//!
//! The repository is cloned into a fresh temporary directory, the requested
//! branch is checked out, and `git archive` packages the addon's sub-path
//! with the `<id>/` prefix. The clone is removed on every exit path.

use std::fs;
use std::path::Path;

use log::warn;

use crate::archive;
use crate::defaults::{CLONE_DIR_SUFFIX, DESCRIPTOR_FILE};
use crate::error::Result;
use crate::fsutil;
use crate::git::GitOperations;
use crate::metadata::{self, AddonMetadata};
use crate::source::VcsLocation;

/// Clone `location` and package its addon into `output_root`.
pub fn fetch(
    location: &VcsLocation,
    git: &dyn GitOperations,
    output_root: &Path,
) -> Result<AddonMetadata> {
    let clone_dir = tempfile::Builder::new()
        .suffix(CLONE_DIR_SUFFIX)
        .tempdir()?;

    let fetched = fetch_from_clone(location, git, clone_dir.path(), output_root);
    let cleanup = fsutil::remove_tree(clone_dir.path());

    match (fetched, cleanup) {
        (Ok(metadata), Ok(())) => Ok(metadata),
        (Ok(_), Err(cleanup_error)) => Err(cleanup_error),
        (Err(fetch_error), Err(cleanup_error)) => {
            warn!(
                "Failed to remove clone of {}: {}",
                location.repository, cleanup_error
            );
            Err(fetch_error)
        }
        (Err(fetch_error), Ok(())) => Err(fetch_error),
    }
}

fn fetch_from_clone(
    location: &VcsLocation,
    git: &dyn GitOperations,
    clone_dir: &Path,
    output_root: &Path,
) -> Result<AddonMetadata> {
    git.clone_repository(&location.repository, clone_dir)?;
    if let Some(branch) = &location.branch {
        git.checkout(clone_dir, branch)?;
    }

    let addon_dir = location.addon_dir(clone_dir);
    let metadata = metadata::parse(&addon_dir.join(DESCRIPTOR_FILE))?;

    let target_folder = archive::addon_folder(output_root, &metadata);
    fs::create_dir_all(&target_folder)?;
    let archive_path = target_folder.join(metadata.archive_basename());
    git.archive_zip(
        clone_dir,
        &location.treeish(),
        &format!("{}/", metadata.id),
        &archive_path,
    )?;

    archive::write_checksum(&archive_path, true, None)?;
    super::copy_sidecars(&addon_dir, &target_folder, &metadata)?;

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::git::mock::MockGit;
    use tempfile::TempDir;

    const DESCRIPTOR: &str = r#"<addon id="repository.maorepo" version="1.0.2"/>"#;

    #[test]
    fn test_fetch_subpath_with_branch() {
        let git = MockGit::with_files(&[
            ("README.md", "# repo"),
            ("addons/repository.maorepo/addon.xml", DESCRIPTOR),
            ("addons/repository.maorepo/icon.png", "png"),
        ]);
        let location = VcsLocation::parse(
            "https://github.com/mao2009/maorepo.git#main:addons/repository.maorepo",
        );
        let temp = TempDir::new().unwrap();

        let metadata = fetch(&location, &git, temp.path()).unwrap();
        assert_eq!(metadata.id, "repository.maorepo");
        assert_eq!(metadata.version, "1.0.2");

        let calls = git.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "clone https://github.com/mao2009/maorepo.git".to_string(),
                "checkout main".to_string(),
                "archive HEAD:addons/repository.maorepo repository.maorepo/".to_string(),
            ]
        );

        let folder = temp.path().join("repository.maorepo");
        assert!(folder.join("repository.maorepo-1.0.2.zip").is_file());
        assert!(folder.join("repository.maorepo-1.0.2.zip.md5").is_file());
        assert!(folder.join("icon.png").is_file());
        assert!(folder.join("addon.xml").is_file());
    }

    #[test]
    fn test_clone_removed_after_success() {
        let git = MockGit::with_files(&[("addon.xml", DESCRIPTOR)]);
        let location = VcsLocation::parse("https://host/repo.git");
        let temp = TempDir::new().unwrap();

        fetch(&location, &git, temp.path()).unwrap();
        let clone_dirs = git.clone_dirs.lock().unwrap().clone();
        assert_eq!(clone_dirs.len(), 1);
        assert!(!clone_dirs[0].exists());
        assert!(clone_dirs[0]
            .to_string_lossy()
            .ends_with(CLONE_DIR_SUFFIX));
    }

    #[test]
    fn test_clone_removed_after_failure() {
        let git = MockGit::with_files(&[("addon.xml", r#"<addon id="Bad ID" version="1.0.0"/>"#)]);
        let location = VcsLocation::parse("https://host/repo.git");
        let temp = TempDir::new().unwrap();

        let err = fetch(&location, &git, temp.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentity);
        let clone_dirs = git.clone_dirs.lock().unwrap().clone();
        assert!(!clone_dirs[0].exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
