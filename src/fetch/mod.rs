//! # Source Fetchers
//!
//! One fetcher per source kind. Each one materializes an addon into the
//! output tree and returns its metadata:
//!
//! 1. locate and parse the descriptor (nothing is written if it is invalid);
//! 2. produce `<output>/<id>/<id>-<version>.zip`;
//! 3. write `<id>-<version>.zip.md5` next to it;
//! 4. copy the sidecar files (`addon.xml`, `icon.png`, `fanart.jpg`,
//!    `LICENSE.txt`, `changelog-<version>.txt`) that exist at the source.
//!
//! The fetchers differ only in how the addon tree is obtained:
//!
//! - [`directory`]: the tree is a local directory;
//! - [`archive`]: the tree is inside a pre-built zip, which is reused as is;
//! - [`vcs`]: the tree is a sub-path of a temporary git clone.

pub mod archive;
pub mod directory;
pub mod vcs;

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::git::GitOperations;
use crate::metadata::AddonMetadata;
use crate::source::{SourceKind, SourceSpec};

/// Classify `location` and fetch it into `output_root`.
///
/// `git` must be provided when the source is a URL.
pub fn fetch_source(
    location: &str,
    output_root: &Path,
    git: Option<&dyn GitOperations>,
) -> Result<AddonMetadata> {
    let spec = SourceSpec::classify(location)?;
    debug!("Source {} classified as {:?}", location, spec.kind);
    fetch(&spec, output_root, git)
}

/// Fetch an already classified source into `output_root`.
pub fn fetch(
    spec: &SourceSpec,
    output_root: &Path,
    git: Option<&dyn GitOperations>,
) -> Result<AddonMetadata> {
    match &spec.kind {
        SourceKind::Directory(path) => directory::fetch(path, output_root),
        SourceKind::Archive(path) => archive::fetch(path, output_root),
        SourceKind::VersionControl(location) => match git {
            Some(git) => vcs::fetch(location, git, output_root),
            None => Err(Error::VersionControlUnavailable {
                message: format!("no git available to fetch {}", spec.location),
                hint: None,
            }),
        },
    }
}

/// Copy the sidecar files present in `source_folder` into `target_folder`.
pub fn copy_sidecars(
    source_folder: &Path,
    target_folder: &Path,
    metadata: &AddonMetadata,
) -> Result<()> {
    for (source_name, target_name) in metadata.sidecar_files() {
        let source_path = source_folder.join(source_name);
        if source_path.is_file() {
            fs::copy(&source_path, target_folder.join(&target_name))?;
        } else {
            debug!("No {} in {}", source_name, source_folder.display());
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::addon_tree;
    use super::*;
    use crate::error::ErrorKind;
    use crate::git::mock::MockGit;
    use crate::source::VcsLocation;
    use tempfile::TempDir;

    #[test]
    fn test_fetch_source_dispatches_directory() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("plugin.video.a");
        addon_tree(&source, "plugin.video.a", "1.0.0");

        let metadata =
            fetch_source(source.to_str().unwrap(), &temp.path().join("repo"), None).unwrap();
        assert_eq!(metadata.id, "plugin.video.a");
    }

    #[test]
    fn test_fetch_source_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = fetch_source(missing.to_str().unwrap(), temp.path(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceNotFound);
    }

    #[test]
    fn test_fetch_vcs_without_git_is_unavailable() {
        let spec = SourceSpec {
            location: "https://host/repo.git".to_string(),
            kind: SourceKind::VersionControl(VcsLocation::parse("https://host/repo.git")),
        };
        let temp = TempDir::new().unwrap();
        let err = fetch(&spec, temp.path(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VersionControlUnavailable);
    }

    #[test]
    fn test_fetch_vcs_dispatches_to_git() {
        let git = MockGit::with_files(&[(
            "addon.xml",
            r#"<addon id="repository.example" version="1.0.0"/>"#,
        )]);
        let temp = TempDir::new().unwrap();
        let spec = SourceSpec::classify("https://host/repo.git").unwrap();

        let metadata = fetch(&spec, temp.path(), Some(&git)).unwrap();
        assert_eq!(metadata.id, "repository.example");
        assert!(git.calls.lock().unwrap()[0].starts_with("clone"));
    }

    #[test]
    fn test_copy_sidecars_renames_changelog_and_skips_missing() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        addon_tree(&source, "plugin.video.a", "2.0.0");
        let target = temp.path().join("out");
        fs::create_dir_all(&target).unwrap();

        let metadata = AddonMetadata {
            id: "plugin.video.a".to_string(),
            version: "2.0.0".to_string(),
            descriptor: String::new(),
        };
        copy_sidecars(&source, &target, &metadata).unwrap();

        assert!(target.join("addon.xml").is_file());
        assert!(target.join("icon.png").is_file());
        assert!(target.join("changelog-2.0.0.txt").is_file());
        assert!(!target.join("changelog.txt").exists());
        assert!(!target.join("fanart.jpg").exists());
        assert!(!target.join("LICENSE.txt").exists());
    }
}
