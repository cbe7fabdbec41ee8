//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_addon("src/plugin.a", "plugin.a", "1.0.0");
//! fixture.command().arg("build").arg("src/plugin.a").assert().success();
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{descriptor, git_available, TestFixture};
}

/// A minimal addon descriptor.
pub fn descriptor(id: &str, version: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<addon id="{id}" version="{version}" name="{id}" provider-name="tests">
  <requires><import addon="xbmc.python" version="3.0.0"/></requires>
  <extension point="xbmc.python.pluginsource" library="default.py"/>
</addon>
"#
    )
}

/// Returns `true` when a usable `git` executable is on the PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary directory populated with addon sources.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write an addon tree at `dir`: descriptor, code, icon and changelog.
    pub fn with_addon(self, dir: &str, id: &str, version: &str) -> Self {
        let root = self.temp_dir.child(dir);
        root.child("addon.xml")
            .write_str(&descriptor(id, version))
            .expect("Failed to write descriptor");
        root.child("default.py")
            .write_str("import xbmc\n")
            .expect("Failed to write addon code");
        root.child("resources/settings.xml")
            .write_str("<settings/>\n")
            .expect("Failed to write settings");
        root.child("icon.png")
            .write_binary(&[0x89, b'P', b'N', b'G'])
            .expect("Failed to write icon");
        root.child("changelog.txt")
            .write_str(&format!("v{version}\n- initial\n"))
            .expect("Failed to write changelog");
        self
    }

    /// Write a zip at `name` whose entries are `(member path, content)`.
    pub fn with_zip(self, name: &str, entries: &[(&str, &str)]) -> Self {
        let path = self.temp_dir.child(name).path().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create zip folder");
        }
        let mut writer = ZipWriter::new(File::create(&path).expect("Failed to create zip"));
        for (member, content) in entries {
            writer
                .start_file(*member, SimpleFileOptions::default())
                .expect("Failed to start zip entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish zip");
        self
    }

    /// Write a pre-built addon zip with a single `<id>/` root.
    pub fn with_addon_zip(self, name: &str, id: &str, version: &str) -> Self {
        let descriptor_member = format!("{id}/addon.xml");
        let code_member = format!("{id}/default.py");
        let descriptor = descriptor(id, version);
        self.with_zip(
            name,
            &[
                (descriptor_member.as_str(), descriptor.as_str()),
                (code_member.as_str(), "import xbmc\n"),
            ],
        )
    }

    /// Add a `.addon-repo.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".addon-repo.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Absolute path of a child, as a source string.
    pub fn source(&self, path: &str) -> String {
        self.path().join(path).display().to_string()
    }

    /// The output folder used by the tests.
    pub fn output(&self) -> PathBuf {
        self.path().join("repo")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("addon-repo");
        cmd.current_dir(self.path())
            .env_remove("ADDON_REPO_CONFIG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_addon() {
        let fixture = TestFixture::new().with_addon("src/a", "plugin.a", "1.0.0");
        assert!(fixture.path().join("src/a/addon.xml").is_file());
        assert!(fixture.path().join("src/a/resources/settings.xml").is_file());
    }

    #[test]
    fn test_fixture_with_addon_zip() {
        let fixture = TestFixture::new().with_addon_zip("dist/nested/a.zip", "plugin.a", "1.0.0");
        let archive = zip::ZipArchive::new(
            File::open(fixture.path().join("dist/nested/a.zip")).unwrap(),
        )
        .unwrap();
        assert_eq!(archive.len(), 2);
    }
}
