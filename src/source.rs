//! # Addon Sources
//!
//! A source string names where one addon comes from. It is classified once,
//! by inspecting the string and the filesystem:
//!
//! - a string starting with `scheme://` is a git repository, optionally
//!   followed by `#<branch>` and `:<subpath>` (in that order);
//! - an existing directory is an unpacked addon tree;
//! - an existing file is a pre-built zip archive.
//!
//! Anything else is `Error::SourceNotFound`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::fsutil;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+.-]+://.").expect("url pattern is valid"));

static VCS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[A-Za-z0-9+.-]+://)?.*?)(?:#([^#]*?))?(?::([^:]*))?$")
        .expect("git source pattern is valid")
});

/// A git repository source, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsLocation {
    /// Clone URL
    pub repository: String,
    /// Branch, tag or commit to check out after cloning
    pub branch: Option<String>,
    /// Directory inside the repository holding the addon, `None` for the root
    pub subpath: Option<String>,
}

impl VcsLocation {
    /// Split `location[#branch][:subpath]` into its parts.
    pub fn parse(location: &str) -> Self {
        // The pattern always matches: every group but the first is optional
        // and the first one can be empty.
        let captures = VCS_PATTERN.captures(location);
        let group = |i: usize| {
            captures
                .as_ref()
                .and_then(|c| c.get(i))
                .map(|m| m.as_str().to_string())
        };

        let subpath = group(3)
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty() && p != ".");

        Self {
            repository: group(1).unwrap_or_else(|| location.to_string()),
            branch: group(2).filter(|b| !b.is_empty()),
            subpath,
        }
    }

    /// Tree-ish handed to `git archive`: `HEAD:` or `HEAD:<subpath>`.
    pub fn treeish(&self) -> String {
        format!("HEAD:{}", self.subpath.as_deref().unwrap_or(""))
    }

    /// Directory of the addon inside a clone at `clone_dir`.
    pub fn addon_dir(&self, clone_dir: &Path) -> PathBuf {
        match &self.subpath {
            Some(subpath) => clone_dir.join(subpath),
            None => clone_dir.to_path_buf(),
        }
    }
}

/// How a source is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Cloned from a git repository
    VersionControl(VcsLocation),
    /// An addon tree on disk
    Directory(PathBuf),
    /// A pre-built zip archive on disk
    Archive(PathBuf),
}

/// One configured source and its resolved kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// The source string as configured
    pub location: String,
    pub kind: SourceKind,
}

impl SourceSpec {
    /// Classify a source string.
    pub fn classify(location: &str) -> Result<Self> {
        let kind = if is_url(location) {
            SourceKind::VersionControl(VcsLocation::parse(location))
        } else {
            let path = fsutil::expand_user(Path::new(location));
            if path.is_dir() {
                SourceKind::Directory(path)
            } else if path.is_file() {
                SourceKind::Archive(path)
            } else {
                return Err(Error::SourceNotFound {
                    location: location.to_string(),
                });
            }
        };

        Ok(Self {
            location: location.to_string(),
            kind,
        })
    }
}

/// Returns true if `location` starts with a URL scheme.
pub fn is_url(location: &str) -> bool {
    URL_PATTERN.is_match(location)
}

/// Returns true if any of `sources` needs git to be fetched.
pub fn requires_version_control<S: AsRef<str>>(sources: &[S]) -> bool {
    sources.iter().any(|s| is_url(s.as_ref()))
}
