//! # Repository Builder
//!
//! `RepositoryBuilder` is the high-level entry point: it takes the output
//! folder, the ordered source list and the compression flag, and runs the
//! whole pipeline:
//!
//! 1. make sure git is usable, but only if a source is a URL;
//! 2. fetch every source concurrently (see `orchestrator`);
//! 3. write the repository index and its checksum (see `index`).
//!
//! Git access is injected through `GitOperations`, so the pipeline can be
//! exercised with a mock. `build()` uses the system `git`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fsutil;
use crate::git::{self, GitOperations, SystemGit};
use crate::index;
use crate::metadata::AddonMetadata;
use crate::orchestrator;
use crate::source;

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Packaged addons, in source order
    pub addons: Vec<AddonMetadata>,
    /// The output folder, with `~` expanded
    pub output_folder: PathBuf,
    /// `addons.xml` or `addons.xml.gz`
    pub index_path: PathBuf,
    /// Checksum file of the index
    pub checksum_path: PathBuf,
}

impl BuildReport {
    /// Path of an addon's archive in the output tree.
    pub fn archive_path(&self, addon: &AddonMetadata) -> PathBuf {
        self.output_folder
            .join(&addon.id)
            .join(addon.archive_basename())
    }
}

/// Builds a repository from an ordered list of sources.
#[derive(Debug, Clone)]
pub struct RepositoryBuilder {
    output_folder: PathBuf,
    sources: Vec<String>,
    compressed: bool,
}

impl RepositoryBuilder {
    /// Create a builder writing into `output_folder`.
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            sources: Vec::new(),
            compressed: false,
        }
    }

    /// Append one source string.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Append several source strings, keeping their order.
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Gzip the repository index.
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    pub fn source_list(&self) -> &[String] {
        &self.sources
    }

    /// Build using the system `git` for URL sources.
    pub fn build(&self) -> Result<BuildReport> {
        self.build_with_git(&SystemGit::new())
    }

    /// Build using `git` for URL sources.
    pub fn build_with_git(&self, git: &dyn GitOperations) -> Result<BuildReport> {
        let git = if source::requires_version_control(&self.sources) {
            git::ensure_available(git)?;
            Some(git)
        } else {
            None
        };

        let output_folder = fsutil::expand_user(&self.output_folder);
        fs::create_dir_all(&output_folder)?;

        let addons = orchestrator::build(&self.sources, &output_folder, git)?;

        let index_path = index::index_path(&output_folder, self.compressed);
        let checksum_path = index::build_index(&addons, &index_path, self.compressed)?;

        Ok(BuildReport {
            addons,
            output_folder,
            index_path,
            checksum_path,
        })
    }
}

/// Build a repository in one call.
pub fn create<S: AsRef<str>>(
    output_folder: &Path,
    sources: &[S],
    compressed: bool,
) -> Result<BuildReport> {
    RepositoryBuilder::new(output_folder)
        .sources(sources.iter().map(|s| s.as_ref().to_string()))
        .compressed(compressed)
        .build()
}
