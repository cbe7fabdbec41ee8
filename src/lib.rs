//! # Addon Repository Builder
//!
//! This library builds a distributable Kodi addon repository from a list of
//! addon sources. It is used by the `addon-repo` command-line tool but can be
//! embedded in other build tooling.
//!
//! ## Quick Example
//!
//! ```no_run
//! use addon_repo::repository::RepositoryBuilder;
//!
//! let report = RepositoryBuilder::new("./repo")
//!     .source("https://github.com/user/kodi-addons.git#main:plugin.video.example")
//!     .source("./addons/script.module.example")
//!     .source("./dist/plugin.audio.example-1.0.0.zip")
//!     .build()?;
//!
//! for addon in &report.addons {
//!     println!("{} {}", addon.id, addon.version);
//! }
//! # Ok::<(), addon_repo::error::Error>(())
//! ```
//!
//! ## Output Tree
//!
//! ```text
//! repo/
//! ├── addons.xml            (or addons.xml.gz)
//! ├── addons.xml.md5
//! └── <id>/
//!     ├── <id>-<version>.zip
//!     ├── <id>-<version>.zip.md5
//!     ├── addon.xml, icon.png, fanart.jpg, LICENSE.txt
//!     └── changelog-<version>.txt
//! ```
//!
//! ## Execution Flow
//!
//! 1.  **Classification (`source`)**: each source string is a git URL, a local
//!     directory, or a pre-built zip.
//! 2.  **Fetching (`fetch`, `orchestrator`)**: one worker per source parses the
//!     addon descriptor (`metadata`), writes the versioned archive and its
//!     checksum (`archive`) and copies sidecar files.
//! 3.  **Indexing (`index`)**: every descriptor is merged, in source order,
//!     into the repository index.
//!
//! The first failing source (by position) aborts the build before the index
//! is written.

pub mod archive;
pub mod config;
pub mod defaults;
pub mod error;
pub mod fetch;
pub mod fsutil;
pub mod git;
pub mod index;
pub mod metadata;
pub mod orchestrator;
pub mod output;
pub mod repository;
pub mod source;
pub mod suggestions;

#[cfg(test)]
mod validation_proptest;
