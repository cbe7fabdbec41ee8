//! # Error Handling
//!
//! This module defines the centralized error type for the `addon-repo`
//! builder. It uses the `thiserror` library to create an `Error` enum that
//! covers every failure mode of a repository build, with messages that name
//! the offending file, source or addon.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Descriptor, archive and source failures are
//!   raised inside a single fetch worker and captured by the orchestrator; the
//!   first failing source (by position) is re-raised wrapped in
//!   `Error::SourceFailed` so the user sees which source aborted the build.
//!
//! - **`ErrorKind`**: A flat, copyable tag for each failure kind. Use
//!   `Error::kind()` to classify an error without caring whether it has been
//!   wrapped with source context.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for addon repository builds
#[derive(Error, Debug)]
pub enum Error {
    /// The addon descriptor could not be opened or is not well-formed XML.
    #[error("Cannot read addon metadata {}: {message}", path.display())]
    MetadataUnreadable { path: PathBuf, message: String },

    /// The descriptor's `id` attribute is missing or not `[a-z0-9._-]+`.
    #[error("Invalid addon ID: {}", id.as_deref().unwrap_or("<missing>"))]
    InvalidIdentity { id: Option<String> },

    /// The descriptor's `version` attribute is missing or not a valid version.
    #[error("Invalid addon version: {}", version.as_deref().unwrap_or("<missing>"))]
    InvalidVersion { version: Option<String> },

    /// A pre-built archive does not have exactly one top-level directory.
    #[error("Malformed addon archive {}: {message}", path.display())]
    MalformedArchive { path: PathBuf, message: String },

    /// The source is neither a URL, a directory nor a file.
    #[error("Source not found: {location}")]
    SourceNotFound { location: String },

    /// A git source was configured but git cannot be used.
    #[error("Version control unavailable: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    VersionControlUnavailable {
        message: String,
        /// Optional hint for how to make git available
        hint: Option<String>,
    },

    /// A git invocation (clone, checkout, archive) exited unsuccessfully.
    #[error("Git command failed for {location}: {command} - {stderr}")]
    GitCommand {
        command: String,
        location: String,
        stderr: String,
    },

    /// An internal invariant of the fetch workers was broken.
    #[error("Addon worker contract violated: {message}")]
    WorkerContractViolation { message: String },

    /// Filesystem failures not otherwise classified (e.g. cleanup failures).
    #[error("Filesystem error at {}: {message}", path.display())]
    Filesystem { path: PathBuf, message: String },

    /// Two sources produced an addon with the same id.
    #[error("Duplicate addon ID {id}: produced by source #{first} and source #{second}")]
    DuplicateAddonId {
        id: String,
        first: usize,
        second: usize,
    },

    /// The first failing source of a build, by position in the source list.
    #[error("Source #{index} ({location}) failed: {source}")]
    SourceFailed {
        /// 1-based position of the source in the configured list
        index: usize,
        location: String,
        source: Box<Error>,
    },

    /// The builder configuration file is invalid.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A zip reading or writing error.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Flat classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MetadataUnreadable,
    InvalidIdentity,
    InvalidVersion,
    MalformedArchive,
    SourceNotFound,
    VersionControlUnavailable,
    WorkerContractViolation,
    DuplicateAddonId,
    Config,
    /// Git command failures, raw I/O and zip failures.
    Filesystem,
}

impl Error {
    /// Returns the failure kind, looking through `SourceFailed` wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MetadataUnreadable { .. } => ErrorKind::MetadataUnreadable,
            Error::InvalidIdentity { .. } => ErrorKind::InvalidIdentity,
            Error::InvalidVersion { .. } => ErrorKind::InvalidVersion,
            Error::MalformedArchive { .. } => ErrorKind::MalformedArchive,
            Error::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Error::VersionControlUnavailable { .. } => ErrorKind::VersionControlUnavailable,
            Error::WorkerContractViolation { .. } => ErrorKind::WorkerContractViolation,
            Error::DuplicateAddonId { .. } => ErrorKind::DuplicateAddonId,
            Error::SourceFailed { source, .. } => source.kind(),
            Error::ConfigParse { .. } | Error::Yaml(_) => ErrorKind::Config,
            Error::GitCommand { .. } | Error::Filesystem { .. } | Error::Io(_) | Error::Zip(_) => {
                ErrorKind::Filesystem
            }
        }
    }

    /// Position (1-based) of the source that caused this error, if known.
    pub fn source_index(&self) -> Option<usize> {
        match self {
            Error::SourceFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
