//! # Addon Metadata
//!
//! Parses an addon descriptor (`addon.xml`) into a validated identity plus the
//! raw descriptor element, which is kept as serialized XML so that it can be
//! moved across worker threads and merged into the repository index later.
//!
//! Identity rules:
//!
//! - `id` must match `[a-z0-9._-]+` in full.
//! - `version` must be `MAJOR.MINOR.PATCH` with numeric components without
//!   leading zeros, an optional pre-release suffix introduced by `-` or `~`,
//!   and an optional build suffix introduced by `+`.
//!
//! Parsing is a pure read; nothing is written until both rules pass.

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use xot::Xot;

use crate::error::{Error, Result};

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._-]+$").expect("addon id pattern is valid"));

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:0|[1-9][0-9]*)(?:\.(?:0|[1-9][0-9]*)){2}",
        r"(?:[-~][0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?",
        r"(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    ))
    .expect("addon version pattern is valid")
});

/// Sidecar files copied next to an addon archive under their own name.
/// `changelog.txt` is handled separately since its target name carries the
/// version.
const STATIC_SIDECARS: [&str; 4] = ["addon.xml", "icon.png", "fanart.jpg", "LICENSE.txt"];

/// Validated identity of an addon, plus its full descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonMetadata {
    /// Addon identifier, e.g. `plugin.video.example`
    pub id: String,
    /// Addon version, kept verbatim
    pub version: String,
    /// The descriptor's root element, serialized as XML
    pub descriptor: String,
}

impl AddonMetadata {
    /// File name of this addon's archive: `<id>-<version>.zip`.
    pub fn archive_basename(&self) -> String {
        format!("{}-{}.zip", self.id, self.version)
    }

    /// Sidecar files as `(source name, target name)` pairs.
    pub fn sidecar_files(&self) -> Vec<(&'static str, String)> {
        let mut files: Vec<(&'static str, String)> = STATIC_SIDECARS
            .iter()
            .map(|name| (*name, name.to_string()))
            .collect();
        files.push(("changelog.txt", format!("changelog-{}.txt", self.version)));
        files
    }
}

/// Returns true if `id` is a valid addon identifier.
pub fn validate_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Returns true if `version` is a valid addon version.
pub fn validate_version(version: &str) -> bool {
    VERSION_PATTERN.is_match(version)
}

/// Parse and validate the descriptor file at `path`.
pub fn parse(path: &Path) -> Result<AddonMetadata> {
    let content = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
    parse_str(&content, path)
}

/// Parse and validate descriptor text; `origin` is only used in errors.
pub fn parse_str(content: &str, origin: &Path) -> Result<AddonMetadata> {
    let content = content.trim_start_matches('\u{feff}');

    let mut xot = Xot::new();
    let document = xot.parse(content).map_err(|e| unreadable(origin, e))?;
    let root = xot
        .document_element(document)
        .map_err(|e| unreadable(origin, e))?;

    let id_name = xot.add_name("id");
    let version_name = xot.add_name("version");
    let id = xot.get_attribute(root, id_name).map(str::to_string);
    let version = xot.get_attribute(root, version_name).map(str::to_string);

    let id = match id {
        Some(id) if validate_id(&id) => id,
        other => return Err(Error::InvalidIdentity { id: other }),
    };
    let version = match version {
        Some(version) if validate_version(&version) => version,
        other => return Err(Error::InvalidVersion { version: other }),
    };

    let descriptor = xot.to_string(root).map_err(|e| unreadable(origin, e))?;

    Ok(AddonMetadata {
        id,
        version,
        descriptor,
    })
}

fn unreadable(path: &Path, error: impl Display) -> Error {
    Error::MetadataUnreadable {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
