//! # Repository Index
//!
//! Merges the descriptors of every fetched addon into `addons.xml`:
//!
//! ```xml
//! <?xml version='1.0' encoding='UTF-8'?>
//! <addons><addon id="..." version="...">...</addon>...</addons>
//! ```
//!
//! Children appear in fetch order. The index is optionally gzip-compressed
//! (`addons.xml.gz`) and always followed by its checksum file, whose marker is
//! binary exactly when the index is compressed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use xot::Xot;

use crate::archive;
use crate::defaults::{COMPRESSED_SUFFIX, INDEX_FILE};
use crate::error::{Error, Result};
use crate::metadata::AddonMetadata;

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";

/// Location of the index in `output_root`.
pub fn index_path(output_root: &Path, compressed: bool) -> PathBuf {
    let name = if compressed {
        format!("{}{}", INDEX_FILE, COMPRESSED_SUFFIX)
    } else {
        INDEX_FILE.to_string()
    };
    output_root.join(name)
}

/// Render the index document for `addons`.
pub fn render_index(addons: &[AddonMetadata]) -> Result<String> {
    let mut xot = Xot::new();
    let addons_name = xot.add_name("addons");
    let root = xot.new_element(addons_name);
    xot.new_document_with_element(root).map_err(index_error)?;

    for addon in addons {
        let document = xot.parse(&addon.descriptor).map_err(index_error)?;
        let descriptor = xot.document_element(document).map_err(index_error)?;
        let child = xot.clone_node(descriptor);
        xot.append(root, child).map_err(index_error)?;
    }

    let body = xot.to_string(root).map_err(index_error)?;
    Ok(format!("{}{}", XML_DECLARATION, body))
}

/// Write the index for `addons` to `output_path` and its checksum next to it.
///
/// Returns the checksum path.
pub fn build_index(
    addons: &[AddonMetadata],
    output_path: &Path,
    compressed: bool,
) -> Result<PathBuf> {
    let document = render_index(addons)?;

    let file = BufWriter::new(File::create(output_path)?);
    if compressed {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(document.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        file.write_all(document.as_bytes())?;
        file.flush()?;
    }

    let checksum_path = archive::write_checksum(output_path, compressed, None)?;
    info!(
        "Wrote repository index {} ({} addons)",
        output_path.display(),
        addons.len()
    );
    Ok(checksum_path)
}

fn index_error(error: impl std::fmt::Display) -> Error {
    Error::MetadataUnreadable {
        path: PathBuf::from(INDEX_FILE),
        message: error.to_string(),
    }
}
