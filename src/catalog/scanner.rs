//! Directory scanning for layer catalogs

use crate::catalog::element::AssetElement;
use crate::io::error::{GenerationError, Result};
use std::path::Path;
use tracing::warn;

/// Scan one layer directory into an ordered catalog
///
/// Only regular files whose name does not start with `.` are kept. Names are
/// sorted byte-wise once and the resulting position becomes the element id.
///
/// # Errors
///
/// Returns `CatalogRead` if the directory or one of its entries cannot be read
pub fn scan_layer_directory(directory: &Path, delimiter: &str) -> Result<Vec<AssetElement>> {
    let read_error = |source| GenerationError::CatalogRead {
        path: directory.to_path_buf(),
        source,
    };

    let mut filenames = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if !entry.file_type().map_err(read_error)?.is_file() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
            warn!(
                directory = %directory.display(),
                "skipping asset with non UTF-8 file name"
            );
            continue;
        };
        if filename.starts_with('.') {
            continue;
        }
        filenames.push(filename);
    }
    filenames.sort_unstable();

    if filenames.is_empty() {
        warn!(directory = %directory.display(), "layer directory is empty");
    }

    Ok(filenames
        .iter()
        .enumerate()
        .map(|(id, filename)| AssetElement::from_filename(id, filename, directory, delimiter))
        .collect())
}
