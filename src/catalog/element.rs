//! Asset element records and rarity filename parsing

use crate::io::configuration::DEFAULT_ELEMENT_WEIGHT;
use std::path::{Path, PathBuf};

/// One selectable asset of a layer kind
///
/// Immutable once scanned. `id` is the element's position in the sorted
/// directory listing and stays stable for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetElement {
    /// Position in the layer catalog
    pub id: usize,
    /// Display name with extension and rarity suffix removed
    pub name: String,
    /// File name as found on disk
    pub filename: String,
    /// Full path to the asset
    pub path: PathBuf,
    /// Rarity weight, `1.0` when the filename carries none
    pub weight: f64,
}

impl AssetElement {
    /// Build an element from its directory position and file name
    pub fn from_filename(id: usize, filename: &str, directory: &Path, delimiter: &str) -> Self {
        let (name, weight) = parse_filename(filename, delimiter);
        Self {
            id,
            name,
            filename: filename.to_string(),
            path: directory.join(filename),
            weight,
        }
    }
}

/// Split `<name><delimiter><weight>.<ext>` into display name and weight
///
/// The final four characters are treated as the extension. Anything that is
/// not a finite, non-negative number in the weight position yields
/// [`DEFAULT_ELEMENT_WEIGHT`]. A weight of zero is kept.
pub fn parse_filename(filename: &str, delimiter: &str) -> (String, f64) {
    let stem = strip_extension(filename);

    if delimiter.is_empty() {
        return (stem.to_string(), DEFAULT_ELEMENT_WEIGHT);
    }

    match stem.rsplit_once(delimiter) {
        Some((name, weight)) => (name.to_string(), parse_weight(weight)),
        None => (stem.to_string(), DEFAULT_ELEMENT_WEIGHT),
    }
}

fn strip_extension(filename: &str) -> &str {
    // Byte offset of the fourth character from the end
    match filename.char_indices().rev().nth(3) {
        Some((cut, _)) if cut > 0 => filename.get(..cut).unwrap_or(filename),
        _ => filename,
    }
}

fn parse_weight(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(DEFAULT_ELEMENT_WEIGHT)
}
