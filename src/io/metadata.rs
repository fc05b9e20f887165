//! Edition metadata records
//!
//! One JSON file per edition plus a combined array for the whole run.

use crate::dna::token::Dna;
use crate::io::configuration::{COMBINED_METADATA_FILE, COMPILER_TAG, CollectionConfig};
use crate::io::error::{GenerationError, Result, file_system_error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One trait of an edition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Layer display name
    pub trait_type: String,
    /// Selected element display name
    pub value: String,
}

/// Metadata record of one edition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionMetadata {
    /// `<namePrefix> #<edition>`
    pub name: String,
    /// Collection description
    pub description: String,
    /// `<baseUri>/<edition>.png`
    pub image: String,
    /// SHA-256 of the edition's DNA string
    pub dna: String,
    /// Edition number
    pub edition: usize,
    /// Generation time in milliseconds since the Unix epoch
    pub date: u64,
    /// Configured extra fields
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    /// Traits in draw order
    pub attributes: Vec<Attribute>,
    /// Generator tag
    pub compiler: String,
}

impl EditionMetadata {
    /// Build the record of `edition` from its DNA and drawn traits
    pub fn new(config: &CollectionConfig, edition: usize, dna: &Dna, attributes: Vec<Attribute>) -> Self {
        Self {
            name: format!("{} #{edition}", config.name_prefix),
            description: config.description.clone(),
            image: format!("{}/{edition}.png", config.base_uri),
            dna: dna.hash(),
            edition,
            date: now_millis(),
            extra: config.extra_metadata.clone(),
            attributes,
            compiler: COMPILER_TAG.to_string(),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

/// Writes metadata JSON into a build directory's `json/` folder
#[derive(Debug, Clone)]
pub struct MetadataWriter {
    json_dir: PathBuf,
}

impl MetadataWriter {
    /// Writer targeting `json_dir`
    pub fn new(json_dir: impl Into<PathBuf>) -> Self {
        Self {
            json_dir: json_dir.into(),
        }
    }

    /// Path of the record for `edition`
    pub fn edition_path(&self, edition: usize) -> PathBuf {
        self.json_dir.join(format!("{edition}.json"))
    }

    /// Path of the combined array
    pub fn combined_path(&self) -> PathBuf {
        self.json_dir.join(COMBINED_METADATA_FILE)
    }

    /// Write `json/<edition>.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialised or written
    pub fn write_edition(&self, record: &EditionMetadata) -> Result<()> {
        write_json(&self.edition_path(record.edition), record)
    }

    /// Write `json/_metadata.json` with every record
    ///
    /// # Errors
    ///
    /// Returns an error if the array cannot be serialised or written
    pub fn write_combined(&self, records: &[EditionMetadata]) -> Result<()> {
        write_json(&self.combined_path(), records)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| GenerationError::Metadata {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system_error(parent, "create directory", e))?;
    }
    std::fs::write(path, text).map_err(|e| file_system_error(path, "write metadata", e))
}
