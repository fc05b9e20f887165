//! Error types for catalog scanning, edition generation and output writing

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
///
/// Only conditions that indicate a configuration or I/O defect are represented
/// here. Per-layer anomalies (missing anchors, unknown DNA tokens, exhausted
/// no-repeat pools) are logged and recovered from where they occur.
#[derive(Debug)]
pub enum GenerationError {
    /// Layer asset directory could not be read
    CatalogRead {
        /// Directory that was scanned
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A mandatory layer has nothing to select from
    EmptyCatalog {
        /// Layer kind (asset directory name)
        layer: String,
    },

    /// Uniqueness retry budget exhausted before the collection was complete
    CollectionExhausted {
        /// Edition number that could not be produced
        edition: usize,
        /// Consecutive duplicate draws before giving up
        attempts: usize,
        /// Edition count the active layer configuration grows to
        target: usize,
    },

    /// Failed to decode a layer asset
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered edition to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Collection configuration file is not valid JSON for the schema
    ConfigParse {
        /// Configuration file path
        path: PathBuf,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// Configuration value failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Metadata record could not be serialized
    Metadata {
        /// Metadata file being written
        path: PathBuf,
        /// Underlying serialization error
        source: serde_json::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogRead { path, source } => {
                write!(
                    f,
                    "Failed to read layer directory '{}': {source}",
                    path.display()
                )
            }
            Self::EmptyCatalog { layer } => {
                write!(f, "Mandatory layer '{layer}' has no selectable elements")
            }
            Self::CollectionExhausted {
                edition,
                attempts,
                target,
            } => {
                write!(
                    f,
                    "No unique DNA for edition {edition} after {attempts} attempts; \
                     add layers or elements to reach edition {target}"
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::ConfigParse { path, source } => {
                write!(
                    f,
                    "Failed to parse configuration '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Metadata { path, source } => {
                write!(
                    f,
                    "Failed to write metadata '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::CatalogRead { source, .. } | Self::FileSystem { source, .. } => Some(source),
            Self::ConfigParse { source, .. } | Self::Metadata { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

impl From<image::ImageError> for GenerationError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to the path and operation that failed
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GenerationError {
    GenerationError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
