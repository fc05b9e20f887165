//! Case-insensitive filename pattern matching
//!
//! Patterns are plain substrings. When several patterns match, the first one
//! in declaration order wins.

use serde::{Deserialize, Serialize};

/// Size constraint multiplier applied when a filename contains `pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeMultiplier {
    /// Substring searched for in the selected asset's filename
    pub pattern: String,
    /// Factor applied to the layer's size constraints
    pub multiplier: f64,
}

/// Whether `filename` contains `pattern`, ignoring case
pub fn matches_pattern(filename: &str, pattern: &str) -> bool {
    !pattern.is_empty() && filename.to_lowercase().contains(&pattern.to_lowercase())
}

/// First multiplier whose pattern occurs in `filename`
pub fn size_multiplier_for<'a>(
    filename: &str,
    multipliers: &'a [SizeMultiplier],
) -> Option<&'a SizeMultiplier> {
    multipliers
        .iter()
        .find(|m| matches_pattern(filename, &m.pattern))
}

/// Whether any of `patterns` occurs in `filename`
pub fn matches_any(filename: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| matches_pattern(filename, p))
}
