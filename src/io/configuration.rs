//! Generation constants and the JSON collection configuration

use crate::catalog::layer::LayerDefinition;
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::render::blend::BlendMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// DNA string format
/// Separator between DNA tokens
pub const DNA_DELIMITER: &str = "-";
/// Query suffix marking a token that does not count towards uniqueness
pub const BYPASS_DNA_FLAG: &str = "bypassDNA=true";

// Catalog defaults
/// Separator between display name and rarity weight in asset filenames
pub const DEFAULT_RARITY_DELIMITER: &str = "#";
/// Weight assigned when the filename carries no parseable weight
pub const DEFAULT_ELEMENT_WEIGHT: f64 = 1.0;

// Low on purpose: anti-aliased edges must count as content for anchoring
/// Alpha value a pixel must exceed to count towards a bounding box
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 1;

// Occlusion checks
/// Alpha value a pixel must exceed to count as solid for occlusion
pub const OCCLUSION_ALPHA_THRESHOLD: u8 = 10;
/// Placement attempts for a free-floating layer before the instance is dropped
pub const MAX_OCCLUSION_ATTEMPTS: usize = 100;

// Randomised effect defaults
/// Rotation range in radians used when `randomRotate` has no explicit range
pub const DEFAULT_ROTATE_RANGE: f64 = 0.08;
/// Maximum offset in pixels of a random drop shadow along each axis
pub const SHADOW_OFFSET_RANGE: f64 = 20.0;
/// Largest glow or shadow blur radius in pixels
pub const MAX_HALO_RADIUS: f64 = 64.0;
/// Candidates for `randomBlend`; repeated entries are proportionally likelier
pub const RANDOM_BLEND_MODES: [BlendMode; 12] = [
    BlendMode::SourceOver,
    BlendMode::SourceOver,
    BlendMode::SourceOver,
    BlendMode::Overlay,
    BlendMode::SoftLight,
    BlendMode::Multiply,
    BlendMode::Screen,
    BlendMode::Lighten,
    BlendMode::Darken,
    BlendMode::ColorBurn,
    BlendMode::HardLight,
    BlendMode::Luminosity,
];

// Uniqueness
/// Consecutive duplicate DNA draws tolerated before the run aborts
pub const DEFAULT_UNIQUE_DNA_TOLERANCE: usize = 10_000;

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// First edition number
pub const DEFAULT_START_INDEX: usize = 1;

// Progress bar display settings
/// Threshold for switching to a single aggregate progress bar
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Subdirectory of the build directory receiving edition PNGs
pub const IMAGES_DIR: &str = "images";
/// Subdirectory of the build directory receiving metadata JSON
pub const JSON_DIR: &str = "json";
/// File name of the combined metadata array
pub const COMBINED_METADATA_FILE: &str = "_metadata.json";
/// Compiler tag written into every metadata record
pub const COMPILER_TAG: &str = "collagen layered edition engine";

/// Canvas format shared by every edition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Bilinear sampling when layers are scaled or rotated
    #[serde(default = "default_true")]
    pub smoothing: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            smoothing: true,
        }
    }
}

/// Background fill drawn before the first layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Background {
    /// Whether a background fill is drawn at all
    pub generate: bool,
    /// Use `default` for every edition instead of a random hue
    #[serde(rename = "static")]
    pub is_static: bool,
    /// Static fill colour as `#rrggbb` or `#rrggbbaa`
    pub default: String,
    /// Lightness percentage of random fills
    pub brightness: f64,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            generate: true,
            is_static: true,
            default: "#ffffff".to_string(),
            brightness: 80.0,
        }
    }
}

/// One block of editions sharing a layer order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfiguration {
    /// Collection size reached once this block is done
    pub grow_edition_size_to: usize,
    /// Layers in draw order
    pub layers_order: Vec<LayerDefinition>,
    /// Overrides the global scramble switch
    #[serde(default)]
    pub scramble_layers: Option<bool>,
    /// Overrides the global list of layers to scramble
    #[serde(default)]
    pub scramble_layer_names: Option<Vec<String>>,
    /// Overrides the global anchor-dependency rule for scrambling
    #[serde(default)]
    pub respect_anchor_dependencies: Option<bool>,
}

/// Complete collection configuration as read from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Canvas format
    #[serde(default)]
    pub format: Format,
    /// Background fill
    #[serde(default)]
    pub background: Background,
    /// Consecutive edition blocks
    pub layer_configurations: Vec<LayerConfiguration>,
    /// Duplicate draws tolerated before the run aborts
    #[serde(default = "default_tolerance", alias = "uniqueDnaTorrance")]
    pub unique_dna_tolerance: usize,
    /// Separator between display name and weight in asset filenames
    #[serde(default = "default_rarity_delimiter")]
    pub rarity_delimiter: String,
    /// Metadata name prefix
    #[serde(default)]
    pub name_prefix: String,
    /// Metadata description
    #[serde(default)]
    pub description: String,
    /// Base URI of edition images in metadata
    #[serde(default)]
    pub base_uri: String,
    /// Extra fields merged into every metadata record
    #[serde(default)]
    pub extra_metadata: serde_json::Map<String, serde_json::Value>,
    /// Shuffle the edition numbers handed out to produced editions
    #[serde(default)]
    pub shuffle_layer_configurations: bool,
    /// First edition number
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    /// Root directory holding one subdirectory per layer kind
    #[serde(default = "default_layers_dir")]
    pub layers_dir: PathBuf,
    /// Output directory
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    /// Emit per-edition debug traces
    #[serde(default)]
    pub debug_logs: bool,
    /// Scramble draw order by default
    #[serde(default)]
    pub scramble_layers: bool,
    /// Layers scrambled by default; empty means every layer but the first
    #[serde(default)]
    pub scramble_layer_names: Vec<String>,
    /// Keep anchored layers after their anchors when scrambling
    #[serde(default)]
    pub respect_anchor_dependencies: bool,
}

const fn default_true() -> bool {
    true
}

const fn default_tolerance() -> usize {
    DEFAULT_UNIQUE_DNA_TOLERANCE
}

const fn default_start_index() -> usize {
    DEFAULT_START_INDEX
}

fn default_rarity_delimiter() -> String {
    DEFAULT_RARITY_DELIMITER.to_string()
}

fn default_layers_dir() -> PathBuf {
    PathBuf::from("layers")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

/// Scramble settings after applying per-configuration overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleSettings {
    /// Scrambling enabled
    pub enabled: bool,
    /// Layer names eligible for scrambling
    pub names: Vec<String>,
    /// Anchored layers stay after their anchors
    pub respect_anchor_dependencies: bool,
}

impl CollectionConfig {
    /// Read and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON for the
    /// schema, or fails [`CollectionConfig::validate`]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenerationError::FileSystem {
            path: path.to_path_buf(),
            operation: "read configuration",
            source: e,
        })?;
        let config = Self::from_json(&text).map_err(|e| match e {
            GenerationError::ConfigParse { source, .. } => GenerationError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the schema or fails validation
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| GenerationError::ConfigParse {
                path: PathBuf::from("<inline>"),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an `InvalidParameter` error naming the first offending value
    pub fn validate(&self) -> Result<()> {
        if self.format.width == 0 || self.format.height == 0 {
            return Err(invalid_parameter(
                "format",
                &format!("{}x{}", self.format.width, self.format.height),
                &"canvas dimensions must be positive",
            ));
        }
        if self.layer_configurations.is_empty() {
            return Err(invalid_parameter(
                "layerConfigurations",
                &"[]",
                &"at least one layer configuration is required",
            ));
        }
        if self.rarity_delimiter.is_empty() {
            return Err(invalid_parameter(
                "rarityDelimiter",
                &"\"\"",
                &"delimiter must not be empty",
            ));
        }
        if !(0.0..=100.0).contains(&self.background.brightness) {
            return Err(invalid_parameter(
                "background.brightness",
                &self.background.brightness,
                &"must be a percentage between 0 and 100",
            ));
        }

        let mut previous_target = 0;
        for configuration in &self.layer_configurations {
            if configuration.layers_order.is_empty() {
                return Err(invalid_parameter(
                    "layersOrder",
                    &"[]",
                    &"a layer configuration needs at least one layer",
                ));
            }
            if configuration.grow_edition_size_to < previous_target {
                return Err(invalid_parameter(
                    "growEditionSizeTo",
                    &configuration.grow_edition_size_to,
                    &"must not decrease between layer configurations",
                ));
            }
            previous_target = configuration.grow_edition_size_to;

            for layer in &configuration.layers_order {
                layer.options.validate()?;
            }
        }
        Ok(())
    }

    /// Resolve the scramble settings for one layer configuration
    pub fn scramble_settings(&self, configuration: &LayerConfiguration) -> ScrambleSettings {
        ScrambleSettings {
            enabled: configuration
                .scramble_layers
                .unwrap_or(self.scramble_layers),
            names: configuration
                .scramble_layer_names
                .clone()
                .unwrap_or_else(|| self.scramble_layer_names.clone()),
            respect_anchor_dependencies: configuration
                .respect_anchor_dependencies
                .unwrap_or(self.respect_anchor_dependencies),
        }
    }

    /// Number of editions the whole run produces
    pub fn total_editions(&self) -> usize {
        self.layer_configurations
            .last()
            .map_or(0, |c| c.grow_edition_size_to)
    }
}
