//! Layer definitions as configured and layers as loaded for a run
//!
//! Behaviour that depends on what a layer *is* (a background that must always
//! be present, a solid body other layers must not overlap, a prop that floats
//! freely) is expressed through [`LayerCapabilities`] instead of by matching
//! layer names.

use crate::catalog::element::AssetElement;
use crate::catalog::scanner::scan_layer_directory;
use crate::geometry::anchor::AnchorSpec;
use crate::geometry::patterns::SizeMultiplier;
use crate::io::configuration::{DEFAULT_ALPHA_THRESHOLD, DEFAULT_ROTATE_RANGE, MAX_HALO_RADIUS};
use crate::io::error::{Result, invalid_parameter};
use crate::render::blend::BlendMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Behaviour tags attached to a layer at configuration time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
// Each flag is an independent switch read from configuration
#[allow(clippy::struct_excessive_bools)]
pub struct LayerCapabilities {
    /// Never skipped: empty catalogs are fatal and zero weights become uniform
    pub mandatory: bool,
    /// Sub-layers of the same kind never pick the same element in one edition
    pub no_repeat_within_image: bool,
    /// Drawn pixels become the occlusion mask for free-floating layers
    pub occlusion_source: bool,
    /// Randomly positioned instances are moved off the occlusion mask
    pub free_floating: bool,
    /// Selection weights are divided by how often each element was used
    pub fairness_rotation: bool,
}

/// One entry of a configured layer order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    /// Layer kind; also the asset directory name
    pub name: String,
    /// Behaviour tags
    #[serde(default)]
    pub capabilities: LayerCapabilities,
    /// Geometry, anchoring, randomisation and gating options
    #[serde(default)]
    pub options: LayerOptions,
}

impl LayerDefinition {
    /// Definition with default options, mostly useful for tests and benches
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: LayerCapabilities::default(),
            options: LayerOptions::default(),
        }
    }
}

/// Per-layer option bag
///
/// Every field is optional in JSON. Ranges are `[min, max]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LayerOptions {
    /// Trait name used for metadata and anchoring instead of the kind
    pub display_name: Option<String>,

    /// Explicit left edge
    pub x: Option<f64>,
    /// Explicit top edge
    pub y: Option<f64>,
    /// Explicit width, canvas width when unset
    pub width: Option<f64>,
    /// Explicit height, canvas height when unset
    pub height: Option<f64>,
    /// Draw at the asset's natural pixel size
    pub use_actual_dimensions: bool,
    /// Fit the asset into the width/height box keeping its aspect ratio
    pub maintain_aspect_ratio: bool,
    /// Upper bound on the resolved width
    pub max_width: Option<f64>,
    /// Upper bound on the resolved height
    pub max_height: Option<f64>,
    /// Filename patterns that scale the size constraints
    pub filename_size_multipliers: Vec<SizeMultiplier>,

    /// Display name of an earlier layer to position against
    pub anchor_to: Option<String>,
    /// Point on the anchor layer
    pub anchor_point: Option<AnchorSpec>,
    /// Point on this layer placed onto the anchor point
    pub align: Option<AnchorSpec>,
    /// Pixel offset added after anchoring
    pub offset_x: f64,
    /// Pixel offset added after anchoring
    pub offset_y: f64,
    /// Offset as a fraction of the anchor rectangle width
    pub relative_offset_x: f64,
    /// Offset as a fraction of the anchor rectangle height
    pub relative_offset_y: f64,
    /// Unprefixed anchor points use bounding boxes rather than raw rectangles
    pub use_bounds: bool,
    /// Alpha a pixel must exceed to count towards this layer's bounding box
    pub alpha_threshold: u8,
    /// Display name of an earlier layer whose bounding box contains this one
    pub constrain_to_bounds: Option<String>,
    /// Filename patterns that switch the bounds constraint off
    pub constraint_disable_patterns: Vec<String>,
    /// Left edge used when the anchor layer is missing
    pub fallback_x: Option<f64>,
    /// Top edge used when the anchor layer is missing
    pub fallback_y: Option<f64>,

    /// Place the layer centre anywhere on the canvas
    pub random_position: bool,
    /// Maximum random displacement on both axes
    pub position_jitter: Option<f64>,
    /// Maximum random vertical displacement
    pub baseline_jitter: Option<f64>,
    /// Fixed rotation in radians
    pub rotate: f64,
    /// Add a random rotation in `[-rotateRange, rotateRange]`
    pub random_rotate: bool,
    /// Random rotation bound in radians
    pub rotate_range: f64,
    /// Fixed scale factor applied after size constraints
    pub scale: f64,
    /// Draw the scale factor from `scaleRange`
    pub random_scale: bool,
    /// Random scale bounds
    pub scale_range: Option<[f64; 2]>,
    /// Global alpha
    pub opacity: f64,
    /// Draw the opacity from `opacityRange`
    pub random_opacity: bool,
    /// Random opacity bounds
    pub opacity_range: Option<[f64; 2]>,
    /// Composite operation
    pub blend: BlendMode,
    /// Pick a blend mode from the weighted random list
    pub random_blend: bool,
    /// Overlay a rainbow gradient on the drawn pixels
    pub rainbow_tint: bool,
    /// Tint strength bounds
    pub tint_intensity: Option<[f64; 2]>,
    /// Surround the layer with a coloured glow
    pub random_glow: bool,
    /// Glow radius bounds
    pub glow_radius: Option<[f64; 2]>,
    /// Cast an offset drop shadow
    pub random_shadow: bool,
    /// Shadow blur radius bounds
    pub shadow_blur: Option<[f64; 2]>,

    /// Chance in `[0, 1]` that the layer takes part in an edition
    pub probability: Option<f64>,
    /// Kind or display name of a layer this one never appears together with
    pub mutually_exclusive_with: Option<String>,
    /// Selection for this layer does not count towards uniqueness
    #[serde(rename = "bypassDNA", alias = "bypassDna")]
    pub bypass_dna: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            display_name: None,
            x: None,
            y: None,
            width: None,
            height: None,
            use_actual_dimensions: false,
            maintain_aspect_ratio: false,
            max_width: None,
            max_height: None,
            filename_size_multipliers: Vec::new(),
            anchor_to: None,
            anchor_point: None,
            align: None,
            offset_x: 0.0,
            offset_y: 0.0,
            relative_offset_x: 0.0,
            relative_offset_y: 0.0,
            use_bounds: true,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            constrain_to_bounds: None,
            constraint_disable_patterns: Vec::new(),
            fallback_x: None,
            fallback_y: None,
            random_position: false,
            position_jitter: None,
            baseline_jitter: None,
            rotate: 0.0,
            random_rotate: false,
            rotate_range: DEFAULT_ROTATE_RANGE,
            scale: 1.0,
            random_scale: false,
            scale_range: None,
            opacity: 1.0,
            random_opacity: false,
            opacity_range: None,
            blend: BlendMode::SourceOver,
            random_blend: false,
            rainbow_tint: false,
            tint_intensity: None,
            random_glow: false,
            glow_radius: None,
            random_shadow: false,
            shadow_blur: None,
            probability: None,
            mutually_exclusive_with: None,
            bypass_dna: false,
        }
    }
}

impl LayerOptions {
    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an `InvalidParameter` error naming the first offending option
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.probability
            && !(0.0..=1.0).contains(&p)
        {
            return Err(invalid_parameter("probability", &p, &"must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(invalid_parameter("opacity", &self.opacity, &"must be within [0, 1]"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid_parameter("scale", &self.scale, &"must be positive"));
        }
        if !(self.rotate_range.is_finite() && self.rotate_range >= 0.0) {
            return Err(invalid_parameter(
                "rotateRange",
                &self.rotate_range,
                &"must be non-negative",
            ));
        }

        for (parameter, value) in [
            ("width", self.width),
            ("height", self.height),
            ("maxWidth", self.max_width),
            ("maxHeight", self.max_height),
        ] {
            if let Some(v) = value
                && !(v.is_finite() && v > 0.0)
            {
                return Err(invalid_parameter(parameter, &v, &"must be positive"));
            }
        }

        check_range("scaleRange", self.scale_range, 0.0, f64::INFINITY)?;
        check_range("opacityRange", self.opacity_range, 0.0, 1.0)?;
        check_range("tintIntensity", self.tint_intensity, 0.0, 1.0)?;
        check_range("glowRadius", self.glow_radius, 0.0, MAX_HALO_RADIUS)?;
        check_range("shadowBlur", self.shadow_blur, 0.0, MAX_HALO_RADIUS)?;

        for multiplier in &self.filename_size_multipliers {
            if !(multiplier.multiplier.is_finite() && multiplier.multiplier > 0.0) {
                return Err(invalid_parameter(
                    "filenameSizeMultipliers",
                    &multiplier.pattern,
                    &"multiplier must be positive",
                ));
            }
        }
        Ok(())
    }
}

fn check_range(parameter: &'static str, range: Option<[f64; 2]>, low: f64, high: f64) -> Result<()> {
    let Some([min, max]) = range else {
        return Ok(());
    };
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(invalid_parameter(
            parameter,
            &format!("[{min}, {max}]"),
            &"range must be finite with min <= max",
        ));
    }
    if min < low || max > high {
        return Err(invalid_parameter(
            parameter,
            &format!("[{min}, {max}]"),
            &format!("range must lie within [{low}, {high}]"),
        ));
    }
    Ok(())
}

/// A layer definition paired with its scanned catalog
#[derive(Debug, Clone)]
pub struct Layer {
    /// Position in the layer order; DNA tokens are bound to this slot
    pub index: usize,
    /// Layer kind (asset directory name)
    pub kind: String,
    /// Trait name: the display name override or the kind
    pub name: String,
    /// Behaviour tags
    pub capabilities: LayerCapabilities,
    /// Configured options
    pub options: LayerOptions,
    /// Selectable elements in id order
    pub elements: Vec<AssetElement>,
}

impl Layer {
    /// Build a layer from its definition and an already scanned catalog
    pub fn new(index: usize, definition: &LayerDefinition, elements: Vec<AssetElement>) -> Self {
        Self {
            index,
            kind: definition.name.clone(),
            name: definition
                .options
                .display_name
                .clone()
                .unwrap_or_else(|| definition.name.clone()),
            capabilities: definition.capabilities,
            options: definition.options.clone(),
            elements,
        }
    }

    /// Whether the layer may legitimately contribute no token to a DNA
    pub fn is_conditional(&self) -> bool {
        self.options.probability.is_some_and(|p| p < 1.0)
            || self.options.mutually_exclusive_with.is_some()
    }

    /// Look up an element by catalog id
    pub fn element(&self, id: usize) -> Option<&AssetElement> {
        self.elements.get(id)
    }

    /// Look up an element by its on-disk file name
    pub fn element_by_filename(&self, filename: &str) -> Option<&AssetElement> {
        self.elements.iter().find(|e| e.filename == filename)
    }
}

/// Scan the catalog of every layer in `order`
///
/// Kinds used by several sub-layers are scanned once and share one catalog.
///
/// # Errors
///
/// Returns `CatalogRead` if any layer directory cannot be read
pub fn layers_setup(
    order: &[LayerDefinition],
    layers_dir: &Path,
    delimiter: &str,
) -> Result<Vec<Layer>> {
    let mut catalogs: HashMap<&str, Vec<AssetElement>> = HashMap::new();
    let mut layers = Vec::with_capacity(order.len());

    for (index, definition) in order.iter().enumerate() {
        let elements = if let Some(elements) = catalogs.get(definition.name.as_str()) {
            elements.clone()
        } else {
            let elements = scan_layer_directory(&layers_dir.join(&definition.name), delimiter)?;
            catalogs.insert(definition.name.as_str(), elements.clone());
            elements
        };
        layers.push(Layer::new(index, definition, elements));
    }

    Ok(layers)
}
