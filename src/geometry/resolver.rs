//! Geometry resolution for one layer of one edition
//!
//! The pipeline runs in a fixed order and every stage only sees the output of
//! the previous one:
//!
//! 1. base size from explicit, natural or aspect-fit dimensions
//! 2. size constraints, optionally scaled by a filename multiplier
//! 3. scale factor
//! 4. anchoring against a layer already drawn in this edition
//! 5. clamping into another layer's bounding box
//! 6. random position and jitter
//! 7. random effects
//!
//! Random draws happen in the order scale, position, rotation, opacity, blend,
//! tint, glow, shadow so a seed reproduces the same layout.

use crate::catalog::layer::LayerOptions;
use crate::dna::selection::RandomSelector;
use crate::geometry::anchor::{AnchorMap, AnchorSpec, PlacedLayer};
use crate::geometry::bounds::BoundingBox;
use crate::geometry::patterns::{matches_any, size_multiplier_for};
use crate::geometry::rect::Rect;
use crate::io::configuration::{Format, RANDOM_BLEND_MODES, SHADOW_OFFSET_RANGE};
use crate::render::blend::BlendMode;
use crate::render::color::hsl_color;
use crate::render::effects::{Halo, Tint};
use tracing::{debug, warn};

/// Everything the resolver needs to know about the layer being placed
#[derive(Debug, Clone, Copy)]
pub struct LayerInput<'a> {
    /// Display name, used for diagnostics
    pub name: &'a str,
    /// Layer options
    pub options: &'a LayerOptions,
    /// File name of the selected element
    pub filename: &'a str,
    /// Natural width of the decoded asset
    pub natural_width: f64,
    /// Natural height of the decoded asset
    pub natural_height: f64,
    /// Visible content of the decoded asset
    pub bounds: &'a BoundingBox,
}

/// Drawing parameters chosen for the layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effects {
    /// Rotation about the layer centre in radians
    pub rotation: f64,
    /// Global alpha
    pub opacity: f64,
    /// Composite operation
    pub blend: BlendMode,
    /// Rainbow tint overlay
    pub tint: Option<Tint>,
    /// Glow; takes priority over the shadow when both are set
    pub glow: Option<Halo>,
    /// Drop shadow
    pub shadow: Option<Halo>,
}

impl Effects {
    /// Halo actually drawn: the glow if any, else the shadow
    pub fn halo(&self) -> Option<&Halo> {
        self.glow.as_ref().or(self.shadow.as_ref())
    }
}

/// Final placement of a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGeometry {
    /// Drawn rectangle
    pub rect: Rect,
    /// Visible content in canvas space
    pub bounds: Rect,
    /// Random displacement applied in the jitter stage, drawn once per edition;
    /// zero after [`ResolvedGeometry::moved_to`], whose position already
    /// includes any jitter
    pub jitter: (f64, f64),
    /// Drawing parameters
    pub effects: Effects,
    natural_width: f64,
    natural_height: f64,
    source_bounds: BoundingBox,
}

impl ResolvedGeometry {
    /// Same size and effects with the top-left corner moved to `(x, y)`
    #[must_use]
    pub fn moved_to(&self, x: f64, y: f64) -> Self {
        let rect = Rect::new(x, y, self.rect.width, self.rect.height);
        Self {
            rect,
            bounds: self.source_bounds.to_canvas(&rect),
            jitter: (0.0, 0.0),
            ..*self
        }
    }

    /// Anchor map entry for this placement
    pub const fn placed(&self) -> PlacedLayer {
        PlacedLayer {
            rect: self.rect,
            original_width: self.natural_width,
            original_height: self.natural_height,
            bounds: self.bounds,
        }
    }
}

/// Resolve position, size and effects of one layer
pub fn resolve(
    input: &LayerInput<'_>,
    format: &Format,
    anchors: &AnchorMap,
    rng: &mut RandomSelector,
) -> ResolvedGeometry {
    let options = input.options;
    let canvas_w = f64::from(format.width);
    let canvas_h = f64::from(format.height);

    let sized = constrained_size(input, canvas_w, canvas_h);

    let scale = if options.random_scale
        && let Some([min, max]) = options.scale_range
    {
        rng.between(min, max)
    } else {
        options.scale
    };
    let width = sized.width * scale;
    let height = sized.height * scale;

    let unanchored = Rect::new(sized.x, sized.y, width, height);
    let mut rect = anchored_rect(input, unanchored, anchors);
    rect = constrained_rect(input, rect, anchors);

    let mut jitter = (0.0, 0.0);
    if options.random_position {
        let x = rng.unit().mul_add(canvas_w, -width / 2.0);
        let y = rng.unit().mul_add(canvas_h, -height / 2.0);
        rect = Rect::new(x, y, width, height);
    }
    if let Some(span) = options.position_jitter.filter(|j| *j > 0.0) {
        jitter = (rng.centered(span), rng.centered(span));
    }
    if let Some(span) = options.baseline_jitter.filter(|j| *j > 0.0) {
        jitter.1 += rng.centered(span);
    }
    rect = rect.translated(jitter.0, jitter.1);

    let effects = draw_effects(options, rng);

    ResolvedGeometry {
        rect,
        bounds: input.bounds.to_canvas(&rect),
        jitter,
        effects,
        natural_width: input.natural_width,
        natural_height: input.natural_height,
        source_bounds: *input.bounds,
    }
}

/// New top-left corner for a randomly positioned layer of the given size
pub fn random_position(
    rng: &mut RandomSelector,
    format: &Format,
    width: f64,
    height: f64,
    position_jitter: Option<f64>,
) -> (f64, f64) {
    let mut x = rng.unit().mul_add(f64::from(format.width), -width / 2.0);
    let mut y = rng.unit().mul_add(f64::from(format.height), -height / 2.0);
    if let Some(span) = position_jitter.filter(|j| *j > 0.0) {
        x += rng.centered(span);
        y += rng.centered(span);
    }
    (x, y)
}

/// Size after base dimensions and max constraints, positioned unanchored
fn constrained_size(input: &LayerInput<'_>, canvas_w: f64, canvas_h: f64) -> Rect {
    let options = input.options;
    let box_x = options.x.unwrap_or(0.0);
    let box_y = options.y.unwrap_or(0.0);
    let box_w = options.width.unwrap_or(canvas_w);
    let box_h = options.height.unwrap_or(canvas_h);

    let has_natural = input.natural_width > 0.0 && input.natural_height > 0.0;
    let fits_aspect = options.maintain_aspect_ratio && !options.use_actual_dimensions && has_natural;
    let has_max = options.max_width.is_some() || options.max_height.is_some();

    let multiplier = match size_multiplier_for(input.filename, &options.filename_size_multipliers) {
        Some(m) if fits_aspect || has_max => m.multiplier,
        Some(m) => {
            debug!(
                layer = input.name,
                pattern = %m.pattern,
                "size multiplier matched but the layer has no size constraint"
            );
            1.0
        }
        None => 1.0,
    };

    // Aspect-fit layers are centred in their (possibly multiplied) box
    let (mut width, mut height, frame) = if options.use_actual_dimensions && has_natural {
        (input.natural_width, input.natural_height, None)
    } else if fits_aspect {
        let fit_w = box_w * multiplier;
        let fit_h = box_h * multiplier;
        let ratio = (fit_w / input.natural_width).min(fit_h / input.natural_height);
        (
            input.natural_width * ratio,
            input.natural_height * ratio,
            Some((fit_w, fit_h)),
        )
    } else {
        (box_w, box_h, None)
    };

    let mut shrink: f64 = 1.0;
    if let Some(max_w) = options.max_width
        && width > 0.0
    {
        shrink = shrink.min(max_w * multiplier / width);
    }
    if let Some(max_h) = options.max_height
        && height > 0.0
    {
        shrink = shrink.min(max_h * multiplier / height);
    }
    width *= shrink;
    height *= shrink;

    let (offset_x, offset_y) =
        frame.map_or((0.0, 0.0), |(fit_w, fit_h)| ((fit_w - width) / 2.0, (fit_h - height) / 2.0));

    Rect::new(box_x + offset_x, box_y + offset_y, width, height)
}

fn anchored_rect(input: &LayerInput<'_>, unanchored: Rect, anchors: &AnchorMap) -> Rect {
    let options = input.options;
    let Some(anchor_name) = options.anchor_to.as_deref() else {
        return unanchored;
    };

    let Some(anchor) = anchors.get(anchor_name) else {
        warn!(
            layer = input.name,
            anchor = anchor_name,
            "anchor layer has not been drawn, using fallback position"
        );
        return Rect::new(
            options.fallback_x.unwrap_or(unanchored.x),
            options.fallback_y.unwrap_or(unanchored.y),
            unanchored.width,
            unanchored.height,
        );
    };

    let anchor_spec = options.anchor_point.unwrap_or_default();
    let reference = anchor.reference_rect(anchor_spec, options.use_bounds);
    let (anchor_x, anchor_y) = anchor_spec.position.point_on(&reference);

    let (align_x, align_y) = align_offset(input, options.align.unwrap_or_default(), &unanchored);

    Rect::new(
        options.relative_offset_x.mul_add(reference.width, anchor_x - align_x + options.offset_x),
        options.relative_offset_y.mul_add(reference.height, anchor_y - align_y + options.offset_y),
        unanchored.width,
        unanchored.height,
    )
}

/// Offset of this layer's alignment point from its own top-left corner
fn align_offset(input: &LayerInput<'_>, align: AnchorSpec, sized: &Rect) -> (f64, f64) {
    let local = Rect::new(0.0, 0.0, sized.width, sized.height);
    let reference = if align.uses_bounds(input.options.use_bounds) {
        input.bounds.to_canvas(&local)
    } else {
        local
    };
    align.position.point_on(&reference)
}

fn constrained_rect(input: &LayerInput<'_>, rect: Rect, anchors: &AnchorMap) -> Rect {
    let options = input.options;
    let Some(target_name) = options.constrain_to_bounds.as_deref() else {
        return rect;
    };
    if matches_any(input.filename, &options.constraint_disable_patterns) {
        debug!(layer = input.name, filename = input.filename, "bounds constraint disabled by filename");
        return rect;
    }
    let Some(target) = anchors.get(target_name) else {
        warn!(
            layer = input.name,
            target = target_name,
            "constraint layer has not been drawn, leaving position unclamped"
        );
        return rect;
    };

    let content = input.bounds.to_canvas(&rect);
    let limit = target.bounds;
    let dx = clamp_shift(content.x, content.width, limit.x, limit.width);
    let dy = clamp_shift(content.y, content.height, limit.y, limit.height);
    rect.translated(dx, dy)
}

/// Translation along one axis that keeps `[start, start + len)` inside the limit
fn clamp_shift(start: f64, len: f64, limit_start: f64, limit_len: f64) -> f64 {
    if len > limit_len {
        (limit_start + limit_len / 2.0) - (start + len / 2.0)
    } else if start < limit_start {
        limit_start - start
    } else if start + len > limit_start + limit_len {
        (limit_start + limit_len) - (start + len)
    } else {
        0.0
    }
}

fn draw_effects(options: &LayerOptions, rng: &mut RandomSelector) -> Effects {
    let mut rotation = options.rotate;
    if options.random_rotate {
        rotation += rng.centered(2.0 * options.rotate_range);
    }

    let opacity = match options.opacity_range {
        Some([min, max]) if options.random_opacity => rng.between(min, max),
        _ => options.opacity,
    };

    let blend = if options.random_blend {
        rng.index(RANDOM_BLEND_MODES.len())
            .and_then(|i| RANDOM_BLEND_MODES.get(i).copied())
            .unwrap_or(options.blend)
    } else {
        options.blend
    };

    let tint = match options.tint_intensity {
        Some([min, max]) if options.rainbow_tint => Some(Tint {
            intensity: rng.between(min, max),
            hue_offset: rng.unit() * 360.0,
        }),
        _ => None,
    };

    let glow = match options.glow_radius {
        Some([min, max]) if options.random_glow => {
            let radius = rng.between(min, max);
            let hue = (rng.unit() * 360.0).floor();
            Some(Halo {
                radius,
                offset_x: 0.0,
                offset_y: 0.0,
                color: hsl_color(hue, 100.0, 60.0, 1.0),
            })
        }
        _ => None,
    };

    let shadow = match options.shadow_blur {
        Some([min, max]) if options.random_shadow => {
            let radius = rng.between(min, max);
            let offset_x = rng.centered(SHADOW_OFFSET_RANGE);
            let offset_y = rng.centered(SHADOW_OFFSET_RANGE);
            let hue = (rng.unit() * 360.0).floor();
            let saturation = rng.unit().mul_add(50.0, 50.0).floor();
            Some(Halo {
                radius,
                offset_x,
                offset_y,
                color: hsl_color(hue, saturation, 30.0, 0.8),
            })
        }
        _ => None,
    };

    Effects {
        rotation,
        opacity,
        blend,
        tint: tint.filter(|t| t.intensity > 0.0),
        glow: glow.filter(|g| g.radius > 0.0),
        shadow: shadow.filter(|s| s.radius > 0.0),
    }
}
