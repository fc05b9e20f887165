//! Drawing one selected layer into the current edition

use crate::catalog::element::AssetElement;
use crate::catalog::layer::Layer;
use crate::dna::selection::RandomSelector;
use crate::geometry::bounds::compute_bounds;
use crate::geometry::resolver::{LayerInput, ResolvedGeometry, random_position, resolve};
use crate::io::configuration::MAX_OCCLUSION_ATTEMPTS;
use crate::render::blend::BlendMode;
use crate::render::canvas::{Canvas, LayerRaster};
use crate::render::context::RenderContext;
use crate::render::effects::{halo_raster, tinted_source};
use crate::render::occlusion::{PlacementExhausted, find_free_placement};
use image::RgbaImage;
use tracing::{debug, warn};

/// A resolved selection with its decoded asset
#[derive(Debug, Clone, Copy)]
pub struct LayerDraw<'a> {
    /// Layer being drawn
    pub layer: &'a Layer,
    /// Selected element
    pub element: &'a AssetElement,
    /// Decoded asset pixels
    pub image: &'a RgbaImage,
}

/// Result of drawing a layer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// The layer was drawn and published to the anchor map
    Drawn {
        /// Final geometry
        geometry: ResolvedGeometry,
        /// Placements tried; 1 unless the occlusion check moved the layer
        attempts: usize,
    },
    /// No overlap-free placement was found; nothing was drawn
    Skipped(PlacementExhausted),
}

impl DrawOutcome {
    /// Whether the layer ended up on the canvas
    pub const fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn { .. })
    }
}

/// Resolve, place and draw one layer, then publish its geometry
///
/// Free-floating layers with a random position are moved until they avoid the
/// current occlusion mask; fixed placements are drawn where configured even if
/// they overlap. Occlusion sources refresh the mask after drawing.
pub fn draw_layer<C: Canvas>(
    ctx: &mut RenderContext<C>,
    draw: &LayerDraw<'_>,
    rng: &mut RandomSelector,
) -> DrawOutcome {
    let layer = draw.layer;
    let options = &layer.options;
    let smoothing = ctx.format.smoothing;
    let format = ctx.format;

    let bounds = compute_bounds(draw.image, options.alpha_threshold);
    let input = LayerInput {
        name: &layer.name,
        options,
        filename: &draw.element.filename,
        natural_width: f64::from(draw.image.width()),
        natural_height: f64::from(draw.image.height()),
        bounds: &bounds,
    };
    let mut geometry = resolve(&input, &format, &ctx.anchors, rng);
    let rotation = geometry.effects.rotation;

    let checks_occlusion = layer.capabilities.free_floating && options.random_position;
    let (raster, attempts) = match ctx.occlusion.as_ref().filter(|_| checks_occlusion) {
        Some(mask) => {
            let size = geometry.rect;
            let placement = find_free_placement(
                mask,
                geometry.rect,
                MAX_OCCLUSION_ATTEMPTS,
                |rect| LayerRaster::rasterize(draw.image, rect, rotation, smoothing),
                || random_position(rng, &format, size.width, size.height, options.position_jitter),
            );
            match placement {
                Ok(placement) => {
                    geometry = geometry.moved_to(placement.rect.x, placement.rect.y);
                    (placement.raster, placement.attempts)
                }
                Err(exhausted) => {
                    warn!(
                        layer = %layer.name,
                        attempts = exhausted.attempts,
                        "no placement clear of the occlusion mask, layer dropped"
                    );
                    return DrawOutcome::Skipped(exhausted);
                }
            }
        }
        None => (
            LayerRaster::rasterize(draw.image, &geometry.rect, rotation, smoothing),
            1,
        ),
    };

    let effects = geometry.effects;
    if let Some(halo) = effects.halo() {
        let halo_pixels = halo_raster(&raster, halo);
        ctx.canvas.draw_layer(&halo_pixels, effects.opacity, effects.blend);
    }

    ctx.canvas.draw_layer(&raster, effects.opacity, effects.blend);

    if let Some(tint) = effects.tint {
        let tinted = tinted_source(draw.image, geometry.rect.width, geometry.rect.height, &tint);
        let overlay = LayerRaster::rasterize(&tinted, &geometry.rect, rotation, smoothing);
        ctx.canvas.draw_layer(&overlay, 1.0, BlendMode::SourceOver);
    }

    ctx.anchors.publish(&layer.name, geometry.placed());

    if layer.capabilities.occlusion_source {
        ctx.capture_occlusion();
    }

    debug!(
        layer = %layer.name,
        element = %draw.element.name,
        x = geometry.rect.x,
        y = geometry.rect.y,
        width = geometry.rect.width,
        height = geometry.rect.height,
        attempts,
        "layer drawn"
    );

    DrawOutcome::Drawn { geometry, attempts }
}
