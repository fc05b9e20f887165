//! Render state scoped to the edition currently being drawn

use crate::geometry::anchor::AnchorMap;
use crate::geometry::rect::Rect;
use crate::io::configuration::{Format, OCCLUSION_ALPHA_THRESHOLD};
use crate::render::canvas::{Canvas, RasterCanvas};
use crate::render::occlusion::OcclusionMask;
use image::Rgba;

/// Canvas, anchor map and occlusion mask of one edition
///
/// Passed explicitly through resolution and drawing and reset before every
/// edition, so nothing leaks from one edition into the next.
#[derive(Debug, Clone)]
pub struct RenderContext<C: Canvas = RasterCanvas> {
    /// Drawing surface
    pub canvas: C,
    /// Layers drawn so far in this edition
    pub anchors: AnchorMap,
    /// Solid pixels of the last occlusion source drawn
    pub occlusion: Option<OcclusionMask>,
    /// Canvas format
    pub format: Format,
}

impl RenderContext<RasterCanvas> {
    /// Context over a fresh transparent raster canvas
    pub fn new(format: Format) -> Self {
        Self::with_canvas(RasterCanvas::new(format.width, format.height), format)
    }
}

impl<C: Canvas> RenderContext<C> {
    /// Context over an existing canvas
    pub fn with_canvas(canvas: C, format: Format) -> Self {
        Self {
            canvas,
            anchors: AnchorMap::new(),
            occlusion: None,
            format,
        }
    }

    /// Clear the canvas and forget anchors and the occlusion mask
    pub fn reset(&mut self) {
        self.canvas.clear();
        self.anchors.clear();
        self.occlusion = None;
    }

    /// Fill the whole canvas with `color`
    pub fn fill_background(&mut self, color: Rgba<u8>) {
        let full = Rect::new(
            0.0,
            0.0,
            f64::from(self.format.width),
            f64::from(self.format.height),
        );
        self.canvas.fill_rect(&full, color);
    }

    /// Snapshot the current canvas alpha as the occlusion mask
    pub fn capture_occlusion(&mut self) {
        self.occlusion = Some(OcclusionMask::capture(
            self.canvas.pixels(),
            OCCLUSION_ALPHA_THRESHOLD,
        ));
    }
}
