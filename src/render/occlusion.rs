//! Occlusion mask capture and overlap-free placement search

use crate::geometry::rect::Rect;
use crate::io::configuration::OCCLUSION_ALPHA_THRESHOLD;
use crate::render::canvas::LayerRaster;
use bitvec::prelude::*;
use image::RgbaImage;
use std::fmt;

/// Canvas pixels considered solid when the mask was captured
#[derive(Clone, Debug)]
pub struct OcclusionMask {
    bits: BitVec,
    width: u32,
    height: u32,
}

impl OcclusionMask {
    /// Capture every pixel whose alpha exceeds `threshold`
    pub fn capture(pixels: &RgbaImage, threshold: u8) -> Self {
        let (width, height) = pixels.dimensions();
        let mut bits = bitvec![0; (width as usize) * (height as usize)];
        for (index, pixel) in pixels.pixels().enumerate() {
            if pixel.0[3] > threshold {
                bits.set(index, true);
            }
        }
        Self {
            bits,
            width,
            height,
        }
    }

    /// Whether the canvas pixel was solid; outside the canvas is never solid
    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Whether any visible pixel of `raster` lands on a solid pixel
    pub fn overlaps(&self, raster: &LayerRaster) -> bool {
        raster
            .solid_pixels(OCCLUSION_ALPHA_THRESHOLD)
            .any(|(x, y)| self.is_solid(x, y))
    }

    /// Number of solid pixels
    pub fn solid_count(&self) -> usize {
        self.bits.count_ones()
    }
}

/// No overlap-free position was found within the attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementExhausted {
    /// Positions tried
    pub attempts: usize,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no free placement after {} attempts", self.attempts)
    }
}

impl std::error::Error for PlacementExhausted {}

/// Accepted candidate of [`find_free_placement`]
#[derive(Debug, Clone)]
pub struct Placement {
    /// Final layer rectangle
    pub rect: Rect,
    /// Raster of the layer at `rect`
    pub raster: LayerRaster,
    /// Positions tried, including the accepted one
    pub attempts: usize,
}

/// Try `initial` and then fresh positions until the layer avoids the mask
///
/// `rasterize` renders the layer at a candidate rectangle and `reposition`
/// draws a new top-left corner for the next attempt.
///
/// # Errors
///
/// Returns [`PlacementExhausted`] when every one of `max_attempts` candidates
/// overlaps the mask
pub fn find_free_placement<R, P>(
    mask: &OcclusionMask,
    initial: Rect,
    max_attempts: usize,
    mut rasterize: R,
    mut reposition: P,
) -> Result<Placement, PlacementExhausted>
where
    R: FnMut(&Rect) -> LayerRaster,
    P: FnMut() -> (f64, f64),
{
    let mut candidate = initial;
    for attempt in 1..=max_attempts {
        let raster = rasterize(&candidate);
        if !mask.overlaps(&raster) {
            return Ok(Placement {
                rect: candidate,
                raster,
                attempts: attempt,
            });
        }
        if attempt < max_attempts {
            let (x, y) = reposition();
            candidate = Rect::new(x, y, candidate.width, candidate.height);
        }
    }
    Err(PlacementExhausted {
        attempts: max_attempts,
    })
}
