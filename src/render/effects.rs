//! Glow, drop shadow and rainbow tint post-effects

use crate::io::configuration::MAX_HALO_RADIUS;
use crate::render::canvas::LayerRaster;
use crate::render::color::hsl_color;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Tint parameters drawn for one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    /// Mix factor in `[0, 1]`
    pub intensity: f64,
    /// Hue rotation of the gradient in degrees
    pub hue_offset: f64,
}

/// Blurred silhouette drawn beneath a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halo {
    /// Blur radius in pixels
    pub radius: f64,
    /// Horizontal displacement, zero for glows
    pub offset_x: f64,
    /// Vertical displacement, zero for glows
    pub offset_y: f64,
    /// Silhouette colour, its alpha scales the layer alpha
    pub color: Rgba<u8>,
}

/// Coloured, blurred and offset copy of a raster's alpha
///
/// The result is padded so the blur is not clipped. The radius is capped at
/// [`MAX_HALO_RADIUS`] and blur sigma is half the radius.
pub fn halo_raster(raster: &LayerRaster, halo: &Halo) -> LayerRaster {
    let sigma = (halo.radius.clamp(0.0, MAX_HALO_RADIUS) / 2.0).max(0.0);
    let margin = (sigma * 3.0).ceil() as u32 + 1;
    let (width, height) = raster.pixels.dimensions();
    let [r, g, b, a] = halo.color.0;

    let padded_width = width.saturating_add(margin.saturating_mul(2));
    let padded_height = height.saturating_add(margin.saturating_mul(2));
    let mut silhouette = RgbaImage::from_pixel(padded_width, padded_height, Rgba([r, g, b, 0]));
    for (x, y, pixel) in raster.pixels.enumerate_pixels() {
        let alpha = (u16::from(pixel.0[3]) * u16::from(a) / 255) as u8;
        silhouette.put_pixel(x + margin, y + margin, Rgba([r, g, b, alpha]));
    }

    let pixels = if sigma > 0.0 {
        imageops::blur(&silhouette, sigma as f32)
    } else {
        silhouette
    };

    LayerRaster {
        origin_x: raster.origin_x - i64::from(margin) + halo.offset_x.round() as i64,
        origin_y: raster.origin_y - i64::from(margin) + halo.offset_y.round() as i64,
        pixels,
    }
}

/// Source resized to the drawn size with a diagonal rainbow blended in
///
/// Only pixels with non-zero alpha are tinted and alpha is left untouched.
pub fn tinted_source(source: &RgbaImage, width: f64, height: f64, tint: &Tint) -> RgbaImage {
    let out_w = width.ceil().max(1.0) as u32;
    let out_h = height.ceil().max(1.0) as u32;
    let mut tinted = if source.dimensions() == (out_w, out_h) {
        source.clone()
    } else {
        imageops::resize(source, out_w, out_h, FilterType::Triangle)
    };

    let intensity = tint.intensity.clamp(0.0, 1.0);
    let (fw, fh) = (f64::from(out_w), f64::from(out_h));
    for (x, y, pixel) in tinted.enumerate_pixels_mut() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        let position = (f64::from(x) / fw + f64::from(y) / fh) / 2.0;
        let hue = position.mul_add(360.0, tint.hue_offset).rem_euclid(360.0);
        let [tr, tg, tb, _] = hsl_color(hue, 100.0, 50.0, 1.0).0;
        let mix = |c: u8, t: u8| {
            f64::from(c)
                .mul_add(1.0 - intensity, f64::from(t) * intensity)
                .round() as u8
        };
        *pixel = Rgba([mix(r, tr), mix(g, tg), mix(b, tb), a]);
    }
    tinted
}
