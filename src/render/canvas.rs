//! Raster drawing primitive and layer rasterisation
//!
//! Layers are first transformed into a [`LayerRaster`] positioned in canvas
//! space (scaled, rotated about their centre) and then composited with a
//! global alpha and blend mode. Keeping the two steps apart lets the occlusion
//! test inspect a candidate placement without touching the canvas.

use crate::geometry::rect::Rect;
use crate::render::blend::{BlendMode, composite_pixel};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Immediate-mode drawing surface
pub trait Canvas {
    /// Canvas width in pixels
    fn width(&self) -> u32;

    /// Canvas height in pixels
    fn height(&self) -> u32;

    /// Fill the pixels covered by `rect` source-over with `color`
    fn fill_rect(&mut self, rect: &Rect, color: Rgba<u8>);

    /// Composite a positioned raster with global alpha and blend mode
    fn draw_layer(&mut self, raster: &LayerRaster, opacity: f64, mode: BlendMode);

    /// Current pixel buffer
    fn pixels(&self) -> &RgbaImage;

    /// Reset every pixel to transparent
    fn clear(&mut self);
}

/// CPU canvas over an RGBA buffer
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    /// Transparent canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Take the pixel buffer out of the canvas
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill_rect(&mut self, rect: &Rect, color: Rgba<u8>) {
        let x0 = rect.x.round().max(0.0) as u32;
        let y0 = rect.y.round().max(0.0) as u32;
        let x1 = (rect.right().round().max(0.0) as u32).min(self.image.width());
        let y1 = (rect.bottom().round().max(0.0) as u32).min(self.image.height());

        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
                    *pixel = composite_pixel(*pixel, color, 1.0, BlendMode::SourceOver);
                }
            }
        }
    }

    fn draw_layer(&mut self, raster: &LayerRaster, opacity: f64, mode: BlendMode) {
        for (x, y, source) in raster.pixels.enumerate_pixels() {
            if source.0[3] == 0 {
                continue;
            }
            let cx = raster.origin_x + i64::from(x);
            let cy = raster.origin_y + i64::from(y);
            let (Ok(cx), Ok(cy)) = (u32::try_from(cx), u32::try_from(cy)) else {
                continue;
            };
            if let Some(pixel) = self.image.get_pixel_mut_checked(cx, cy) {
                *pixel = composite_pixel(*pixel, *source, opacity, mode);
            }
        }
    }

    fn pixels(&self) -> &RgbaImage {
        &self.image
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }
}

/// Layer pixels transformed into canvas space
#[derive(Debug, Clone)]
pub struct LayerRaster {
    /// Canvas column of the buffer's left edge
    pub origin_x: i64,
    /// Canvas row of the buffer's top edge
    pub origin_y: i64,
    /// Transformed pixels
    pub pixels: RgbaImage,
}

impl LayerRaster {
    /// Transform `source` so it fills `rect` rotated by `rotation` radians
    ///
    /// Nearest-neighbour sampling is used when the draw neither scales nor
    /// rotates, or when `smoothing` is off; bilinear sampling otherwise.
    pub fn rasterize(source: &RgbaImage, rect: &Rect, rotation: f64, smoothing: bool) -> Self {
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
            return Self::empty(rect);
        }

        let (sin, cos) = rotation.sin_cos();
        let cx = rect.center_x();
        let cy = rect.center_y();
        let half_w = rect.width / 2.0;
        let half_h = rect.height / 2.0;

        // Axis-aligned extent of the rotated rectangle
        let extent_x = half_w.mul_add(cos.abs(), half_h * sin.abs());
        let extent_y = half_w.mul_add(sin.abs(), half_h * cos.abs());
        let origin_x = (cx - extent_x).floor();
        let origin_y = (cy - extent_y).floor();
        let out_w = ((cx + extent_x).ceil() - origin_x).max(0.0) as u32;
        let out_h = ((cy + extent_y).ceil() - origin_y).max(0.0) as u32;

        let unscaled = (rect.width - f64::from(src_w)).abs() < 1e-9
            && (rect.height - f64::from(src_h)).abs() < 1e-9;
        let nearest = !smoothing || (unscaled && rotation.abs() < f64::EPSILON);

        let scale_x = f64::from(src_w) / rect.width;
        let scale_y = f64::from(src_h) / rect.height;

        let pixels = RgbaImage::from_fn(out_w, out_h, |x, y| {
            let dx = origin_x + f64::from(x) + 0.5 - cx;
            let dy = origin_y + f64::from(y) + 0.5 - cy;
            // Inverse rotation back into the unrotated layer frame
            let local_x = cos.mul_add(dx, sin * dy) + half_w;
            let local_y = (-sin).mul_add(dx, cos * dy) + half_h;
            if local_x < 0.0 || local_y < 0.0 || local_x >= rect.width || local_y >= rect.height {
                return TRANSPARENT;
            }

            let u = local_x * scale_x;
            let v = local_y * scale_y;
            if nearest {
                sample_nearest(source, u, v)
            } else {
                sample_bilinear(source, u, v)
            }
        });

        Self {
            origin_x: origin_x as i64,
            origin_y: origin_y as i64,
            pixels,
        }
    }

    fn empty(rect: &Rect) -> Self {
        Self {
            origin_x: rect.x.floor() as i64,
            origin_y: rect.y.floor() as i64,
            pixels: RgbaImage::new(0, 0),
        }
    }

    /// Pixels with alpha above `threshold`, as canvas coordinates
    pub fn solid_pixels(&self, threshold: u8) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.pixels
            .enumerate_pixels()
            .filter(move |(_, _, p)| p.0[3] > threshold)
            .map(|(x, y, _)| (self.origin_x + i64::from(x), self.origin_y + i64::from(y)))
    }
}

fn sample_nearest(source: &RgbaImage, u: f64, v: f64) -> Rgba<u8> {
    let x = (u.floor().max(0.0) as u32).min(source.width().saturating_sub(1));
    let y = (v.floor().max(0.0) as u32).min(source.height().saturating_sub(1));
    source.get_pixel_checked(x, y).copied().unwrap_or(TRANSPARENT)
}

fn sample_bilinear(source: &RgbaImage, u: f64, v: f64) -> Rgba<u8> {
    let max_x = f64::from(source.width().saturating_sub(1));
    let max_y = f64::from(source.height().saturating_sub(1));
    let fx = (u - 0.5).clamp(0.0, max_x);
    let fy = (v - 0.5).clamp(0.0, max_y);
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);

    let taps = [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x1, y0, tx * (1.0 - ty)),
        (x0, y1, (1.0 - tx) * ty),
        (x1, y1, tx * ty),
    ];

    // Interpolate premultiplied colour so transparent texels do not bleed
    let mut acc = [0.0f64; 4];
    for (x, y, weight) in taps {
        let Some(pixel) = source.get_pixel_checked(x as u32, y as u32) else {
            continue;
        };
        let [r, g, b, a] = pixel.0.map(f64::from);
        let alpha = a / 255.0;
        let [ar, ag, ab, aa] = &mut acc;
        *ar += r * alpha * weight;
        *ag += g * alpha * weight;
        *ab += b * alpha * weight;
        *aa += a * weight;
    }

    let [r, g, b, a] = acc;
    if a <= 0.0 {
        return TRANSPARENT;
    }
    let alpha = a / 255.0;
    let channel = |c: f64| (c / alpha).round().clamp(0.0, 255.0) as u8;
    Rgba([channel(r), channel(g), channel(b), a.round().clamp(0.0, 255.0) as u8])
}
