//! Tests for halo rasters and rainbow tinting

#[cfg(test)]
mod tests {
    use collagen::io::configuration::MAX_HALO_RADIUS;
    use collagen::render::canvas::LayerRaster;
    use collagen::render::effects::{Halo, Tint, halo_raster, tinted_source};
    use image::{Rgba, RgbaImage};

    fn square_raster() -> LayerRaster {
        LayerRaster {
            origin_x: 10,
            origin_y: 20,
            pixels: RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255])),
        }
    }

    // Tests an unblurred halo is a recoloured, offset silhouette
    // Verified by keeping the layer colour
    #[test]
    fn test_halo_without_blur() {
        let halo = Halo {
            radius: 0.0,
            offset_x: 3.0,
            offset_y: -2.0,
            color: Rgba([0, 0, 0, 128]),
        };
        let out = halo_raster(&square_raster(), &halo);
        assert_eq!(out.pixels.dimensions(), (6, 6));
        assert_eq!((out.origin_x, out.origin_y), (12, 17));
        assert_eq!(*out.pixels.get_pixel(1, 1), Rgba([0, 0, 0, 128]));
        assert_eq!(out.pixels.get_pixel(0, 0).0[3], 0);
    }

    // Tests blur spreads the silhouette into the margin
    // Verified by skipping the blur
    #[test]
    fn test_halo_blur_spreads() {
        let halo = Halo {
            radius: 4.0,
            offset_x: 0.0,
            offset_y: 0.0,
            color: Rgba([255, 0, 255, 255]),
        };
        let out = halo_raster(&square_raster(), &halo);
        let (width, height) = out.pixels.dimensions();
        assert_eq!((width, height), (4 + 2 * 7, 4 + 2 * 7));
        assert!(out.pixels.get_pixel(6, 8).0[3] > 0);
        assert!(out.pixels.get_pixel(8, 8).0[3] < 255);
    }

    // Tests an oversized radius is capped instead of overflowing the padding
    // Verified by removing the radius cap
    #[test]
    fn test_halo_radius_capped() {
        let halo = Halo {
            radius: 1e12,
            offset_x: 0.0,
            offset_y: 0.0,
            color: Rgba([255, 255, 255, 255]),
        };
        let out = halo_raster(&square_raster(), &halo);
        let margin = ((MAX_HALO_RADIUS / 2.0) * 3.0).ceil() as u32 + 1;
        assert_eq!(out.pixels.dimensions(), (4 + 2 * margin, 4 + 2 * margin));
        assert_eq!(out.origin_x, 10 - i64::from(margin));
    }

    // Tests zero intensity leaves colours unchanged
    // Verified by mixing at full intensity
    #[test]
    fn test_tint_zero_intensity() {
        let source = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 255]));
        let tint = Tint {
            intensity: 0.0,
            hue_offset: 90.0,
        };
        assert_eq!(tinted_source(&source, 3.0, 3.0, &tint), source);
    }

    // Tests full intensity replaces colour with the gradient and keeps alpha
    // Verified by tinting transparent pixels
    #[test]
    fn test_tint_full_intensity() {
        let mut source = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 77]));
        source.put_pixel(3, 3, Rgba([0, 0, 0, 0]));
        let tint = Tint {
            intensity: 1.0,
            hue_offset: 0.0,
        };
        let out = tinted_source(&source, 4.0, 4.0, &tint);
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 77]));
        assert_eq!(*out.get_pixel(3, 3), Rgba([0, 0, 0, 0]));
    }

    // Tests the tint source is resized to the drawn size
    // Verified by returning the source dimensions
    #[test]
    fn test_tint_resizes() {
        let source = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let tint = Tint {
            intensity: 0.5,
            hue_offset: 0.0,
        };
        assert_eq!(tinted_source(&source, 8.5, 2.0, &tint).dimensions(), (9, 2));
    }
}
