//! Tests for occlusion masks and the placement retry loop

#[cfg(test)]
mod tests {
    use collagen::geometry::rect::Rect;
    use collagen::render::canvas::LayerRaster;
    use collagen::render::occlusion::{OcclusionMask, PlacementExhausted, find_free_placement};
    use image::{Rgba, RgbaImage};

    /// Canvas whose left `solid_columns` columns are opaque
    fn mask(width: u32, height: u32, solid_columns: u32) -> OcclusionMask {
        let pixels = RgbaImage::from_fn(width, height, |x, _| {
            if x < solid_columns {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        OcclusionMask::capture(&pixels, 10)
    }

    fn square(rect: &Rect) -> LayerRaster {
        LayerRaster {
            origin_x: rect.x as i64,
            origin_y: rect.y as i64,
            pixels: RgbaImage::from_pixel(rect.width as u32, rect.height as u32, Rgba([0, 255, 0, 255])),
        }
    }

    // Tests captured solidity and out-of-canvas queries
    // Verified by treating outside pixels as solid
    #[test]
    fn test_capture_and_query() {
        let mask = mask(10, 4, 3);
        assert_eq!(mask.solid_count(), 12);
        assert!(mask.is_solid(2, 3));
        assert!(!mask.is_solid(3, 0));
        assert!(!mask.is_solid(-1, 0));
        assert!(!mask.is_solid(0, 4));
    }

    // Tests the capture threshold is exclusive
    // Verified by comparing with greater-or-equal
    #[test]
    fn test_capture_threshold() {
        let mut pixels = RgbaImage::new(2, 1);
        pixels.put_pixel(0, 0, Rgba([0, 0, 0, 10]));
        pixels.put_pixel(1, 0, Rgba([0, 0, 0, 11]));
        let mask = OcclusionMask::capture(&pixels, 10);
        assert!(!mask.is_solid(0, 0));
        assert!(mask.is_solid(1, 0));
    }

    // Tests overlap detection ignores faint pixels
    // Verified by checking every raster pixel
    #[test]
    fn test_overlaps() {
        let mask = mask(10, 10, 5);
        assert!(mask.overlaps(&square(&Rect::new(3.0, 0.0, 3.0, 3.0))));
        assert!(!mask.overlaps(&square(&Rect::new(5.0, 0.0, 3.0, 3.0))));

        let faint = LayerRaster {
            origin_x: 0,
            origin_y: 0,
            pixels: RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 10])),
        };
        assert!(!mask.overlaps(&faint));
    }

    // Tests a free initial placement is accepted immediately
    // Verified by always repositioning once
    #[test]
    fn test_free_initial_placement() {
        let mask = mask(10, 10, 5);
        let mut repositions = 0;
        let placement = find_free_placement(&mask, Rect::new(6.0, 6.0, 2.0, 2.0), 100, square, || {
            repositions += 1;
            (0.0, 0.0)
        })
        .expect("free placement");
        assert_eq!(placement.attempts, 1);
        assert_eq!(repositions, 0);
        assert_eq!(placement.rect, Rect::new(6.0, 6.0, 2.0, 2.0));
    }

    // Tests overlapping candidates are replaced until one is free
    // Verified by accepting the first candidate
    #[test]
    fn test_retry_until_free() {
        let mask = mask(10, 10, 5);
        let mut candidates = vec![(7.0, 1.0), (2.0, 2.0)];
        let placement = find_free_placement(&mask, Rect::new(0.0, 0.0, 2.0, 2.0), 100, square, || {
            candidates.pop().unwrap_or((0.0, 0.0))
        })
        .expect("free placement");
        assert_eq!(placement.attempts, 3);
        assert_eq!((placement.rect.x, placement.rect.y), (7.0, 1.0));
        assert_eq!((placement.rect.width, placement.rect.height), (2.0, 2.0));
        assert!(!mask.overlaps(&placement.raster));
    }

    // Tests the attempt budget ends the search
    // Verified by retrying without limit
    #[test]
    fn test_exhaustion() {
        let mask = mask(10, 10, 10);
        let mut repositions = 0;
        let result = find_free_placement(&mask, Rect::new(0.0, 0.0, 2.0, 2.0), 5, square, || {
            repositions += 1;
            (1.0, 1.0)
        });
        assert_eq!(result.map(|p| p.attempts), Err(PlacementExhausted { attempts: 5 }));
        assert_eq!(repositions, 4);
        assert_eq!(
            PlacementExhausted { attempts: 5 }.to_string(),
            "no free placement after 5 attempts"
        );
    }
}
