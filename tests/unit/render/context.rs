//! Tests for per-edition render state

#[cfg(test)]
mod tests {
    use collagen::geometry::anchor::PlacedLayer;
    use collagen::geometry::rect::Rect;
    use collagen::io::configuration::Format;
    use collagen::render::canvas::Canvas;
    use collagen::render::context::RenderContext;
    use image::Rgba;

    const FORMAT: Format = Format {
        width: 8,
        height: 6,
        smoothing: true,
    };

    // Tests a new context matches the format and starts empty
    // Verified by swapping canvas width and height
    #[test]
    fn test_new_context() {
        let ctx = RenderContext::new(FORMAT);
        assert_eq!((ctx.canvas.width(), ctx.canvas.height()), (8, 6));
        assert!(ctx.anchors.is_empty());
        assert!(ctx.occlusion.is_none());
    }

    // Tests background fill covers the canvas
    // Verified by filling only the first row
    #[test]
    fn test_fill_background() {
        let mut ctx = RenderContext::new(FORMAT);
        ctx.fill_background(Rgba([1, 2, 3, 255]));
        assert!(ctx.canvas.pixels().pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    // Tests occlusion capture reflects drawn pixels
    // Verified by capturing before the fill
    #[test]
    fn test_capture_occlusion() {
        let mut ctx = RenderContext::new(FORMAT);
        ctx.canvas.fill_rect(&Rect::new(0.0, 0.0, 2.0, 6.0), Rgba([9, 9, 9, 255]));
        ctx.capture_occlusion();
        let mask = ctx.occlusion.as_ref().expect("mask captured");
        assert_eq!(mask.solid_count(), 12);
        assert!(mask.is_solid(1, 5));
        assert!(!mask.is_solid(2, 0));
    }

    // Tests reset forgets everything from the previous edition
    // Verified by keeping the anchor map across resets
    #[test]
    fn test_reset() {
        let mut ctx = RenderContext::new(FORMAT);
        ctx.fill_background(Rgba([255, 255, 255, 255]));
        ctx.capture_occlusion();
        ctx.anchors.publish(
            "Body",
            PlacedLayer {
                rect: Rect::new(0.0, 0.0, 1.0, 1.0),
                original_width: 1.0,
                original_height: 1.0,
                bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
            },
        );

        ctx.reset();
        assert!(ctx.anchors.is_empty());
        assert!(ctx.occlusion.is_none());
        assert!(ctx.canvas.pixels().pixels().all(|p| p.0[3] == 0));
    }
}
