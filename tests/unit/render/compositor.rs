//! Tests for drawing layers with placement, occlusion and publication

#[cfg(test)]
mod tests {
    use collagen::catalog::element::AssetElement;
    use collagen::catalog::layer::{Layer, LayerDefinition};
    use collagen::dna::selection::RandomSelector;
    use collagen::io::configuration::{Format, MAX_OCCLUSION_ATTEMPTS};
    use collagen::render::canvas::Canvas;
    use collagen::render::compositor::{DrawOutcome, LayerDraw, draw_layer};
    use collagen::render::context::RenderContext;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    const FORMAT: Format = Format {
        width: 20,
        height: 20,
        smoothing: true,
    };
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    fn element(name: &str) -> AssetElement {
        AssetElement {
            id: 0,
            name: name.to_string(),
            filename: format!("{name}.png"),
            path: PathBuf::from(format!("{name}.png")),
            weight: 1.0,
        }
    }

    fn body_layer() -> Layer {
        let mut definition = LayerDefinition::new("Body");
        definition.capabilities.occlusion_source = true;
        definition.options.use_actual_dimensions = true;
        Layer::new(0, &definition, vec![element("body")])
    }

    fn prop_layer() -> Layer {
        let mut definition = LayerDefinition::new("Prop");
        definition.capabilities.free_floating = true;
        definition.options.use_actual_dimensions = true;
        definition.options.random_position = true;
        Layer::new(1, &definition, vec![element("orb")])
    }

    fn draw(ctx: &mut RenderContext, layer: &Layer, image: &RgbaImage, seed: u64) -> DrawOutcome {
        let mut rng = RandomSelector::new(seed);
        let draw = LayerDraw {
            layer,
            element: &layer.elements[0],
            image,
        };
        draw_layer(ctx, &draw, &mut rng)
    }

    // Tests a fixed layer is drawn where configured and published
    // Verified by publishing under the layer kind
    #[test]
    fn test_draw_fixed_layer() {
        let mut definition = LayerDefinition::new("Hat");
        definition.options.use_actual_dimensions = true;
        definition.options.x = Some(5.0);
        definition.options.y = Some(4.0);
        definition.options.display_name = Some("Top Hat".to_string());
        let layer = Layer::new(0, &definition, vec![element("hat")]);
        let image = RgbaImage::from_pixel(3, 2, GREEN);

        let mut ctx = RenderContext::new(FORMAT);
        let outcome = draw(&mut ctx, &layer, &image, 1);
        assert!(outcome.is_drawn());

        let pixels = ctx.canvas.pixels();
        assert_eq!(*pixels.get_pixel(5, 4), GREEN);
        assert_eq!(*pixels.get_pixel(7, 5), GREEN);
        assert_eq!(pixels.get_pixel(8, 5).0[3], 0);
        assert_eq!(pixels.get_pixel(5, 6).0[3], 0);

        assert!(ctx.anchors.contains("Top Hat"));
        assert!(!ctx.anchors.contains("Hat"));
        assert!(ctx.occlusion.is_none());
    }

    // Tests occlusion sources refresh the mask
    // Verified by capturing the mask before drawing
    #[test]
    fn test_occlusion_source_captures_mask() {
        let mut ctx = RenderContext::new(FORMAT);
        let body = body_layer();
        let image = RgbaImage::from_pixel(10, 20, RED);
        assert!(draw(&mut ctx, &body, &image, 1).is_drawn());
        let mask = ctx.occlusion.as_ref().expect("mask captured");
        assert_eq!(mask.solid_count(), 200);
    }

    // Tests free-floating props never land on the occluding body
    // Verified by skipping the overlap check
    #[test]
    fn test_props_avoid_occlusion() {
        let body = body_layer();
        let prop = prop_layer();
        let body_image = RgbaImage::from_pixel(10, 20, RED);
        let prop_image = RgbaImage::from_pixel(2, 2, GREEN);

        for seed in 0..30 {
            let mut ctx = RenderContext::new(FORMAT);
            assert!(draw(&mut ctx, &body, &body_image, seed).is_drawn());
            let outcome = draw(&mut ctx, &prop, &prop_image, seed);
            assert!(outcome.is_drawn(), "seed {seed}: {outcome:?}");

            for (x, y, pixel) in ctx.canvas.pixels().enumerate_pixels() {
                if x < 10 {
                    assert_eq!(*pixel, RED, "seed {seed}: prop overlapped body at ({x}, {y})");
                }
            }
        }
    }

    // Tests a prop is dropped when no free placement exists
    // Verified by drawing the last candidate anyway
    #[test]
    fn test_prop_dropped_when_blocked() {
        let body = body_layer();
        let prop = prop_layer();
        let mut ctx = RenderContext::new(FORMAT);
        let full_body = RgbaImage::from_pixel(20, 20, RED);
        assert!(draw(&mut ctx, &body, &full_body, 3).is_drawn());

        let prop_image = RgbaImage::from_pixel(2, 2, GREEN);
        match draw(&mut ctx, &prop, &prop_image, 3) {
            DrawOutcome::Skipped(exhausted) => {
                assert_eq!(exhausted.attempts, MAX_OCCLUSION_ATTEMPTS);
            }
            DrawOutcome::Drawn { .. } => panic!("blocked prop should be dropped"),
        }
        assert!(!ctx.anchors.contains("Prop"));
        assert!(ctx.canvas.pixels().pixels().all(|p| *p == RED));
    }

    // Tests props without random position ignore the mask
    // Verified by checking occlusion for fixed placements
    #[test]
    fn test_fixed_prop_exempt() {
        let body = body_layer();
        let mut definition = LayerDefinition::new("Prop");
        definition.capabilities.free_floating = true;
        definition.options.use_actual_dimensions = true;
        let prop = Layer::new(1, &definition, vec![element("orb")]);

        let mut ctx = RenderContext::new(FORMAT);
        let full_body = RgbaImage::from_pixel(20, 20, RED);
        assert!(draw(&mut ctx, &body, &full_body, 3).is_drawn());

        let prop_image = RgbaImage::from_pixel(2, 2, GREEN);
        match draw(&mut ctx, &prop, &prop_image, 3) {
            DrawOutcome::Drawn { attempts, .. } => assert_eq!(attempts, 1),
            DrawOutcome::Skipped(_) => panic!("fixed prop must be drawn"),
        }
        assert_eq!(*ctx.canvas.pixels().get_pixel(0, 0), GREEN);
    }

    // Tests layer opacity reaches the canvas
    // Verified by drawing at full opacity
    #[test]
    fn test_layer_opacity() {
        let mut definition = LayerDefinition::new("Veil");
        definition.options.opacity = 0.5;
        let layer = Layer::new(0, &definition, vec![element("veil")]);
        let image = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));

        let mut ctx = RenderContext::new(FORMAT);
        ctx.fill_background(Rgba([0, 0, 0, 255]));
        assert!(draw(&mut ctx, &layer, &image, 1).is_drawn());
        assert_eq!(*ctx.canvas.pixels().get_pixel(10, 10), Rgba([128, 128, 128, 255]));
    }
}
