//! Tests for anchor point parsing, reference rectangles and the anchor map

#[cfg(test)]
mod tests {
    use collagen::geometry::anchor::{
        AnchorMap, AnchorMode, AnchorPosition, AnchorSpec, PlacedLayer,
    };
    use collagen::geometry::rect::Rect;

    fn placed() -> PlacedLayer {
        PlacedLayer {
            rect: Rect::new(0.0, 0.0, 100.0, 80.0),
            original_width: 100.0,
            original_height: 80.0,
            bounds: Rect::new(10.0, 20.0, 50.0, 40.0),
        }
    }

    // Tests parsing of plain and prefixed anchor names
    // Verified by ignoring the bounds prefix
    #[test]
    fn test_parse_anchor_spec() {
        let spec: AnchorSpec = "bounds-top-left".parse().expect("parse");
        assert_eq!(spec.position, AnchorPosition::TopLeft);
        assert_eq!(spec.mode, AnchorMode::Bounds);

        let spec: AnchorSpec = "rect-bottom".parse().expect("parse");
        assert_eq!((spec.position, spec.mode), (AnchorPosition::Bottom, AnchorMode::Rect));

        let spec: AnchorSpec = " Middle ".parse().expect("parse");
        assert_eq!((spec.position, spec.mode), (AnchorPosition::Center, AnchorMode::Inherit));

        assert!("upper-left".parse::<AnchorSpec>().is_err());
        assert!("bounds-".parse::<AnchorSpec>().is_err());
    }

    // Tests JSON strings map to specs and back
    // Verified by dropping the mode prefix on serialize
    #[test]
    fn test_anchor_spec_serde() {
        let spec: AnchorSpec = serde_json::from_str("\"bounds-right\"").expect("parse");
        assert_eq!(spec.position, AnchorPosition::Right);
        assert_eq!(
            serde_json::to_string(&spec).expect("serialize"),
            "\"bounds-right\""
        );
        assert!(serde_json::from_str::<AnchorSpec>("\"nowhere\"").is_err());
    }

    // Tests fractional point positions
    // Verified by swapping the axis fractions
    #[test]
    fn test_point_on() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(AnchorPosition::TopLeft.point_on(&rect), (10.0, 20.0));
        assert_eq!(AnchorPosition::Center.point_on(&rect), (60.0, 45.0));
        assert_eq!(AnchorPosition::BottomRight.point_on(&rect), (110.0, 70.0));
        assert_eq!(AnchorPosition::Right.point_on(&rect), (110.0, 45.0));
        assert_eq!(AnchorPosition::Top.point_on(&rect), (60.0, 20.0));
    }

    // Tests mode selection of the reference rectangle
    // Verified by always returning the bounds
    #[test]
    fn test_reference_rect() {
        let layer = placed();
        let inherit = AnchorSpec::new(AnchorPosition::Center);
        assert_eq!(layer.reference_rect(inherit, true), layer.bounds);
        assert_eq!(layer.reference_rect(inherit, false), layer.rect);

        let rect_mode: AnchorSpec = "rect-center".parse().expect("parse");
        assert_eq!(layer.reference_rect(rect_mode, true), layer.rect);

        let bounds_mode: AnchorSpec = "bounds-center".parse().expect("parse");
        assert_eq!(layer.reference_rect(bounds_mode, false), layer.bounds);
    }

    // Tests map publication, replacement and reset
    // Verified by keeping the first published entry
    #[test]
    fn test_anchor_map() {
        let mut map = AnchorMap::new();
        assert!(map.is_empty());

        map.publish("Body", placed());
        assert!(map.contains("Body"));
        assert!(!map.contains("Head"));

        let mut moved = placed();
        moved.rect = moved.rect.translated(5.0, 5.0);
        map.publish("Body", moved);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Body").map(|p| p.rect.x), Some(5.0));

        map.clear();
        assert!(map.get("Body").is_none());
    }
}
