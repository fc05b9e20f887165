//! Tests for rarity filename parsing and element construction

#[cfg(test)]
mod tests {
    use collagen::catalog::element::{AssetElement, parse_filename};
    use std::path::Path;

    // Tests weight and name extraction
    // Verified by splitting on the first delimiter instead of the last
    #[test]
    fn test_parse_filename_with_weight() {
        assert_eq!(parse_filename("Red Eyes#20.png", "#"), ("Red Eyes".to_string(), 20.0));
        assert_eq!(parse_filename("a#b#5.png", "#"), ("a#b".to_string(), 5.0));
        assert_eq!(parse_filename("half#0.5.png", "#"), ("half".to_string(), 0.5));
    }

    // Tests default weight when no delimiter is present
    // Verified by defaulting weight to zero
    #[test]
    fn test_parse_filename_without_weight() {
        assert_eq!(parse_filename("Plain.png", "#"), ("Plain".to_string(), 1.0));
    }

    // Tests non-numeric and negative weights fall back to one
    // Verified by accepting any parsed float
    #[test]
    fn test_parse_filename_invalid_weight() {
        assert_eq!(parse_filename("Cap#rare.png", "#"), ("Cap".to_string(), 1.0));
        assert_eq!(parse_filename("Cap#-3.png", "#"), ("Cap".to_string(), 1.0));
        assert_eq!(parse_filename("Cap#.png", "#"), ("Cap".to_string(), 1.0));
    }

    // Tests a zero weight is preserved
    // Verified by filtering out zero weights
    #[test]
    fn test_parse_filename_zero_weight_kept() {
        let (_, weight) = parse_filename("Never#0.png", "#");
        assert!(weight.abs() < f64::EPSILON);
    }

    // Tests custom delimiters
    // Verified by hardcoding the hash delimiter
    #[test]
    fn test_parse_filename_custom_delimiter() {
        assert_eq!(parse_filename("Hat_7.png", "_"), ("Hat".to_string(), 7.0));
        assert_eq!(parse_filename("Hat#7.png", "_"), ("Hat#7".to_string(), 1.0));
    }

    // Tests short names are not truncated past the start
    // Verified by always slicing four bytes off
    #[test]
    fn test_parse_filename_short_names() {
        assert_eq!(parse_filename("ab", "#").0, "ab");
        assert_eq!(parse_filename("x.png", "#").0, "x");
    }

    // Tests multi-byte names strip by characters
    // Verified by slicing bytes instead of characters
    #[test]
    fn test_parse_filename_unicode() {
        assert_eq!(parse_filename("Ünïcode#3.png", "#"), ("Ünïcode".to_string(), 3.0));
    }

    // Tests element construction joins the directory path
    // Verified by storing the bare file name as path
    #[test]
    fn test_from_filename() {
        let element = AssetElement::from_filename(4, "Blue#2.png", Path::new("layers/Eyes"), "#");
        assert_eq!(element.id, 4);
        assert_eq!(element.name, "Blue");
        assert_eq!(element.filename, "Blue#2.png");
        assert_eq!(element.path, Path::new("layers/Eyes/Blue#2.png"));
        assert!((element.weight - 2.0).abs() < f64::EPSILON);
    }
}
