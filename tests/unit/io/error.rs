//! Tests for error messages and source chaining

#[cfg(test)]
mod tests {
    use collagen::io::error::{GenerationError, file_system_error, invalid_parameter};
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;

    // Tests the exhaustion message tells the user how to recover
    // Verified by dropping the target from the message
    #[test]
    fn test_collection_exhausted_display() {
        let error = GenerationError::CollectionExhausted {
            edition: 7,
            attempts: 100,
            target: 10,
        };
        let message = error.to_string();
        assert!(message.contains("edition 7"));
        assert!(message.contains("100 attempts"));
        assert!(message.contains("reach edition 10"));
        assert!(error.source().is_none());
    }

    // Tests the empty catalog message names the layer
    // Verified by printing the layer index instead
    #[test]
    fn test_empty_catalog_display() {
        let error = GenerationError::EmptyCatalog {
            layer: "Eyes".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Mandatory layer 'Eyes' has no selectable elements"
        );
    }

    // Tests the invalid parameter helper formats its parts
    // Verified by swapping value and reason
    #[test]
    fn test_invalid_parameter() {
        let error = invalid_parameter("opacity", &1.5, &"must lie in [0, 1]");
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'opacity' = '1.5': must lie in [0, 1]"
        );
    }

    // Tests file system errors keep their path, operation and cause
    // Verified by returning None from source
    #[test]
    fn test_file_system_error_source() {
        let error = file_system_error(
            "/tmp/build",
            "create directory",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = error.to_string();
        assert!(message.contains("create directory"));
        assert!(message.contains("/tmp/build"));
        assert!(error.source().is_some());

        let GenerationError::FileSystem { path, .. } = error else {
            panic!("expected a file system error");
        };
        assert_eq!(path, PathBuf::from("/tmp/build"));
    }

    // Tests conversions from library errors
    // Verified by mapping io errors to image errors
    #[test]
    fn test_from_conversions() {
        let io_error: GenerationError = io::Error::other("boom").into();
        assert!(matches!(io_error, GenerationError::FileSystem { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let converted: GenerationError = json_error.into();
        assert!(matches!(converted, GenerationError::ConfigParse { .. }));
        assert!(converted.source().is_some());
    }
}
