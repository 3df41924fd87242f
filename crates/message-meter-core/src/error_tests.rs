//! Tests for monitor error types.

use super::*;

#[test]
fn test_error_categorization() {
    assert!(MonitorError::Configuration(MonitorConfigError::Missing {
        field: "registry".to_string(),
    })
    .is_configuration());

    assert!(!MonitorError::TagExtraction(TagExtractionError::MissingMetadata {
        key: "tenant".to_string(),
    })
    .is_configuration());
}

#[test]
fn test_error_display() {
    let missing = MonitorConfigError::Missing {
        field: "meter_name_prefix".to_string(),
    };
    assert_eq!(
        missing.to_string(),
        "Missing required configuration: meter_name_prefix"
    );

    let invalid = MonitorConfigError::Invalid {
        field: "meter_name_prefix".to_string(),
        message: "must not be empty".to_string(),
    };
    assert_eq!(
        invalid.to_string(),
        "Invalid configuration for 'meter_name_prefix': must not be empty"
    );

    let missing_metadata = TagExtractionError::MissingMetadata {
        key: "myMetadataKey".to_string(),
    };
    assert_eq!(
        missing_metadata.to_string(),
        "Metadata key 'myMetadataKey' not present on message"
    );
}

#[test]
fn test_error_conversion() {
    let config = MonitorConfigError::Missing {
        field: "registry".to_string(),
    };
    let monitor: MonitorError = config.into();
    assert!(matches!(monitor, MonitorError::Configuration(_)));

    let extraction = TagExtractionError::Failed {
        message: "payload is not valid JSON".to_string(),
        source: None,
    };
    let monitor: MonitorError = extraction.into();
    assert!(matches!(monitor, MonitorError::TagExtraction(_)));
}

#[test]
fn test_extraction_failure_preserves_source() {
    let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "truncated payload");
    let failed = TagExtractionError::Failed {
        message: "payload inspection failed".to_string(),
        source: Some(Box::new(cause)),
    };

    let source = std::error::Error::source(&failed);
    assert!(source.is_some_and(|inner| inner.to_string().contains("truncated payload")));
}
