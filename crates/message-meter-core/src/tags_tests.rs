//! Tests for tag extraction strategies.

use super::*;
use crate::message::GenericMessage;

#[test]
fn test_no_tags_yields_empty_set() {
    let message = GenericMessage::new("OrderPlaced");
    let tags = NoTags.extract(&message).unwrap();
    assert!(tags.is_empty());

    // NoTags works for message types that implement nothing at all
    let tags = NoTags.extract(&42u32).unwrap();
    assert!(tags.is_empty());
}

#[test]
fn test_payload_type_tagger() {
    let message = GenericMessage::new("OrderPlaced");
    let tags = PayloadTypeTagger.extract(&message).unwrap();

    assert_eq!(tags.len(), 1);
    assert_eq!(tags.value_of(PAYLOAD_TYPE_TAG), Some("OrderPlaced"));
}

#[test]
fn test_metadata_tagger_reads_configured_key() {
    let message = GenericMessage::new("OrderPlaced").with_metadata("myMetadataKey", "myMetaData");
    let tags = MetadataTagger::new("myMetadataKey").extract(&message).unwrap();

    assert_eq!(tags.value_of("myMetadataKey"), Some("myMetaData"));
}

#[test]
fn test_metadata_tagger_custom_tag_key() {
    let message = GenericMessage::new("OrderPlaced").with_metadata("tenant-id", "acme");
    let tags = MetadataTagger::new("tenant-id")
        .with_tag_key("tenant")
        .extract(&message)
        .unwrap();

    assert_eq!(tags.value_of("tenant"), Some("acme"));
    assert_eq!(tags.value_of("tenant-id"), None);
}

#[test]
fn test_metadata_tagger_missing_key_fails() {
    let message = GenericMessage::new("OrderPlaced");
    let result = MetadataTagger::new("tenant").extract(&message);

    assert!(matches!(
        result,
        Err(TagExtractionError::MissingMetadata { key }) if key == "tenant"
    ));
}

#[test]
fn test_fn_extractor_wraps_closure() {
    let extractor = FnTagExtractor::new(|message: &GenericMessage| {
        Tags::of("payloadType", message.payload_type()).and("source", "closure")
    });

    let tags = extractor.extract(&GenericMessage::new("OrderPlaced")).unwrap();
    assert_eq!(tags.value_of("payloadType"), Some("OrderPlaced"));
    assert_eq!(tags.value_of("source"), Some("closure"));
}

#[test]
fn test_extractors_as_trait_objects() {
    use std::sync::Arc;

    let extractors: Vec<Arc<dyn TagExtractor<GenericMessage>>> = vec![
        Arc::new(NoTags),
        Arc::new(PayloadTypeTagger),
        Arc::new(MetadataTagger::new("tenant")),
        Arc::new(FnTagExtractor::new(|_: &GenericMessage| Tags::none())),
    ];

    let message = GenericMessage::new("OrderPlaced").with_metadata("tenant", "acme");
    for extractor in &extractors {
        // Every stock extractor handles a fully populated message
        assert!(extractor.extract(&message).is_ok());
    }
}
