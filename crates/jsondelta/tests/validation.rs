//! Construction, end-of-stream validation, and failure semantics.

mod common;

use common::{REQUIRED_SCHEMA, SIMPLE_SCHEMA};
use jsondelta::{DeltaStream, StreamError};
use rstest::rstest;

#[rstest]
#[case("")]
#[case("   \n\t")]
fn blank_schema_fails_construction(#[case] source: &str) {
    assert!(matches!(
        DeltaStream::new(source),
        Err(StreamError::Configuration { .. })
    ));
}

#[test]
fn unparsable_schema_fails_construction() {
    assert!(matches!(
        DeltaStream::new("{\"type\": "),
        Err(StreamError::Configuration { .. })
    ));
}

#[test]
fn valid_document_passes_validation() {
    let mut stream = DeltaStream::new(REQUIRED_SCHEMA).unwrap();
    stream.feed(r#"{"content":"Hello"}"#).unwrap();
    let deltas = stream.flush().unwrap();
    assert!(deltas.is_empty());
}

#[test]
fn missing_required_field_raises_validation_error() {
    let mut stream = DeltaStream::new(REQUIRED_SCHEMA).unwrap();
    stream.feed(r#"{"wrong":"value"}"#).unwrap();
    match stream.flush() {
        Err(StreamError::Validation { violations }) => {
            assert!(violations.contains("content"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn requiring_an_absent_field_raises_validation_error() {
    const WRONG_SCHEMA: &str = r#"
    {
      "type": "object",
      "properties": { "wrong": { "type": "string" } },
      "required": ["wrong"]
    }
    "#;

    let mut stream = DeltaStream::new(WRONG_SCHEMA).unwrap();
    stream.feed(r#"{"content":"Hello"}"#).unwrap();
    assert!(matches!(
        stream.flush(),
        Err(StreamError::Validation { .. })
    ));
}

#[test]
fn incomplete_document_skips_validation() {
    let mut stream = DeltaStream::new(REQUIRED_SCHEMA).unwrap();
    stream.feed(r#"{"content":"Hello"#).unwrap();
    // `content` never completed and the root never closed, yet flush must
    // neither validate nor fail.
    let deltas = stream.flush().unwrap();
    assert!(deltas.is_empty());
}

#[test]
fn unopened_document_skips_validation() {
    let stream = DeltaStream::new(REQUIRED_SCHEMA).unwrap();
    assert!(stream.flush().unwrap().is_empty());
}

#[test]
fn malformed_document_is_a_decoding_error() {
    let mut stream = DeltaStream::new(SIMPLE_SCHEMA).unwrap();
    match stream.feed(r#"{"a":nope}"#) {
        Err(StreamError::Decoding { .. }) => {}
        other => panic!("expected a decoding error, got {other:?}"),
    }
}

#[test]
fn decoding_errors_latch_across_feeds() {
    let mut stream = DeltaStream::new(SIMPLE_SCHEMA).unwrap();
    assert!(stream.feed("{!}").is_err());
    // The instance refuses further input with the same terminal error.
    assert!(matches!(
        stream.feed(r#"{"a":1}"#),
        Err(StreamError::Decoding { .. })
    ));
    assert!(matches!(
        stream.flush(),
        Err(StreamError::Decoding { .. })
    ));
}

#[test]
fn deltas_before_an_error_are_kept_by_the_caller() {
    let mut stream = DeltaStream::new(SIMPLE_SCHEMA).unwrap();
    let batch = stream.feed(r#"{"a":1,"#).unwrap();
    assert_eq!(common::rendered(&batch), [r#"{"a":1}"#]);
    // The next chunk is garbage; the batch above stays valid.
    assert!(stream.feed("?").is_err());
}

#[test]
fn trailing_garbage_after_the_document_is_a_decoding_error() {
    let mut stream = DeltaStream::new(SIMPLE_SCHEMA).unwrap();
    stream.feed(r#"{"a":1}"#).unwrap();
    assert!(matches!(
        stream.feed("{"),
        Err(StreamError::Decoding { .. })
    ));
}

#[test]
fn validation_sees_number_widths() {
    const INT_SCHEMA: &str = r#"
    {
      "type": "object",
      "properties": { "count": { "type": "integer" } },
      "required": ["count"]
    }
    "#;

    let mut stream = DeltaStream::new(INT_SCHEMA).unwrap();
    stream.feed(r#"{"count":42}"#).unwrap();
    stream.flush().unwrap();

    let mut stream = DeltaStream::new(INT_SCHEMA).unwrap();
    stream.feed(r#"{"count":4.5}"#).unwrap();
    assert!(matches!(
        stream.flush(),
        Err(StreamError::Validation { .. })
    ));
}

#[test]
fn validation_error_displays_its_violations() {
    let mut stream = DeltaStream::new(REQUIRED_SCHEMA).unwrap();
    stream.feed("{}").unwrap();
    let err = stream.flush().unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("schema validation failed"), "{text}");
}
