//! Chunk-partition properties: however the text is split, no character of
//! any string value is lost or duplicated, and the reconstructed document is
//! identical to a one-chunk parse.

mod common;

use common::{SIMPLE_SCHEMA, concat_strings, produce_chunks};
use jsondelta::{Delta, DeltaStream, Map, Value};
use quickcheck::QuickCheck;
use rstest::rstest;

const PAYLOAD: &str = concat!(
    r#"{"user":{"name":"Alice \"A\" Doe","bio":"line1\nline2\tend"},"#,
    r#""items":[{"index":0,"value":"First"},{"value":"Second"}],"#,
    r#""pi":3.5,"count":42,"ok":true,"note":null,"emoji":"😀"}"#
);

/// Feeds `chunks` into a fresh engine and returns all deltas plus the final
/// document.
fn run(chunks: &[&str]) -> (Vec<Delta>, Map) {
    let mut stream = DeltaStream::new(SIMPLE_SCHEMA).expect("schema");
    let mut deltas = Vec::new();
    for chunk in chunks {
        deltas.extend(stream.feed(chunk).expect("feed"));
    }
    let doc = stream.document().expect("document").clone();
    stream.flush().expect("flush");
    (deltas, doc)
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
#[case(13)]
#[case(64)]
fn document_reconstruction_is_chunking_invariant(#[case] parts: usize) {
    let (_, whole) = run(&[PAYLOAD]);
    let (_, chunked) = run(&produce_chunks(PAYLOAD, parts));
    assert_eq!(whole, chunked);
}

#[test]
fn character_by_character_feed_matches_one_shot() {
    let chars: Vec<String> = PAYLOAD.chars().map(String::from).collect();
    let chunks: Vec<&str> = chars.iter().map(String::as_str).collect();

    let (_, whole) = run(&[PAYLOAD]);
    let (deltas, chunked) = run(&chunks);
    assert_eq!(whole, chunked);

    // Every nested string also survives reassembly from its increments.
    assert_eq!(
        concat_strings(&deltas, &["user"], "bio"),
        "line1\nline2\tend"
    );
    assert_eq!(concat_strings(&deltas, &[], "emoji"), "😀");
}

/// Splits `payload` at character granularity according to `splits`, so no
/// split point can land inside a UTF-8 sequence.
fn char_chunks(payload: &str, splits: &[usize]) -> Vec<String> {
    let chars: Vec<char> = payload.chars().collect();
    let mut chunks = Vec::new();
    let mut idx = 0;
    let mut remaining = chars.len();

    for s in splits {
        if remaining == 0 {
            break;
        }
        let size = 1 + (s % remaining);
        let end = idx + size;
        chunks.push(chars[idx..end].iter().collect());
        idx = end;
        remaining -= size;
    }
    if remaining > 0 {
        chunks.push(chars[idx..].iter().collect());
    }
    chunks
}

#[test]
fn no_string_content_is_lost_for_any_partition() {
    fn prop(content: String, splits: Vec<usize>) -> bool {
        let payload = format!("{{\"content\":{}}}", Value::String(content.clone()));

        let mut stream = DeltaStream::new(SIMPLE_SCHEMA).expect("schema");
        let mut deltas = Vec::new();
        for chunk in char_chunks(&payload, &splits) {
            deltas.extend(stream.feed(&chunk).expect("feed"));
        }
        let doc = stream.document().expect("document").clone();
        if stream.flush().is_err() {
            return false;
        }

        concat_strings(&deltas, &[], "content") == content
            && doc.get("content") == Some(&Value::String(content))
    }

    QuickCheck::new()
        .tests(1_000)
        .quickcheck(prop as fn(String, Vec<usize>) -> bool);
}

#[test]
fn delta_count_may_differ_but_the_sum_never_does() {
    let content = "Hello, streaming world";
    let payload = format!("{{\"content\":\"{content}\"}}");

    for parts in 1..payload.len() {
        let chunks = produce_chunks(&payload, parts);
        let (deltas, _) = run(&chunks);
        assert_eq!(
            concat_strings(&deltas, &[], "content"),
            content,
            "partition into {parts} parts lost characters"
        );
    }
}
