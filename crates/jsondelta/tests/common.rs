#![allow(dead_code)]

use jsondelta::{Delta, DeltaStream};

pub const SIMPLE_SCHEMA: &str = r#"
{
  "type": "object",
  "properties": {
    "content": { "type": "string" }
  }
}
"#;

pub const REQUIRED_SCHEMA: &str = r#"
{
  "type": "object",
  "properties": {
    "content": { "type": "string" }
  },
  "required": ["content"]
}
"#;

pub const ARRAY_SCHEMA: &str = r#"
{
  "type": "object",
  "properties": {
    "items": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "index": { "type": "integer" },
          "value": { "type": "string" }
        }
      }
    }
  }
}
"#;

/// Split `payload` into approximately equal-sized chunks without breaking
/// UTF-8 code points.
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Feeds every chunk into a fresh engine, returning all delta batches
/// flattened in order (the engine is dropped unflushed).
pub fn collect_deltas(schema: &str, chunks: &[&str]) -> Vec<Delta> {
    let mut stream = DeltaStream::new(schema).expect("schema must compile");
    let mut all = Vec::new();
    for chunk in chunks {
        all.extend(stream.feed(chunk).expect("feed must succeed"));
    }
    all
}

/// Renders each delta as canonical JSON for compact assertions.
pub fn rendered(deltas: &[Delta]) -> Vec<String> {
    deltas.iter().map(ToString::to_string).collect()
}

/// Digs a nested string fragment out of a delta along `path` + `field`.
pub fn string_at<'a>(delta: &'a Delta, path: &[&str], field: &str) -> Option<&'a str> {
    let mut current = delta;
    for segment in path {
        current = current.as_object()?.get(*segment)?;
    }
    current.as_object()?.get(field)?.as_str()
}

/// Concatenates the `field` string fragments from every delta, following
/// `path` into each.
pub fn concat_strings(deltas: &[Delta], path: &[&str], field: &str) -> String {
    let mut out = String::new();
    for delta in deltas {
        if let Some(s) = string_at(delta, path, field) {
            out.push_str(s);
        }
    }
    out
}
