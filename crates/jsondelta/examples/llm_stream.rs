//! Streams an LLM-style tool-call payload chunk by chunk and reacts to each
//! delta as it arrives.
//!
//! The simulated response carries a `moderation` object first so the
//! consumer can abort early, then a code snippet that is rendered to stdout
//! character by character while it is still being generated. When the
//! stream ends, the reconstructed document is validated against the tool's
//! JSON Schema.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsondelta --example llm_stream
//! ```

use jsondelta::{Delta, DeltaStream, Value};

const SCHEMA: &str = r#"
{
  "type": "object",
  "properties": {
    "moderation": {
      "type": "object",
      "properties": {
        "decision": { "type": "string" }
      },
      "required": ["decision"]
    },
    "filename": { "type": "string" },
    "code": { "type": "string" }
  },
  "required": ["moderation", "filename", "code"]
}
"#;

/// A toy assistant response split into small, irregular chunks, the way a
/// completion API would deliver partial tokens.
const SIMULATED_STREAM: [&str; 9] = [
    r#"{"moderation":{"decision":"al"#,
    r#"lo"#,
    r#"w"},"filename":"example.rs","#,
    r#""code":"fn main() {\"#,
    r#"n    println!(\"strea"#,
    r#"ming\");\n"#,
    r#"}"#,
    r#"\n""#,
    r#"}"#,
];

fn string_at<'a>(delta: &'a Delta, path: &[&str], field: &str) -> Option<&'a str> {
    let mut current = delta;
    for segment in path {
        current = current.as_object()?.get(*segment)?;
    }
    current.as_object()?.get(field)?.as_str()
}

fn main() {
    let mut stream = DeltaStream::new(SCHEMA).expect("schema must compile");
    let mut decision = String::new();

    for chunk in SIMULATED_STREAM {
        let deltas = stream.feed(chunk).expect("well-formed stream");

        for delta in &deltas {
            // Moderation fragments accumulate until a verdict is readable.
            if let Some(fragment) = string_at(delta, &["moderation"], "decision") {
                decision.push_str(fragment);
                if decision.starts_with("block") {
                    eprintln!("moderation blocked the content, aborting");
                    return;
                }
            }

            // Code fragments render the moment they arrive.
            if let Some(fragment) = string_at(delta, &[], "code") {
                print!("{fragment}");
            }

            if let Some(name) = delta
                .as_object()
                .and_then(|d| d.get("filename"))
                .and_then(Value::as_str)
            {
                println!("--- {name} ---");
            }
        }
    }

    println!();
    stream.flush().expect("schema validation");
    println!("stream complete, document valid");
}
