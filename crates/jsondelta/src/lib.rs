//! Incremental decoding of a streaming JSON document into delta events.
//!
//! A [`DeltaStream`] consumes one JSON object as an open-ended sequence of
//! text chunks — for instance tokens from a generative model — and reports
//! each newly determined piece of state as a minimal nested delta object,
//! without waiting for the document to finish. String values stream
//! character by character, escape sequences included, even when a chunk
//! boundary falls in the middle of one. When the stream ends, the fully
//! reconstructed document is validated against a caller-supplied JSON
//! Schema.
//!
//! # Examples
//!
//! ```
//! use jsondelta::DeltaStream;
//!
//! let schema = r#"{
//!     "type": "object",
//!     "properties": { "content": { "type": "string" } },
//!     "required": ["content"]
//! }"#;
//!
//! let mut stream = DeltaStream::new(schema)?;
//! let mut text = String::new();
//! for chunk in [r#"{"content"#, r#"":"Hello\"#, r#"nWorld"}"#] {
//!     for delta in stream.feed(chunk)? {
//!         let fragment = delta
//!             .as_object()
//!             .and_then(|d| d.get("content"))
//!             .and_then(|v| v.as_str());
//!         if let Some(s) = fragment {
//!             text.push_str(s);
//!         }
//!     }
//! }
//! stream.flush()?;
//! assert_eq!(text, "Hello\nWorld");
//! # Ok::<(), jsondelta::StreamError>(())
//! ```

mod accumulator;
mod array_track;
mod delta;
mod engine;
mod error;
mod increments;
mod schema;
pub mod tokenizer;
mod value;

pub use delta::Delta;
pub use engine::DeltaStream;
pub use error::StreamError;
pub use value::{Array, Map, Value};
