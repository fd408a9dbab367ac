//! The engine's error taxonomy.

use thiserror::Error;

use crate::tokenizer::TokenizeError;

/// Everything that can go wrong across an engine's lifetime.
///
/// Errors are terminal: none of them is retried internally, and deltas
/// already handed out before an error remain valid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The schema source handed to the constructor was blank or did not
    /// parse/compile as a JSON Schema.
    #[error("invalid schema: {message}")]
    Configuration {
        /// Why the schema was rejected.
        message: String,
    },

    /// The tokenizer could not accept the fed text. The instance must not be
    /// fed again.
    #[error("malformed document: {source}")]
    Decoding {
        /// The underlying grammar fault.
        #[from]
        source: TokenizeError,
    },

    /// The completed document failed schema validation. Raised only from
    /// `flush`, only when the document is structurally complete.
    #[error("schema validation failed: {violations}")]
    Validation {
        /// All violation messages, comma-joined.
        violations: String,
    },
}
