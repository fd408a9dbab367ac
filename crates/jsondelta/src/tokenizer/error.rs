//! Tokenizer error types.

use thiserror::Error;

/// A grammar-level fault in the fed JSON text, with the 1-based line/column
/// where the tokenizer stopped.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source} at {line}:{column}")]
pub struct TokenizeError {
    /// What went wrong.
    pub source: SyntaxError,
    /// Line of the offending character.
    pub line: usize,
    /// Column of the offending character.
    pub column: usize,
}

/// The ways the JSON grammar can be violated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    /// A character that cannot start or continue the current token.
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A non-hex character inside a `\uXXXX` escape.
    #[error("invalid unicode escape sequence at character: '{0}'")]
    InvalidUnicodeEscapeChar(char),
    /// The input stream was closed in the middle of a document.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Structural bookkeeping failed (mismatched frame kinds).
    #[error("{0}")]
    Structure(&'static str),
}

impl TokenizeError {
    /// Whether this fault is the benign "the stream simply stopped early"
    /// case, as opposed to actually malformed text.
    #[must_use]
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self.source, SyntaxError::UnexpectedEndOfInput)
    }
}
