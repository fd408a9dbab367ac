//! Incremental structural JSON tokenizer.
//!
//! [`JsonTokenizer`] accepts text in arbitrary chunks and produces
//! [`StructuralToken`]s as soon as they are complete. A token split across
//! chunk boundaries (a string, a number, a literal, an escape sequence) is
//! resumed transparently when more input arrives; until then
//! [`JsonTokenizer::next_token`] reports `Ok(None)`.
//!
//! Only complete string values are emitted. Streaming partial string content
//! is the job of the increment scanner, which watches the raw text directly;
//! the tokenizer is the source of structural truth the engine reconciles
//! against.
//!
//! # Examples
//!
//! ```
//! use jsondelta::tokenizer::{JsonTokenizer, StructuralToken, TokenSource};
//!
//! let mut tok = JsonTokenizer::new();
//! tok.feed(r#"{"a": 1}"#);
//! assert_eq!(tok.next_token().unwrap(), Some(StructuralToken::ObjectBegin));
//! assert_eq!(
//!     tok.next_token().unwrap(),
//!     Some(StructuralToken::FieldName { name: "a".into() })
//! );
//! assert_eq!(tok.next_token().unwrap(), Some(StructuralToken::Integer(1)));
//! assert_eq!(tok.next_token().unwrap(), Some(StructuralToken::ObjectEnd));
//! ```

mod buffer;
mod error;
pub(crate) mod escape;
mod literal;

use buffer::Buffer;
pub use error::{SyntaxError, TokenizeError};
use escape::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate,
             unit_to_char};
use literal::{ExpectedLiteralBuffer, Step};

/// A structural boundary or complete scalar recognized in the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralToken {
    /// `{`
    ObjectBegin,
    /// `}`
    ObjectEnd,
    /// A complete object member name (the text between the quotes, decoded).
    ///
    /// Announced only once the following `:` has been consumed, so a name is
    /// never reported before its value is actually expected. The raw-buffer
    /// string-start heuristic depends on that ordering: when it runs, the
    /// most recent `:` in the buffer is the announced member's separator.
    FieldName {
        /// The decoded member name.
        name: String,
    },
    /// `[`, carrying the name of the object member holding the array when
    /// the array is an object member's value.
    ArrayBegin {
        /// Field under which the array appears, if any.
        name: Option<String>,
    },
    /// `]`
    ArrayEnd,
    /// A complete string value, fully decoded.
    String(String),
    /// An integer number value.
    Integer(i64),
    /// A floating-point number value.
    Float(f64),
    /// `true` / `false`
    Boolean(bool),
    /// `null`
    Null,
}

/// A pull interface over an incrementally fed stream of structural tokens.
///
/// This is the seam between the delta engine and whatever recognizes JSON
/// grammar; tests drive the engine with a scripted source, production code
/// uses [`JsonTokenizer`].
pub trait TokenSource {
    /// Appends a chunk of text to the source's input.
    fn feed(&mut self, text: &str);

    /// Returns the next complete token, `Ok(None)` when no further token can
    /// be produced from the input buffered so far, or a [`TokenizeError`] on
    /// malformed input.
    fn next_token(&mut self) -> Result<Option<StructuralToken>, TokenizeError>;

    /// Signals end of input; afterwards remaining complete tokens drain and
    /// a truncated document surfaces as
    /// [`SyntaxError::UnexpectedEndOfInput`].
    fn finish(&mut self);
}

// ------------------------------------------------------------------------
// Lexer - internal tokens & states
// ------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Token {
    Eof,
    PropertyName { value: String },
    String { value: String },
    Boolean(bool),
    Null,
    Integer(i64),
    Float(f64),
    /// Must be one of: `{` `}` `[` `]` `:` `,`
    Punctuator(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents a peeked character from the input buffer.
enum PeekedChar {
    /// The buffer is exhausted but the stream is still open.
    Empty,
    /// Some character
    Char(char),
    /// End of input, the input stream is closed.
    EndOfInput,
}

use PeekedChar::{Char, Empty, EndOfInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Value,
    ValueLiteral,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
    String,
    StringEscape,
    StringEscapeUnicode,
    Start,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
    Error,
}

impl From<ParseState> for LexState {
    fn from(state: ParseState) -> Self {
        match state {
            ParseState::Start => LexState::Start,
            ParseState::BeforePropertyName => LexState::BeforePropertyName,
            ParseState::AfterPropertyName => LexState::AfterPropertyName,
            ParseState::BeforePropertyValue => LexState::BeforePropertyValue,
            ParseState::BeforeArrayValue => LexState::BeforeArrayValue,
            ParseState::AfterPropertyValue => LexState::AfterPropertyValue,
            ParseState::AfterArrayValue => LexState::AfterArrayValue,
            ParseState::End => LexState::End,
            ParseState::Error => LexState::Error,
        }
    }
}

/// Stack entry – one per open container.
#[derive(Clone, Debug)]
enum Frame {
    Array,
    Object {
        /// Member name waiting for its value.
        pending_key: Option<String>,
    },
}

/// The incremental JSON tokenizer.
///
/// Feed it text with [`TokenSource::feed`], then drain complete tokens with
/// [`TokenSource::next_token`] until it reports `Ok(None)`.
#[derive(Debug)]
pub struct JsonTokenizer {
    source: Buffer,
    end_of_input: bool,

    line: usize,
    column: usize,

    parse_state: ParseState,
    lex_state: LexState,

    /// Reused for numbers / literals / strings.
    buffer: String,
    number_is_float: bool,
    unicode_escape_buffer: UnicodeEscapeBuffer,
    /// A decoded high surrogate waiting for its trailing partner escape.
    pending_high_surrogate: Option<u32>,
    expected_literal: ExpectedLiteralBuffer,
    partial_lex: bool,

    /// Stack of open containers (arrays or objects).
    frames: Vec<Frame>,
}

impl Default for JsonTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for JsonTokenizer {
    fn feed(&mut self, text: &str) {
        self.source.push(text);
    }

    fn next_token(&mut self) -> Result<Option<StructuralToken>, TokenizeError> {
        if self.parse_state == ParseState::Error {
            return Ok(None);
        }

        loop {
            let token = match self.lex() {
                Ok(tok) => tok,
                Err(err) => {
                    self.poison();
                    return Err(err);
                }
            };
            let is_eof = matches!(token, Token::Eof);
            match self.dispatch_parse_state(token) {
                Ok(Some(out)) => return Ok(Some(out)),
                Ok(None) => {}
                Err(err) => {
                    self.poison();
                    return Err(err);
                }
            }
            if is_eof {
                return Ok(None);
            }
        }
    }

    fn finish(&mut self) {
        self.end_of_input = true;
    }
}

impl JsonTokenizer {
    /// Creates a tokenizer with an empty input buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: Buffer::new(),
            end_of_input: false,
            partial_lex: false,

            line: 1,
            column: 1,

            lex_state: LexState::Default,
            parse_state: ParseState::Start,

            buffer: String::new(),
            number_is_float: false,
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
            pending_high_surrogate: None,
            expected_literal: ExpectedLiteralBuffer::none(),
            frames: Vec::with_capacity(16),
        }
    }

    fn poison(&mut self) {
        self.parse_state = ParseState::Error;
        self.lex_state = LexState::Error;
    }

    // --------------------------------------------------------------------
    // Lexer
    // --------------------------------------------------------------------

    fn lex(&mut self) -> Result<Token, TokenizeError> {
        if !self.partial_lex {
            self.lex_state = LexState::Default;
        }

        loop {
            let next_char = self.peek_char();
            if let Some(tok) = self.lex_state_step(self.lex_state, next_char)? {
                return Ok(tok);
            }
        }
    }

    /// `None` for buffer depleted, `Some(EndOfInput)` once the stream is
    /// closed, else the next character.
    #[inline]
    fn peek_char(&mut self) -> PeekedChar {
        if let Some(ch) = self.source.peek() {
            return Char(ch);
        }

        if self.end_of_input {
            return EndOfInput;
        }

        Empty
    }

    #[inline]
    fn advance_char(&mut self) {
        if let Some(ch) = self.source.next() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    #[inline]
    fn new_token(&mut self, value: Token, partial: bool) -> Token {
        self.partial_lex = partial;
        value
    }

    /// Emits the buffered string as a property name or a value string,
    /// depending on where the grammar says we are.
    fn produce_string(&mut self) -> Token {
        self.partial_lex = false;
        self.flush_pending_surrogate();

        let value = core::mem::take(&mut self.buffer);
        if self.parse_state == ParseState::BeforePropertyName {
            Token::PropertyName { value }
        } else {
            Token::String { value }
        }
    }

    /// Emits the buffered number, keeping integers integral.
    fn produce_number(&mut self) -> Token {
        self.partial_lex = false;
        let text = core::mem::take(&mut self.buffer);
        if !self.number_is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Token::Integer(n);
            }
        }
        // The lexer only accumulates valid JSON number prefixes, which all
        // parse as f64 (overflow folds to infinity).
        Token::Float(text.parse::<f64>().unwrap())
    }

    fn flush_pending_surrogate(&mut self) {
        if self.pending_high_surrogate.take().is_some() {
            self.buffer.push(char::REPLACEMENT_CHARACTER);
        }
    }

    /// Resolves one decoded `\uXXXX` code unit against any pending high
    /// surrogate.
    fn resolve_unicode_unit(&mut self, unit: u32) {
        match self.pending_high_surrogate.take() {
            Some(high) if is_low_surrogate(unit) => {
                self.buffer.push(combine_surrogates(high, unit));
            }
            stale => {
                if stale.is_some() {
                    self.buffer.push(char::REPLACEMENT_CHARACTER);
                }
                if is_high_surrogate(unit) {
                    self.pending_high_surrogate = Some(unit);
                } else {
                    self.buffer.push(unit_to_char(unit));
                }
            }
        }
        self.lex_state = LexState::String;
    }

    #[allow(clippy::too_many_lines)]
    fn lex_state_step(
        &mut self,
        lex_state: LexState,
        next_char: PeekedChar,
    ) -> Result<Option<Token>, TokenizeError> {
        use LexState::*;
        match lex_state {
            Error => Ok(None),
            Default => match next_char {
                Char(' ' | '\t' | '\n' | '\r') => {
                    self.advance_char();
                    Ok(None)
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                EndOfInput => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Eof, false)))
                }
                Char(_) => self.lex_state_step(self.parse_state.into(), next_char),
            },

            // -------------------------- VALUE entry --------------------------
            Value => match next_char {
                Char(c) if matches!(c, '{' | '[') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                Char(c) if matches!(c, 'n' | 't' | 'f') => {
                    self.buffer.clear();
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = ValueLiteral;
                    self.expected_literal = ExpectedLiteralBuffer::new(c);
                    Ok(None)
                }
                Char(c @ '-') => {
                    self.buffer.clear();
                    self.number_is_float = false;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = Sign;
                    Ok(None)
                }
                Char(c @ '0') => {
                    self.buffer.clear();
                    self.number_is_float = false;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = Zero;
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.buffer.clear();
                    self.number_is_float = false;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalInteger;
                    Ok(None)
                }
                Char('"') => {
                    self.advance_char();
                    self.buffer.clear();
                    self.lex_state = LexState::String;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            // -------------------------- LITERALS -----------------------------
            ValueLiteral => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) => match self.expected_literal.step(c) {
                    Step::NeedMore => {
                        self.advance_char();
                        Ok(None)
                    }
                    Step::Done(tok) => {
                        self.advance_char();
                        let tok = match tok {
                            StructuralToken::Null => Token::Null,
                            StructuralToken::Boolean(b) => Token::Boolean(b),
                            // The literal matcher only produces null/bool.
                            _ => unreachable!(),
                        };
                        Ok(Some(self.new_token(tok, false)))
                    }
                    Step::Reject => Err(self.invalid_char(Char(c))),
                },
                c @ EndOfInput => Err(self.invalid_char(c)),
            },

            // -------------------------- NUMBERS -----------------------------
            Sign => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ '0') => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = Zero;
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalInteger;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            Zero => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ '.') => {
                    self.number_is_float = true;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalPoint;
                    Ok(None)
                }
                Char(c) if matches!(c, 'e' | 'E') => {
                    self.number_is_float = true;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalExponent;
                    Ok(None)
                }
                _ => Ok(Some(self.produce_number())),
            },

            DecimalInteger => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c @ '.') => {
                    self.number_is_float = true;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalPoint;
                    Ok(None)
                }
                Char(c) if matches!(c, 'e' | 'E') => {
                    self.number_is_float = true;
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalExponent;
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    Ok(None)
                }
                _ => Ok(Some(self.produce_number())),
            },

            DecimalPoint => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalFraction;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            DecimalFraction => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if matches!(c, 'e' | 'E') => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalExponent;
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    Ok(None)
                }
                _ => Ok(Some(self.produce_number())),
            },

            DecimalExponent => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if matches!(c, '+' | '-') => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalExponentSign;
                    Ok(None)
                }
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalExponentInteger;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            DecimalExponentSign => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    self.lex_state = DecimalExponentInteger;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            DecimalExponentInteger => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) if c.is_ascii_digit() => {
                    self.advance_char();
                    self.buffer.push(c);
                    Ok(None)
                }
                _ => Ok(Some(self.produce_number())),
            },

            // -------------------------- STRING -----------------------------
            LexState::String => match next_char {
                Char('\\') => {
                    self.advance_char();
                    self.lex_state = LexState::StringEscape;
                    Ok(None)
                }
                Char('"') => {
                    self.advance_char();
                    Ok(Some(self.produce_string()))
                }
                Char(c @ '\0'..='\x1F') => {
                    // JSON allows 0x20 .. 0x10FFFF unescaped.
                    Err(self.invalid_char(Char(c)))
                }
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) => {
                    self.flush_pending_surrogate();
                    self.advance_char();
                    self.buffer.push(c);
                    Ok(None)
                }
                EndOfInput => Err(self.invalid_char(EndOfInput)),
            },

            StringEscape => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(ch) if matches!(ch, '"' | '\\' | '/') => {
                    self.flush_pending_surrogate();
                    self.advance_char();
                    self.buffer.push(ch);
                    self.lex_state = LexState::String;
                    Ok(None)
                }
                Char(ch) if matches!(ch, 'b' | 'f' | 'n' | 'r' | 't') => {
                    self.flush_pending_surrogate();
                    self.advance_char();
                    self.buffer.push(escape::decode_short_escape(ch));
                    self.lex_state = LexState::String;
                    Ok(None)
                }
                Char('u') => {
                    self.advance_char();
                    self.unicode_escape_buffer.reset();
                    self.lex_state = LexState::StringEscapeUnicode;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            StringEscapeUnicode => match next_char {
                Empty => Ok(Some(self.new_token(Token::Eof, true))),
                Char(c) => {
                    self.advance_char();
                    match self.unicode_escape_buffer.feed(c) {
                        Ok(Some(unit)) => {
                            self.resolve_unicode_unit(unit);
                            Ok(None)
                        }
                        // Still waiting for more hex digits
                        Ok(None) => Ok(None),
                        Err(err) => Err(self.syntax_error(err)),
                    }
                }
                EndOfInput => Err(self.invalid_char(EndOfInput)),
            },

            Start => match next_char {
                Char(c) if matches!(c, '{' | '[') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                _ => {
                    self.lex_state = LexState::Value;
                    Ok(None)
                }
            },

            BeforePropertyName => match next_char {
                Char('}') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(b'}'), false)))
                }
                Char('"') => {
                    self.advance_char();
                    self.buffer.clear();
                    self.lex_state = LexState::String;
                    Ok(None)
                }
                c => Err(self.invalid_char(c)),
            },

            AfterPropertyName => match next_char {
                Char(c @ ':') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                c => Err(self.invalid_char(c)),
            },

            BeforePropertyValue => {
                self.lex_state = LexState::Value;
                Ok(None)
            }

            AfterPropertyValue => match next_char {
                Char(c) if matches!(c, ',' | '}') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                c => Err(self.invalid_char(c)),
            },

            BeforeArrayValue => match next_char {
                Char(']') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(b']'), false)))
                }
                _ => {
                    self.lex_state = LexState::Value;
                    Ok(None)
                }
            },

            AfterArrayValue => match next_char {
                Char(c) if matches!(c, ',' | ']') => {
                    self.advance_char();
                    Ok(Some(self.new_token(Token::Punctuator(c as u8), false)))
                }
                c => Err(self.invalid_char(c)),
            },

            End => {
                let c = self.peek_char();
                Err(self.invalid_char(c))
            }
        }
    }

    // --------------------------------------------------------------------
    // Parse state dispatcher
    // --------------------------------------------------------------------

    fn dispatch_parse_state(
        &mut self,
        token: Token,
    ) -> Result<Option<StructuralToken>, TokenizeError> {
        use ParseState::*;

        match self.parse_state {
            Start => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                tok => self.push_value(tok),
            },

            BeforePropertyName => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                Token::PropertyName { value } => {
                    match self.frames.last_mut() {
                        Some(Frame::Object { pending_key }) => {
                            *pending_key = Some(value);
                        }
                        _ => {
                            return Err(
                                self.structure_error("expected object frame for property name")
                            );
                        }
                    }
                    self.parse_state = AfterPropertyName;
                    Ok(None)
                }
                Token::Punctuator(b'}') => self.pop_container(),
                _ => Err(self.structure_error("expected property name")),
            },

            AfterPropertyName => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                _ => {
                    // The `:` just went by; only now is the member announced.
                    self.parse_state = BeforePropertyValue;
                    let name = match self.frames.last() {
                        Some(Frame::Object {
                            pending_key: Some(key),
                        }) => key.clone(),
                        _ => String::new(),
                    };
                    Ok(Some(StructuralToken::FieldName { name }))
                }
            },

            BeforePropertyValue => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                tok => self.push_value(tok),
            },

            BeforeArrayValue => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                Token::Punctuator(b']') => self.pop_container(),
                tok => self.push_value(tok),
            },

            AfterPropertyValue => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                Token::Punctuator(b',') => {
                    if let Some(Frame::Object { pending_key }) = self.frames.last_mut() {
                        *pending_key = None;
                    }
                    self.parse_state = BeforePropertyName;
                    Ok(None)
                }
                Token::Punctuator(b'}') => self.pop_container(),
                _ => Ok(None),
            },

            AfterArrayValue => match token {
                Token::Eof if self.end_of_input => Err(self.invalid_eof()),
                Token::Eof => Ok(None),
                Token::Punctuator(b',') => {
                    self.parse_state = BeforeArrayValue;
                    Ok(None)
                }
                Token::Punctuator(b']') => self.pop_container(),
                _ => Ok(None),
            },

            End | Error => Ok(None),
        }
    }

    fn pop_container(&mut self) -> Result<Option<StructuralToken>, TokenizeError> {
        let out = match self.frames.pop() {
            Some(Frame::Array) => StructuralToken::ArrayEnd,
            Some(Frame::Object { .. }) => StructuralToken::ObjectEnd,
            None => return Err(self.structure_error("close without open container")),
        };

        self.parse_state = match self.frames.last() {
            Some(Frame::Array) => ParseState::AfterArrayValue,
            Some(Frame::Object { .. }) => ParseState::AfterPropertyValue,
            None => ParseState::End,
        };

        Ok(Some(out))
    }

    fn push_value(&mut self, token: Token) -> Result<Option<StructuralToken>, TokenizeError> {
        match token {
            Token::Punctuator(b'{') => {
                self.frames.push(Frame::Object { pending_key: None });
                self.parse_state = ParseState::BeforePropertyName;
                return Ok(Some(StructuralToken::ObjectBegin));
            }
            Token::Punctuator(b'[') => {
                let name = match self.frames.last() {
                    Some(Frame::Object { pending_key }) => pending_key.clone(),
                    _ => None,
                };
                self.frames.push(Frame::Array);
                self.parse_state = ParseState::BeforeArrayValue;
                return Ok(Some(StructuralToken::ArrayBegin { name }));
            }
            _ => {}
        }

        let out = match token {
            Token::Null => StructuralToken::Null,
            Token::Boolean(b) => StructuralToken::Boolean(b),
            Token::Integer(n) => StructuralToken::Integer(n),
            Token::Float(n) => StructuralToken::Float(n),
            Token::String { value } => StructuralToken::String(value),
            Token::PropertyName { .. } => {
                return Err(self.structure_error("unexpected property name outside of object"));
            }
            Token::Eof | Token::Punctuator(_) => return Ok(None),
        };

        if let Some(Frame::Object { pending_key }) = self.frames.last_mut() {
            *pending_key = None;
        }

        self.parse_state = match self.frames.last() {
            None => ParseState::End,
            Some(Frame::Array) => ParseState::AfterArrayValue,
            Some(Frame::Object { .. }) => ParseState::AfterPropertyValue,
        };

        Ok(Some(out))
    }

    // --------------------------------------------------------------------
    // Errors
    // --------------------------------------------------------------------

    fn invalid_char(&self, c: PeekedChar) -> TokenizeError {
        match c {
            EndOfInput | Empty => self.syntax_error(SyntaxError::UnexpectedEndOfInput),
            Char(c) => self.syntax_error(SyntaxError::InvalidCharacter(c)),
        }
    }

    fn invalid_eof(&self) -> TokenizeError {
        self.syntax_error(SyntaxError::UnexpectedEndOfInput)
    }

    fn structure_error(&self, msg: &'static str) -> TokenizeError {
        self.syntax_error(SyntaxError::Structure(msg))
    }

    fn syntax_error(&self, source: SyntaxError) -> TokenizeError {
        TokenizeError {
            source,
            line: self.line,
            column: self.column,
        }
    }
}
