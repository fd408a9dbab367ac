//! Incremental extraction of string-value content from the raw text buffer.
//!
//! The tokenizer only reports a string once its closing quote has been read;
//! for long values that arrive over many chunks that is far too late. The
//! [`StringIncrements`] scanner owns a second, raw view of everything fed so
//! far and hands out newly decodable characters of the current string value
//! as soon as they are buffered, deferring any escape sequence that a chunk
//! boundary has cut in half.
//!
//! The two views are reconciled by decoded length, not by offset: when the
//! tokenizer finally reports the full value, [`StringIncrements::complete`]
//! returns exactly the suffix that was never streamed. Both views decode
//! escapes through the same helpers, so the character counts always agree.

use crate::tokenizer::escape::{
    self, combine_surrogates, is_high_surrogate, is_low_surrogate, unit_to_char,
};

/// Scanner state for streaming one string value at a time out of the raw
/// buffer.
///
/// The buffer grows monotonically for the lifetime of the document; offsets
/// into it stay valid forever. String-mode state is reset after every value,
/// the buffer is not.
#[derive(Debug, Default)]
pub(crate) struct StringIncrements {
    raw: String,
    in_string: bool,
    /// Byte offset of the first not-yet-decoded byte.
    last_emitted: usize,
    /// An escape sequence was cut off by the end of the buffer; it has not
    /// been consumed and decoding will re-read it from `last_emitted`.
    pending_escape: bool,
    /// Total characters handed out for the active value.
    emitted_chars: usize,
}

impl StringIncrements {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk to the raw buffer, returning the byte offset at which
    /// it begins.
    pub(crate) fn begin_chunk(&mut self, text: &str) -> usize {
        let at = self.raw.len();
        self.raw.push_str(text);
        at
    }

    pub(crate) fn in_string(&self) -> bool {
        self.in_string
    }

    #[cfg(test)]
    pub(crate) fn pending_escape(&self) -> bool {
        self.pending_escape
    }

    /// Scans the buffer tail for a string value that has begun but that the
    /// tokenizer has not yet surfaced: the most recent `:`, optional
    /// whitespace, then an opening quote.
    ///
    /// On a hit, arms string mode and returns the offset just past the
    /// quote. A miss (`None`) is always safe — it only delays streaming
    /// until either more input or the tokenizer's own report.
    pub(crate) fn detect_string_start(&mut self) -> Option<usize> {
        let colon = self.raw.rfind(':')?;
        for (off, c) in self.raw[colon + 1..].char_indices() {
            if c.is_whitespace() {
                continue;
            }
            if c == '"' {
                let start = colon + 1 + off + 1;
                self.in_string = true;
                self.last_emitted = start;
                self.pending_escape = false;
                self.emitted_chars = 0;
                return Some(start);
            }
            break;
        }
        None
    }

    /// Decodes and returns everything newly available for the active string
    /// value, from `max(from, last_emitted)` up to an unescaped closing
    /// quote or the end of the buffer.
    ///
    /// Returns `None` when not in a string or when zero characters became
    /// decodable (for instance because the buffer ends inside an escape).
    pub(crate) fn extract_increment(&mut self, from: usize) -> Option<String> {
        if !self.in_string {
            return None;
        }

        // A deferred escape was left unconsumed at `last_emitted`; resuming
        // from the chunk edge would skip its prefix bytes.
        let mut i = if self.pending_escape {
            self.last_emitted
        } else {
            from.max(self.last_emitted)
        };
        let mut out = String::new();
        self.pending_escape = false;

        while i < self.raw.len() {
            let Some(c) = self.raw[i..].chars().next() else {
                break;
            };
            if c == '\\' {
                match decode_escape(&self.raw[i..], &mut out) {
                    Some(consumed) => i += consumed,
                    None => {
                        // Cut off mid-escape; leave it unconsumed and pick
                        // it back up when more bytes arrive.
                        self.pending_escape = true;
                        break;
                    }
                }
            } else if c == '"' {
                break;
            } else {
                out.push(c);
                i += c.len_utf8();
            }
        }

        self.last_emitted = i;

        if out.is_empty() {
            None
        } else {
            self.emitted_chars += out.chars().count();
            Some(out)
        }
    }

    /// Reconciles the incremental view with the tokenizer's full value and
    /// returns the suffix that still needs to be reported.
    ///
    /// - Streaming happened: the remainder beyond the already-emitted
    ///   character count, or `None` if everything was streamed — except that
    ///   an empty value with nothing streamed yields `Some("")` so that
    ///   empty string fields still produce exactly one delta.
    /// - No streaming happened at all: the full value.
    ///
    /// String-mode state is reset either way.
    pub(crate) fn complete(&mut self, full_value: &str) -> Option<String> {
        let remaining = if self.in_string {
            let total = full_value.chars().count();
            if self.emitted_chars < total {
                let at = full_value
                    .char_indices()
                    .nth(self.emitted_chars)
                    .map_or(full_value.len(), |(i, _)| i);
                Some(full_value[at..].to_string())
            } else if self.emitted_chars == 0 && full_value.is_empty() {
                Some(String::new())
            } else {
                None
            }
        } else {
            Some(full_value.to_string())
        };

        self.reset();
        remaining
    }

    fn reset(&mut self) {
        self.in_string = false;
        self.last_emitted = 0;
        self.pending_escape = false;
        self.emitted_chars = 0;
    }
}

/// Decodes one escape sequence at the start of `s` (which begins with `\`),
/// pushing the result onto `out`.
///
/// Returns the number of bytes consumed, or `None` if the sequence is not
/// yet fully buffered — including a high surrogate whose partner escape has
/// not completely arrived, since the pair must decode as one scalar.
///
/// A `\uXXXX` with non-hex digits degrades to the literal `\u` text (the
/// tokenizer will fault the document when it reaches the same bytes); an
/// unpaired surrogate half decodes to U+FFFD, matching the tokenizer's own
/// policy so the emitted-length bookkeeping stays exact.
fn decode_escape(s: &str, out: &mut String) -> Option<usize> {
    debug_assert!(s.starts_with('\\'));

    let mut tail = s[1..].chars();
    let marker = tail.next()?;

    if marker != 'u' {
        out.push(escape::decode_short_escape(marker));
        return Some(1 + marker.len_utf8());
    }

    if s.len() < 6 {
        return None;
    }
    // `get` rather than slicing: the four "digits" may be arbitrary garbage,
    // including multi-byte characters that break the byte range.
    let Some(unit) = s.get(2..6).and_then(|hex| u32::from_str_radix(hex, 16).ok()) else {
        out.push('\\');
        out.push('u');
        return Some(6);
    };

    if is_high_surrogate(unit) {
        return decode_low_surrogate(&s[6..], unit, out).map(|extra| 6 + extra);
    }

    if is_low_surrogate(unit) {
        out.push(char::REPLACEMENT_CHARACTER);
    } else {
        out.push(unit_to_char(unit));
    }
    Some(6)
}

/// Resolves what follows a decoded high surrogate: a `\uXXXX` low surrogate
/// combines with it, anything else demotes it to U+FFFD. Returns the extra
/// bytes consumed beyond the high surrogate's own escape, or `None` while
/// the decision cannot be made yet.
fn decode_low_surrogate(rest: &str, high: u32, out: &mut String) -> Option<usize> {
    let mut chars = rest.chars();
    match chars.next() {
        // Buffer ends right at the boundary: the partner may still arrive.
        None => None,
        Some('\\') => match chars.next() {
            None => None,
            Some('u') => {
                if rest.len() < 6 {
                    return None;
                }
                match rest.get(2..6).and_then(|hex| u32::from_str_radix(hex, 16).ok()) {
                    Some(unit) if is_low_surrogate(unit) => {
                        out.push(combine_surrogates(high, unit));
                        Some(6)
                    }
                    // Unpaired; the following escape is re-scanned on its
                    // own next round.
                    _ => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        Some(0)
                    }
                }
            }
            Some(_) => {
                out.push(char::REPLACEMENT_CHARACTER);
                Some(0)
            }
        },
        Some(_) => {
            out.push(char::REPLACEMENT_CHARACTER);
            Some(0)
        }
    }
}
