//! Resumable matcher for the `true` / `false` / `null` literals.

use super::StructuralToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpectedLiteralValue {
    Null,
    True,
    False,
}

/// What happened after feeding one more character into the literal matcher?
pub(crate) enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched *and* we consumed the last byte of the literal.
    Done(StructuralToken),
    /// Character did **not** match the expected byte.
    Reject,
}

/// `None`  ➜  we are **not** in the middle of a literal
/// `Some`  ➜  `(remaining_bytes, token_kind)` while matching
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteralBuffer(Option<(&'static [u8], ExpectedLiteralValue)>);

impl ExpectedLiteralBuffer {
    /// No literal is in flight
    pub fn none() -> Self {
        ExpectedLiteralBuffer(None)
    }

    /// Start matching after the *first* character (`n`, `t`, or `f`)
    pub fn new(first: char) -> Self {
        match first {
            'n' => ExpectedLiteralBuffer(Some((b"ull", ExpectedLiteralValue::Null))),
            't' => ExpectedLiteralBuffer(Some((b"rue", ExpectedLiteralValue::True))),
            'f' => ExpectedLiteralBuffer(Some((b"alse", ExpectedLiteralValue::False))),
            _ => ExpectedLiteralBuffer::none(),
        }
    }

    /// Give the matcher the next input character and learn what to do next.
    pub fn step(&mut self, c: char) -> Step {
        // If we are not in the middle of a literal, any char is a reject
        let Some((bytes, kind)) = self.0.take() else {
            return Step::Reject;
        };

        if bytes.first().is_some_and(|b| *b as char == c) {
            // Safe: we just checked that `bytes` is non-empty
            let (_, rest) = bytes.split_first().unwrap();

            if rest.is_empty() {
                Step::Done(match kind {
                    ExpectedLiteralValue::Null => StructuralToken::Null,
                    ExpectedLiteralValue::True => StructuralToken::Boolean(true),
                    ExpectedLiteralValue::False => StructuralToken::Boolean(false),
                })
            } else {
                // Still more to go – remember the rest
                self.0 = Some((rest, kind));
                Step::NeedMore
            }
        } else {
            // Mismatch – restore the state we took at the top
            self.0 = Some((bytes, kind));
            Step::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_null_across_steps() {
        let mut m = ExpectedLiteralBuffer::new('n');
        assert!(matches!(m.step('u'), Step::NeedMore));
        assert!(matches!(m.step('l'), Step::NeedMore));
        assert!(matches!(m.step('l'), Step::Done(StructuralToken::Null)));
    }

    #[test]
    fn rejects_mismatch_without_losing_state() {
        let mut m = ExpectedLiteralBuffer::new('t');
        assert!(matches!(m.step('r'), Step::NeedMore));
        assert!(matches!(m.step('x'), Step::Reject));
        // The mismatch must not have consumed the expected suffix.
        assert!(matches!(m.step('u'), Step::NeedMore));
        assert!(matches!(
            m.step('e'),
            Step::Done(StructuralToken::Boolean(true))
        ));
    }
}
