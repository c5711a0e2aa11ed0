/*!
This module provides the error type returned by a failed parse and the
result type that carries it.

Parsing is fail-fast: the first problem encountered is recorded and
propagated to the root `Regex`, and no further diagnostics are attempted.
*/

use std::result;
use thiserror::Error;

/// The result of an operation internal to parsing, holding either the
/// desired return value (`Ok`) or a [`RexError`] (`Err`).
///
/// See [`RexError`] for a list of the different errors and their meanings.
pub type RexResult<T> = result::Result<T, RexError>;

/// An error that occurred while parsing a regex source string.
///
/// A [`crate::Regex`] never fails to return from [`crate::parse`]; instead
/// the first `RexError` encountered is recorded on the `Regex` and can be
/// read back with [`crate::Regex::error`].
///
/// ```
/// use rexcount::{parse, Flags};
///
/// let re = parse(b"a*", Flags::empty());
/// assert!(re.error().is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RexError {
    /// The source denotes an infinite language (`*`, `+`, or an unbounded
    /// `{n,}`).
    #[error("the pattern denotes an infinite language")]
    Infinite,
    /// A `)` was encountered with no matching open group.
    #[error("unmatched ')'")]
    TooManyParens,
    /// End of input was reached with one or more groups still open.
    #[error("missing ')'")]
    TooLittleParens,
    /// A quantifier (`?`, `{n,m}`) appeared with no preceding node to
    /// quantify.
    #[error("quantifier has nothing to repeat")]
    LoneQuantifier,
    /// Two quantifiers appeared back to back (e.g. `a??`, `a{2}{3}`).
    #[error("quantifiers cannot be stacked")]
    NestedQuantifiers,
    /// A literal construct was left unterminated (reserved for future
    /// literal forms; currently unused by the parser).
    #[error("unterminated literal")]
    UnterminatedLiteral,
    /// A `[...]` character class was not closed with `]`.
    #[error("unterminated character class")]
    UnterminatedClass,
    /// A `{n,m}` repetition was not closed with `}`.
    #[error("unterminated repetition")]
    UnterminatedRepeat,
    /// A `(?ims-im` inline-flag run was not closed with `:` or `)`.
    #[error("unterminated inline flags")]
    UnterminatedFlags,
    /// A `{n,m}` repetition had `n > m`.
    #[error("repetition bounds out of order")]
    BadRepetition,
    /// The escape or construct is recognized but deliberately not
    /// implemented (`\c \E \g \k \l \m \o \p \P \Q \u \C`).
    #[error("construct not implemented")]
    Unimplemented,
    /// A numeric back-reference or `(?N)` recursion referred to a group
    /// that doesn't exist, or isn't closed yet.
    #[error("invalid back-reference")]
    InvalidBackref,
    /// A numeric constant (e.g. a repetition count) was malformed.
    #[error("invalid numeric constant")]
    InvalidConstant,
    /// A `\x{...}` hex escape was not closed with `}`.
    #[error("unterminated hex constant")]
    UnterminatedHexConstant,
}

impl RexError {
    /// The human-readable message for this error, as returned by
    /// [`crate::Regex::error_message`].
    ///
    /// This is identical to the `Display` message, surfaced as an
    /// independent method so callers who already hold a `RexError` don't
    /// need to format it themselves.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_non_empty() {
        for err in [
            RexError::Infinite,
            RexError::TooManyParens,
            RexError::TooLittleParens,
            RexError::LoneQuantifier,
            RexError::NestedQuantifiers,
            RexError::UnterminatedLiteral,
            RexError::UnterminatedClass,
            RexError::UnterminatedRepeat,
            RexError::UnterminatedFlags,
            RexError::BadRepetition,
            RexError::Unimplemented,
            RexError::InvalidBackref,
            RexError::InvalidConstant,
            RexError::UnterminatedHexConstant,
        ] {
            assert!(!err.message().is_empty());
        }
    }
}
