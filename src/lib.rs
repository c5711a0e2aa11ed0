/*!
This library counts and enumerates the members of a bounded, loosely
PCRE-flavored regular language, without ever walking the language as
strings.

A pattern such as `[0-9]{3}` or `(cat|dog)s?` is parsed into a counted tree:
every node in the tree knows how many distinct byte sequences it can
produce, so the language's total size is known the moment parsing finishes,
`BigUint`-precise, with no enumeration required. From there you can jump
straight to the *n*-th member in that tree's canonical order, or walk it
one member at a time.

Patterns that would admit an unbounded language — anything built from `*`
or `+` — are rejected at parse time with [`RexError::Infinite`]; there is
no bound on the counts `[0-9]{1000}` or nested `{n,m}` reach, only on the
shape of the pattern itself.

# Example

```
use num_bigint::BigUint;
use rexcount::Flags;

let mut re = rexcount::parse(b"[A-C]{2}", Flags::empty());
assert!(re.error().is_none());
assert_eq!(re.count(), BigUint::from(9u32));

assert_eq!(re.current(), b"AA");
assert_eq!(re.next(), Some(b"AB".to_vec()));

assert!(!re.seek(&BigUint::from(8u32)));
assert_eq!(re.current(), b"CC");
assert!(re.seek(&BigUint::from(9u32))); // out of range, state unchanged
assert_eq!(re.current(), b"CC");
```

# Back-references and recursion

`\1` refers back to an already-closed group by position, and its count is
folded into the product of the alternative it appears in rather than
enumerated independently — `(a|b)\1` has 2 members (`aa`, `bb`), not 4.
`(?1)` instead splices an independent deep copy of the referenced group,
so `(a|b)(?1)` has the full 4 (`aa`, `ab`, `ba`, `bb`). A pattern can only
reference a group whose closing `)` has already been consumed; referencing
an open, in-progress group is [`RexError::Infinite`].

# Inline flags

`(?i)` (case-insensitive) and `(?s)` (let `.` match any byte, including
`\n`) can be set for the rest of the enclosing group, or scoped to a new
group with `(?i:...)`; `(?-i:...)` clears a flag for the scope it
introduces. See [`Flags`].

# Non-goals

This crate parses a *pattern description language*; it has no pattern
*matching* engine. Given a pattern and a byte string, it cannot tell you
whether the string matches — only enumerate or count everything the
pattern could produce.
*/

#![deny(missing_docs)]

mod backref;
mod bigint;
mod charclass;
mod enumerate;
mod error;
mod flags;
mod parser;
mod tree;

pub use error::{RexError, RexResult};
pub use flags::Flags;

use num_bigint::BigUint;
use num_traits::Zero;

use backref::BackrefTable;
use tree::{Arena, TreeId};

/// Parses `source` under `flags` into a [`Regex`].
///
/// Always returns a value: a failed parse is reported through
/// [`Regex::error`] rather than by this function, so a caller that only
/// cares about well-formed patterns can check `error()` once up front.
pub fn parse(source: &[u8], flags: Flags) -> Regex {
    let (arena, backrefs, root, error) = parser::parse(source, flags);
    Regex { arena, backrefs, root, error }
}

/// A parsed pattern, positioned at one member of the language it denotes.
///
/// Constructed with [`parse`]. If parsing failed, every enumeration method
/// becomes a no-op (`count` is zero, `current` is empty, `iterate`/`seek`
/// report no movement) rather than panicking; check [`Regex::error`] first.
pub struct Regex {
    arena: Arena,
    #[allow(dead_code)] // kept for (?N) recursion support during parsing; not read afterward
    backrefs: BackrefTable,
    root: TreeId,
    error: Option<RexError>,
}

impl Regex {
    /// The parse error, if `source` didn't denote a valid bounded pattern.
    pub fn error(&self) -> Option<RexError> {
        self.error
    }

    /// A human-readable rendering of [`Regex::error`], if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.message())
    }

    /// The total number of distinct byte sequences this pattern denotes.
    pub fn count(&self) -> BigUint {
        if self.error.is_some() {
            return BigUint::zero();
        }
        self.arena.get(self.root).nitems.clone()
    }

    /// The byte sequence at the current position.
    pub fn current(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if self.error.is_none() {
            enumerate::current(&self.arena, self.root, &mut out);
        }
        out
    }

    /// Advances to the next member in canonical order. Returns `true` if
    /// this wrapped back around to the first member (there was no next
    /// member to advance to).
    pub fn iterate(&mut self) -> bool {
        if self.error.is_some() {
            return true;
        }
        enumerate::iterate(&mut self.arena, self.root)
    }

    /// Advances to the next member and returns it, or `None` if doing so
    /// wrapped back to the first member.
    pub fn next(&mut self) -> Option<Vec<u8>> {
        if self.iterate() {
            None
        } else {
            Some(self.current())
        }
    }

    /// Jumps directly to the `pos`-th member (0-indexed) in canonical
    /// order. Returns `true` if `pos` is out of range, leaving the current
    /// position unchanged.
    pub fn seek(&mut self, pos: &BigUint) -> bool {
        if self.error.is_some() {
            return true;
        }
        enumerate::seek(&mut self.arena, self.root, pos)
    }

    /// Seeks to a uniformly random member, using `rng`, and returns its
    /// index. Does nothing and returns zero if the pattern failed to parse
    /// or denotes the empty language.
    pub fn seek_random<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> BigUint {
        let bound = self.count();
        if bound.is_zero() {
            return bound;
        }
        let pos = bigint::random_below(rng, &bound);
        self.seek(&pos);
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_pattern_has_no_error() {
        let re = parse(b"[0-9]{3}", Flags::empty());
        assert!(re.error().is_none());
        assert!(re.error_message().is_none());
        assert_eq!(re.count(), BigUint::from(1000u32));
    }

    #[test]
    fn malformed_pattern_reports_error_and_degrades_safely() {
        let mut re = parse(b"a*", Flags::empty());
        assert_eq!(re.error(), Some(RexError::Infinite));
        assert!(re.error_message().unwrap().contains("infinite"));
        assert_eq!(re.count(), BigUint::zero());
        assert_eq!(re.current(), Vec::<u8>::new());
        assert!(re.iterate());
        assert!(re.seek(&BigUint::zero()));
    }

    #[test]
    fn next_walks_in_canonical_order_then_reports_wrap() {
        let mut re = parse(b"a{0,1}", Flags::empty());
        assert_eq!(re.current(), b"");
        assert_eq!(re.next(), Some(b"a".to_vec()));
        assert_eq!(re.next(), None);
        assert_eq!(re.current(), b"");
    }

    #[test]
    fn seek_out_of_range_leaves_position_unchanged() {
        let mut re = parse(b"a{0,1}", Flags::empty());
        assert!(re.seek(&BigUint::from(2u32)));
        assert_eq!(re.current(), b"");
    }
}
