/*!
Recursive-descent parser lowering a regex source string into a counted
parse tree (see [`crate::tree`]).

One level of recursion corresponds to one `Tree` (the root, or a
parenthesized group). Per level, a running `alt_product` tracks the count
of every node pushed so far *except* the most recently pushed one; that
node's count sits in `last_node_count` instead, one token behind. A
quantifier (`?`, `{n,m}`) pops that still-pending node and count straight
out and replaces them, so it never has to undo a multiplication that
hasn't happened yet — the lag means `alt_product` is only ever folded
forward, never divided back out, even when the pending count is zero (an
empty or fully-inverted character class).
*/

use num_bigint::BigUint;
use num_traits::Zero;

use crate::backref::BackrefTable;
use crate::charclass::{class_bytes, dot_bytes, escape_table, parse_hex_escape, Cursor, Escape};
use crate::error::RexError;
use crate::flags::Flags;
use crate::tree::{deep_clone_node, deep_clone_tree, Alternative, Arena, Node, TreeId};

type RexResult<T> = Result<T, RexError>;

/// Parses `source` under `flags`, returning the arena, the back-reference
/// table, the root tree's id, and the first error encountered (if any).
pub(crate) fn parse(
    source: &[u8],
    flags: Flags,
) -> (Arena, BackrefTable, TreeId, Option<RexError>) {
    Parser::new(source, flags).run()
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: Arena,
    backrefs: BackrefTable,
    flags: Flags,
}

impl<'a> Parser<'a> {
    fn new(source: &'a [u8], flags: Flags) -> Self {
        Parser {
            cursor: Cursor::new(source),
            arena: Arena::new(),
            backrefs: BackrefTable::new(),
            flags,
        }
    }

    fn run(mut self) -> (Arena, BackrefTable, TreeId, Option<RexError>) {
        // A leading `^` is always anchoring here (the whole regex is always
        // treated as anchored); it's consumed and ignored.
        if self.cursor.peek() == Some(b'^') {
            self.cursor.advance();
        }
        let root = self.arena.push();
        let error = self.parse_body(root, 0).err();
        self.arena.get_mut(root).closed = true;
        (self.arena, self.backrefs, root, error)
    }

    /// Parses the body of `tree_id` (already pushed, empty) until `)` at
    /// `depth > 0`, or end of input at `depth == 0`.
    fn parse_body(&mut self, tree_id: TreeId, depth: usize) -> RexResult<()> {
        let mut ret = BigUint::zero();
        let mut alt_start = BigUint::zero();
        let mut nodes: Vec<Node> = Vec::new();
        let mut alt_product = BigUint::from(1u32);
        let mut last_node_count: Option<BigUint> = None;
        let mut quantifier = false;

        loop {
            match self.cursor.peek() {
                None => {
                    if depth > 0 {
                        return Err(RexError::TooLittleParens);
                    }
                    self.commit_alt(tree_id, &mut nodes, &mut alt_product, &mut last_node_count, &alt_start, &mut ret);
                    break;
                }
                Some(b')') => {
                    if depth == 0 {
                        return Err(RexError::TooManyParens);
                    }
                    self.cursor.advance();
                    self.commit_alt(tree_id, &mut nodes, &mut alt_product, &mut last_node_count, &alt_start, &mut ret);
                    break;
                }
                Some(b'|') => {
                    self.cursor.advance();
                    self.commit_alt(tree_id, &mut nodes, &mut alt_product, &mut last_node_count, &alt_start, &mut ret);
                    alt_start = ret.clone();
                    alt_product = BigUint::from(1u32);
                    last_node_count = None;
                    quantifier = false;
                }
                Some(b'*') | Some(b'+') => return Err(RexError::Infinite),
                Some(b'?') => {
                    self.cursor.advance();
                    self.rewrite_optional(&mut nodes, &mut last_node_count, quantifier)?;
                    quantifier = true;
                }
                Some(b'{') => {
                    self.cursor.advance();
                    self.rewrite_bounded(&mut nodes, &mut last_node_count, quantifier)?;
                    quantifier = true;
                }
                Some(b'(') => {
                    self.cursor.advance();
                    match self.handle_open_paren(depth)? {
                        OpenParenResult::FlagsOnly => {}
                        OpenParenResult::Node(node, count) => {
                            Self::fold_last(&mut alt_product, &mut last_node_count);
                            nodes.push(node);
                            last_node_count = Some(count);
                        }
                    }
                    quantifier = false;
                }
                Some(b'[') => {
                    self.cursor.advance();
                    let bytes = class_bytes(&mut self.cursor, self.flags)?;
                    self.push_bytes(&mut nodes, &mut alt_product, &mut last_node_count, bytes);
                    quantifier = false;
                }
                Some(b'.') => {
                    self.cursor.advance();
                    let bytes = dot_bytes(self.flags);
                    self.push_bytes(&mut nodes, &mut alt_product, &mut last_node_count, bytes);
                    quantifier = false;
                }
                Some(b'\\') => {
                    self.cursor.advance();
                    self.parse_escape(&mut nodes, &mut alt_product, &mut last_node_count)?;
                    quantifier = false;
                }
                Some(b'$') if self.cursor.peek_at(1).is_none() => {
                    self.cursor.advance();
                }
                Some(c) => {
                    self.cursor.advance();
                    self.push_literal_byte(&mut nodes, &mut alt_product, &mut last_node_count, c);
                    quantifier = false;
                }
            }
        }

        let tree = self.arena.get_mut(tree_id);
        tree.nitems = ret;
        Ok(())
    }

    /// Folds the still-pending last node's count into `alt_product`, if any
    /// is pending. Must run before the alternative's node list is read (a
    /// new node is about to be appended, or the alternative is ending).
    fn fold_last(alt_product: &mut BigUint, last_node_count: &mut Option<BigUint>) {
        if let Some(count) = last_node_count.take() {
            *alt_product *= &count;
        }
    }

    fn commit_alt(
        &mut self,
        tree_id: TreeId,
        nodes: &mut Vec<Node>,
        alt_product: &mut BigUint,
        last_node_count: &mut Option<BigUint>,
        alt_start: &BigUint,
        ret: &mut BigUint,
    ) {
        Self::fold_last(alt_product, last_node_count);
        let alt = Alternative {
            nodes: std::mem::take(nodes),
            nitems: alt_product.clone(),
            start: alt_start.clone(),
        };
        *ret += &alt.nitems;
        self.arena.get_mut(tree_id).alts.push(alt);
    }

    fn push_bytes(
        &mut self,
        nodes: &mut Vec<Node>,
        alt_product: &mut BigUint,
        last_node_count: &mut Option<BigUint>,
        bytes: Vec<u8>,
    ) {
        Self::fold_last(alt_product, last_node_count);
        let count = BigUint::from(bytes.len() as u64);
        nodes.push(Node::literal(bytes));
        *last_node_count = Some(count);
    }

    fn push_literal_byte(
        &mut self,
        nodes: &mut Vec<Node>,
        alt_product: &mut BigUint,
        last_node_count: &mut Option<BigUint>,
        c: u8,
    ) {
        let mut bytes = vec![c];
        if self.flags.contains(Flags::CASELESS) && c.is_ascii_alphabetic() {
            bytes.push(c ^ 0x20);
            bytes.sort_unstable();
            bytes.dedup();
        }
        self.push_bytes(nodes, alt_product, last_node_count, bytes);
    }

    fn parse_decimal(&mut self) -> RexResult<usize> {
        let mut value: usize = 0;
        let mut any = false;
        while let Some(b) = self.cursor.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            self.cursor.advance();
            any = true;
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as usize))
                .ok_or(RexError::InvalidConstant)?;
        }
        if !any {
            return Err(RexError::InvalidConstant);
        }
        Ok(value)
    }

    fn parse_escape(
        &mut self,
        nodes: &mut Vec<Node>,
        alt_product: &mut BigUint,
        last_node_count: &mut Option<BigUint>,
    ) -> RexResult<()> {
        let c = self.cursor.advance().ok_or(RexError::UnterminatedLiteral)?;

        if c.is_ascii_digit() {
            let mut value = (c - b'0') as usize;
            while let Some(d) = self.cursor.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                self.cursor.advance();
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add((d - b'0') as usize))
                    .ok_or(RexError::InvalidConstant)?;
            }
            if value == 0 {
                return Err(RexError::InvalidBackref);
            }
            let target = self.backrefs.get(value)?;
            if !self.arena.get(target).closed {
                return Err(RexError::Infinite);
            }
            Self::fold_last(alt_product, last_node_count);
            nodes.push(Node::BackRef(target));
            *last_node_count = Some(BigUint::from(1u32));
            return Ok(());
        }

        if c == b'x' {
            let byte = parse_hex_escape(&mut self.cursor)?;
            self.push_literal_byte(nodes, alt_product, last_node_count, byte);
            return Ok(());
        }

        match escape_table(c) {
            Escape::Empty => Ok(()),
            Escape::Byte(b) => {
                self.push_literal_byte(nodes, alt_product, last_node_count, b);
                Ok(())
            }
            Escape::ClassFragment(body) => {
                let bytes = class_bytes(&mut Cursor::new(body), self.flags)?;
                self.push_bytes(nodes, alt_product, last_node_count, bytes);
                Ok(())
            }
            Escape::Unimplemented => Err(RexError::Unimplemented),
            Escape::Literal => {
                self.push_literal_byte(nodes, alt_product, last_node_count, c);
                Ok(())
            }
        }
    }

    /// `?`: replaces the last node with a two-alternative sub-tree (empty,
    /// then the original).
    fn rewrite_optional(
        &mut self,
        nodes: &mut Vec<Node>,
        last_node_count: &mut Option<BigUint>,
        quantifier: bool,
    ) -> RexResult<()> {
        if quantifier {
            return Err(RexError::NestedQuantifiers);
        }
        // `old_count` was never folded into `alt_product` (it's still the
        // pending last-node count), so there's nothing to undo here, even
        // when it's zero (an empty or fully-inverted class).
        let old_count = last_node_count.take().ok_or(RexError::LoneQuantifier)?;
        let old_node = nodes.pop().ok_or(RexError::LoneQuantifier)?;

        let sub_id = self.arena.push();
        let alt_a = Alternative::empty(BigUint::zero());
        let alt_b = Alternative {
            nodes: vec![old_node],
            nitems: old_count.clone(),
            start: BigUint::from(1u32),
        };
        let new_count = &old_count + BigUint::from(1u32);
        {
            let tree = self.arena.get_mut(sub_id);
            tree.alts.push(alt_a);
            tree.alts.push(alt_b);
            tree.nitems = new_count.clone();
            tree.closed = true;
        }

        nodes.push(Node::Sub(sub_id));
        *last_node_count = Some(new_count);
        Ok(())
    }

    /// `{r0[,r1]}`: replaces the last node with a sub-tree holding one
    /// alternative per repetition count `k` in `[r0, r1]`.
    fn rewrite_bounded(
        &mut self,
        nodes: &mut Vec<Node>,
        last_node_count: &mut Option<BigUint>,
        quantifier: bool,
    ) -> RexResult<()> {
        if quantifier {
            return Err(RexError::NestedQuantifiers);
        }
        let r0 = self.parse_decimal()?;
        let r1 = if self.cursor.peek() == Some(b',') {
            self.cursor.advance();
            if self.cursor.peek() == Some(b'}') {
                return Err(RexError::Infinite);
            }
            self.parse_decimal()?
        } else {
            r0
        };
        if self.cursor.advance() != Some(b'}') {
            return Err(RexError::UnterminatedRepeat);
        }
        if r0 > r1 {
            return Err(RexError::BadRepetition);
        }

        // As in `rewrite_optional`, `old_count` is still only pending —
        // never folded into `alt_product` — so zero needs no special case.
        let old_count = last_node_count.take().ok_or(RexError::LoneQuantifier)?;
        let old_node = nodes.pop().ok_or(RexError::LoneQuantifier)?;

        let template = old_node.clone();
        let mut original = Some(old_node);

        let sub_id = self.arena.push();
        let mut sub_alts = Vec::with_capacity(r1 - r0 + 1);
        let mut running_start = BigUint::zero();
        let mut total = BigUint::zero();
        for k in r0..=r1 {
            let mut alt_nodes = Vec::with_capacity(k);
            for _ in 0..k {
                let node = match original.take() {
                    Some(n) => n,
                    None => deep_clone_node(&template, &mut self.arena),
                };
                alt_nodes.push(node);
            }
            let alt_count = num_traits::pow::pow(old_count.clone(), k);
            sub_alts.push(Alternative {
                nodes: alt_nodes,
                nitems: alt_count.clone(),
                start: running_start.clone(),
            });
            running_start += &alt_count;
            total += &alt_count;
        }

        {
            let tree = self.arena.get_mut(sub_id);
            tree.alts = sub_alts;
            tree.nitems = total.clone();
            tree.closed = true;
        }

        nodes.push(Node::Sub(sub_id));
        *last_node_count = Some(total);
        Ok(())
    }

    /// Handles everything that can follow an opening `(`: a plain group, a
    /// `(?:...)`/`(?i)`/`(?-im:...)` flagged group, or a `(?N)` recursion
    /// reference.
    fn handle_open_paren(&mut self, depth: usize) -> RexResult<OpenParenResult> {
        if self.cursor.peek() == Some(b'?') {
            if let Some(b) = self.cursor.peek_at(1) {
                if b.is_ascii_digit() {
                    self.cursor.advance();
                    let n = self.parse_decimal()?;
                    if self.cursor.advance() != Some(b')') {
                        return Err(RexError::TooLittleParens);
                    }
                    let target = self.backrefs.get(n)?;
                    if !self.arena.get(target).closed {
                        return Err(RexError::Infinite);
                    }
                    let cloned = deep_clone_tree(&mut self.arena, target);
                    let count = self.arena.get(cloned).nitems.clone();
                    return Ok(OpenParenResult::Node(Node::Sub(cloned), count));
                }
            }
            return self.handle_inline_flags(depth);
        }

        let sub_id = self.arena.push();
        self.backrefs.add(sub_id);
        self.parse_body(sub_id, depth + 1)?;
        self.arena.get_mut(sub_id).closed = true;
        let count = self.arena.get(sub_id).nitems.clone();
        Ok(OpenParenResult::Node(Node::Sub(sub_id), count))
    }

    /// `(?[ims-]*[:)]`. Terminating on `:` scopes the flags to a new group;
    /// terminating on `)` applies them to the rest of the enclosing scope
    /// and produces no node.
    fn handle_inline_flags(&mut self, depth: usize) -> RexResult<OpenParenResult> {
        self.cursor.advance(); // consume '?'
        let mut new_flags = self.flags;
        let mut clearing = false;
        loop {
            match self.cursor.advance() {
                Some(b'i') => {
                    new_flags = if clearing {
                        new_flags - Flags::CASELESS
                    } else {
                        new_flags | Flags::CASELESS
                    };
                }
                Some(b'm') => {
                    new_flags = if clearing {
                        new_flags - Flags::DOTALL
                    } else {
                        new_flags | Flags::DOTALL
                    };
                }
                Some(b'-') => clearing = true,
                Some(b':') => {
                    let old_flags = self.flags;
                    self.flags = new_flags;
                    let sub_id = self.arena.push();
                    let result = self.parse_body(sub_id, depth + 1);
                    self.flags = old_flags;
                    result?;
                    self.arena.get_mut(sub_id).closed = true;
                    let count = self.arena.get(sub_id).nitems.clone();
                    return Ok(OpenParenResult::Node(Node::Sub(sub_id), count));
                }
                Some(b')') => {
                    self.flags = new_flags;
                    return Ok(OpenParenResult::FlagsOnly);
                }
                _ => return Err(RexError::UnterminatedFlags),
            }
        }
    }
}

enum OpenParenResult {
    Node(Node, BigUint),
    FlagsOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(src: &[u8]) -> BigUint {
        let (arena, _, root, error) = parse(src, Flags::empty());
        assert!(error.is_none(), "unexpected error for {:?}: {:?}", src, error);
        arena.get(root).nitems.clone()
    }

    #[test]
    fn digit_class_repetition_counts_a_thousand() {
        assert_eq!(count(b"[0-9]{3}"), BigUint::from(1000u32));
    }

    #[test]
    fn optional_suffix_counts_four() {
        let (arena, _, root, error) = parse(b"(cat|dog)s?", Flags::empty());
        assert!(error.is_none());
        assert_eq!(arena.get(root).nitems, BigUint::from(4u32));
    }

    #[test]
    fn empty_alternation_counts_three() {
        assert_eq!(count(b"a||b"), BigUint::from(3u32));
    }

    #[test]
    fn empty_group_counts_one() {
        assert_eq!(count(b"()"), BigUint::from(1u32));
    }

    #[test]
    fn zero_repetition_counts_one() {
        assert_eq!(count(b"a{0}"), BigUint::from(1u32));
    }

    #[test]
    fn bounded_repetition_range_counts_three() {
        assert_eq!(count(b"a{0,2}"), BigUint::from(3u32));
    }

    #[test]
    fn backreference_halves_the_count() {
        assert_eq!(count(b"(a|b)\\1"), BigUint::from(2u32));
    }

    #[test]
    fn recursion_reference_is_independent() {
        assert_eq!(count(b"(a|b)(?1)"), BigUint::from(4u32));
    }

    #[test]
    fn star_is_infinite() {
        let (_, _, _, error) = parse(b"a*", Flags::empty());
        assert_eq!(error, Some(RexError::Infinite));
    }

    #[test]
    fn unbalanced_open_paren_is_too_little_parens() {
        let (_, _, _, error) = parse(b"((a)", Flags::empty());
        assert_eq!(error, Some(RexError::TooLittleParens));
    }

    #[test]
    fn unbalanced_close_paren_is_too_many_parens() {
        let (_, _, _, error) = parse(b")", Flags::empty());
        assert_eq!(error, Some(RexError::TooManyParens));
    }

    #[test]
    fn reversed_repetition_bounds_is_bad_repetition() {
        let (_, _, _, error) = parse(b"a{3,2}", Flags::empty());
        assert_eq!(error, Some(RexError::BadRepetition));
    }

    #[test]
    fn dangling_backref_is_invalid() {
        let (_, _, _, error) = parse(b"\\5", Flags::empty());
        assert_eq!(error, Some(RexError::InvalidBackref));
    }

    #[test]
    fn stacked_quantifiers_are_rejected() {
        let (_, _, _, error) = parse(b"a??", Flags::empty());
        assert_eq!(error, Some(RexError::NestedQuantifiers));
    }

    #[test]
    fn caseless_literal_includes_both_cases() {
        let (arena, _, root, error) = parse(b"a", Flags::CASELESS);
        assert!(error.is_none());
        assert_eq!(arena.get(root).nitems, BigUint::from(2u32));
    }

    #[test]
    fn optional_empty_class_counts_one() {
        // `[]` is a zero-member literal node (the `]` closes the class
        // immediately); `?` on it must not divide by that zero count.
        assert_eq!(count(b"[]?"), BigUint::from(1u32));
    }

    #[test]
    fn bounded_empty_class_counts_one() {
        // Only `k = 0` contributes: `0^0 = 1`, `0^1 = 0^2 = 0`.
        assert_eq!(count(b"[]{0,2}"), BigUint::from(1u32));
    }

    #[test]
    fn bounded_fully_inverted_class_counts_one() {
        assert_eq!(count(b"[^\\x00-\\xFF]{0,2}"), BigUint::from(1u32));
    }
}
