/*!
The counted parse tree: `Tree`, `Alternative`, `Node`, stored in a flat
arena indexed by [`TreeId`].

All sub-regexes (parenthesized groups, and the sub-trees materialized by
`?` and `{n,m}`) live in one `Vec<Tree>`; edges between them are plain
`TreeId` values rather than pointers. This lets the whole graph move around
as one value, makes a back-reference a `Copy` index with no borrow-checker
friction, and needs no manual teardown — `Drop`ping the arena frees
everything.
*/

use num_bigint::BigUint;
use num_traits::Zero;

/// An index into an [`Arena`]'s tree vector.
///
/// Opaque outside this crate's modules so callers can't construct one that
/// doesn't belong to the arena it's used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeId(pub(crate) usize);

/// A single concatenation element of an [`Alternative`].
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// A literal byte set: the allowed bytes at this position, sorted
    /// ascending. Exactly one is "consumed" by a given enumeration state,
    /// tracked by `iterator`.
    Literal {
        bytes: Vec<u8>,
        iterator: usize,
    },
    /// A parenthesized group, or a sub-tree materialized by `?`/`{n,m}`.
    /// Owns the pointed-to arena slot: no other live node may alias it.
    Sub(TreeId),
    /// A numeric back-reference or `(?N)` recursion target. Holds an
    /// unowned reference into the back-reference table; never recursed
    /// into during teardown, and skipped during `iterate`/`seek` (it
    /// replays its target's current assignment rather than enumerating
    /// independently).
    BackRef(TreeId),
}

impl Node {
    pub(crate) fn literal(bytes: Vec<u8>) -> Self {
        Node::Literal { bytes, iterator: 0 }
    }
}

/// One `|`-branch of a [`Tree`]: an ordered concatenation of [`Node`]s.
#[derive(Debug, Clone)]
pub(crate) struct Alternative {
    pub(crate) nodes: Vec<Node>,
    /// Product of `nodes`' counts; 1 for an empty node list.
    pub(crate) nitems: BigUint,
    /// Offset of this alternative within its parent `Tree`'s index space:
    /// the sum of `nitems` of all preceding alternatives.
    pub(crate) start: BigUint,
}

impl Alternative {
    pub(crate) fn empty(start: BigUint) -> Self {
        Alternative { nodes: Vec::new(), nitems: BigUint::from(1u32), start }
    }
}

/// A regex or parenthesized sub-regex: an ordered disjoint union of
/// [`Alternative`]s.
#[derive(Debug, Clone)]
pub(crate) struct Tree {
    pub(crate) alts: Vec<Alternative>,
    /// Sum of `alts`' counts.
    pub(crate) nitems: BigUint,
    /// Set once the matching `)` (or end of source, for the root) has
    /// been consumed. Required for this tree to be legally referenced by
    /// `\N` or `(?N)`.
    pub(crate) closed: bool,
    /// Index into `alts` of the alternative the enumerator is currently
    /// positioned on.
    pub(crate) curr: usize,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Tree { alts: Vec::new(), nitems: BigUint::zero(), closed: false, curr: 0 }
    }
}

/// The flat arena backing every `Tree` reachable from a parse's root.
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    trees: Vec<Tree>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Arena { trees: Vec::new() }
    }

    /// Appends a new, empty tree and returns its id.
    pub(crate) fn push(&mut self) -> TreeId {
        let id = TreeId(self.trees.len());
        self.trees.push(Tree::new());
        id
    }

    pub(crate) fn get(&self, id: TreeId) -> &Tree {
        &self.trees[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: TreeId) -> &mut Tree {
        &mut self.trees[id.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.trees.len()
    }
}

/// Deep-clones a single node: a `Literal` clones its bytes with a fresh
/// iterator, a `Sub` recursively deep-clones its entire owned sub-tree into
/// new arena slots, and a `BackRef` is copied as-is (it shares its target
/// by definition, never duplicates it).
pub(crate) fn deep_clone_node(node: &Node, arena: &mut Arena) -> Node {
    match node {
        Node::Literal { bytes, .. } => Node::literal(bytes.clone()),
        Node::Sub(id) => Node::Sub(deep_clone_tree(arena, *id)),
        Node::BackRef(target) => Node::BackRef(*target),
    }
}

/// Deep-clones the tree at `src` into a fresh arena slot, recursively
/// deep-cloning every owned sub-tree it contains so the clone has entirely
/// independent enumeration state. Back-reference nodes inside it keep
/// pointing at their original targets.
pub(crate) fn deep_clone_tree(arena: &mut Arena, src: TreeId) -> TreeId {
    let src_tree = arena.get(src).clone();
    let new_id = arena.push();

    let mut new_alts = Vec::with_capacity(src_tree.alts.len());
    for alt in &src_tree.alts {
        let mut new_nodes = Vec::with_capacity(alt.nodes.len());
        for node in &alt.nodes {
            new_nodes.push(deep_clone_node(node, arena));
        }
        new_alts.push(Alternative {
            nodes: new_nodes,
            nitems: alt.nitems.clone(),
            start: alt.start.clone(),
        });
    }

    let new_tree = arena.get_mut(new_id);
    new_tree.alts = new_alts;
    new_tree.nitems = src_tree.nitems;
    new_tree.closed = src_tree.closed;
    new_tree.curr = 0;
    new_id
}
