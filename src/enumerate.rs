/*!
The enumerator: `current`, `iterate`, `seek` over a parsed tree.

`iterate` treats the current alternative as a mixed-radix odometer with the
least-significant digit at the tail node; `seek` walks the same digits in
one pass via divmod. Back-reference nodes are transparent to both: they
replay whatever their target currently holds rather than owning their own
position.
*/

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::bigint::tdiv_qr;
use crate::tree::{Arena, Node, TreeId};

/// Appends the bytes of the tree's current member to `out`.
pub(crate) fn current(arena: &Arena, tree_id: TreeId, out: &mut Vec<u8>) {
    let tree = arena.get(tree_id);
    let alt = &tree.alts[tree.curr];
    for node in &alt.nodes {
        match node {
            Node::Literal { bytes, iterator } => out.push(bytes[*iterator]),
            Node::Sub(child) => current(arena, *child, out),
            Node::BackRef(target) => current(arena, *target, out),
        }
    }
}

/// Advances to the next member in index order. Returns `true` if this step
/// wrapped back around to the first member (there was no next member).
pub(crate) fn iterate(arena: &mut Arena, tree_id: TreeId) -> bool {
    let alt_idx = arena.get(tree_id).curr;
    let node_count = arena.get(tree_id).alts[alt_idx].nodes.len();

    // An empty alternative (zero nodes) has exactly one member: itself.
    // Having just produced it, we always carry out immediately.
    let mut carry = true;
    for node_idx in (0..node_count).rev() {
        let is_backref = matches!(
            arena.get(tree_id).alts[alt_idx].nodes[node_idx],
            Node::BackRef(_)
        );
        if is_backref {
            continue;
        }
        carry = bump_node(arena, tree_id, alt_idx, node_idx);
        if !carry {
            break;
        }
    }

    if !carry {
        return false;
    }

    let alt_count = arena.get(tree_id).alts.len();
    if alt_idx + 1 < alt_count {
        arena.get_mut(tree_id).curr = alt_idx + 1;
        reset_alt_to_zero(arena, tree_id, alt_idx + 1);
        false
    } else {
        arena.get_mut(tree_id).curr = 0;
        reset_alt_to_zero(arena, tree_id, 0);
        true
    }
}

/// Bumps one node's position, reporting whether it carried (wrapped) into
/// the node before it.
fn bump_node(arena: &mut Arena, tree_id: TreeId, alt_idx: usize, node_idx: usize) -> bool {
    let child_id = match &arena.get(tree_id).alts[alt_idx].nodes[node_idx] {
        Node::Sub(id) => Some(*id),
        _ => None,
    };
    if let Some(child_id) = child_id {
        return iterate(arena, child_id);
    }

    let tree = arena.get_mut(tree_id);
    match &mut tree.alts[alt_idx].nodes[node_idx] {
        Node::Literal { bytes, iterator } => {
            *iterator += 1;
            if *iterator >= bytes.len() {
                *iterator = 0;
                true
            } else {
                false
            }
        }
        Node::BackRef(_) => unreachable!("back-references are skipped by the caller"),
        Node::Sub(_) => unreachable!("handled above"),
    }
}

fn reset_alt_to_zero(arena: &mut Arena, tree_id: TreeId, alt_idx: usize) {
    let node_count = arena.get(tree_id).alts[alt_idx].nodes.len();
    for node_idx in 0..node_count {
        let child_id = match &arena.get(tree_id).alts[alt_idx].nodes[node_idx] {
            Node::Sub(id) => Some(*id),
            _ => None,
        };
        match child_id {
            Some(child_id) => {
                arena.get_mut(child_id).curr = 0;
                reset_alt_to_zero(arena, child_id, 0);
            }
            None => {
                let tree = arena.get_mut(tree_id);
                if let Node::Literal { iterator, .. } = &mut tree.alts[alt_idx].nodes[node_idx] {
                    *iterator = 0;
                }
            }
        }
    }
}

enum NodeKind {
    Literal(usize),
    Sub(TreeId),
    BackRef,
}

/// Positions `tree_id` so that `current` returns its `pos`-th member.
/// Returns `true` if `pos >= tree.nitems` (overflow; state is left
/// unchanged).
pub(crate) fn seek(arena: &mut Arena, tree_id: TreeId, pos: &BigUint) -> bool {
    let nitems = arena.get(tree_id).nitems.clone();
    if pos >= &nitems {
        return true;
    }
    seek_inner(arena, tree_id, pos.clone());
    false
}

fn seek_inner(arena: &mut Arena, tree_id: TreeId, pos: BigUint) {
    let alt_idx = {
        let tree = arena.get(tree_id);
        tree.alts
            .iter()
            .enumerate()
            .rev()
            .find(|(_, alt)| alt.start <= pos)
            .map(|(i, _)| i)
            .expect("pos within tree.nitems implies a containing alternative")
    };
    let alt_start = arena.get(tree_id).alts[alt_idx].start.clone();
    let mut remaining = pos - alt_start;
    arena.get_mut(tree_id).curr = alt_idx;

    let node_count = arena.get(tree_id).alts[alt_idx].nodes.len();
    for node_idx in (0..node_count).rev() {
        let kind = match &arena.get(tree_id).alts[alt_idx].nodes[node_idx] {
            Node::Literal { bytes, .. } => NodeKind::Literal(bytes.len()),
            Node::Sub(id) => NodeKind::Sub(*id),
            Node::BackRef(_) => NodeKind::BackRef,
        };
        match kind {
            NodeKind::BackRef => continue,
            NodeKind::Literal(len) => {
                let (q, r) = tdiv_qr(&remaining, &BigUint::from(len as u64));
                remaining = q;
                let tree = arena.get_mut(tree_id);
                if let Node::Literal { iterator, .. } = &mut tree.alts[alt_idx].nodes[node_idx] {
                    *iterator = r.to_usize().expect("remainder below a usize length");
                }
            }
            NodeKind::Sub(child_id) => {
                let child_count = arena.get(child_id).nitems.clone();
                let (q, r) = tdiv_qr(&remaining, &child_count);
                remaining = q;
                seek_inner(arena, child_id, r);
            }
        }
    }
}
