//! Pure tree assembly over flat node rows.
//!
//! Nodes are indexed into an arena (id → slot) and the owned `children`
//! vectors are rebuilt from it on every call. Nothing here touches storage.

use std::collections::HashMap;

use super::node::HierarchyNode;

/// Builds the forest of every root in `nodes`, attaching each non-root to
/// its parent. Siblings keep the order in which they appear in `nodes`.
///
/// Rows whose parent is not part of `nodes` are dropped (and logged); they
/// cannot be reached from any root.
pub fn assemble_forest<N: HierarchyNode>(nodes: Vec<N>) -> Vec<N> {
    let index: HashMap<i64, usize> = nodes.iter().enumerate().map(|(slot, n)| (n.id(), slot)).collect();

    let mut child_slots: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut root_slots = Vec::new();
    let mut orphans = 0usize;
    for (slot, node) in nodes.iter().enumerate() {
        if node.is_root() {
            root_slots.push(slot);
            continue;
        }
        match index.get(&node.parent_id()) {
            Some(&parent) if parent != slot => child_slots[parent].push(slot),
            _ => orphans += 1,
        }
    }
    if orphans > 0 {
        tracing::warn!(kind = N::KIND, orphans, "rows without a reachable parent were left out of the tree");
    }

    let mut slots: Vec<Option<N>> = nodes.into_iter().map(Some).collect();
    root_slots.into_iter().filter_map(|slot| take_with_children(slot, &mut slots, &child_slots)).collect()
}

// `take` guarantees every row is emitted at most once.
fn take_with_children<N: HierarchyNode>(
    slot: usize,
    slots: &mut [Option<N>],
    child_slots: &[Vec<usize>],
) -> Option<N> {
    let mut node = slots[slot].take()?;
    for &child in &child_slots[slot] {
        if let Some(child) = take_with_children(child, slots, child_slots) {
            node.children_mut().push(child);
        }
    }
    Some(node)
}

/// Folds a bottom-up path `[node, parent, grandparent, ..]` into a single
/// chain rooted at the last element, each ancestor holding exactly one child.
pub fn fold_chain<N: HierarchyNode>(path: Vec<N>) -> Option<N> {
    let mut iter = path.into_iter();
    let mut node = iter.next()?;
    for mut ancestor in iter {
        ancestor.children_mut().push(node);
        node = ancestor;
    }
    Some(node)
}

/// Depth-first lookup of `id` anywhere in `forest`.
pub fn find_mut<N: HierarchyNode>(forest: &mut [N], id: i64) -> Option<&mut N> {
    for node in forest.iter_mut() {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_mut(node.children_mut(), id) {
            return Some(found);
        }
    }
    None
}

/// Detaches the subtree rooted at `id` from `forest`, consuming the rest.
pub fn extract_subtree<N: HierarchyNode>(forest: Vec<N>, id: i64) -> Option<N> {
    for mut node in forest {
        if node.id() == id {
            return Some(node);
        }
        let children = std::mem::take(node.children_mut());
        if let Some(found) = extract_subtree(children, id) {
            return Some(found);
        }
    }
    None
}

/// Number of nodes in `forest`, nested children included.
#[cfg(test)]
pub fn count_nodes<N: HierarchyNode>(forest: &[N]) -> usize {
    forest.iter().map(|n| 1 + count_nodes(n.children())).sum()
}

/// Collects every id in `forest` in depth-first order.
#[cfg(test)]
pub fn collect_ids<N: HierarchyNode>(forest: &[N]) -> Vec<i64> {
    let mut ids = Vec::new();
    let mut stack: Vec<&N> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.id());
        stack.extend(node.children().iter().rev());
    }
    ids
}
