use std::cmp::Ordering;

use super::arena::{NodeId, WeightedTree};

/// Compute aggregated weights for all internal nodes (bottom-up).
/// After this, each internal node's `weight` equals the sum of its children's weights.
pub fn aggregate_weights(tree: &mut WeightedTree) {
    // Children always have higher indices than their parents in the arena,
    // so a reverse sweep sees every child before its parent.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let node = &tree.nodes[i];
        if node.is_leaf() {
            continue;
        }

        let mut total = 0.0;
        let mut child = node.first_child;
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].weight;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].weight = total;
    }
}

/// Descending-weight comparator. Equal weights compare equal, so a stable sort
/// keeps them in document order.
pub fn by_weight_descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Sort children of each internal node by weight (descending).
/// This re-links the sibling list without moving nodes in the arena.
pub fn sort_children_by_weight(tree: &mut WeightedTree) {
    let len = tree.nodes.len();
    for i in 0..len {
        if tree.nodes[i].is_leaf() {
            continue;
        }

        let mut children: Vec<NodeId> = Vec::new();
        let mut child = tree.nodes[i].first_child;
        while let Some(child_id) = child {
            children.push(child_id);
            child = tree.nodes[child_id.index()].next_sibling;
        }

        children.sort_by(|a, b| {
            by_weight_descending(tree.nodes[a.index()].weight, tree.nodes[b.index()].weight)
        });

        // Re-link the sibling list
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            continue;
        };
        tree.nodes[i].first_child = Some(first);
        tree.nodes[i].last_child = Some(last);
        for w in children.windows(2) {
            tree.nodes[w[0].index()].next_sibling = Some(w[1]);
        }
        tree.nodes[last.index()].next_sibling = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::WeightedNode;

    #[test]
    fn internal_weights_are_sums() {
        let mut tree = WeightedTree::new("root", 0.0);
        let a = tree.add_child(tree.root, WeightedNode::new("a", 0.0));
        tree.add_child(a, WeightedNode::new("x", 2.5));
        tree.add_child(a, WeightedNode::new("y", 1.5));
        tree.add_child(tree.root, WeightedNode::new("b", 3.0));
        aggregate_weights(&mut tree);
        assert_eq!(tree.get(a).weight, 4.0);
        assert_eq!(tree.get(tree.root).weight, 7.0);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut tree = WeightedTree::new("root", 0.0);
        let a = tree.add_child(tree.root, WeightedNode::new("a", 1.0));
        let b = tree.add_child(tree.root, WeightedNode::new("b", 5.0));
        let c = tree.add_child(tree.root, WeightedNode::new("c", 1.0));
        sort_children_by_weight(&mut tree);
        let kids: Vec<_> = tree.children(tree.root).collect();
        assert_eq!(kids, vec![b, a, c]);
        assert_eq!(tree.get(tree.root).last_child, Some(c));
    }
}
