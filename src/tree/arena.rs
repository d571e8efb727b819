use compact_str::CompactString;

/// Index into the arena `Vec<WeightedNode>`. Uses u32 to save memory (supports up to ~4 billion nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node in the weighted tree, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
/// A leaf simply has no `first_child`; there is no separate "empty children" state.
#[derive(Debug, Clone)]
pub struct WeightedNode {
    /// Path segment naming this node (not the full path)
    pub name: CompactString,
    /// Non-negative weight. For internal nodes: sum of children after aggregation.
    pub weight: f64,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for leaves)
    pub first_child: Option<NodeId>,
    /// Last child node index, kept so appends stay O(1)
    pub last_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u16,
}

impl WeightedNode {
    /// A detached node; links and depth are filled in by `WeightedTree::add_child`.
    pub fn new(name: &str, weight: f64) -> Self {
        WeightedNode {
            name: CompactString::new(name),
            weight,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            depth: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }
}

/// The weighted tree stored as a flat arena of nodes.
/// Children always have higher indices than their parents.
#[derive(Debug, Clone)]
pub struct WeightedTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<WeightedNode>,
    /// Root node index
    pub root: NodeId,
}

impl WeightedTree {
    /// Create a tree holding only a root node.
    pub fn new(root_name: &str, root_weight: f64) -> Self {
        WeightedTree {
            nodes: vec![WeightedNode::new(root_name, root_weight)],
            root: NodeId(0),
        }
    }

    /// Append a child under the given parent, after any existing children.
    /// Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: WeightedNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;
        node.next_sibling = None;

        match self.nodes[parent.index()].last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &WeightedNode {
        &self.nodes[id.index()]
    }

    /// Get a node by ID, or None when the ID is out of range.
    pub fn try_get(&self, id: NodeId) -> Option<&WeightedNode> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut WeightedNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but its root.
    pub fn is_bare_root(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node in document order.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// Find a direct child by name.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .find(|&id| self.nodes[id.index()].name.as_str() == name)
    }

    /// Slash-separated path from the root's children down to `id`.
    /// The root itself is rendered as its own name.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            if node.parent.is_none() && node_id != id {
                break;
            }
            segments.push(node.name.as_str());
            current = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a WeightedTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}
