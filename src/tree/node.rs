//! Tree node storage
//!
//! Nodes live in one contiguous arena owned by the tree and reference their
//! children by index. There is no shared ownership and no pointer graph to
//! walk during serialization.

/// Index of a node inside the tree's arena
pub(crate) type NodeId = usize;

/// A single tree node: sorted entries plus child indexes
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    /// Leaf nodes have no children
    pub is_leaf: bool,

    /// Key/value entries in ascending key order
    pub entries: Vec<(K, V)>,

    /// Child node indexes; entries.len() + 1 of them on interior nodes
    pub children: Vec<NodeId>,
}

impl<K: Ord, V> Node<K, V> {
    pub fn leaf() -> Self {
        Self {
            is_leaf: true,
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn interior() -> Self {
        Self {
            is_leaf: false,
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Position of the first entry whose key is >= `key`
    /// (entries.len() when every key is smaller)
    pub fn lower_bound(&self, key: &K) -> usize {
        self.entries
            .iter()
            .position(|(k, _)| key <= k)
            .unwrap_or(self.entries.len())
    }
}
