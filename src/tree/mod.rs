//! OrderedTree Module
//!
//! A bounded-fanout ordered map with preemptive top-down splitting.
//!
//! ## Responsibilities
//! - Upsert, point lookup, ordered enumeration, inclusive range scan
//! - Whole-tree snapshot save/load with caller-supplied pair codecs
//! - Corruption-resistant loading (degrade to empty, never crash)
//!
//! ## Data Structure Choice
//! Order-3 tree (max 5 entries per node) over an arena of nodes indexed by
//! position. A full node is split *before* the insert descends into it, so
//! no split is ever needed on the way back up. Snapshots rebuild the tree
//! purely through insertion, so on-disk record order never encodes tree
//! shape.

mod node;

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::codec;
use crate::error::{Result, StoreError};

use node::{Node, NodeId};

/// Fanout parameter: interior nodes hold at most `2 * TREE_ORDER - 1` entries
pub const TREE_ORDER: usize = 3;

/// Maximum entries per node before it must split
pub const MAX_NODE_ENTRIES: usize = 2 * TREE_ORDER - 1;

/// Index of the entry promoted to the parent during a split
const MEDIAN: usize = TREE_ORDER - 1;

/// In-memory bounded-fanout ordered map keyed by a totally-ordered key type
pub struct OrderedTree<K, V> {
    nodes: Vec<Node<K, V>>,
    root: NodeId,
}

impl<K: Ord + Clone, V: Clone> OrderedTree<K, V> {
    /// Create an empty tree: a single empty leaf root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::leaf()],
            root: 0,
        }
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Upsert: insert a key/value pair, replacing the value if the key
    /// already exists. Never produces duplicate keys.
    pub fn insert(&mut self, key: K, value: V) {
        // A full root splits first, growing the tree by one level
        if self.nodes[self.root].entries.len() == MAX_NODE_ENTRIES {
            let old_root = self.root;
            let new_root = self.alloc(Node::interior());
            self.nodes[new_root].children.push(old_root);
            self.root = new_root;
            self.split_child(new_root, 0);
        }
        self.insert_non_full(self.root, key, value);
    }

    fn insert_non_full(&mut self, node_id: NodeId, key: K, value: V) {
        // Keys promoted into interior nodes are replaced in place, so a
        // re-insert can never duplicate a key that lives above the leaves.
        if let Some(pos) = self.nodes[node_id]
            .entries
            .iter()
            .position(|(k, _)| *k == key)
        {
            self.nodes[node_id].entries[pos].1 = value;
            return;
        }

        if self.nodes[node_id].is_leaf {
            let pos = self.nodes[node_id].lower_bound(&key);
            self.nodes[node_id].entries.insert(pos, (key, value));
            return;
        }

        let mut idx = self.nodes[node_id].lower_bound(&key);
        let child = self.nodes[node_id].children[idx];
        if self.nodes[child].entries.len() == MAX_NODE_ENTRIES {
            // Preemptive split: the child's median moves up beside idx
            self.split_child(node_id, idx);
            match key.cmp(&self.nodes[node_id].entries[idx].0) {
                Ordering::Equal => {
                    self.nodes[node_id].entries[idx].1 = value;
                    return;
                }
                Ordering::Greater => idx += 1,
                Ordering::Less => {}
            }
        }

        let child = self.nodes[node_id].children[idx];
        self.insert_non_full(child, key, value);
    }

    /// Split the full child at `child_index` of `parent`: promote its median
    /// entry into the parent and move its trailing half into a new sibling.
    fn split_child(&mut self, parent: NodeId, child_index: usize) {
        let child_id = self.nodes[parent].children[child_index];
        let child_is_leaf = self.nodes[child_id].is_leaf;

        let upper_entries = self.nodes[child_id].entries.split_off(MEDIAN + 1);
        let median = self.nodes[child_id]
            .entries
            .pop()
            .expect("split target holds a median entry");
        let upper_children = if child_is_leaf {
            Vec::new()
        } else {
            self.nodes[child_id].children.split_off(MEDIAN + 1)
        };

        let sibling = self.alloc(Node {
            is_leaf: child_is_leaf,
            entries: upper_entries,
            children: upper_children,
        });

        self.nodes[parent].entries.insert(child_index, median);
        self.nodes[parent].children.insert(child_index + 1, sibling);
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get the value for a key, or `NotFound`
    pub fn search(&self, key: &K) -> Result<V> {
        self.find(self.root, key).cloned().ok_or(StoreError::NotFound)
    }

    /// Non-failing presence check
    pub fn exists(&self, key: &K) -> bool {
        self.find(self.root, key).is_some()
    }

    fn find(&self, node_id: NodeId, key: &K) -> Option<&V> {
        let node = &self.nodes[node_id];

        let mut i = 0;
        while i < node.entries.len() && *key > node.entries[i].0 {
            i += 1;
        }
        if i < node.entries.len() && *key == node.entries[i].0 {
            return Some(&node.entries[i].1);
        }
        if node.is_leaf {
            return None;
        }
        node.children.get(i).and_then(|&child| self.find(child, key))
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// All keys in ascending order. O(total entries) per call, not cached.
    pub fn get_all_keys(&self) -> Vec<K> {
        let mut keys = Vec::new();
        self.collect_keys(self.root, &mut keys);
        keys
    }

    fn collect_keys(&self, node_id: NodeId, out: &mut Vec<K>) {
        let node = &self.nodes[node_id];
        for (i, (key, _)) in node.entries.iter().enumerate() {
            if !node.is_leaf && i < node.children.len() {
                self.collect_keys(node.children[i], out);
            }
            out.push(key.clone());
        }
        if !node.is_leaf && node.children.len() > node.entries.len() {
            self.collect_keys(node.children[node.entries.len()], out);
        }
    }

    /// Number of keys in the tree (defined through enumeration)
    pub fn len(&self) -> usize {
        self.get_all_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root].entries.is_empty() && self.nodes[self.root].is_leaf
    }

    /// Depth of the leftmost root-to-leaf path
    pub fn get_height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.nodes[self.root];
        while !node.is_leaf && !node.children.is_empty() {
            node = &self.nodes[node.children[0]];
            height += 1;
        }
        height
    }

    /// Every value whose key lies in `[low, high]`, inclusive.
    /// Visits all nodes unconditionally; fine at this engine's scale.
    pub fn range_query(&self, low: &K, high: &K) -> Vec<V> {
        let mut values = Vec::new();
        self.collect_range(self.root, low, high, &mut values);
        values
    }

    fn collect_range(&self, node_id: NodeId, low: &K, high: &K, out: &mut Vec<V>) {
        let node = &self.nodes[node_id];
        for (key, value) in &node.entries {
            if key >= low && key <= high {
                out.push(value.clone());
            }
        }
        if !node.is_leaf {
            for &child in &node.children {
                self.collect_range(child, low, high, out);
            }
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Write the whole tree to `path`: a u64 record count followed by one
    /// caller-encoded pair per key. The snapshot lands in a `.tmp` sibling
    /// first and is renamed into place, so a crash mid-write leaves the
    /// previous snapshot intact.
    pub fn save_to_file<F>(&self, path: &Path, mut write_pair: F) -> Result<()>
    where
        F: FnMut(&mut BufWriter<File>, &K, &V) -> Result<()>,
    {
        let tmp = path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);

        let keys = self.get_all_keys();
        codec::write_u64(&mut writer, keys.len() as u64)?;
        for key in &keys {
            if let Some(value) = self.find(self.root, key) {
                write_pair(&mut writer, key, value)?;
            }
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Rebuild the tree from a snapshot through normal insertion. A missing
    /// file is an empty collection. A record count over the sanity bound, or
    /// any decode failure mid-stream, degrades the tree to empty instead of
    /// propagating.
    pub fn load_from_file<F>(&mut self, path: &Path, mut read_pair: F) -> Result<()>
    where
        F: FnMut(&mut BufReader<File>) -> Result<(K, V)>,
    {
        if !path.exists() {
            return Ok(());
        }
        let mut reader = BufReader::new(File::open(path)?);

        let count = match codec::read_u64(&mut reader) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(path = %path.display(), "unreadable snapshot header, starting empty: {e}");
                self.clear();
                return Ok(());
            }
        };
        if count > codec::MAX_RECORD_COUNT {
            tracing::warn!(
                path = %path.display(),
                count,
                "snapshot record count exceeds sanity bound, starting empty"
            );
            self.clear();
            return Ok(());
        }

        for _ in 0..count {
            match read_pair(&mut reader) {
                Ok((key, value)) => self.insert(key, value),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "corrupt snapshot record, starting empty: {e}");
                    self.clear();
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Reset to a single empty leaf root
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::leaf());
        self.root = 0;
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

impl<K: Ord + Clone, V: Clone> Default for OrderedTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
