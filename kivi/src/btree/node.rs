//! Tree vertices and the per-node mutations used by insertion.
//!
//! A node is either a leaf (no children) or an internal node holding
//! `keys.len() + 1` children:
//! - `Child[i]` contains keys < `Key[i]`
//! - `Child[i+1]` contains keys > `Key[i]`

use std::fmt;

/// Maximum number of keys in a node (an order-5 tree).
pub const MAX_KEYS: usize = 4;

/// Minimum number of keys in a non-root node.
pub const MIN_KEYS: usize = MAX_KEYS.div_ceil(2) - 1;

/// Maximum number of children of an internal node.
pub const ORDER: usize = MAX_KEYS + 1;

/// A single vertex of the tree.
///
/// The node exclusively owns its children. Keys are kept strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    keys: Vec<K>,
    children: Vec<Self>,
}

impl<K: Ord> Node<K> {
    /// Create a leaf holding the given keys.
    #[must_use]
    pub const fn leaf(keys: Vec<K>) -> Self {
        Self {
            keys,
            children: Vec::new(),
        }
    }

    /// Create an internal node from its separator keys and children.
    ///
    /// Shape is not checked here; trees built from hand-made nodes go through
    /// [`BTree::from_root`](super::BTree::from_root), which validates them.
    #[must_use]
    pub const fn internal(keys: Vec<K>, children: Vec<Self>) -> Self {
        Self { keys, children }
    }

    /// Keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Children in key order. Empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A full node cannot take another key without splitting.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.keys.len() >= MAX_KEYS
    }

    /// True while the node transiently holds `MAX_KEYS + 1` keys, between
    /// receiving a key and being split.
    #[must_use]
    pub const fn is_overflowing(&self) -> bool {
        self.keys.len() > MAX_KEYS
    }

    /// Find the child index a key descends into.
    ///
    /// `Ok` carries the index when the key is absent from this node; `Err`
    /// carries the position of an equal key.
    pub fn find_child_index(&self, key: &K) -> Result<usize, usize> {
        match self.keys.binary_search(key) {
            Ok(i) => Err(i),
            Err(i) => Ok(i),
        }
    }

    /// Insert a key into a node with spare capacity, keeping keys sorted.
    ///
    /// Returns the position the key landed at.
    pub fn insert_key(&mut self, key: K) -> Result<usize, NodeError> {
        if self.is_full() {
            return Err(NodeError::Full {
                len: self.keys.len(),
            });
        }
        Ok(self.insert_sorted(key))
    }

    /// Insert a key into a full leaf, leaving it overflowing until it is split.
    pub(crate) fn insert_overflowing(&mut self, key: K) -> Result<usize, NodeError> {
        if self.is_overflowing() {
            return Err(NodeError::Overflowing {
                len: self.keys.len(),
            });
        }
        Ok(self.insert_sorted(key))
    }

    /// Insert a promoted separator after the child at `child_index`, with
    /// `right` becoming the new child immediately to its right.
    ///
    /// The node may overflow by one key; the caller splits it.
    pub(crate) fn insert_separator(
        &mut self,
        child_index: usize,
        key: K,
        right: Self,
    ) -> Result<(), NodeError> {
        if self.is_overflowing() {
            return Err(NodeError::Overflowing {
                len: self.keys.len(),
            });
        }
        if child_index >= self.children.len() {
            return Err(NodeError::ChildOutOfRange {
                index: child_index,
                children: self.children.len(),
            });
        }
        self.keys.insert(child_index, key);
        self.children.insert(child_index + 1, right);
        Ok(())
    }

    /// Split an overflowing node, returning the median key and the new right node.
    ///
    /// This node keeps the keys (and children) before the median.
    pub(crate) fn split(&mut self) -> Result<(K, Self), NodeError> {
        if !self.is_overflowing() {
            return Err(NodeError::NotOverflowing {
                len: self.keys.len(),
            });
        }

        let mid = self.keys.len() / 2;

        // Right node gets keys and children after median
        let right_keys = self.keys.split_off(mid + 1);
        let right_children = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.split_off(mid + 1)
        };

        // Remove median key from left node
        let median = self.keys.pop().ok_or(NodeError::NotOverflowing { len: 0 })?;

        Ok((median, Self::internal(right_keys, right_children)))
    }

    fn insert_sorted(&mut self, key: K) -> usize {
        let index = self.keys.partition_point(|existing| existing <= &key);
        self.keys.insert(index, key);
        index
    }
}

/// Errors from node-level mutations. Each one means a caller broke a precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Direct insert into a node that already holds `MAX_KEYS` keys.
    Full { len: usize },
    /// A node already holding `MAX_KEYS + 1` keys was handed another key.
    Overflowing { len: usize },
    /// Split requested on a node that does not hold `MAX_KEYS + 1` keys.
    NotOverflowing { len: usize },
    /// Separator inserted next to a child that does not exist.
    ChildOutOfRange { index: usize, children: usize },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full { len } => write!(f, "node is full ({len} of {MAX_KEYS} keys)"),
            Self::Overflowing { len } => {
                write!(f, "node is already overflowing ({len} keys)")
            }
            Self::NotOverflowing { len } => {
                write!(f, "cannot split a node holding {len} keys")
            }
            Self::ChildOutOfRange { index, children } => {
                write!(f, "child index {index} out of range for {children} children")
            }
        }
    }
}

impl std::error::Error for NodeError {}
