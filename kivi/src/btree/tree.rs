//! In-memory B-tree with split-and-promote insertion.
//!
//! Insertion runs in three steps:
//! 1. Descend from the root to the target leaf, recording the child index
//!    taken at every ancestor.
//! 2. Insert into the leaf directly if it has room.
//! 3. Otherwise split the leaf and promote its median into the parent,
//!    walking the recorded path upward while parents overflow. When the
//!    root itself splits, a new root is grown above it.

use std::fmt;

use crate::btree::invariants::{self, InvariantViolation};
use crate::btree::node::{Node, NodeError};

/// An ordered set of keys stored in an order-5 B-tree.
///
/// Duplicate keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTree<K> {
    root: Option<Node<K>>,
    len: usize,
}

impl<K: Ord> Default for BTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> BTree<K> {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Adopt an existing root node.
    ///
    /// The node is validated against every tree invariant first.
    pub fn from_root(root: Node<K>) -> Result<Self, InvariantViolation> {
        let len = invariants::count_keys(&root);
        let tree = Self {
            root: Some(root),
            len,
        };
        tree.validate()?;
        Ok(tree)
    }

    #[must_use]
    pub const fn root(&self) -> Option<&Node<K>> {
        self.root.as_ref()
    }

    /// Number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels: 0 for an empty tree, 1 for a lone leaf root.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            height += 1;
            current = node.children().first();
        }
        height
    }

    /// Iterate over all keys in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        if let Some(root) = &self.root {
            iter.push_left_spine(root);
        }
        iter
    }

    /// Check every structural invariant of the tree.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        invariants::check(self.root.as_ref(), self.len)
    }

    /// Insert a key.
    ///
    /// Returns `DuplicateKey` if the key is already present; the tree is left
    /// unchanged in that case.
    pub fn insert(&mut self, key: K) -> Result<(), BTreeError> {
        let Some(path) = self.descend(&key)? else {
            // Empty tree: the key becomes a lone leaf root
            self.root = Some(Node::leaf(vec![key]));
            self.len = 1;
            return Ok(());
        };

        let leaf = self.node_at_mut(&path)?;
        if !leaf.is_full() {
            leaf.insert_key(key)?;
            self.len += 1;
            return Ok(());
        }

        leaf.insert_overflowing(key)?;
        let (median, right) = leaf.split()?;
        tracing::debug!(depth = path.len(), "split leaf");

        self.promote(&path, median, right)?;
        self.len += 1;
        Ok(())
    }

    /// Find the path from the root to the leaf where `key` belongs.
    ///
    /// Each entry is the child index taken at one ancestor, root first. An
    /// empty path means the root is the leaf. Returns `None` for an empty tree.
    fn descend(&self, key: &K) -> Result<Option<Vec<usize>>, BTreeError> {
        let Some(mut current) = self.root.as_ref() else {
            return Ok(None);
        };

        let mut path = Vec::new();
        loop {
            let index = current
                .find_child_index(key)
                .map_err(|_| BTreeError::DuplicateKey)?;
            if current.is_leaf() {
                return Ok(Some(path));
            }
            current = current
                .children()
                .get(index)
                .ok_or(BTreeError::BrokenPath { depth: path.len() })?;
            path.push(index);
        }
    }

    /// Resolve a path prefix to the node it names.
    fn node_at_mut(&mut self, path: &[usize]) -> Result<&mut Node<K>, BTreeError> {
        let mut current = self
            .root
            .as_mut()
            .ok_or(BTreeError::BrokenPath { depth: 0 })?;
        for (depth, &index) in path.iter().enumerate() {
            current = current
                .children_mut()
                .get_mut(index)
                .ok_or(BTreeError::BrokenPath { depth: depth + 1 })?;
        }
        Ok(current)
    }

    /// Push a split upward along `path`.
    ///
    /// `median` and `right` came from splitting the node at the end of `path`.
    /// Each overflowing ancestor is split in turn until one absorbs the
    /// separator, or the root splits and a new root is grown.
    fn promote(
        &mut self,
        path: &[usize],
        mut median: K,
        mut right: Node<K>,
    ) -> Result<(), BTreeError> {
        let mut depth = path.len();

        while let Some(parent_depth) = depth.checked_sub(1) {
            let child_index = path[parent_depth];
            let parent = self.node_at_mut(&path[..parent_depth])?;
            parent.insert_separator(child_index, median, right)?;
            if !parent.is_overflowing() {
                return Ok(());
            }

            (median, right) = parent.split()?;
            tracing::debug!(depth = parent_depth, "split internal node");
            depth = parent_depth;
        }

        self.grow_root(median, right)
    }

    /// Replace the root with a new node holding only `median`, with the old
    /// root and `right` as its two children.
    fn grow_root(&mut self, median: K, right: Node<K>) -> Result<(), BTreeError> {
        let left = self
            .root
            .take()
            .ok_or(BTreeError::BrokenPath { depth: 0 })?;
        self.root = Some(Node::internal(vec![median], vec![left, right]));
        tracing::debug!(height = self.height(), "grew new root");
        Ok(())
    }
}

impl<'a, K: Ord> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of a [`BTree`].
pub struct Iter<'a, K> {
    /// Nodes on the path to the next key, with the index of the next key to
    /// yield from each.
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K: Ord> Iter<'a, K> {
    fn push_left_spine(&mut self, node: &'a Node<K>) {
        let mut current = Some(node);
        while let Some(node) = current {
            self.stack.push((node, 0));
            current = node.children().first();
        }
    }
}

impl<'a, K: Ord> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let (node, index) = *top;
            if let Some(key) = node.keys().get(index) {
                top.1 += 1;
                if let Some(child) = node.children().get(index + 1) {
                    self.push_left_spine(child);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Renders one line per level, e.g. `[3]` then `[1 2] [4 5]`.
impl<K: Ord + fmt::Display> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = &self.root else {
            return f.write_str("(empty)");
        };

        let mut level = vec![root];
        let mut first_line = true;
        while !level.is_empty() {
            if !first_line {
                writeln!(f)?;
            }
            first_line = false;

            for (i, node) in level.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                f.write_str("[")?;
                for (j, key) in node.keys().iter().enumerate() {
                    if j > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}")?;
                }
                f.write_str("]")?;
            }

            level = level.into_iter().flat_map(Node::children).collect();
        }
        Ok(())
    }
}

/// Errors that can occur during tree insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// The key is already in the tree.
    DuplicateKey,
    /// A recorded ancestor path no longer resolves to a node.
    BrokenPath { depth: usize },
    /// Node error.
    Node(NodeError),
}

impl fmt::Display for BTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey => f.write_str("key already exists"),
            Self::BrokenPath { depth } => {
                write!(f, "ancestor path does not resolve at depth {depth}")
            }
            Self::Node(e) => write!(f, "node error: {e}"),
        }
    }
}

impl std::error::Error for BTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Node(e) => Some(e),
            Self::DuplicateKey | Self::BrokenPath { .. } => None,
        }
    }
}

impl From<NodeError> for BTreeError {
    fn from(e: NodeError) -> Self {
        Self::Node(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn leaf(keys: &[i32]) -> Node<i32> {
        Node::leaf(keys.to_vec())
    }

    fn internal(keys: &[i32], children: Vec<Node<i32>>) -> Node<i32> {
        Node::internal(keys.to_vec(), children)
    }

    fn tree_from(root: Node<i32>) -> BTree<i32> {
        BTree::from_root(root).expect("valid fixture tree")
    }

    fn insert_all(tree: &mut BTree<i32>, keys: impl IntoIterator<Item = i32>) {
        for key in keys {
            tree.insert(key).expect("insert");
            tree.validate().expect("invariants hold after insert");
        }
    }

    #[test]
    fn test_empty_tree() {
        let tree: BTree<i32> = BTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.root().is_none());
        assert_eq!(tree.iter().next(), None);
        tree.validate().expect("empty tree is valid");
    }

    #[test]
    fn test_insert_into_empty_tree() {
        let mut tree = BTree::new();
        tree.insert(3).expect("insert");

        assert_eq!(tree.root(), Some(&leaf(&[3])));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_insert_into_root_leaf() {
        let mut tree = tree_from(leaf(&[1, 2, 4]));
        tree.insert(3).expect("insert");

        assert_eq!(tree.root(), Some(&leaf(&[1, 2, 3, 4])));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_split_root_leaf() {
        let mut tree = tree_from(leaf(&[1, 2, 4, 5]));
        tree.insert(3).expect("insert");

        assert_eq!(
            tree.root(),
            Some(&internal(&[3], vec![leaf(&[1, 2]), leaf(&[4, 5])]))
        );
        assert_eq!(tree.height(), 2);
        tree.validate().expect("valid after split");
    }

    #[test]
    fn test_insert_into_leaf_below_root() {
        let fixture = || {
            internal(
                &[10, 20],
                vec![leaf(&[5, 6, 7]), leaf(&[15, 16, 19]), leaf(&[25, 26])],
            )
        };

        let cases = [
            (17, leaf(&[15, 16, 17, 19])),
            (14, leaf(&[14, 15, 16, 19])),
            (18, leaf(&[15, 16, 18, 19])),
        ];

        for (key, expected_middle) in cases {
            let mut tree = tree_from(fixture());
            tree.insert(key).expect("insert");
            assert_eq!(
                tree.root(),
                Some(&internal(
                    &[10, 20],
                    vec![leaf(&[5, 6, 7]), expected_middle, leaf(&[25, 26])]
                )),
                "inserting {key}"
            );
        }
    }

    #[test]
    fn test_split_leaf_promotes_into_parent() {
        let mut tree = tree_from(internal(
            &[10, 20],
            vec![leaf(&[5, 6, 7]), leaf(&[11, 12, 14, 15]), leaf(&[25, 26])],
        ));
        tree.insert(13).expect("insert");

        assert_eq!(
            tree.root(),
            Some(&internal(
                &[10, 13, 20],
                vec![
                    leaf(&[5, 6, 7]),
                    leaf(&[11, 12]),
                    leaf(&[14, 15]),
                    leaf(&[25, 26])
                ]
            ))
        );
    }

    #[test]
    fn test_sequential_inserts_one_to_thirteen() {
        let mut tree = BTree::new();
        insert_all(&mut tree, 1..=13);

        assert_eq!(
            tree.root(),
            Some(&internal(
                &[3, 6, 9],
                vec![
                    leaf(&[1, 2]),
                    leaf(&[4, 5]),
                    leaf(&[7, 8]),
                    leaf(&[10, 11, 12, 13])
                ]
            ))
        );
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.len(), 13);
    }

    #[test]
    fn test_root_growth_on_internal_overflow() {
        let mut tree = BTree::new();
        insert_all(&mut tree, 1..=17);

        assert_eq!(
            tree.root(),
            Some(&internal(
                &[9],
                vec![
                    internal(&[3, 6], vec![leaf(&[1, 2]), leaf(&[4, 5]), leaf(&[7, 8])]),
                    internal(
                        &[12, 15],
                        vec![leaf(&[10, 11]), leaf(&[13, 14]), leaf(&[16, 17])]
                    ),
                ]
            ))
        );
        assert_eq!(tree.height(), 3);
        assert_eq!(
            tree.to_string(),
            "[9]\n[3 6] [12 15]\n[1 2] [4 5] [7 8] [10 11] [13 14] [16 17]"
        );
    }

    #[test]
    fn test_promotion_through_two_levels() {
        // Inserting 65 splits the rightmost leaf, which overflows its parent.
        // The root absorbs the second promotion.
        let mut tree = tree_from(internal(
            &[40],
            vec![
                internal(&[20], vec![leaf(&[10]), leaf(&[30])]),
                internal(
                    &[45, 50, 55, 60],
                    vec![
                        leaf(&[41]),
                        leaf(&[46]),
                        leaf(&[51]),
                        leaf(&[56]),
                        leaf(&[61, 62, 63, 64]),
                    ],
                ),
            ],
        ));
        tree.insert(65).expect("insert");

        assert_eq!(
            tree.root(),
            Some(&internal(
                &[40, 55],
                vec![
                    internal(&[20], vec![leaf(&[10]), leaf(&[30])]),
                    internal(&[45, 50], vec![leaf(&[41]), leaf(&[46]), leaf(&[51])]),
                    internal(&[60, 63], vec![leaf(&[56]), leaf(&[61, 62]), leaf(&[64, 65])]),
                ]
            ))
        );
        assert_eq!(tree.height(), 3);
        tree.validate().expect("valid after cascade");
    }

    #[test]
    fn test_promotion_cascades_into_root_growth() {
        fn small(key: i32) -> Node<i32> {
            internal(&[key], vec![leaf(&[key - 4]), leaf(&[key + 1])])
        }

        let mut tree = tree_from(internal(
            &[20, 30, 40, 50],
            vec![
                small(10),
                small(25),
                small(35),
                small(45),
                internal(
                    &[55, 60, 65, 70],
                    vec![
                        leaf(&[51]),
                        leaf(&[56]),
                        leaf(&[61]),
                        leaf(&[66]),
                        leaf(&[71, 72, 73, 74]),
                    ],
                ),
            ],
        ));
        assert_eq!(tree.height(), 3);

        tree.insert(75).expect("insert");

        assert_eq!(
            tree.root(),
            Some(&internal(
                &[40],
                vec![
                    internal(&[20, 30], vec![small(10), small(25), small(35)]),
                    internal(
                        &[50, 65],
                        vec![
                            small(45),
                            internal(&[55, 60], vec![leaf(&[51]), leaf(&[56]), leaf(&[61])]),
                            internal(
                                &[70, 73],
                                vec![leaf(&[66]), leaf(&[71, 72]), leaf(&[74, 75])]
                            ),
                        ]
                    ),
                ]
            ))
        );
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.len(), 29);
        tree.validate().expect("valid after root growth");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut tree = BTree::new();
        insert_all(&mut tree, 1..=17);
        let before = tree.clone();

        // 9 is the root separator, 4 sits in a leaf
        assert_eq!(tree.insert(9), Err(BTreeError::DuplicateKey));
        assert_eq!(tree.insert(4), Err(BTreeError::DuplicateKey));
        assert_eq!(tree, before);
        assert_eq!(tree.len(), 17);
    }

    #[test]
    fn test_reverse_inserts() {
        let mut tree = BTree::new();
        insert_all(&mut tree, (1..=200).rev());

        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, (1..=200).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_inserts_keep_invariants() {
        for seed in 0..8u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut keys: Vec<i32> = (0..2000).collect();
            keys.shuffle(&mut rng);

            let mut tree = BTree::new();
            for &key in &keys {
                tree.insert(key).expect("insert");
                tree.validate().expect("invariants hold after insert");

                // Every internal node has at least two children, so
                // n >= 2^height - 1, i.e. height <= ceil(log2(n + 1)).
                let n = tree.len();
                let max_height = (usize::BITS - n.leading_zeros()) as usize;
                assert!(
                    tree.height() <= max_height,
                    "seed {seed}: height {} with {n} keys",
                    tree.height()
                );
            }

            let collected: Vec<i32> = tree.iter().copied().collect();
            assert_eq!(collected, (0..2000).collect::<Vec<_>>(), "seed {seed}");
            assert_eq!(tree.len(), 2000);
        }
    }

    #[test]
    fn test_iter_size_hint() {
        let mut tree = BTree::new();
        insert_all(&mut tree, 0..50);

        let mut iter = tree.iter();
        assert_eq!(iter.size_hint(), (50, Some(50)));
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.size_hint(), (49, Some(49)));
        assert_eq!((&tree).into_iter().count(), 50);
    }

    #[test]
    fn test_from_root_rejects_invalid_tree() {
        // Two children for four keys
        let result = BTree::from_root(internal(
            &[10, 20, 30, 40],
            vec![leaf(&[5, 6, 7]), leaf(&[15, 16, 19])],
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_display_empty() {
        let tree: BTree<i32> = BTree::new();
        assert_eq!(tree.to_string(), "(empty)");
    }

    #[test]
    fn test_string_keys() {
        let mut tree = BTree::new();
        for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry"] {
            tree.insert(word.to_string()).expect("insert");
        }

        assert_eq!(
            tree.iter().map(String::as_str).collect::<Vec<_>>(),
            ["apple", "banana", "cherry", "fig", "kiwi", "pear"]
        );
        assert_eq!(tree.height(), 2);
    }
}
