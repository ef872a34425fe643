//! Structural invariant checking.
//!
//! Verifies, for a whole tree:
//! - keys inside every node are strictly ascending
//! - non-root nodes hold between `MIN_KEYS` and `MAX_KEYS` keys; the root
//!   holds between 1 and `MAX_KEYS`
//! - internal nodes have exactly one more child than keys
//! - every key in child `i` lies strictly between separators `i - 1` and `i`
//! - all leaves sit at the same depth
//! - the recorded key count matches the keys actually stored

use std::fmt;

use crate::btree::node::{MAX_KEYS, MIN_KEYS, Node};

/// A broken tree invariant, located by depth (root is depth 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root exists but holds no keys.
    EmptyRoot,
    /// Keys inside a node are not strictly ascending.
    UnorderedKeys { depth: usize },
    /// A node holds more than `MAX_KEYS` keys.
    Overfull { depth: usize, len: usize },
    /// A non-root node holds fewer than `MIN_KEYS` keys.
    Underfull { depth: usize, len: usize },
    /// An internal node's child count is not its key count plus one.
    FanoutMismatch {
        depth: usize,
        keys: usize,
        children: usize,
    },
    /// A key lies outside the range its parent separators allow.
    OutOfBounds { depth: usize },
    /// Leaves were found at different depths.
    UnbalancedLeaves { expected: usize, found: usize },
    /// The tree's key count disagrees with the keys it stores.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoot => f.write_str("root node holds no keys"),
            Self::UnorderedKeys { depth } => {
                write!(f, "keys not strictly ascending at depth {depth}")
            }
            Self::Overfull { depth, len } => {
                write!(f, "node at depth {depth} holds {len} keys (max {MAX_KEYS})")
            }
            Self::Underfull { depth, len } => {
                write!(f, "node at depth {depth} holds {len} keys (min {MIN_KEYS})")
            }
            Self::FanoutMismatch {
                depth,
                keys,
                children,
            } => write!(
                f,
                "internal node at depth {depth} has {keys} keys but {children} children"
            ),
            Self::OutOfBounds { depth } => {
                write!(f, "key outside separator bounds at depth {depth}")
            }
            Self::UnbalancedLeaves { expected, found } => {
                write!(f, "leaf at depth {found}, expected depth {expected}")
            }
            Self::LengthMismatch { expected, found } => {
                write!(f, "tree records {expected} keys but stores {found}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Count every key stored under `node`, separators included.
pub fn count_keys<K: Ord>(node: &Node<K>) -> usize {
    node.keys().len() + node.children().iter().map(count_keys).sum::<usize>()
}

/// Check every invariant of the tree rooted at `root`.
pub fn check<K: Ord>(root: Option<&Node<K>>, len: usize) -> Result<(), InvariantViolation> {
    let Some(root) = root else {
        return if len == 0 {
            Ok(())
        } else {
            Err(InvariantViolation::LengthMismatch {
                expected: len,
                found: 0,
            })
        };
    };

    if root.keys().is_empty() {
        return Err(InvariantViolation::EmptyRoot);
    }

    let mut checker = Checker { leaf_depth: None };
    let found = checker.check_node(root, 0, None, None)?;
    if found != len {
        return Err(InvariantViolation::LengthMismatch {
            expected: len,
            found,
        });
    }
    Ok(())
}

struct Checker {
    /// Depth of the first leaf seen; every other leaf must match it.
    leaf_depth: Option<usize>,
}

impl Checker {
    /// Check `node` and its subtree, returning the number of keys it holds.
    ///
    /// `lower` and `upper` are exclusive bounds inherited from ancestors.
    fn check_node<K: Ord>(
        &mut self,
        node: &Node<K>,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<usize, InvariantViolation> {
        let keys = node.keys();

        if keys.len() > MAX_KEYS {
            return Err(InvariantViolation::Overfull {
                depth,
                len: keys.len(),
            });
        }
        if depth > 0 && keys.len() < MIN_KEYS {
            return Err(InvariantViolation::Underfull {
                depth,
                len: keys.len(),
            });
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(InvariantViolation::UnorderedKeys { depth });
        }

        let below_lower = |key: &K| lower.is_some_and(|bound| key <= bound);
        let above_upper = |key: &K| upper.is_some_and(|bound| key >= bound);
        if keys.iter().any(|key| below_lower(key) || above_upper(key)) {
            return Err(InvariantViolation::OutOfBounds { depth });
        }

        if node.is_leaf() {
            return match self.leaf_depth {
                Some(expected) if expected != depth => Err(InvariantViolation::UnbalancedLeaves {
                    expected,
                    found: depth,
                }),
                _ => {
                    self.leaf_depth = Some(depth);
                    Ok(keys.len())
                }
            };
        }

        let children = node.children();
        if children.len() != keys.len() + 1 {
            return Err(InvariantViolation::FanoutMismatch {
                depth,
                keys: keys.len(),
                children: children.len(),
            });
        }

        let mut count = keys.len();
        for (i, child) in children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { keys.get(i - 1) };
            let child_upper = keys.get(i).or(upper);
            count += self.check_node(child, depth + 1, child_lower, child_upper)?;
        }
        Ok(count)
    }
}
