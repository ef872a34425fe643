//! In-memory B-tree index.
//!
//! An order-5 tree: every node holds at most `MAX_KEYS` (4) keys and every
//! internal node has one more child than it has keys. The tree only grows by
//! splitting full nodes and promoting their median key upward, so all leaves
//! stay at the same depth.
//!
//! # Structure
//!
//! - Internal nodes: store separator keys and owned children
//! - Leaf nodes: store keys only
//!
//! Duplicate keys are rejected with [`BTreeError::DuplicateKey`].
//!
//! # Usage
//!
//! ```
//! use kivi::btree::BTree;
//!
//! let mut tree = BTree::new();
//! for key in [5, 1, 4, 2, 3] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert_eq!(tree.to_string(), "[3]\n[1 2] [4 5]");
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
//! ```

mod invariants;
mod node;
mod tree;

pub use invariants::InvariantViolation;
pub use node::{MAX_KEYS, MIN_KEYS, Node, NodeError, ORDER};
pub use tree::{BTree, BTreeError, Iter};
