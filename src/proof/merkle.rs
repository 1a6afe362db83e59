//! Standard Merkle Tree
//!
//! Keccak-256 binary tree over every board cell, laid out the way
//! OpenZeppelin's `StandardMerkleTree` lays it out so its Solidity
//! `MerkleProof.verify` accepts our proofs unchanged:
//!
//! ```text
//!   tree[0]                      root
//!   tree[i] children             2i+1, 2i+2
//!   leaves (sorted ascending)    tree[2n-2], tree[2n-3], ..., tree[n-1]
//!   inner node                   keccak256(sort(left, right))
//! ```
//!
//! Hits and misses are both committed, so revealing a miss is provable too.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::board::cell::Cell;
use crate::board::grid::Grid;
use crate::core::coord::Coordinate;
use crate::core::hash::{hash_pair, process_proof, NodeHash};

/// A committed cell and the tree slot its leaf hash occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedCell {
    /// The committed cell.
    pub cell: Cell,
    /// Slot in the flat tree array.
    pub tree_index: usize,
}

/// Merkle inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    /// Tree slot of the proven leaf.
    pub tree_index: usize,
    /// Sibling hashes from the leaf up to (excluding) the root.
    pub siblings: Vec<NodeHash>,
}

/// Commitment tree over board cells.
#[derive(Clone, Debug)]
pub struct StandardMerkleTree {
    /// Flat node array, root at index 0.
    tree: Vec<NodeHash>,
    /// Cells in the order they were supplied.
    values: Vec<IndexedCell>,
    /// Leaf hash to position in `values`.
    lookup: BTreeMap<NodeHash, usize>,
}

impl StandardMerkleTree {
    /// Build the tree over a validated grid.
    pub fn build(grid: &Grid) -> Result<Self, TreeError> {
        Self::of(grid.cells())
    }

    /// Build the tree over an arbitrary list of cells.
    ///
    /// Fails on an empty list or on a coordinate that appears twice.
    pub fn of(cells: &[Cell]) -> Result<Self, TreeError> {
        if cells.is_empty() {
            return Err(TreeError::Empty);
        }

        let mut seen = BTreeMap::new();
        for cell in cells {
            if let Some(previous) = seen.insert(cell.coord, cell.hit) {
                debug!(coord = %cell.coord, previous, "duplicate coordinate in tree input");
                return Err(TreeError::DuplicateLeaf(cell.coord));
            }
        }

        let mut hashed: Vec<(NodeHash, usize)> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.leaf_hash(), i))
            .collect();
        hashed.sort();

        let leaves: Vec<NodeHash> = hashed.iter().map(|(hash, _)| *hash).collect();
        let tree = make_tree(&leaves);

        let mut values: Vec<IndexedCell> = cells
            .iter()
            .map(|&cell| IndexedCell { cell, tree_index: 0 })
            .collect();
        let mut lookup = BTreeMap::new();
        for (leaf_index, (hash, value_index)) in hashed.into_iter().enumerate() {
            values[value_index].tree_index = tree.len() - 1 - leaf_index;
            lookup.insert(hash, value_index);
        }

        debug!(
            leaves = leaves.len(),
            nodes = tree.len(),
            root = %tree[0],
            "built merkle tree"
        );

        Ok(Self { tree, values, lookup })
    }

    /// Rebuild from a stored node array and indexed values, checking every
    /// structural invariant.
    pub(crate) fn from_parts(
        tree: Vec<NodeHash>,
        values: Vec<IndexedCell>,
    ) -> Result<Self, TreeError> {
        if values.is_empty() {
            return Err(TreeError::Empty);
        }
        if tree.len() != 2 * values.len() - 1 {
            return Err(TreeError::InvalidTreeLength {
                expected: 2 * values.len() - 1,
                got: tree.len(),
            });
        }

        let mut lookup = BTreeMap::new();
        let mut seen = BTreeMap::new();
        for (value_index, value) in values.iter().enumerate() {
            if !is_leaf_node(&tree, value.tree_index) {
                return Err(TreeError::NotALeaf(value.tree_index));
            }
            if seen.insert(value.cell.coord, value_index).is_some() {
                return Err(TreeError::DuplicateLeaf(value.cell.coord));
            }
            lookup.insert(value.cell.leaf_hash(), value_index);
        }

        let built = Self { tree, values, lookup };
        built.validate()?;
        Ok(built)
    }

    /// The published commitment.
    pub fn root(&self) -> NodeHash {
        self.tree[0]
    }

    /// Number of committed cells.
    pub fn leaf_count(&self) -> usize {
        self.values.len()
    }

    /// Flat node array (root first).
    pub fn nodes(&self) -> &[NodeHash] {
        &self.tree
    }

    /// Committed cells in insertion order, with their position in it.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &IndexedCell)> {
        self.values.iter().enumerate()
    }

    /// Position of a cell among the committed values.
    pub fn leaf_lookup(&self, cell: &Cell) -> Result<usize, TreeError> {
        self.lookup
            .get(&cell.leaf_hash())
            .copied()
            .ok_or(TreeError::UnknownLeaf(cell.coord))
    }

    /// Inclusion proof for the value at `value_index`.
    pub fn generate_proof(&self, value_index: usize) -> Result<MerkleProof, TreeError> {
        let value = self.values.get(value_index).ok_or(TreeError::IndexOutOfBounds {
            index: value_index,
            len: self.values.len(),
        })?;

        let mut siblings = Vec::new();
        let mut index = value.tree_index;
        while index > 0 {
            siblings.push(self.tree[sibling_index(index)]);
            index = parent_index(index);
        }

        Ok(MerkleProof {
            tree_index: value.tree_index,
            siblings,
        })
    }

    /// Inclusion proof for a cell.
    pub fn generate_proof_for(&self, cell: &Cell) -> Result<MerkleProof, TreeError> {
        self.generate_proof(self.leaf_lookup(cell)?)
    }

    /// Verify a cell's proof against a root hash.
    pub fn verify_proof(root: &NodeHash, proof: &[NodeHash], cell: &Cell) -> bool {
        Self::verify_proof_with_hash(root, proof, &cell.leaf_hash())
    }

    /// Verify a proof using a pre-hashed leaf.
    pub fn verify_proof_with_hash(root: &NodeHash, proof: &[NodeHash], leaf_hash: &NodeHash) -> bool {
        process_proof(*leaf_hash, proof) == *root
    }

    /// Check every inner node is the sorted-pair hash of its children and
    /// every value sits on its own leaf hash.
    pub fn validate(&self) -> Result<(), TreeError> {
        for (value_index, value) in self.values.iter().enumerate() {
            let node = self.tree.get(value.tree_index).ok_or(TreeError::NotALeaf(value.tree_index))?;
            if *node != value.cell.leaf_hash() {
                return Err(TreeError::LeafMismatch {
                    value_index,
                    tree_index: value.tree_index,
                });
            }
        }

        for i in (0..self.tree.len()).rev() {
            if is_internal_node(&self.tree, i)
                && self.tree[i] != hash_pair(&self.tree[left_child_index(i)], &self.tree[right_child_index(i)])
            {
                return Err(TreeError::InvalidNode(i));
            }
        }

        Ok(())
    }

    /// Human-readable tree, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // (node, prefix of the node's own line, prefix for its children)
        let mut stack = vec![(0usize, String::new(), String::new())];

        while let Some((index, line_prefix, child_prefix)) = stack.pop() {
            let _ = writeln!(out, "{}{}) {}", line_prefix, index, self.tree[index]);

            if is_internal_node(&self.tree, index) {
                let right = right_child_index(index);
                let left = left_child_index(index);
                stack.push((right, format!("{}└─ ", child_prefix), format!("{}   ", child_prefix)));
                stack.push((left, format!("{}├─ ", child_prefix), format!("{}│  ", child_prefix)));
            }
        }

        out
    }
}

/// Errors building, querying or loading a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No leaves.
    #[error("cannot build a merkle tree with no leaves")]
    Empty,

    /// Coordinate committed twice.
    #[error("coordinate {0} appears more than once")]
    DuplicateLeaf(Coordinate),

    /// Cell was never committed.
    #[error("cell at {0} is not part of the tree")]
    UnknownLeaf(Coordinate),

    /// Value index past the end.
    #[error("value index {index} out of bounds ({len} values)")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of values.
        len: usize,
    },

    /// Tree index is not a leaf slot.
    #[error("tree index {0} is not a leaf")]
    NotALeaf(usize),

    /// Node array has the wrong size for the number of values.
    #[error("tree has {got} nodes, expected {expected}")]
    InvalidTreeLength {
        /// `2n - 1`.
        expected: usize,
        /// Actual node count.
        got: usize,
    },

    /// Stored leaf does not hash to the value it claims.
    #[error("value {value_index} does not match leaf at tree index {tree_index}")]
    LeafMismatch {
        /// Position in values.
        value_index: usize,
        /// Claimed tree slot.
        tree_index: usize,
    },

    /// Inner node is not the hash of its children.
    #[error("inner node {0} does not match its children")]
    InvalidNode(usize),

    /// Unsupported dump format.
    #[error("unknown tree format {0:?}")]
    UnknownFormat(String),

    /// Dump leaf encoding is not `[bool, uint256, string]`.
    #[error("unsupported leaf encoding {0:?}")]
    UnsupportedLeafEncoding(Vec<String>),

    /// Dumped value is not a valid cell.
    #[error("invalid leaf value: {0}")]
    InvalidValue(String),
}

// =============================================================================
// TREE LAYOUT
// =============================================================================

/// Build the flat node array from already-sorted leaf hashes.
fn make_tree(leaves: &[NodeHash]) -> Vec<NodeHash> {
    let len = 2 * leaves.len() - 1;
    let mut tree = vec![NodeHash::default(); len];

    for (i, leaf) in leaves.iter().enumerate() {
        tree[len - 1 - i] = *leaf;
    }
    for i in (0..len - leaves.len()).rev() {
        tree[i] = hash_pair(&tree[left_child_index(i)], &tree[right_child_index(i)]);
    }

    tree
}

#[inline]
fn left_child_index(i: usize) -> usize {
    2 * i + 1
}

#[inline]
fn right_child_index(i: usize) -> usize {
    2 * i + 2
}

#[inline]
fn parent_index(i: usize) -> usize {
    debug_assert!(i > 0, "root has no parent");
    (i - 1) / 2
}

#[inline]
fn sibling_index(i: usize) -> usize {
    debug_assert!(i > 0, "root has no sibling");
    if i % 2 == 1 {
        i + 1
    } else {
        i - 1
    }
}

#[inline]
fn is_internal_node(tree: &[NodeHash], i: usize) -> bool {
    right_child_index(i) < tree.len()
}

#[inline]
fn is_leaf_node(tree: &[NodeHash], i: usize) -> bool {
    i < tree.len() && !is_internal_node(tree, i)
}

// =============================================================================
// TESTS
// =============================================================================
