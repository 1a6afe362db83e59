//! Commitment and Claim Engine
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF ENGINE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  merkle.rs  - OpenZeppelin-compatible standard merkle tree  │
//! │  dump.rs    - standard-v1 tree snapshot                     │
//! │  index.rs   - coordinate -> (hit, proof) lookup             │
//! │  claim.rs   - ship segment canonicalization                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Grid -> StandardMerkleTree -> ProofIndex -> ClaimBundle.

pub mod claim;
pub mod dump;
pub mod index;
pub mod merkle;

// Re-export key types
pub use claim::{canonicalize, canonicalize_segments, ClaimBundle, ClaimError, Segment};
pub use dump::{StandardTreeDump, STANDARD_FORMAT};
pub use index::{BoardCommitment, IndexError, ProofEntry, ProofIndex};
pub use merkle::{IndexedCell, MerkleProof, StandardMerkleTree, TreeError};

use crate::board::grid::Grid;
use crate::error::Result;

/// Commit to a validated board: build the tree and index every proof.
pub fn commit_board(grid: &Grid) -> Result<(StandardMerkleTree, ProofIndex)> {
    let tree = StandardMerkleTree::build(grid)?;
    let index = ProofIndex::from_tree(&tree)?;
    Ok((tree, index))
}
