//! # Fleet Commit
//!
//! Merkle commitments to hidden battleship boards, and ordered hit-claim
//! bundles derived from them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FLEET COMMIT                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── hash.rs     - Keccak-256, sorted-pair node hashing     │
//! │  ├── abi.rs      - Solidity ABI tuple encoding              │
//! │  └── coord.rs    - Row/column coordinates and keys          │
//! │                                                             │
//! │  board/          - Input model                              │
//! │  ├── cell.rs     - Cell and canonical leaf encoding         │
//! │  └── grid.rs     - Validated R x C board                    │
//! │                                                             │
//! │  proof/          - Commitment and claims                    │
//! │  ├── merkle.rs   - Standard merkle tree                     │
//! │  ├── dump.rs     - standard-v1 snapshot                     │
//! │  ├── index.rs    - Per-coordinate proof index               │
//! │  └── claim.rs    - Ship segment canonicalization            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Compatibility
//!
//! Leaves, node hashing and tree layout match OpenZeppelin's
//! `StandardMerkleTree` with leaf encoding `["bool", "uint256", "string"]`,
//! so roots and proofs verify with `MerkleProof.verify` on-chain.
//!
//! ## Determinism
//!
//! No HashMap anywhere (BTreeMap for sorted iteration). The same board
//! always yields the same root, the same proofs and the same claim order.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod board;
pub mod config;
pub mod core;
pub mod error;
pub mod proof;
pub mod storage;

// Re-export commonly used types
pub use board::{Cell, Grid, GridError};
pub use config::{BoardConfig, ConfigError};
pub use crate::core::coord::Coordinate;
pub use crate::core::hash::NodeHash;
pub use error::{Error, Result};
pub use proof::{
    canonicalize, commit_board, BoardCommitment, ClaimBundle, ProofIndex, StandardMerkleTree,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
