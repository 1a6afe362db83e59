//! Core deterministic primitives.
//!
//! Hashing, ABI encoding and coordinates. Everything here is part of the
//! wire format shared with the external verifier.

pub mod abi;
pub mod coord;
pub mod hash;

// Re-export core types
pub use coord::{column_index, column_label, Coordinate, Direction, MAX_COLUMNS};
pub use hash::{hash_leaf, hash_pair, keccak256, process_proof, NodeHash};
