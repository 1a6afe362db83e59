//! Proof Index
//!
//! Coordinate-addressed view of a commitment: for every cell, its hit flag
//! and inclusion proof. This is the artifact published next to the root.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::board::cell::Cell;
use crate::config::BoardConfig;
use crate::core::coord::Coordinate;
use crate::core::hash::NodeHash;
use crate::proof::merkle::{StandardMerkleTree, TreeError};

/// Hit flag and proof for one coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEntry {
    /// Occupied by a ship.
    pub hit: bool,
    /// Sibling hashes, leaf to root.
    pub proof: Vec<NodeHash>,
}

/// Serialized commitment: `{ "root": "0x…", "proofs": { "1-A": { … } } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCommitment {
    /// Published root.
    pub root: NodeHash,
    /// Per-coordinate entries, row-major.
    pub proofs: BTreeMap<Coordinate, ProofEntry>,
}

/// Read-only lookup from coordinate to hit flag and proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofIndex {
    root: NodeHash,
    entries: BTreeMap<Coordinate, ProofEntry>,
}

impl ProofIndex {
    /// Index every committed leaf of a tree.
    pub fn from_tree(tree: &StandardMerkleTree) -> Result<Self, IndexError> {
        let mut entries = BTreeMap::new();

        for (i, value) in tree.entries() {
            let proof = tree.generate_proof(i)?;
            let entry = ProofEntry {
                hit: value.cell.hit,
                proof: proof.siblings,
            };
            if entries.insert(value.cell.coord, entry).is_some() {
                warn!(coord = %value.cell.coord, "coordinate collision while indexing proofs");
                return Err(IndexError::DuplicateCoordinate(value.cell.coord));
            }
        }

        info!(root = %tree.root(), entries = entries.len(), "indexed board proofs");

        Ok(Self {
            root: tree.root(),
            entries,
        })
    }

    /// Wrap a deserialized commitment.
    pub fn from_commitment(commitment: BoardCommitment) -> Self {
        Self {
            root: commitment.root,
            entries: commitment.proofs,
        }
    }

    /// Serializable form.
    pub fn to_commitment(&self) -> BoardCommitment {
        BoardCommitment {
            root: self.root,
            proofs: self.entries.clone(),
        }
    }

    /// Consume into the serializable form.
    pub fn into_commitment(self) -> BoardCommitment {
        BoardCommitment {
            root: self.root,
            proofs: self.entries,
        }
    }

    /// Published root.
    pub fn root(&self) -> NodeHash {
        self.root
    }

    /// Entry for a coordinate.
    pub fn get(&self, coord: Coordinate) -> Result<&ProofEntry, IndexError> {
        self.entries
            .get(&coord)
            .ok_or(IndexError::UnknownCoordinate(coord))
    }

    /// Number of indexed coordinates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of hit entries.
    pub fn hit_count(&self) -> usize {
        self.entries.values().filter(|e| e.hit).count()
    }

    /// Entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &ProofEntry)> {
        self.entries.iter()
    }

    /// Check the index covers exactly the board: one entry per coordinate,
    /// none outside it.
    pub fn ensure_complete(&self, config: &BoardConfig) -> Result<(), IndexError> {
        if let Some(coord) = self.entries.keys().find(|c| !config.contains(**c)) {
            return Err(IndexError::OutOfBounds(*coord));
        }
        if let Some(coord) = config.coordinates().find(|c| !self.entries.contains_key(c)) {
            return Err(IndexError::UnknownCoordinate(coord));
        }
        Ok(())
    }

    /// Recompute the path for a coordinate and compare with the root.
    pub fn verify(&self, coord: Coordinate) -> Result<bool, IndexError> {
        let entry = self.get(coord)?;
        let cell = Cell::at(coord, entry.hit);
        Ok(StandardMerkleTree::verify_proof(&self.root, &entry.proof, &cell))
    }
}

/// Proof index failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Tree query failed while indexing.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Two leaves share a coordinate.
    #[error("coordinate {0} indexed twice")]
    DuplicateCoordinate(Coordinate),

    /// Coordinate was never committed.
    #[error("no proof for coordinate {0}")]
    UnknownCoordinate(Coordinate),

    /// Entry lies outside the configured board.
    #[error("coordinate {0} is outside the board")]
    OutOfBounds(Coordinate),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::grid::Grid;

    fn scenario() -> (BoardConfig, ProofIndex) {
        let config = BoardConfig::new(4, 4, 3);
        let grid = Grid::from_hits(
            &config,
            &[Coordinate::new(1, 0), Coordinate::new(1, 1), Coordinate::new(3, 2)],
        )
        .unwrap();
        let tree = StandardMerkleTree::build(&grid).unwrap();
        (config, ProofIndex::from_tree(&tree).unwrap())
    }

    #[test]
    fn test_one_entry_per_coordinate() {
        let (config, index) = scenario();
        assert_eq!(index.len(), config.cell_count());
        assert_eq!(index.hit_count(), 3);
        assert!(index.ensure_complete(&config).is_ok());

        let keys: Vec<Coordinate> = index.iter().map(|(c, _)| *c).collect();
        let expected: Vec<Coordinate> = config.coordinates().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_every_entry_verifies() {
        let (config, index) = scenario();
        for coord in config.coordinates() {
            assert!(index.verify(coord).unwrap(), "proof for {} failed", coord);
        }
        assert!(index.get(Coordinate::new(1, 0)).unwrap().hit);
        assert!(!index.get(Coordinate::new(2, 0)).unwrap().hit);
    }

    #[test]
    fn test_unknown_coordinate() {
        let (_, index) = scenario();
        assert_eq!(
            index.get(Coordinate::new(5, 0)).unwrap_err(),
            IndexError::UnknownCoordinate(Coordinate::new(5, 0))
        );
    }

    #[test]
    fn test_ensure_complete_detects_gaps() {
        let (config, index) = scenario();
        let mut commitment = index.into_commitment();
        commitment.proofs.remove(&Coordinate::new(2, 3));
        let index = ProofIndex::from_commitment(commitment);
        assert_eq!(
            index.ensure_complete(&config),
            Err(IndexError::UnknownCoordinate(Coordinate::new(2, 3)))
        );

        let small = BoardConfig::new(3, 4, 3);
        let (_, full) = scenario();
        assert_eq!(
            full.ensure_complete(&small),
            Err(IndexError::OutOfBounds(Coordinate::new(4, 0)))
        );
    }

    #[test]
    fn test_commitment_json_shape() {
        let (_, index) = scenario();
        let json = serde_json::to_value(index.to_commitment()).unwrap();

        assert_eq!(json["root"], serde_json::json!(index.root().to_hex()));
        assert_eq!(json["proofs"]["1-A"]["hit"], serde_json::json!(true));
        assert_eq!(json["proofs"]["4-D"]["hit"], serde_json::json!(false));
        assert_eq!(json["proofs"]["1-A"]["proof"].as_array().unwrap().len(), 4);

        let back: BoardCommitment = serde_json::from_value(json).unwrap();
        assert_eq!(ProofIndex::from_commitment(back), index);
    }

    #[test]
    fn test_tampered_entry_fails_verification() {
        let (_, index) = scenario();
        let mut commitment = index.into_commitment();
        if let Some(entry) = commitment.proofs.get_mut(&Coordinate::new(2, 2)) {
            entry.hit = true;
        }
        let index = ProofIndex::from_commitment(commitment);
        assert!(!index.verify(Coordinate::new(2, 2)).unwrap());
    }
}
