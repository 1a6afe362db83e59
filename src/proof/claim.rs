//! Ship Segment Canonicalization
//!
//! Orders the hit coordinates of a committed board into ship runs for
//! sequential claim submission, without being told where the ships are.
//!
//! Scan rows top to bottom, columns left to right. The first unused hit of
//! each ship is its origin: emit it, then walk right from it, then walk down
//! from it (not from the end of the rightward walk). Each walk stops at the
//! board edge, a miss, or a used cell. A straight ship is reached first at
//! its top-left cell because both walks only look forward, so every later
//! cell of the ship is already used when the scan gets there.
//!
//! A hit that is neither reached by a walk nor a ship origin (its upper or
//! left neighbour is a hit) belongs to a shape straight walks cannot
//! linearize. It is withheld, and the final count check rejects the board.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::cell::Cell;
use crate::config::BoardConfig;
use crate::core::coord::{column_index, Coordinate, Direction};
use crate::core::hash::NodeHash;
use crate::proof::index::{IndexError, ProofIndex};
use crate::proof::merkle::StandardMerkleTree;

/// Ordered hit claims: three index-aligned sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimBundle {
    /// Proof for each claimed coordinate.
    pub sorted_proofs: Vec<Vec<NodeHash>>,
    /// Row number of each claimed coordinate.
    pub coordinate_numbers: Vec<usize>,
    /// Column label of each claimed coordinate.
    pub coordinate_literals: Vec<char>,
}

impl ClaimBundle {
    fn push(&mut self, coord: Coordinate, proof: Vec<NodeHash>) {
        self.sorted_proofs.push(proof);
        self.coordinate_numbers.push(coord.row);
        self.coordinate_literals.push(coord.label());
    }

    /// Number of claims.
    pub fn len(&self) -> usize {
        self.sorted_proofs.len()
    }

    /// True if there are no claims.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Are the three sequences the same length?
    pub fn is_aligned(&self) -> bool {
        self.sorted_proofs.len() == self.coordinate_numbers.len()
            && self.coordinate_numbers.len() == self.coordinate_literals.len()
    }

    /// Claimed coordinates in submission order.
    ///
    /// Labels outside `A..=Z` are skipped.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.coordinate_numbers
            .iter()
            .zip(&self.coordinate_literals)
            .filter_map(|(&row, &label)| {
                column_index(label).map(|col| Coordinate::new(row, col))
            })
    }

    /// Re-verify every claim as a hit leaf under `root`.
    pub fn verify_against(&self, root: &NodeHash) -> Result<(), ClaimError> {
        if !self.is_aligned() {
            return Err(ClaimError::Misaligned {
                proofs: self.sorted_proofs.len(),
                numbers: self.coordinate_numbers.len(),
                literals: self.coordinate_literals.len(),
            });
        }

        for (i, (&row, &label)) in self
            .coordinate_numbers
            .iter()
            .zip(&self.coordinate_literals)
            .enumerate()
        {
            let coord = column_index(label)
                .map(|col| Coordinate::new(row, col))
                .ok_or(ClaimError::InvalidLabel(label))?;
            let cell = Cell::at(coord, true);
            if !StandardMerkleTree::verify_proof(root, &self.sorted_proofs[i], &cell) {
                return Err(ClaimError::InvalidProof(coord));
            }
        }
        Ok(())
    }
}

/// One ship origin and how far each walk took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Scan-discovered first cell.
    pub origin: Coordinate,
    /// Cells taken by the rightward walk.
    pub rightward: usize,
    /// Cells taken by the downward walk.
    pub downward: usize,
}

impl Segment {
    /// Total cells emitted for this origin.
    pub fn cell_count(&self) -> usize {
        1 + self.rightward + self.downward
    }

    /// Horizontal, vertical or single cell (not both walks).
    pub fn is_straight(&self) -> bool {
        self.rightward == 0 || self.downward == 0
    }
}

/// Canonicalization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    /// Index lookup failed.
    #[error("proof index error: {0}")]
    Index(#[from] IndexError),

    /// Emitted claims do not add up to the fleet size.
    #[error("expected {expected} claims, produced {got}: board has hits outside straight ship runs")]
    SegmentCountMismatch {
        /// Configured ship cells.
        expected: usize,
        /// Claims produced.
        got: usize,
    },

    /// Sequences have different lengths.
    #[error("claim sequences misaligned: {proofs} proofs, {numbers} rows, {literals} labels")]
    Misaligned {
        /// Proof count.
        proofs: usize,
        /// Row count.
        numbers: usize,
        /// Label count.
        literals: usize,
    },

    /// Label outside the column alphabet.
    #[error("invalid column label {0:?}")]
    InvalidLabel(char),

    /// Proof does not verify as a hit.
    #[error("claim for {0} does not verify against the root")]
    InvalidProof(Coordinate),
}

/// Produce the claim bundle for a proof index.
pub fn canonicalize(index: &ProofIndex, config: &BoardConfig) -> Result<ClaimBundle, ClaimError> {
    canonicalize_segments(index, config).map(|(bundle, _)| bundle)
}

/// Produce the claim bundle and the segments that fixed its order.
pub fn canonicalize_segments(
    index: &ProofIndex,
    config: &BoardConfig,
) -> Result<(ClaimBundle, Vec<Segment>), ClaimError> {
    index.ensure_complete(config)?;

    let mut scan = Scan {
        index,
        config,
        used: vec![false; config.cell_count()],
        bundle: ClaimBundle::default(),
    };
    let mut segments = Vec::new();
    let mut withheld = 0usize;

    for coord in config.coordinates() {
        if scan.is_used(coord) || !index.get(coord)?.hit {
            continue;
        }
        if !scan.is_origin(coord)? {
            warn!(%coord, "hit is not reachable from a ship origin");
            withheld += 1;
            continue;
        }

        scan.emit(coord)?;
        let rightward = scan.extend(coord, Direction::Right)?;
        let downward = scan.extend(coord, Direction::Down)?;

        let segment = Segment {
            origin: coord,
            rightward,
            downward,
        };
        if !segment.is_straight() {
            warn!(%coord, rightward, downward, "origin extends both right and down");
        }
        debug!(origin = %coord, len = segment.cell_count(), rightward, downward, "segment");
        segments.push(segment);
    }

    let bundle = scan.bundle;
    if bundle.len() != config.ship_cells {
        warn!(
            expected = config.ship_cells,
            got = bundle.len(),
            withheld,
            "claim count mismatch"
        );
        return Err(ClaimError::SegmentCountMismatch {
            expected: config.ship_cells,
            got: bundle.len(),
        });
    }

    info!(claims = bundle.len(), segments = segments.len(), "canonicalized hit claims");
    Ok((bundle, segments))
}

/// Mutable scan state. `used` is a row-major arena over the board.
struct Scan<'a> {
    index: &'a ProofIndex,
    config: &'a BoardConfig,
    used: Vec<bool>,
    bundle: ClaimBundle,
}

impl Scan<'_> {
    #[inline]
    fn is_used(&self, coord: Coordinate) -> bool {
        self.used[self.config.flat_index(coord)]
    }

    fn is_hit(&self, coord: Coordinate) -> Result<bool, IndexError> {
        Ok(self.index.get(coord)?.hit)
    }

    fn is_origin(&self, coord: Coordinate) -> Result<bool, IndexError> {
        for neighbour in [coord.up(), coord.left()].into_iter().flatten() {
            if self.is_hit(neighbour)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn emit(&mut self, coord: Coordinate) -> Result<(), IndexError> {
        let proof = self.index.get(coord)?.proof.clone();
        self.bundle.push(coord, proof);
        let slot = self.config.flat_index(coord);
        self.used[slot] = true;
        Ok(())
    }

    /// Walk from `origin`, emitting unused hits until the run ends.
    fn extend(&mut self, origin: Coordinate, direction: Direction) -> Result<usize, IndexError> {
        let mut taken = 0;
        loop {
            let next = origin.step(direction, taken + 1);
            if !self.config.contains(next) || self.is_used(next) || !self.is_hit(next)? {
                return Ok(taken);
            }
            self.emit(next)?;
            taken += 1;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
