//! Board Grid
//!
//! Validated `R × C` board. Construction enforces the shape and the exact
//! ship cell count before anything is hashed.

use tracing::warn;

use crate::board::cell::Cell;
use crate::config::{BoardConfig, ConfigError};
use crate::core::coord::Coordinate;

/// A validated board: one cell per coordinate, exactly `ship_cells` hits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    config: BoardConfig,
    /// Row-major cells.
    cells: Vec<Cell>,
}

impl Grid {
    /// Build from a `[row][column]` matrix of hit flags.
    pub fn from_matrix(config: &BoardConfig, matrix: &[Vec<bool>]) -> Result<Self, GridError> {
        config.validate()?;

        if matrix.len() != config.rows {
            return Err(GridError::RowCountMismatch {
                expected: config.rows,
                got: matrix.len(),
            });
        }

        let mut cells = Vec::with_capacity(config.cell_count());
        for (r, row) in matrix.iter().enumerate() {
            if row.len() != config.columns {
                return Err(GridError::RowLengthMismatch {
                    row: r + 1,
                    expected: config.columns,
                    got: row.len(),
                });
            }
            for (c, &hit) in row.iter().enumerate() {
                cells.push(Cell::new(hit, r + 1, c));
            }
        }

        Self::checked(*config, cells)
    }

    /// Build from the set of hit coordinates; every other cell is a miss.
    pub fn from_hits(config: &BoardConfig, hits: &[Coordinate]) -> Result<Self, GridError> {
        config.validate()?;

        let mut flags = vec![false; config.cell_count()];
        for &coord in hits {
            if !config.contains(coord) {
                return Err(GridError::OutOfBounds(coord));
            }
            flags[config.flat_index(coord)] = true;
        }

        let cells = config
            .coordinates()
            .zip(flags)
            .map(|(coord, hit)| Cell::at(coord, hit))
            .collect();

        Self::checked(*config, cells)
    }

    fn checked(config: BoardConfig, cells: Vec<Cell>) -> Result<Self, GridError> {
        let hits = cells.iter().filter(|c| c.hit).count();
        if hits != config.ship_cells {
            warn!(expected = config.ship_cells, got = hits, "board hit count mismatch");
            return Err(GridError::HitCountMismatch {
                expected: config.ship_cells,
                got: hits,
            });
        }
        Ok(Self { config, cells })
    }

    /// Board configuration.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a coordinate.
    pub fn get(&self, coord: Coordinate) -> Option<&Cell> {
        if self.config.contains(coord) {
            self.cells.get(self.config.flat_index(coord))
        } else {
            None
        }
    }

    /// Hit coordinates, row-major.
    pub fn hits(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells.iter().filter(|c| c.hit).map(|c| c.coord)
    }

    /// Number of hit cells.
    pub fn hit_count(&self) -> usize {
        self.hits().count()
    }
}

/// Board precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Invalid board configuration.
    #[error("invalid board config: {0}")]
    Config(#[from] ConfigError),

    /// Wrong number of rows.
    #[error("expected {expected} rows, got {got}")]
    RowCountMismatch {
        /// Configured rows.
        expected: usize,
        /// Rows in the input.
        got: usize,
    },

    /// A row has the wrong number of columns.
    #[error("row {row}: expected {expected} columns, got {got}")]
    RowLengthMismatch {
        /// 1-based row number.
        row: usize,
        /// Configured columns.
        expected: usize,
        /// Columns in the input row.
        got: usize,
    },

    /// A hit lies outside the board.
    #[error("coordinate {0:?} is outside the board")]
    OutOfBounds(Coordinate),

    /// Hit cells do not add up to the fleet size.
    #[error("board must contain exactly {expected} ship cells, got {got}")]
    HitCountMismatch {
        /// Configured ship cells.
        expected: usize,
        /// Hits in the input.
        got: usize,
    },
}
