//! Board Configuration
//!
//! Grid dimensions and the required number of ship cells.

use serde::{Deserialize, Serialize};

use crate::core::coord::{Coordinate, MAX_COLUMNS};

/// Default number of rows.
pub const DEFAULT_ROWS: usize = 10;

/// Default number of columns (`A..=J`).
pub const DEFAULT_COLUMNS: usize = 10;

/// Default ship cell count (4 + 3 + 3 + 2 + 2 + 2 + 1 + 1 + 1 + 1).
pub const DEFAULT_SHIP_CELLS: usize = 20;

/// Board shape and fleet size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of rows (R).
    pub rows: usize,
    /// Number of columns (C), at most 26.
    pub columns: usize,
    /// Exact number of hit cells every board must contain (K).
    pub ship_cells: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            ship_cells: DEFAULT_SHIP_CELLS,
        }
    }
}

impl BoardConfig {
    /// Create a config. Call `validate` before use.
    pub const fn new(rows: usize, columns: usize, ship_cells: usize) -> Self {
        Self {
            rows,
            columns,
            ship_cells,
        }
    }

    /// Create config from environment variables.
    ///
    /// Reads `FLEET_ROWS`, `FLEET_COLUMNS` and `FLEET_SHIP_CELLS`; missing or
    /// unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, fallback: usize| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            rows: read("FLEET_ROWS", defaults.rows),
            columns: read("FLEET_COLUMNS", defaults.columns),
            ship_cells: read("FLEET_SHIP_CELLS", defaults.ship_cells),
        }
    }

    /// Check the config describes a usable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyBoard {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.columns > MAX_COLUMNS {
            return Err(ConfigError::TooManyColumns {
                columns: self.columns,
                max: MAX_COLUMNS,
            });
        }
        if self.ship_cells > self.cell_count() {
            return Err(ConfigError::TooManyShipCells {
                ship_cells: self.ship_cells,
                capacity: self.cell_count(),
            });
        }
        Ok(())
    }

    /// Total number of cells (R × C).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Is the coordinate on this board?
    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row >= 1 && coord.row <= self.rows && coord.column < self.columns
    }

    /// Position of a coordinate in a row-major arena of `cell_count` slots.
    ///
    /// Only meaningful when `contains(coord)` holds.
    #[inline]
    pub fn flat_index(&self, coord: Coordinate) -> usize {
        (coord.row - 1) * self.columns + coord.column
    }

    /// All coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (1..=self.rows).flat_map(move |row| (0..self.columns).map(move |col| Coordinate::new(row, col)))
    }
}

/// Invalid board configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A dimension is zero.
    #[error("board must have at least one cell, got {rows}x{columns}")]
    EmptyBoard {
        /// Configured rows.
        rows: usize,
        /// Configured columns.
        columns: usize,
    },

    /// More columns than labels.
    #[error("{columns} columns exceeds the {max}-letter column alphabet")]
    TooManyColumns {
        /// Configured columns.
        columns: usize,
        /// Alphabet size.
        max: usize,
    },

    /// Fleet does not fit on the board.
    #[error("{ship_cells} ship cells cannot fit on a board of {capacity} cells")]
    TooManyShipCells {
        /// Configured ship cells.
        ship_cells: usize,
        /// Board capacity.
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_classic_board() {
        let config = BoardConfig::default();
        assert_eq!(config.rows, 10);
        assert_eq!(config.columns, 10);
        assert_eq!(config.ship_cells, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(matches!(
            BoardConfig::new(0, 4, 0).validate(),
            Err(ConfigError::EmptyBoard { .. })
        ));
        assert!(matches!(
            BoardConfig::new(4, 27, 3).validate(),
            Err(ConfigError::TooManyColumns { columns: 27, max: 26 })
        ));
        assert!(matches!(
            BoardConfig::new(2, 2, 5).validate(),
            Err(ConfigError::TooManyShipCells { ship_cells: 5, capacity: 4 })
        ));
    }

    #[test]
    fn test_contains_and_flat_index() {
        let config = BoardConfig::new(4, 4, 3);
        assert!(config.contains(Coordinate::new(1, 0)));
        assert!(config.contains(Coordinate::new(4, 3)));
        assert!(!config.contains(Coordinate::new(0, 0)));
        assert!(!config.contains(Coordinate::new(5, 0)));
        assert!(!config.contains(Coordinate::new(1, 4)));

        assert_eq!(config.flat_index(Coordinate::new(1, 0)), 0);
        assert_eq!(config.flat_index(Coordinate::new(2, 1)), 5);
        assert_eq!(config.flat_index(Coordinate::new(4, 3)), 15);
    }

    #[test]
    fn test_coordinates_row_major() {
        let config = BoardConfig::new(2, 3, 1);
        let coords: Vec<String> = config.coordinates().map(|c| c.key()).collect();
        assert_eq!(coords, vec!["1-A", "1-B", "1-C", "2-A", "2-B", "2-C"]);

        for (i, coord) in config.coordinates().enumerate() {
            assert_eq!(config.flat_index(coord), i);
        }
    }
}
