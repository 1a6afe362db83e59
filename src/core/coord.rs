//! Board Coordinates
//!
//! One coordinate convention is used everywhere: `row` is the 1-based row
//! number, `column` is the 0-based column index whose label is the matching
//! uppercase letter. The input matrix is indexed `[row - 1][column]`.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Size of the column alphabet (`A..=Z`).
pub const MAX_COLUMNS: usize = 26;

/// Column label for a 0-based column index.
///
/// # Panics
/// Panics if `index >= MAX_COLUMNS`. Board configs are validated against
/// this bound up front, so reaching it is a programming error.
#[inline]
pub fn column_label(index: usize) -> char {
    assert!(
        index < MAX_COLUMNS,
        "column index {} outside the {}-letter alphabet",
        index,
        MAX_COLUMNS
    );
    (b'A' + index as u8) as char
}

/// 0-based column index for an uppercase label.
#[inline]
pub fn column_index(label: char) -> Option<usize> {
    if label.is_ascii_uppercase() {
        Some((label as u8 - b'A') as usize)
    } else {
        None
    }
}

/// Scan direction for segment extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Same row, increasing column.
    Right,
    /// Same column, increasing row.
    Down,
}

/// A grid position.
///
/// Orders row-major: by row, then by column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    /// Row number, starting at 1.
    pub row: usize,
    /// Column index, starting at 0.
    pub column: usize,
}

impl Coordinate {
    /// Create a coordinate from a 1-based row and 0-based column.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Column label (`A`, `B`, ...).
    #[inline]
    pub fn label(&self) -> char {
        column_label(self.column)
    }

    /// Composite key `"{row}-{label}"`, e.g. `"3-C"`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// The coordinate `distance` cells away in `direction`.
    ///
    /// Not bounds-checked against any board; see `BoardConfig::contains`.
    #[inline]
    pub fn step(&self, direction: Direction, distance: usize) -> Self {
        match direction {
            Direction::Right => Self::new(self.row, self.column + distance),
            Direction::Down => Self::new(self.row + distance, self.column),
        }
    }

    /// Neighbour above, if any.
    #[inline]
    pub fn up(&self) -> Option<Self> {
        (self.row > 1).then(|| Self::new(self.row - 1, self.column))
    }

    /// Neighbour to the left, if any.
    #[inline]
    pub fn left(&self) -> Option<Self> {
        (self.column > 0).then(|| Self::new(self.row, self.column - 1))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.label())
    }
}

/// Errors parsing a coordinate key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateParseError {
    /// No `-` separator.
    #[error("coordinate key {0:?} is not of the form ROW-LABEL")]
    MissingSeparator(String),

    /// Row is not a positive integer.
    #[error("invalid row in coordinate key {0:?}")]
    InvalidRow(String),

    /// Label is not a single uppercase letter.
    #[error("invalid column label in coordinate key {0:?}")]
    InvalidLabel(String),
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, label) = s
            .split_once('-')
            .ok_or_else(|| CoordinateParseError::MissingSeparator(s.to_string()))?;

        let row: usize = row
            .parse()
            .ok()
            .filter(|r| *r >= 1)
            .ok_or_else(|| CoordinateParseError::InvalidRow(s.to_string()))?;

        let mut chars = label.chars();
        let column = match (chars.next(), chars.next()) {
            (Some(c), None) => column_index(c),
            _ => None,
        }
        .ok_or_else(|| CoordinateParseError::InvalidLabel(s.to_string()))?;

        Ok(Self::new(row, column))
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_bijective() {
        for index in 0..MAX_COLUMNS {
            assert_eq!(column_index(column_label(index)), Some(index));
        }
        assert_eq!(column_label(0), 'A');
        assert_eq!(column_label(9), 'J');
        assert_eq!(column_index('a'), None);
        assert_eq!(column_index('1'), None);
    }

    #[test]
    #[should_panic]
    fn test_label_out_of_alphabet_panics() {
        column_label(MAX_COLUMNS);
    }

    #[test]
    fn test_key_format() {
        assert_eq!(Coordinate::new(1, 0).key(), "1-A");
        assert_eq!(Coordinate::new(10, 9).key(), "10-J");
    }

    #[test]
    fn test_parse_key() {
        assert_eq!("3-C".parse::<Coordinate>(), Ok(Coordinate::new(3, 2)));
        assert_eq!("10-J".parse::<Coordinate>(), Ok(Coordinate::new(10, 9)));
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(matches!(
            "3C".parse::<Coordinate>(),
            Err(CoordinateParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "0-A".parse::<Coordinate>(),
            Err(CoordinateParseError::InvalidRow(_))
        ));
        assert!(matches!(
            "x-A".parse::<Coordinate>(),
            Err(CoordinateParseError::InvalidRow(_))
        ));
        assert!(matches!(
            "1-a".parse::<Coordinate>(),
            Err(CoordinateParseError::InvalidLabel(_))
        ));
        assert!(matches!(
            "1-AB".parse::<Coordinate>(),
            Err(CoordinateParseError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_row_major_ordering() {
        let mut coords = vec![
            Coordinate::new(2, 0),
            Coordinate::new(1, 3),
            Coordinate::new(1, 0),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![Coordinate::new(1, 0), Coordinate::new(1, 3), Coordinate::new(2, 0)]
        );
    }

    #[test]
    fn test_steps_and_neighbours() {
        let c = Coordinate::new(2, 1);
        assert_eq!(c.step(Direction::Right, 2), Coordinate::new(2, 3));
        assert_eq!(c.step(Direction::Down, 1), Coordinate::new(3, 1));
        assert_eq!(c.up(), Some(Coordinate::new(1, 1)));
        assert_eq!(c.left(), Some(Coordinate::new(2, 0)));
        assert_eq!(Coordinate::new(1, 0).up(), None);
        assert_eq!(Coordinate::new(1, 0).left(), None);
    }

    #[test]
    fn test_serde_as_key_string() {
        let c = Coordinate::new(4, 3);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"4-D\"");
        let back: Coordinate = serde_json::from_str("\"4-D\"").unwrap();
        assert_eq!(back, c);
    }
}
