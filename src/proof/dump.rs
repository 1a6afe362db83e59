//! Tree Dump Format
//!
//! Serializable snapshot of a whole tree in OpenZeppelin's `standard-v1`
//! layout, so the same file loads with `StandardMerkleTree.load` in JS.

use serde::{Deserialize, Serialize};

use crate::board::cell::{Cell, LEAF_ENCODING};
use crate::core::coord::{column_index, Coordinate};
use crate::core::hash::NodeHash;
use crate::proof::merkle::{IndexedCell, StandardMerkleTree, TreeError};

/// Dump format identifier.
pub const STANDARD_FORMAT: &str = "standard-v1";

/// Leaf tuple as stored in a dump: `[hit, row, label]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafValue(pub bool, pub u64, pub String);

impl From<&Cell> for LeafValue {
    fn from(cell: &Cell) -> Self {
        Self(cell.hit, cell.coord.row as u64, cell.coord.label().to_string())
    }
}

impl TryFrom<&LeafValue> for Cell {
    type Error = TreeError;

    fn try_from(value: &LeafValue) -> Result<Self, Self::Error> {
        let LeafValue(hit, row, label) = value;

        let row = usize::try_from(*row)
            .ok()
            .filter(|r| *r >= 1)
            .ok_or_else(|| TreeError::InvalidValue(format!("row {} must be at least 1", row)))?;

        let mut chars = label.chars();
        let column = match (chars.next(), chars.next()) {
            (Some(c), None) => column_index(c),
            _ => None,
        }
        .ok_or_else(|| TreeError::InvalidValue(format!("column label {:?}", label)))?;

        Ok(Cell::at(Coordinate::new(row, column), *hit))
    }
}

/// One dumped value and its tree slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpedValue {
    /// Leaf tuple.
    pub value: LeafValue,
    /// Slot in `tree`.
    pub tree_index: usize,
}

/// Whole-tree snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardTreeDump {
    /// Always `standard-v1`.
    pub format: String,
    /// Always `["bool", "uint256", "string"]`.
    pub leaf_encoding: Vec<String>,
    /// Flat node array, root first.
    pub tree: Vec<NodeHash>,
    /// Values in insertion order.
    pub values: Vec<DumpedValue>,
}

impl StandardMerkleTree {
    /// Snapshot the tree.
    pub fn dump(&self) -> StandardTreeDump {
        StandardTreeDump {
            format: STANDARD_FORMAT.to_string(),
            leaf_encoding: LEAF_ENCODING.iter().map(|s| s.to_string()).collect(),
            tree: self.nodes().to_vec(),
            values: self
                .entries()
                .map(|(_, v)| DumpedValue {
                    value: LeafValue::from(&v.cell),
                    tree_index: v.tree_index,
                })
                .collect(),
        }
    }

    /// Restore and fully validate a snapshot.
    pub fn load(dump: &StandardTreeDump) -> Result<Self, TreeError> {
        if dump.format != STANDARD_FORMAT {
            return Err(TreeError::UnknownFormat(dump.format.clone()));
        }
        if dump.leaf_encoding.iter().map(String::as_str).ne(LEAF_ENCODING) {
            return Err(TreeError::UnsupportedLeafEncoding(dump.leaf_encoding.clone()));
        }

        let values = dump
            .values
            .iter()
            .map(|v| {
                Ok(IndexedCell {
                    cell: Cell::try_from(&v.value)?,
                    tree_index: v.tree_index,
                })
            })
            .collect::<Result<Vec<_>, TreeError>>()?;

        Self::from_parts(dump.tree.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::grid::Grid;
    use crate::config::BoardConfig;

    fn sample_tree() -> StandardMerkleTree {
        let grid = Grid::from_hits(
            &BoardConfig::new(3, 3, 2),
            &[Coordinate::new(1, 0), Coordinate::new(2, 0)],
        )
        .unwrap();
        StandardMerkleTree::build(&grid).unwrap()
    }

    #[test]
    fn test_dump_shape() {
        let tree = sample_tree();
        let dump = tree.dump();

        assert_eq!(dump.format, "standard-v1");
        assert_eq!(dump.leaf_encoding, vec!["bool", "uint256", "string"]);
        assert_eq!(dump.tree.len(), 17);
        assert_eq!(dump.tree[0], tree.root());
        assert_eq!(dump.values[0].value, LeafValue(true, 1, "A".into()));

        let json = serde_json::to_value(&dump).unwrap();
        assert!(json.get("leafEncoding").is_some());
        assert!(json["values"][0].get("treeIndex").is_some());
        assert_eq!(json["values"][0]["value"], serde_json::json!([true, 1, "A"]));
    }

    #[test]
    fn test_load_restores_same_proofs() {
        let tree = sample_tree();
        let json = serde_json::to_string(&tree.dump()).unwrap();
        let dump: StandardTreeDump = serde_json::from_str(&json).unwrap();
        let loaded = StandardMerkleTree::load(&dump).unwrap();

        assert_eq!(loaded.root(), tree.root());
        for (i, _) in tree.entries() {
            assert_eq!(loaded.generate_proof(i).unwrap(), tree.generate_proof(i).unwrap());
        }
    }

    #[test]
    fn test_load_rejects_wrong_format_and_encoding() {
        let mut dump = sample_tree().dump();
        dump.format = "simple-v1".into();
        assert!(matches!(
            StandardMerkleTree::load(&dump),
            Err(TreeError::UnknownFormat(_))
        ));

        let mut dump = sample_tree().dump();
        dump.leaf_encoding = vec!["bool".into(), "uint8".into(), "string".into()];
        assert!(matches!(
            StandardMerkleTree::load(&dump),
            Err(TreeError::UnsupportedLeafEncoding(_))
        ));
    }

    #[test]
    fn test_load_rejects_tampered_value() {
        let mut dump = sample_tree().dump();
        // Claim a miss is a hit
        let miss = dump.values.iter_mut().find(|v| !v.value.0).unwrap();
        miss.value.0 = true;
        assert!(matches!(
            StandardMerkleTree::load(&dump),
            Err(TreeError::LeafMismatch { .. })
        ));
    }

    #[test]
    fn test_load_rejects_bad_structure() {
        let mut dump = sample_tree().dump();
        dump.tree.pop();
        assert!(matches!(
            StandardMerkleTree::load(&dump),
            Err(TreeError::InvalidTreeLength { expected: 17, got: 16 })
        ));

        let mut dump = sample_tree().dump();
        dump.values[0].tree_index = 0;
        assert_eq!(StandardMerkleTree::load(&dump).unwrap_err(), TreeError::NotALeaf(0));
    }

    #[test]
    fn test_invalid_leaf_values() {
        assert!(Cell::try_from(&LeafValue(true, 0, "A".into())).is_err());
        assert!(Cell::try_from(&LeafValue(true, 1, "a".into())).is_err());
        assert!(Cell::try_from(&LeafValue(true, 1, "AB".into())).is_err());
        assert_eq!(
            Cell::try_from(&LeafValue(false, 2, "C".into())).unwrap(),
            Cell::new(false, 2, 2)
        );
    }
}
