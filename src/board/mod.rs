//! Board input model.
//!
//! Cells, their canonical leaf encoding, and the validated grid.

pub mod cell;
pub mod grid;

pub use cell::{Cell, LEAF_ENCODING};
pub use grid::{Grid, GridError};
