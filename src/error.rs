//! Crate-level error type.

use std::path::PathBuf;

use crate::board::grid::GridError;
use crate::config::ConfigError;
use crate::proof::claim::ClaimError;
use crate::proof::index::IndexError;
use crate::proof::merkle::TreeError;

/// Any failure from board input to claim output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid board configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Board failed validation.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// Tree build, query or load failed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Proof index failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Canonicalization failed.
    #[error("claim error: {0}")]
    Claim(#[from] ClaimError),

    /// Board file holds something other than 0/1/true/false.
    #[error("row {row}, column {column}: cell value {value} is not 0, 1, true or false")]
    InvalidCellValue {
        /// 1-based row.
        row: usize,
        /// 0-based column.
        column: usize,
        /// Offending JSON value.
        value: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
