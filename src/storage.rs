//! JSON File Boundary
//!
//! Board input, commitment output and claim output files. Everything past
//! this module works on validated in-memory data.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::board::grid::Grid;
use crate::config::BoardConfig;
use crate::error::{Error, Result};

/// Parse a `[row][column]` board matrix. Cells may be `0`/`1` or booleans.
pub fn parse_board(json: &str, config: &BoardConfig) -> Result<Grid> {
    let raw: Vec<Vec<Value>> = serde_json::from_str(json)?;
    board_from_values(&raw, config)
}

/// Read and validate a board file.
pub fn read_board(path: &Path, config: &BoardConfig) -> Result<Grid> {
    let raw: Vec<Vec<Value>> = read_json(path)?;
    board_from_values(&raw, config)
}

fn board_from_values(raw: &[Vec<Value>], config: &BoardConfig) -> Result<Grid> {
    let mut matrix = Vec::with_capacity(raw.len());
    for (r, row) in raw.iter().enumerate() {
        let flags = row
            .iter()
            .enumerate()
            .map(|(c, value)| match value {
                Value::Bool(b) => Ok(*b),
                Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
                Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
                other => Err(Error::InvalidCellValue {
                    row: r + 1,
                    column: c,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<bool>>>()?;
        matrix.push(flags);
    }
    Ok(Grid::from_matrix(config, &matrix)?)
}

/// Deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), "read json");
    Ok(value)
}

/// Serialize to a compact JSON file, replacing any existing one.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_err = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush().map_err(io_err)?;

    debug!(path = %path.display(), "wrote json");
    Ok(())
}
