//! Parser module: line-oriented Swift declaration scanning.

pub mod braces;
pub mod docblock;
pub mod members;
pub mod signatures;
pub mod swift;

use crate::error::{Error, Result};
use crate::model::Declaration;
use std::fs;
use std::path::Path;

/// Read and index a single `.swift` file.
pub fn parse_file(path: &Path) -> Result<Vec<Declaration>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(swift::parse(&content, path))
}
