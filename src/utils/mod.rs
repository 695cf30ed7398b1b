//! Utilities (source file reading, unicode helpers).

use std::fs;
use std::path::Path;
use anyhow::{bail, Result};

pub mod unicode;

/// Read a source file for one-shot execution.
pub fn read_source_file(file_path: &str) -> Result<String> {
    let path = Path::new(file_path);

    if !path.exists() {
        bail!("Source file '{}' does not exist", file_path);
    }

    if !path.is_file() {
        bail!("'{}' is not a file", file_path);
    }

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", file_path, e))
}
