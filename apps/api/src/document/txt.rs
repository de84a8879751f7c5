use std::path::Path;

use crate::document::ExtractError;

/// Loads a plain-text file as a single UTF-8 unit.
pub fn load(path: &Path) -> Result<Vec<String>, ExtractError> {
    Ok(vec![std::fs::read_to_string(path)?])
}
