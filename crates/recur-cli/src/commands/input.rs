//! Reading occurrence pools from files or stdin.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use recur_core::Occurrence;

/// Reads a JSON array of occurrences from `path`, or from stdin when `path` is `-`.
pub fn read_occurrences(path: &Path) -> Result<Vec<Occurrence>> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        return parse_occurrences(stdin.lock()).context("failed to read occurrences from stdin");
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_occurrences(file).with_context(|| format!("failed to read occurrences from {}", path.display()))
}

/// Parses a JSON array of occurrences. One malformed occurrence rejects the whole array.
pub fn parse_occurrences<R: Read>(mut reader: R) -> Result<Vec<Occurrence>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let occurrences: Vec<Occurrence> =
        serde_json::from_str(&text).context("invalid occurrence list")?;
    tracing::debug!(count = occurrences.len(), "read occurrences");
    Ok(occurrences)
}
