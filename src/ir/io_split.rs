//! Newline-delimited split manifests.
//!
//! A manifest lists one entry per line: stems in the normalized tree, legacy
//! identifiers in the raw split directory. Surrounding whitespace is trimmed
//! and blank lines are ignored.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::LeafcocoError;

/// Parses manifest text into entries, in file order.
pub fn parse_split_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a manifest file.
pub fn read_split_list(path: &Path) -> Result<Vec<String>, LeafcocoError> {
    let text = fs::read_to_string(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    Ok(parse_split_list(&text))
}

/// Writes entries one per line, each newline-terminated, creating the parent
/// directory if needed.
pub fn write_split_list<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a str>,
) -> Result<(), LeafcocoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| LeafcocoError::io_at(parent, source))?;
    }
    let file = fs::File::create(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        writeln!(writer, "{entry}").map_err(|source| LeafcocoError::io_at(path, source))?;
    }
    writer
        .flush()
        .map_err(|source| LeafcocoError::io_at(path, source))
}
