//! `labelmap.json`: the ordered list of subcategories and their label ids.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Category, CategoryId};
use crate::error::LeafcocoError;
use crate::taxonomy::{Subcategory, SUPERCATEGORY};

/// One label map record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapEntry {
    pub object_id: i64,
    pub label_id: i64,
    pub keyboard_shortcut: String,
    pub object_name: String,
}

impl LabelMapEntry {
    fn for_subcategory(sub: Subcategory) -> Self {
        let id = sub.label_id();
        Self {
            object_id: id,
            label_id: id,
            keyboard_shortcut: id.to_string(),
            object_name: sub.as_str().to_string(),
        }
    }
}

/// Label map for the fixed taxonomy: background first, then ascending label
/// id.
pub fn build_label_map() -> Vec<LabelMapEntry> {
    Subcategory::by_label_id()
        .into_iter()
        .map(LabelMapEntry::for_subcategory)
        .collect()
}

/// Export categories from a label map, skipping background (`object_id` 0).
pub fn categories_from_label_map(entries: &[LabelMapEntry]) -> Vec<Category> {
    entries
        .iter()
        .filter(|entry| entry.object_id > 0)
        .map(|entry| {
            Category::new(
                CategoryId::new(entry.object_id),
                entry.object_name.clone(),
                SUPERCATEGORY,
            )
        })
        .collect()
}

/// Export categories straight from the fixed taxonomy, skipping background.
pub fn categories_from_taxonomy() -> Vec<Category> {
    crate::taxonomy::SCAN_ORDER
        .into_iter()
        .filter(|sub| !sub.is_background())
        .map(|sub| Category::new(sub.category_id(), sub.as_str(), SUPERCATEGORY))
        .collect()
}

pub fn read_label_map(path: &Path) -> Result<Vec<LabelMapEntry>, LeafcocoError> {
    let file = File::open(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LeafcocoError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_label_map(path: &Path, entries: &[LabelMapEntry]) -> Result<(), LeafcocoError> {
    let file = File::create(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, entries).map_err(|source| {
        LeafcocoError::JsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer
        .flush()
        .map_err(|source| LeafcocoError::io_at(path, source))
}
