//! Reader for the legacy per-image annotation JSON.
//!
//! Each legacy file describes one photograph:
//!
//! ```json
//! {
//!   "images": [{"pvc_filename": "0a1b...JPG", "width": 256, "height": 256}],
//!   "annotations": [{"bbox": [x, y, w, h], "category_id": 7}]
//! }
//! ```
//!
//! Only `images[0].pvc_filename` and each annotation's `bbox` matter here.
//! The legacy per-annotation category is ignored: the owning subcategory
//! decides the label.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::BBoxXYWH;
use crate::error::LeafcocoError;

/// A parsed legacy annotation file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyRecord {
    #[serde(default)]
    pub images: Vec<LegacyImage>,
    #[serde(default)]
    pub annotations: Vec<LegacyAnnotation>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyImage {
    #[serde(default)]
    pub pvc_filename: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyAnnotation {
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

impl LegacyRecord {
    /// The legacy identifier, taken from the first image entry. Empty
    /// identifiers count as absent.
    pub fn pvc_filename(&self) -> Option<&str> {
        self.images
            .first()
            .and_then(|image| image.pvc_filename.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Boxes in annotation order; an annotation without a `bbox` becomes an
    /// all-zero box.
    pub fn boxes(&self) -> impl Iterator<Item = BBoxXYWH> + '_ {
        self.annotations
            .iter()
            .map(|ann| BBoxXYWH::from(ann.bbox.unwrap_or_default()))
    }
}

/// Reads a legacy annotation file.
pub fn read_legacy_json(path: &Path) -> Result<LegacyRecord, LeafcocoError> {
    let file = File::open(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LeafcocoError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a legacy annotation document from bytes.
pub fn from_legacy_slice(bytes: &[u8]) -> Result<LegacyRecord, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Fuzz-only entrypoint for legacy JSON parsing. Walks the identifier and
/// every box of a parsed record.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_legacy_json(bytes: &[u8]) -> Result<(), LeafcocoError> {
    let record = from_legacy_slice(bytes).map_err(|source| LeafcocoError::JsonParse {
        path: Path::new("<fuzz>").to_path_buf(),
        source,
    })?;
    let _ = record.pvc_filename();
    let _ = record.boxes().count();
    Ok(())
}
