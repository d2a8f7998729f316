//! COCO instances JSON writer.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "info": {"year": 2025, "version": "1.0.0", "description": "...", "url": "..."},
//!   "images": [{"id": 1, "file_name": "grapes/healthy/images/a.jpg", "width": 256, "height": 256}],
//!   "annotations": [{"id": 1, "image_id": 1, "category_id": 1, "bbox": [0, 0, 256, 256], "area": 65536, "iscrowd": 0}],
//!   "categories": [{"id": 1, "name": "healthy", "supercategory": "grape"}],
//!   "licenses": []
//! }
//! ```
//!
//! Bounding boxes are `[x, y, width, height]` in absolute pixels with the
//! origin at the top-left corner. Boxes read from CSVs are written as floats;
//! synthesized whole-image boxes and their areas are written as integers.
//!
//! # Deterministic Output
//!
//! Lists are written in the order the exporter built them (sorted stems,
//! then CSV row order), so an unchanged tree renders byte-identical output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, DatasetInfo};
use crate::error::LeafcocoError;

// ============================================================================
// COCO Schema Types
// ============================================================================

/// Top-level export document. Field order is the serialized key order.
#[derive(Debug, Serialize, Deserialize)]
pub struct CocoDocument {
    pub info: DatasetInfo,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
    pub categories: Vec<CocoCategory>,
    #[serde(default)]
    pub licenses: Vec<serde_json::Value>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: i64,
    /// `[x, y, width, height]`, top-left origin.
    pub bbox: [CocoNumber; 4],
    pub area: CocoNumber,
    pub iscrowd: u8,
}

/// A JSON number kept in the form it is written: `256` or `256.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CocoNumber {
    Int(i64),
    Float(f64),
}

impl CocoNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            CocoNumber::Int(v) => v as f64,
            CocoNumber::Float(v) => v,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: i64,
    pub name: String,
    pub supercategory: String,
}

// ============================================================================
// Public API
// ============================================================================

/// Writes an export document to `path`, replacing any existing file.
pub fn write_coco_json(path: &Path, dataset: &Dataset) -> Result<(), LeafcocoError> {
    let file = File::create(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_coco_document(dataset)).map_err(|source| {
        LeafcocoError::JsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer
        .flush()
        .map_err(|source| LeafcocoError::io_at(path, source))
}

/// Renders an export document to a string.
///
/// Useful for testing without file I/O.
pub fn to_coco_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_coco_document(dataset))
}

/// Parses an export document previously written by this module.
pub fn from_coco_str(json: &str) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Conversion: model -> COCO
// ============================================================================

fn to_coco_document(dataset: &Dataset) -> CocoDocument {
    let images = dataset
        .images
        .iter()
        .map(|img| CocoImage {
            id: img.id.as_u64(),
            file_name: img.file_name.clone(),
            width: img.width,
            height: img.height,
        })
        .collect();

    let annotations = dataset
        .annotations
        .iter()
        .map(|ann| CocoAnnotation {
            id: ann.id.as_u64(),
            image_id: ann.image_id.as_u64(),
            category_id: ann.category_id.as_i64(),
            bbox: ann.bbox.to_array().map(|v| coco_number(v, ann.whole_image)),
            area: coco_number(ann.area(), ann.whole_image),
            iscrowd: 0,
        })
        .collect();

    let categories = dataset
        .categories
        .iter()
        .map(|cat| CocoCategory {
            id: cat.id.as_i64(),
            name: cat.name.clone(),
            supercategory: cat.supercategory.clone(),
        })
        .collect();

    CocoDocument {
        info: dataset.info.clone(),
        images,
        annotations,
        categories,
        licenses: Vec::new(),
    }
}

/// Whole-image values are whole pixel counts read from `u32` dimensions, so
/// the integer conversion is exact.
fn coco_number(value: f64, integral: bool) -> CocoNumber {
    if integral {
        CocoNumber::Int(value as i64)
    } else {
        CocoNumber::Float(value)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Annotation, BBoxXYWH, Category, Image};

    fn sample_dataset() -> Dataset {
        Dataset {
            info: DatasetInfo::for_split("grapes", "train"),
            images: vec![Image::new(1u64, "grapes/esca/images/a.jpg", 200, 100)],
            annotations: vec![Annotation::new(
                1u64,
                1u64,
                3i64,
                BBoxXYWH::new(10.0, 20.0, 30.0, 40.0),
            )],
            categories: vec![Category::new(3i64, "esca", "grape")],
        }
    }

    #[test]
    fn test_document_shape() {
        let json = to_coco_string(&sample_dataset()).expect("serialize failed");
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["info"]["year"], 2025);
        assert_eq!(parsed["info"]["version"], "1.0.0");
        assert_eq!(
            parsed["info"]["description"],
            "Plant Village Grape grapes train split"
        );
        assert_eq!(parsed["images"][0]["file_name"], "grapes/esca/images/a.jpg");
        assert_eq!(parsed["annotations"][0]["bbox"][2], 30.0);
        assert_eq!(parsed["annotations"][0]["area"], 1200.0);
        assert_eq!(parsed["annotations"][0]["iscrowd"], 0);
        assert_eq!(parsed["categories"][0]["supercategory"], "grape");
        assert_eq!(parsed["licenses"], serde_json::json!([]));
    }

    #[test]
    fn test_whole_image_box_is_written_as_integers() {
        let mut dataset = sample_dataset();
        dataset.annotations = vec![Annotation::whole_image(1u64, 1u64, 3i64, 200, 100)];
        let json = to_coco_string(&dataset).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["annotations"][0]["bbox"], serde_json::json!([0, 0, 200, 100]));
        assert_eq!(parsed["annotations"][0]["area"], serde_json::json!(20000));
        assert!(json.contains("\"area\": 20000,"));

        let doc = from_coco_str(&json).unwrap();
        assert_eq!(doc.annotations[0].area, CocoNumber::Int(20000));
        assert_eq!(doc.annotations[0].bbox[2].as_f64(), 200.0);
    }

    #[test]
    fn test_negative_category_id_is_written() {
        let mut dataset = sample_dataset();
        dataset.annotations[0].category_id = crate::ir::CategoryId::new(-1);
        let parsed: serde_json::Value =
            serde_json::from_str(&to_coco_string(&dataset).unwrap()).unwrap();
        assert_eq!(parsed["annotations"][0]["category_id"], -1);
    }

    #[test]
    fn test_top_level_key_order() {
        let json = to_coco_string(&sample_dataset()).unwrap();
        let keys = [
            "\"info\"",
            "\"images\"",
            "\"annotations\"",
            "\"categories\"",
            "\"licenses\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|key| json.find(key).expect("key present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_dataset_is_well_formed() {
        let dataset = Dataset {
            info: DatasetInfo::for_split("grapes", "test"),
            ..Default::default()
        };
        let doc = from_coco_str(&to_coco_string(&dataset).unwrap()).unwrap();
        assert!(doc.images.is_empty());
        assert!(doc.annotations.is_empty());
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn test_write_is_byte_stable() {
        let temp = tempfile::tempdir().unwrap();
        let a = temp.path().join("a.json");
        let b = temp.path().join("b.json");
        write_coco_json(&a, &sample_dataset()).unwrap();
        write_coco_json(&b, &sample_dataset()).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }
}
