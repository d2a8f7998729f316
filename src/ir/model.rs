//! In-memory model of one export document.
//!
//! The exporter builds a [`Dataset`] per split; the COCO writer renders it.
//! Keeping the two apart lets tests inspect what was resolved without going
//! through JSON.

use serde::{Deserialize, Serialize};

use super::bbox::BBoxXYWH;
use super::ids::{AnnotationId, CategoryId, ImageId};

/// Everything that goes into one export document.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub info: DatasetInfo,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

/// Descriptive header of an export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub year: u32,
    pub version: String,
    pub description: String,
    pub url: String,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            year: DatasetInfo::YEAR,
            version: DatasetInfo::VERSION.to_string(),
            description: String::new(),
            url: DatasetInfo::SOURCE_URL.to_string(),
        }
    }
}

impl DatasetInfo {
    pub const YEAR: u32 = 2025;
    pub const VERSION: &'static str = "1.0.0";
    pub const SOURCE_URL: &'static str =
        "https://www.kaggle.com/datasets/abdallahalidev/plantvillage-dataset";

    /// Header for the `split` document of `category`.
    pub fn for_split(category: &str, split: &str) -> Self {
        Self {
            description: format!("Plant Village Grape {} {} split", category, split),
            ..Default::default()
        }
    }
}

/// An image record.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub id: ImageId,
    /// Path relative to the dataset root, namespaced by subcategory.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// A category record.
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        supercategory: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: supercategory.into(),
        }
    }
}

/// A box annotation. The crowd flag is always 0 for this dataset, so it is
/// not stored.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,
    pub bbox: BBoxXYWH,
    /// Synthesized to cover the whole image; written with integer pixels.
    pub whole_image: bool,
}

impl Annotation {
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        bbox: BBoxXYWH,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            category_id: category_id.into(),
            bbox,
            whole_image: false,
        }
    }

    /// A box covering the whole `width` x `height` image.
    pub fn whole_image(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            whole_image: true,
            ..Self::new(id, image_id, category_id, BBoxXYWH::whole_image(width, height))
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.bbox.area()
    }
}
