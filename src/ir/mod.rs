//! Data model and on-disk codecs for the grape leaf dataset.
//!
//! The model mirrors one COCO instances document: images, box annotations
//! and categories with typed ids. The `io_*` modules read and write the
//! files of the normalized tree (box CSVs, label map, split manifests,
//! legacy JSON) and the final export document; [`layout`] owns the path
//! contract that ties them together.
//!
//! # Example
//!
//! ```
//! use leafcoco::ir::{Annotation, Category, Dataset, DatasetInfo, Image};
//!
//! let dataset = Dataset {
//!     info: DatasetInfo::for_split("grapes", "train"),
//!     images: vec![Image::new(1u64, "grapes/healthy/images/a.jpg", 256, 256)],
//!     annotations: vec![Annotation::whole_image(1u64, 1u64, 1i64, 256, 256)],
//!     categories: vec![Category::new(1i64, "healthy", "grape")],
//! };
//! assert_eq!(dataset.annotations[0].area(), 65536.0);
//! ```

mod bbox;
mod ids;
pub mod io_box_csv;
pub mod io_coco_json;
pub mod io_labelmap;
pub mod io_legacy_json;
pub mod io_split;
pub mod layout;
mod model;
pub mod probe;

// Re-export core types for convenient access
pub use bbox::BBoxXYWH;
pub use ids::{AnnotationId, CategoryId, IdSequence, ImageId};
pub use layout::{DatasetLayout, LocatedImage};
pub use model::{Annotation, Category, Dataset, DatasetInfo, Image};
