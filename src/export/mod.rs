//! Split-aware COCO export of a normalized tree.
//!
//! For each requested split the exporter
//!
//! 1. resolves the image set: the first `sets/{split}.txt` found in scan
//!    order, or, when there is none (or it is empty), every image of every
//!    subcategory;
//! 2. walks the stems in lexicographic order, locating each image file and
//!    its owning subcategory;
//! 3. takes boxes from `csv/{stem}.csv` when it yields at least one valid
//!    box, and otherwise emits a single whole-image box labelled with the
//!    subcategory;
//! 4. writes `{category}_instances_{split}.json`.
//!
//! Missing or malformed inputs degrade the document; they never abort it.
//! Image and annotation ids are assigned in that walk order and are only
//! meant to be unique within one document.

pub mod report;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::LeafcocoError;
use crate::ir::io_box_csv::{read_box_csv, CsvBox};
use crate::ir::io_coco_json::write_coco_json;
use crate::ir::io_labelmap::{categories_from_label_map, categories_from_taxonomy, read_label_map};
use crate::ir::io_split::read_split_list;
use crate::ir::layout::collect_stems;
use crate::ir::probe::{read_image_dimensions, DEFAULT_IMAGE_SIZE};
use crate::ir::{
    Annotation, AnnotationId, Category, Dataset, DatasetInfo, DatasetLayout, IdSequence,
    Image, ImageId, LocatedImage,
};
use crate::taxonomy::{first_match, DISCOVERY_EXTENSIONS, SCAN_ORDER};

pub use report::{CategorySource, ExportReport, ImageSource};

/// Inputs of an export run.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Directory containing `{category}/`.
    pub dataset_root: PathBuf,
    /// Directory the export documents are written to.
    pub output_dir: PathBuf,
    /// Top-level category name, e.g. `grapes`.
    pub category: String,
    /// Splits to export, each producing one document.
    pub splits: Vec<String>,
}

/// File name of the document for `split`.
pub fn output_file_name(category: &str, split: &str) -> String {
    format!("{category}_instances_{split}.json")
}

/// Exports every requested split. Splits are independent; each report
/// describes one written document.
pub fn export(options: &ExportOptions) -> Result<Vec<ExportReport>, LeafcocoError> {
    fs::create_dir_all(&options.output_dir)
        .map_err(|source| LeafcocoError::io_at(&options.output_dir, source))?;

    let layout = DatasetLayout::new(&options.dataset_root, options.category.as_str());
    if !layout.category_root().is_dir() {
        warn!(
            path = %layout.category_root().display(),
            "category directory does not exist, documents will be empty"
        );
    }

    options
        .splits
        .iter()
        .map(|split| {
            let path = options
                .output_dir
                .join(output_file_name(layout.category(), split));
            export_split(&layout, split, &path)
        })
        .collect()
}

/// Builds and writes the document for one split.
pub fn export_split(
    layout: &DatasetLayout,
    split: &str,
    path: &Path,
) -> Result<ExportReport, LeafcocoError> {
    let (dataset, mut report) = build_split(layout, split);
    write_coco_json(path, &dataset)?;
    report.output_path = Some(path.to_path_buf());
    info!(
        split,
        path = %path.display(),
        images = report.images,
        annotations = report.annotations,
        "wrote export document"
    );
    Ok(report)
}

/// Resolves one split into an in-memory document without writing it.
pub fn build_split(layout: &DatasetLayout, split: &str) -> (Dataset, ExportReport) {
    let (stems, image_source) = resolve_image_set(layout, split);
    let mut report = ExportReport::new(split, image_source);
    report.stems = stems.len();

    let (categories, category_source) = resolve_categories(layout);
    report.category_source = category_source;

    let mut dataset = Dataset {
        info: DatasetInfo::for_split(layout.category(), split),
        categories,
        ..Default::default()
    };
    let mut image_ids = IdSequence::new();
    let mut annotation_ids = IdSequence::new();

    for stem in &stems {
        let Some(located) = layout.locate_image(stem) else {
            debug!(split, stem = stem.as_str(), "no image file for stem, excluding");
            report.excluded_stems += 1;
            continue;
        };

        let (width, height) = probe_dimensions(&located, &mut report);
        let image_id: ImageId = image_ids.next_id();
        dataset.images.push(Image::new(
            image_id,
            layout.export_file_name(&located),
            width,
            height,
        ));

        let boxes = csv_boxes(layout, &located, stem, &mut report);
        if boxes.is_empty() {
            let annotation_id: AnnotationId = annotation_ids.next_id();
            dataset.annotations.push(Annotation::whole_image(
                annotation_id,
                image_id,
                located.subcategory.category_id(),
                width,
                height,
            ));
            report.whole_image_boxes += 1;
        } else {
            for csv_box in boxes {
                let annotation_id: AnnotationId = annotation_ids.next_id();
                dataset.annotations.push(Annotation::new(
                    annotation_id,
                    image_id,
                    csv_box.category_id,
                    csv_box.bbox,
                ));
            }
            report.images_with_csv_boxes += 1;
        }
    }

    report.images = dataset.images.len();
    report.annotations = dataset.annotations.len();
    report.categories = dataset.categories.len();
    (dataset, report)
}

/// The stems a split covers, and where they came from.
fn resolve_image_set(layout: &DatasetLayout, split: &str) -> (BTreeSet<String>, ImageSource) {
    let manifest = first_match(SCAN_ORDER, |sub| {
        let path = layout.split_path(sub, split);
        path.is_file().then_some(path)
    });

    if let Some(path) = manifest {
        match read_split_list(&path) {
            Ok(entries) if !entries.is_empty() => {
                debug!(split, path = %path.display(), "using split manifest");
                return (entries.into_iter().collect(), ImageSource::Manifest { path });
            }
            Ok(_) => warn!(path = %path.display(), "split manifest is empty"),
            Err(err) => warn!("unreadable split manifest: {err}"),
        }
    }

    warn!(split, "no usable split manifest, falling back to all images");
    let stems = SCAN_ORDER
        .into_iter()
        .flat_map(|sub| collect_stems(&layout.images_dir(sub), &DISCOVERY_EXTENSIONS))
        .collect();
    (stems, ImageSource::AllImages)
}

/// Categories from the label map, or from the built-in taxonomy when the
/// label map is absent or unreadable.
fn resolve_categories(layout: &DatasetLayout) -> (Vec<Category>, CategorySource) {
    let path = layout.labelmap_path();
    if path.is_file() {
        match read_label_map(&path) {
            Ok(entries) => {
                return (
                    categories_from_label_map(&entries),
                    CategorySource::LabelMap,
                )
            }
            Err(err) => warn!("ignoring unreadable label map: {err}"),
        }
    }
    (categories_from_taxonomy(), CategorySource::Taxonomy)
}

fn probe_dimensions(located: &LocatedImage, report: &mut ExportReport) -> (u32, u32) {
    match read_image_dimensions(&located.path) {
        Ok(dims) => dims,
        Err(err) => {
            warn!("using default image size: {err}");
            report.probe_fallbacks += 1;
            DEFAULT_IMAGE_SIZE
        }
    }
}

/// Valid boxes from the stem's CSV. Empty when the CSV is absent,
/// unreadable, or has no valid rows.
fn csv_boxes(
    layout: &DatasetLayout,
    located: &LocatedImage,
    stem: &str,
    report: &mut ExportReport,
) -> Vec<CsvBox> {
    let path = layout.csv_path(located.subcategory, stem);
    if !path.is_file() {
        return Vec::new();
    }

    match read_box_csv(&path) {
        Ok(parsed) => {
            let skipped = parsed.unparsable_rows + parsed.degenerate_rows;
            if skipped > 0 {
                debug!(path = %path.display(), skipped, "skipped CSV rows");
                report.csv_rows_skipped += skipped;
            }
            parsed.boxes
        }
        Err(err) => {
            warn!("ignoring unreadable box CSV: {err}");
            report.csv_read_failures += 1;
            Vec::new()
        }
    }
}
