//! Per-split export report.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where a split's image set came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// A `sets/{split}.txt` manifest, the first one found in scan order.
    Manifest { path: PathBuf },
    /// No usable manifest: every image of every subcategory.
    AllImages,
}

/// Where the category list came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    LabelMap,
    #[default]
    Taxonomy,
}

/// Summary of one generated export document.
#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    pub split: String,
    /// Set once the document has been written.
    pub output_path: Option<PathBuf>,
    pub image_source: ImageSource,
    pub category_source: CategorySource,
    /// Stems in the resolved image set.
    pub stems: usize,
    pub images: usize,
    pub annotations: usize,
    pub categories: usize,
    /// Stems with no image file in any subcategory.
    pub excluded_stems: usize,
    /// Images whose boxes came from a CSV.
    pub images_with_csv_boxes: usize,
    /// Images given a single whole-image box.
    pub whole_image_boxes: usize,
    /// CSV rows dropped as unparsable or with non-positive extents.
    pub csv_rows_skipped: usize,
    /// CSVs that could not be read at all.
    pub csv_read_failures: usize,
    /// Images whose dimensions fell back to the default size.
    pub probe_fallbacks: usize,
}

impl ExportReport {
    pub fn new(split: impl Into<String>, image_source: ImageSource) -> Self {
        Self {
            split: split.into(),
            output_path: None,
            image_source,
            category_source: CategorySource::default(),
            stems: 0,
            images: 0,
            annotations: 0,
            categories: 0,
            excluded_stems: 0,
            images_with_csv_boxes: 0,
            whole_image_boxes: 0,
            csv_rows_skipped: 0,
            csv_read_failures: 0,
            probe_fallbacks: 0,
        }
    }

    pub fn used_fallback_image_set(&self) -> bool {
        self.image_source == ImageSource::AllImages
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.output_path {
            Some(path) => writeln!(
                f,
                "Generated: {} ({} images, {} annotations)",
                path.display(),
                self.images,
                self.annotations
            )?,
            None => writeln!(
                f,
                "Split {}: {} images, {} annotations (not written)",
                self.split, self.images, self.annotations
            )?,
        }

        match &self.image_source {
            ImageSource::Manifest { path } => {
                writeln!(f, "  image set: {} ({} stems)", path.display(), self.stems)?
            }
            ImageSource::AllImages => writeln!(
                f,
                "  image set: no '{}' manifest, using all {} images",
                self.split, self.stems
            )?,
        }

        let categories_from = match self.category_source {
            CategorySource::LabelMap => "label map",
            CategorySource::Taxonomy => "built-in taxonomy",
        };
        writeln!(f, "  categories: {} from {}", self.categories, categories_from)?;
        writeln!(
            f,
            "  boxes: {} image(s) from CSV, {} whole-image",
            self.images_with_csv_boxes, self.whole_image_boxes
        )?;

        let skipped = [
            (self.excluded_stems, "stem(s) without an image file"),
            (self.csv_rows_skipped, "CSV row(s) skipped"),
            (self.csv_read_failures, "unreadable CSV(s)"),
            (self.probe_fallbacks, "image(s) defaulted to 256x256"),
        ];
        for (count, what) in skipped {
            if count > 0 {
                writeln!(f, "  warning: {} {}", count, what)?;
            }
        }
        Ok(())
    }
}
