//! Path contract of the normalized dataset tree.
//!
//! ```text
//! {root}/{category}/labelmap.json
//! {root}/{category}/{subcategory}/images/{stem}.{ext}
//! {root}/{category}/{subcategory}/json/{stem}.json
//! {root}/{category}/{subcategory}/csv/{stem}.csv
//! {root}/{category}/{subcategory}/sets/{split}.txt
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::taxonomy::{
    first_match, strip_any_extension, Subcategory, RESOLVE_EXTENSIONS, SCAN_ORDER,
};

const LABELMAP_FILE: &str = "labelmap.json";
const IMAGES_DIR: &str = "images";
const JSON_DIR: &str = "json";
const CSV_DIR: &str = "csv";
const SETS_DIR: &str = "sets";

/// A normalized tree for one top-level category (e.g. `grapes`).
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    category: String,
    category_root: PathBuf,
}

/// Where a stem was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatedImage {
    pub subcategory: Subcategory,
    pub path: PathBuf,
    /// File name including the extension variant that matched.
    pub file_name: String,
}

impl DatasetLayout {
    pub fn new(root: &Path, category: impl Into<String>) -> Self {
        let category = category.into();
        let category_root = root.join(&category);
        Self {
            category,
            category_root,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn category_root(&self) -> &Path {
        &self.category_root
    }

    pub fn labelmap_path(&self) -> PathBuf {
        self.category_root.join(LABELMAP_FILE)
    }

    pub fn subcategory_dir(&self, sub: Subcategory) -> PathBuf {
        self.category_root.join(sub.as_str())
    }

    pub fn images_dir(&self, sub: Subcategory) -> PathBuf {
        self.subcategory_dir(sub).join(IMAGES_DIR)
    }

    pub fn json_dir(&self, sub: Subcategory) -> PathBuf {
        self.subcategory_dir(sub).join(JSON_DIR)
    }

    pub fn csv_dir(&self, sub: Subcategory) -> PathBuf {
        self.subcategory_dir(sub).join(CSV_DIR)
    }

    pub fn sets_dir(&self, sub: Subcategory) -> PathBuf {
        self.subcategory_dir(sub).join(SETS_DIR)
    }

    pub fn csv_path(&self, sub: Subcategory, stem: &str) -> PathBuf {
        self.csv_dir(sub).join(format!("{stem}.csv"))
    }

    pub fn split_path(&self, sub: Subcategory, split: &str) -> PathBuf {
        self.sets_dir(sub).join(format!("{split}.txt"))
    }

    /// Finds the first subcategory (scan order) holding `{stem}{ext}` for
    /// the first extension variant (resolve order) that exists.
    pub fn locate_image(&self, stem: &str) -> Option<LocatedImage> {
        first_match(SCAN_ORDER, |sub| {
            let images_dir = self.images_dir(sub);
            first_match(RESOLVE_EXTENSIONS, |ext| {
                let file_name = format!("{stem}{ext}");
                let path = images_dir.join(&file_name);
                path.is_file().then(|| LocatedImage {
                    subcategory: sub,
                    path,
                    file_name,
                })
            })
        })
    }

    /// Dataset-relative file name recorded in the export document.
    pub fn export_file_name(&self, located: &LocatedImage) -> String {
        format!(
            "{}/{}/{}/{}",
            self.category, located.subcategory, IMAGES_DIR, located.file_name
        )
    }
}

/// Lists the regular files directly inside `dir`, sorted by name.
///
/// A missing directory yields an empty list. Unreadable entries are logged
/// and skipped.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => warn!(dir = %dir.display(), "skipping unreadable entry: {err}"),
        }
    }
    files
}

/// Stems of the files in `dir` whose names end with one of `extensions`.
pub fn collect_stems(dir: &Path, extensions: &[&str]) -> BTreeSet<String> {
    list_files(dir)
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .filter_map(|name| strip_any_extension(name, extensions))
        .map(str::to_string)
        .collect()
}
