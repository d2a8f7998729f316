//! The fixed grape-leaf taxonomy.
//!
//! Every subcategory, its label id and the legacy directory it was shipped in
//! is static configuration. Nothing here is inferred from the data on disk.
//!
//! The ordered lists in this module are tie-break contracts: whenever more
//! than one candidate could satisfy a lookup (which subcategory owns a stem,
//! which extension variant exists, which CSV alias is present), the first
//! candidate in list order wins. [`first_match`] is the single reducer used
//! for all of those scans.

use std::fmt;

use serde::Serialize;

use crate::ir::CategoryId;

/// One disease class, or the leafless background class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcategory {
    Healthy,
    BlackRot,
    Esca,
    LeafBlight,
    Background,
}

/// Order in which subcategory directories are scanned when looking up split
/// manifests or resolving a stem to its owning subcategory.
pub const SCAN_ORDER: [Subcategory; 5] = [
    Subcategory::Healthy,
    Subcategory::BlackRot,
    Subcategory::Esca,
    Subcategory::LeafBlight,
    Subcategory::Background,
];

/// Legacy directory name to subcategory, in migration order.
pub const LEGACY_DIRECTORIES: [(&str, Subcategory); 5] = [
    ("Grape___healthy", Subcategory::Healthy),
    ("Grape___Black_rot", Subcategory::BlackRot),
    ("Grape___Esca_(Black_Measles)", Subcategory::Esca),
    (
        "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
        Subcategory::LeafBlight,
    ),
    ("Background_without_leaves", Subcategory::Background),
];

/// Extensions that count as images when a directory is enumerated without a
/// split manifest. Matching is case-sensitive.
pub const DISCOVERY_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".JPG", ".bmp"];

/// Extension variants probed, in order, when resolving a stem to a file.
pub const RESOLVE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".JPG", ".PNG", ".bmp", ".BMP"];

/// Image extensions copied out of a legacy category directory.
pub const LEGACY_IMAGE_EXTENSIONS: [&str; 2] = [".JPG", ".jpg"];

/// Extension of the legacy per-image annotation files.
pub const LEGACY_JSON_EXTENSION: &str = ".json";

/// Sub-location inside each legacy category directory holding the raw assets.
pub const LEGACY_ASSET_SUBDIR: &str = "without_augmentation";

/// Directory under the legacy root holding the flat split manifests.
pub const LEGACY_SPLIT_DIR: &str = "all";

/// Legacy split manifests rewritten by the migrator.
pub const LEGACY_SPLITS: [&str; 3] = ["train", "val", "test"];

/// Name of the split that lists every migrated image.
pub const ALL_SPLIT: &str = "all";

/// Supercategory reported for every exported category.
pub const SUPERCATEGORY: &str = "grape";

impl Subcategory {
    /// Fixed label id. Background is 0, disease classes are 1..=4.
    pub const fn label_id(self) -> i64 {
        match self {
            Subcategory::Background => 0,
            Subcategory::Healthy => 1,
            Subcategory::BlackRot => 2,
            Subcategory::Esca => 3,
            Subcategory::LeafBlight => 4,
        }
    }

    /// Label id as a category id for annotations.
    pub fn category_id(self) -> CategoryId {
        CategoryId::new(self.label_id())
    }

    /// Directory name in the normalized tree, also the category name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Subcategory::Healthy => "healthy",
            Subcategory::BlackRot => "black_rot",
            Subcategory::Esca => "esca",
            Subcategory::LeafBlight => "leaf_blight",
            Subcategory::Background => "background",
        }
    }

    pub fn is_background(self) -> bool {
        self.label_id() == 0
    }

    /// All subcategories ordered by ascending label id (background first).
    pub fn by_label_id() -> Vec<Subcategory> {
        let mut all = SCAN_ORDER.to_vec();
        all.sort_by_key(|s| s.label_id());
        all
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the result for the first candidate, in iteration order, that
/// `probe` accepts.
pub fn first_match<T, U>(
    candidates: impl IntoIterator<Item = T>,
    probe: impl FnMut(T) -> Option<U>,
) -> Option<U> {
    candidates.into_iter().find_map(probe)
}

/// Returns the file stem when `file_name` ends with one of `extensions`
/// (case-sensitive), and the stem is non-empty.
pub fn strip_any_extension<'a>(file_name: &'a str, extensions: &[&str]) -> Option<&'a str> {
    first_match(extensions.iter(), |ext| {
        file_name
            .strip_suffix(*ext)
            .filter(|stem| !stem.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_ids_are_fixed() {
        assert_eq!(Subcategory::Background.label_id(), 0);
        assert_eq!(Subcategory::Healthy.label_id(), 1);
        assert_eq!(Subcategory::BlackRot.label_id(), 2);
        assert_eq!(Subcategory::Esca.label_id(), 3);
        assert_eq!(Subcategory::LeafBlight.label_id(), 4);
    }

    #[test]
    fn by_label_id_puts_background_first() {
        let ordered = Subcategory::by_label_id();
        assert_eq!(ordered[0], Subcategory::Background);
        let ids: Vec<i64> = ordered.iter().map(|s| s.label_id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn every_subcategory_has_one_legacy_directory() {
        for sub in SCAN_ORDER {
            let count = LEGACY_DIRECTORIES
                .iter()
                .filter(|(_, legacy_sub)| *legacy_sub == sub)
                .count();
            assert_eq!(count, 1, "{sub}");
        }
    }

    #[test]
    fn first_match_respects_candidate_order() {
        let found = first_match(["b", "a", "c"], |c| (c != "b").then(|| c.to_uppercase()));
        assert_eq!(found.as_deref(), Some("A"));
        assert_eq!(first_match(Vec::<u8>::new(), Some), None);
    }

    #[test]
    fn strip_extension_is_case_sensitive() {
        assert_eq!(
            strip_any_extension("leaf.JPG", &DISCOVERY_EXTENSIONS),
            Some("leaf")
        );
        assert_eq!(strip_any_extension("leaf.PNG", &DISCOVERY_EXTENSIONS), None);
        assert_eq!(strip_any_extension(".jpg", &DISCOVERY_EXTENSIONS), None);
    }
}
