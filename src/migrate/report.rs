//! Migration report: what was copied, derived and cross-referenced.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::taxonomy::Subcategory;

/// Summary of one migrator run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrationReport {
    /// Root of the normalized tree that was written.
    pub category_root: PathBuf,
    /// Per-subcategory outcome, in legacy migration order.
    pub subcategories: Vec<SubcategoryMigration>,
    /// Legacy identifiers mapped to a migrated stem.
    pub identifiers_indexed: usize,
    /// Identifiers seen in more than one legacy JSON file (later file wins).
    pub duplicate_identifiers: usize,
    /// Legacy JSON files that carried no identifier.
    pub files_without_identifier: usize,
    /// Rewritten legacy splits, in `train`, `val`, `test` order.
    pub splits: Vec<SplitRewrite>,
    pub label_map_path: PathBuf,
}

/// Outcome for one legacy category directory.
#[derive(Clone, Debug, Serialize)]
pub struct SubcategoryMigration {
    pub subcategory: Subcategory,
    pub legacy_dir: String,
    /// False when the legacy asset directory was missing and copying was
    /// skipped.
    pub source_found: bool,
    pub images_copied: usize,
    pub json_copied: usize,
    pub copy_failures: usize,
    pub csv_written: usize,
    /// CSVs written with only a header row.
    pub empty_csv: usize,
    pub malformed_json: usize,
    /// Size of the `all` manifest written for this subcategory.
    pub all_manifest_size: usize,
}

impl SubcategoryMigration {
    pub fn new(subcategory: Subcategory, legacy_dir: impl Into<String>) -> Self {
        Self {
            subcategory,
            legacy_dir: legacy_dir.into(),
            source_found: false,
            images_copied: 0,
            json_copied: 0,
            copy_failures: 0,
            csv_written: 0,
            empty_csv: 0,
            malformed_json: 0,
            all_manifest_size: 0,
        }
    }
}

/// Outcome for one legacy split manifest.
#[derive(Clone, Debug, Serialize)]
pub struct SplitRewrite {
    pub split: String,
    /// False when the legacy manifest did not exist.
    pub found: bool,
    pub matched: usize,
    pub unmatched: usize,
    /// Entries written per subcategory manifest.
    pub manifests: BTreeMap<Subcategory, usize>,
}

impl SplitRewrite {
    pub fn missing(split: impl Into<String>) -> Self {
        Self {
            split: split.into(),
            found: false,
            matched: 0,
            unmatched: 0,
            manifests: BTreeMap::new(),
        }
    }
}

impl MigrationReport {
    pub fn total_images_copied(&self) -> usize {
        self.subcategories.iter().map(|s| s.images_copied).sum()
    }

    pub fn total_csv_written(&self) -> usize {
        self.subcategories.iter().map(|s| s.csv_written).sum()
    }

    pub fn total_malformed_json(&self) -> usize {
        self.subcategories.iter().map(|s| s.malformed_json).sum()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migrated into {}", self.category_root.display())?;

        for sub in &self.subcategories {
            if !sub.source_found {
                writeln!(
                    f,
                    "  {}: skipped copy, '{}' not found; {} CSV(s) derived from existing JSON",
                    sub.subcategory, sub.legacy_dir, sub.csv_written
                )?;
                continue;
            }
            writeln!(
                f,
                "  {}: {} image(s), {} JSON, {} CSV ({} empty), {} in all.txt",
                sub.subcategory,
                sub.images_copied,
                sub.json_copied,
                sub.csv_written,
                sub.empty_csv,
                sub.all_manifest_size
            )?;
            if sub.malformed_json > 0 || sub.copy_failures > 0 {
                writeln!(
                    f,
                    "    skipped: {} malformed JSON, {} failed copies",
                    sub.malformed_json, sub.copy_failures
                )?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Indexed {} legacy identifier(s) ({} duplicate, {} file(s) without one)",
            self.identifiers_indexed, self.duplicate_identifiers, self.files_without_identifier
        )?;

        for split in &self.splits {
            if !split.found {
                writeln!(f, "  {}.txt: not found", split.split)?;
                continue;
            }
            writeln!(
                f,
                "  {}.txt: {} matched, {} unmatched",
                split.split, split.matched, split.unmatched
            )?;
            for (sub, count) in &split.manifests {
                writeln!(f, "    {}/sets/{}.txt: {} image(s)", sub, split.split, count)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Label map: {}", self.label_map_path.display())
    }
}
