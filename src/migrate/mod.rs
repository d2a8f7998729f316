//! Legacy-to-normalized migration.
//!
//! Reads the legacy PlantVillage grape layout
//!
//! ```text
//! {legacy_root}/Grape___healthy/without_augmentation/{file}.JPG + {file}.json
//! ...
//! {legacy_root}/all/{train,val,test}.txt     (legacy identifiers)
//! ```
//!
//! and produces the normalized tree described in [`crate::ir::layout`]:
//! copied images and JSON, one derived box CSV per JSON, a label map, and
//! per-subcategory split manifests.
//!
//! Every derived artifact is rewritten on each run. Files left over from a
//! previous run are never deleted. Bad inputs are logged and skipped at file
//! granularity; only failures to create the output tree or write the label
//! map abort the run.

pub mod report;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::LeafcocoError;
use crate::ir::io_box_csv::{write_box_csv, BoxCsvRow};
use crate::ir::io_labelmap::{build_label_map, write_label_map};
use crate::ir::io_legacy_json::read_legacy_json;
use crate::ir::io_split::{read_split_list, write_split_list};
use crate::ir::layout::{collect_stems, list_files};
use crate::ir::DatasetLayout;
use crate::taxonomy::{
    strip_any_extension, Subcategory, ALL_SPLIT, LEGACY_ASSET_SUBDIR, LEGACY_DIRECTORIES,
    LEGACY_IMAGE_EXTENSIONS, LEGACY_JSON_EXTENSION, LEGACY_SPLITS, LEGACY_SPLIT_DIR,
    RESOLVE_EXTENSIONS, SCAN_ORDER,
};

pub use report::{MigrationReport, SplitRewrite, SubcategoryMigration};

/// Inputs of a migration run.
#[derive(Clone, Debug)]
pub struct MigrateOptions {
    /// Directory holding the legacy category directories and `all/`.
    pub legacy_root: PathBuf,
    /// Directory under which `{category}/` is created.
    pub output_root: PathBuf,
    /// Top-level category name, e.g. `grapes`.
    pub category: String,
}

/// Legacy identifier to the migrated file it now lives in.
type IdentifierIndex = HashMap<String, (Subcategory, String)>;

/// Runs the full migration.
pub fn migrate(options: &MigrateOptions) -> Result<MigrationReport, LeafcocoError> {
    let layout = DatasetLayout::new(&options.output_root, options.category.as_str());
    fs::create_dir_all(layout.category_root())
        .map_err(|source| LeafcocoError::io_at(layout.category_root(), source))?;

    let mut report = MigrationReport {
        category_root: layout.category_root().to_path_buf(),
        label_map_path: layout.labelmap_path(),
        ..Default::default()
    };
    let mut index = IdentifierIndex::new();

    for (legacy_dir, sub) in LEGACY_DIRECTORIES {
        info!(legacy = legacy_dir, subcategory = %sub, "migrating category");
        let mut stats = SubcategoryMigration::new(sub, legacy_dir);

        let source = options.legacy_root.join(legacy_dir).join(LEGACY_ASSET_SUBDIR);
        if source.is_dir() {
            stats.source_found = true;
            copy_assets(&source, &layout, sub, &mut stats)?;
        } else {
            warn!(path = %source.display(), "legacy asset directory does not exist, skipping copy");
        }

        derive_csvs(&layout, sub, &mut stats, &mut index, &mut report)?;
        report.subcategories.push(stats);
    }

    write_label_map(&layout.labelmap_path(), &build_label_map())?;
    info!(path = %layout.labelmap_path().display(), "wrote label map");

    report.identifiers_indexed = index.len();
    info!(identifiers = index.len(), "indexed legacy identifiers");

    let split_dir = options.legacy_root.join(LEGACY_SPLIT_DIR);
    for split in LEGACY_SPLITS {
        report
            .splits
            .push(rewrite_split(&split_dir, split, &index, &layout));
    }

    for stats in &mut report.subcategories {
        stats.all_manifest_size = write_all_manifest(&layout, stats.subcategory)?;
    }

    Ok(report)
}

/// Copies images into `images/` and legacy JSON into `json/`.
fn copy_assets(
    source: &Path,
    layout: &DatasetLayout,
    sub: Subcategory,
    stats: &mut SubcategoryMigration,
) -> Result<(), LeafcocoError> {
    let images_dir = layout.images_dir(sub);
    let json_dir = layout.json_dir(sub);
    for dir in [&images_dir, &json_dir] {
        fs::create_dir_all(dir).map_err(|source| LeafcocoError::io_at(dir, source))?;
    }

    for path in list_files(source) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let (dest_dir, counter) = if strip_any_extension(name, &LEGACY_IMAGE_EXTENSIONS).is_some() {
            (&images_dir, &mut stats.images_copied)
        } else if strip_any_extension(name, &[LEGACY_JSON_EXTENSION]).is_some() {
            (&json_dir, &mut stats.json_copied)
        } else {
            continue;
        };

        match copy_asset(&path, &dest_dir.join(name)) {
            Ok(()) => *counter += 1,
            Err(err) => {
                warn!("skipping asset: {err}");
                stats.copy_failures += 1;
            }
        }
    }

    info!(
        subcategory = %sub,
        images = stats.images_copied,
        json = stats.json_copied,
        "copied legacy assets"
    );
    Ok(())
}

/// Copies one file, overwriting the destination.
pub fn copy_asset(src: &Path, dst: &Path) -> Result<(), LeafcocoError> {
    fs::copy(src, dst)
        .map(|_| ())
        .map_err(|source| LeafcocoError::io_at(src, source))
}

/// Writes one CSV per JSON in `json/` and records each file's legacy
/// identifier.
fn derive_csvs(
    layout: &DatasetLayout,
    sub: Subcategory,
    stats: &mut SubcategoryMigration,
    index: &mut IdentifierIndex,
    report: &mut MigrationReport,
) -> Result<(), LeafcocoError> {
    let json_files: Vec<(PathBuf, String)> = list_files(&layout.json_dir(sub))
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let stem = strip_any_extension(name, &[LEGACY_JSON_EXTENSION])?.to_string();
            Some((path, stem))
        })
        .collect();
    if json_files.is_empty() {
        return Ok(());
    }

    let csv_dir = layout.csv_dir(sub);
    fs::create_dir_all(&csv_dir).map_err(|source| LeafcocoError::io_at(&csv_dir, source))?;

    for (json_path, stem) in json_files {
        let record = match read_legacy_json(&json_path) {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping malformed legacy JSON: {err}");
                stats.malformed_json += 1;
                continue;
            }
        };

        let label = sub.label_id();
        let rows: Vec<BoxCsvRow> = record
            .boxes()
            .enumerate()
            .map(|(item, bbox)| BoxCsvRow {
                item,
                x: bbox.x,
                y: bbox.y,
                width: bbox.width,
                height: bbox.height,
                label,
            })
            .collect();

        match write_box_csv(&layout.csv_path(sub, &stem), &rows) {
            Ok(()) => {
                stats.csv_written += 1;
                if rows.is_empty() {
                    stats.empty_csv += 1;
                }
            }
            Err(err) => warn!("failed to write box CSV: {err}"),
        }

        match record.pvc_filename() {
            Some(identifier) => {
                if let Some((prev_sub, prev_stem)) =
                    index.insert(identifier.to_string(), (sub, stem.clone()))
                {
                    warn!(
                        identifier,
                        previous = %format!("{prev_sub}/{prev_stem}"),
                        current = %format!("{sub}/{stem}"),
                        "duplicate legacy identifier, keeping the later file"
                    );
                    report.duplicate_identifiers += 1;
                }
            }
            None => {
                debug!(path = %json_path.display(), "legacy JSON has no identifier");
                report.files_without_identifier += 1;
            }
        }
    }

    info!(subcategory = %sub, csv = stats.csv_written, "derived box CSVs");
    Ok(())
}

/// Splits one legacy manifest into per-subcategory manifests.
fn rewrite_split(
    split_dir: &Path,
    split: &str,
    index: &IdentifierIndex,
    layout: &DatasetLayout,
) -> SplitRewrite {
    let mut outcome = SplitRewrite::missing(split);

    let legacy_path = split_dir.join(format!("{split}.txt"));
    if !legacy_path.is_file() {
        debug!(path = %legacy_path.display(), "legacy split manifest not found");
        return outcome;
    }
    let identifiers = match read_split_list(&legacy_path) {
        Ok(identifiers) => identifiers,
        Err(err) => {
            warn!("skipping legacy split manifest: {err}");
            return outcome;
        }
    };
    outcome.found = true;

    let mut grouped: BTreeMap<Subcategory, Vec<&str>> = BTreeMap::new();
    for identifier in &identifiers {
        match index.get(identifier) {
            Some((sub, stem)) => {
                grouped.entry(*sub).or_default().push(stem.as_str());
                outcome.matched += 1;
            }
            None => {
                debug!(split, identifier = identifier.as_str(), "unmatched legacy identifier");
                outcome.unmatched += 1;
            }
        }
    }
    info!(
        split,
        matched = outcome.matched,
        unmatched = outcome.unmatched,
        "cross-referenced legacy split"
    );

    for (sub, mut stems) in grouped {
        stems.sort_unstable();
        let path = layout.split_path(sub, split);
        match write_split_list(&path, stems.iter().copied()) {
            Ok(()) => {
                debug!(path = %path.display(), count = stems.len(), "wrote split manifest");
                outcome.manifests.insert(sub, stems.len());
            }
            Err(err) => warn!("failed to write split manifest: {err}"),
        }
    }

    outcome
}

/// Lists every image in `images/` as the `all` split. Returns its size.
fn write_all_manifest(layout: &DatasetLayout, sub: Subcategory) -> Result<usize, LeafcocoError> {
    let stems = collect_stems(&layout.images_dir(sub), &RESOLVE_EXTENSIONS);
    write_split_list(
        &layout.split_path(sub, ALL_SPLIT),
        stems.iter().map(String::as_str),
    )?;
    Ok(stems.len())
}
