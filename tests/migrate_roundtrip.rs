//! Legacy layout -> normalized tree -> export documents.

use std::fs;
use std::path::Path;

use leafcoco::export::{export, ExportOptions, ImageSource};
use leafcoco::migrate::{migrate, MigrateOptions};

mod common;
use common::{legacy_json, read_document, write_bmp, write_file};

fn legacy_asset(root: &Path, legacy_dir: &str, name: &str) -> std::path::PathBuf {
    root.join("legacy")
        .join(legacy_dir)
        .join("without_augmentation")
        .join(name)
}

fn create_legacy_dataset(root: &Path) {
    write_bmp(&legacy_asset(root, "Grape___healthy", "h_01.JPG"), 32, 24);
    write_file(
        &legacy_asset(root, "Grape___healthy", "h_01.json"),
        legacy_json("pv-healthy-1", &[[2.0, 3.0, 10.0, 12.0]]),
    );
    write_bmp(&legacy_asset(root, "Grape___healthy", "h_02.jpg"), 16, 16);
    write_file(
        &legacy_asset(root, "Grape___healthy", "h_02.json"),
        legacy_json("pv-healthy-2", &[]),
    );

    write_bmp(&legacy_asset(root, "Grape___Black_rot", "br_01.JPG"), 40, 30);
    write_file(
        &legacy_asset(root, "Grape___Black_rot", "br_01.json"),
        legacy_json("pv-rot-1", &[[1.0, 1.0, 5.0, 5.0], [6.0, 6.0, 4.0, 3.0]]),
    );

    write_bmp(
        &legacy_asset(root, "Background_without_leaves", "bg_01.jpg"),
        20,
        20,
    );

    write_file(
        &root.join("legacy/all/train.txt"),
        "pv-healthy-1\npv-rot-1\npv-missing\n",
    );
    write_file(&root.join("legacy/all/val.txt"), "pv-healthy-2\n");
}

fn run_migration(root: &Path) -> leafcoco::migrate::MigrationReport {
    migrate(&MigrateOptions {
        legacy_root: root.join("legacy"),
        output_root: root.join("data"),
        category: "grapes".to_string(),
    })
    .expect("migrate")
}

#[test]
fn migration_builds_normalized_tree() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    create_legacy_dataset(root);

    let report = run_migration(root);
    let grapes = root.join("data/grapes");

    assert!(grapes.join("healthy/images/h_01.JPG").is_file());
    assert!(grapes.join("healthy/json/h_01.json").is_file());
    assert!(!grapes.join("healthy/images/h_01.json").exists());
    assert!(grapes.join("labelmap.json").is_file());

    let csv = fs::read_to_string(grapes.join("black_rot/csv/br_01.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("#item,x,y,width,height,label"));
    assert_eq!(lines.count(), 2);

    assert_eq!(
        fs::read_to_string(grapes.join("healthy/sets/train.txt")).unwrap(),
        "h_01\n"
    );
    assert_eq!(
        fs::read_to_string(grapes.join("black_rot/sets/train.txt")).unwrap(),
        "br_01\n"
    );
    assert_eq!(
        fs::read_to_string(grapes.join("healthy/sets/all.txt")).unwrap(),
        "h_01\nh_02\n"
    );

    let train = &report.splits[0];
    assert!(train.found);
    assert_eq!(train.matched, 2);
    assert_eq!(train.unmatched, 1);
    assert!(!report.splits[2].found);
    assert_eq!(report.identifiers_indexed, 3);
    assert_eq!(report.total_images_copied(), 4);
    assert_eq!(report.total_csv_written(), 3);
}

#[test]
fn unmatched_identifier_is_in_no_manifest() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    create_legacy_dataset(root);
    run_migration(root);

    for sub in ["healthy", "black_rot", "esca", "leaf_blight", "background"] {
        let path = root.join("data/grapes").join(sub).join("sets/train.txt");
        if let Ok(text) = fs::read_to_string(&path) {
            assert!(!text.contains("pv-missing"));
        }
    }
}

#[test]
fn migrated_tree_exports_with_derived_boxes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    create_legacy_dataset(root);
    run_migration(root);

    let reports = export(&ExportOptions {
        dataset_root: root.join("data"),
        output_dir: root.join("out"),
        category: "grapes".to_string(),
        splits: vec!["train".to_string(), "val".to_string()],
    })
    .expect("export");

    // Only the first manifest in scan order (healthy) drives the split.
    assert!(matches!(reports[0].image_source, ImageSource::Manifest { .. }));
    let train = read_document(&root.join("out/grapes_instances_train.json"));
    let images = train["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["file_name"], "grapes/healthy/images/h_01.JPG");
    assert_eq!(images[0]["width"], 32);
    assert_eq!(
        train["annotations"][0]["bbox"],
        serde_json::json!([2.0, 3.0, 10.0, 12.0])
    );
    assert_eq!(train["annotations"][0]["category_id"], 1);
    assert_eq!(train["categories"].as_array().unwrap().len(), 4);

    // h_02 has a header-only CSV, so it gets a whole-image box.
    let val = read_document(&root.join("out/grapes_instances_val.json"));
    assert_eq!(
        val["annotations"],
        serde_json::json!([{
            "id": 1,
            "image_id": 1,
            "category_id": 1,
            "bbox": [0, 0, 16, 16],
            "area": 256,
            "iscrowd": 0
        }])
    );
}

#[test]
fn second_migration_is_stable() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let root = temp.path();
    create_legacy_dataset(root);

    run_migration(root);
    let first = fs::read_to_string(root.join("data/grapes/black_rot/csv/br_01.csv")).unwrap();
    let report = run_migration(root);
    let second = fs::read_to_string(root.join("data/grapes/black_rot/csv/br_01.csv")).unwrap();

    assert_eq!(first, second);
    assert_eq!(report.duplicate_identifiers, 0);
}
