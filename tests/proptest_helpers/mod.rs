#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Header spellings for `x, y, width, height, label`, one per alias column.
pub const HEADER_SPELLINGS: [[&str; 5]; 3] = [
    ["x", "y", "width", "height", "label"],
    ["xc", "yc", "w", "h", "class"],
    ["x_center", "y_center", "dx", "dy", "category_id"],
];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One CSV row: `x, y, width, height, label`.
#[derive(Clone, Debug, PartialEq)]
pub struct RowSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: i64,
}

impl RowSpec {
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

fn arb_coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![
        (0u32..2048).prop_map(f64::from),
        (0.0f64..2048.0),
        (-16.0f64..0.0),
    ]
}

pub fn arb_row() -> impl Strategy<Value = RowSpec> {
    (
        arb_coordinate(),
        arb_coordinate(),
        arb_coordinate(),
        arb_coordinate(),
        -2i64..8,
    )
        .prop_map(|(x, y, width, height, label)| RowSpec {
            x,
            y,
            width,
            height,
            label,
        })
}

pub fn arb_rows(max_rows: usize) -> impl Strategy<Value = Vec<RowSpec>> {
    prop::collection::vec(arb_row(), 0..=max_rows)
}

/// Renders rows under the given header spelling.
pub fn render_csv(header: &[&str; 5], rows: &[RowSpec]) -> String {
    let mut csv = header.join(",");
    csv.push('\n');
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            row.x, row.y, row.width, row.height, row.label
        ));
    }
    csv
}
