//! Per-image bounding-box CSV reader and writer.
//!
//! # Reading
//!
//! Box CSVs come from several tools and do not agree on column names. Each
//! field has an ordered alias list; the first alias present in the header row
//! names the column for the whole file:
//!
//! | field    | aliases                        | default when absent |
//! |----------|--------------------------------|---------------------|
//! | x        | `x`, `xc`, `x_center`          | 0                   |
//! | y        | `y`, `yc`, `y_center`          | 0                   |
//! | width    | `width`, `w`, `dx`             | 0                   |
//! | height   | `height`, `h`, `dy`            | 0                   |
//! | label    | `label`, `class`, `category_id`| 1                   |
//!
//! Labels are any integer, negative ones included. Values are taken as
//! written: `xc`/`x_center` columns are read as the top-left x, not
//! recentred. Rows that fail to parse are skipped, and rows whose width or
//! height is not strictly positive are dropped; neither aborts the file.
//!
//! # Writing
//!
//! The migrator writes `#item,x,y,width,height,label`, one row per legacy
//! annotation. A file with only the header row means "no boxes".

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;

use super::{BBoxXYWH, CategoryId};
use crate::error::LeafcocoError;
use crate::taxonomy::first_match;

const X_ALIASES: [&str; 3] = ["x", "xc", "x_center"];
const Y_ALIASES: [&str; 3] = ["y", "yc", "y_center"];
const WIDTH_ALIASES: [&str; 3] = ["width", "w", "dx"];
const HEIGHT_ALIASES: [&str; 3] = ["height", "h", "dy"];
const LABEL_ALIASES: [&str; 3] = ["label", "class", "category_id"];

const DEFAULT_LABEL: i64 = 1;

/// Header written by [`write_box_csv`].
pub const BOX_CSV_HEADER: [&str; 6] = ["#item", "x", "y", "width", "height", "label"];

/// One box read from a CSV.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CsvBox {
    pub bbox: BBoxXYWH,
    pub category_id: CategoryId,
}

/// Result of reading one box CSV.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedBoxes {
    /// Boxes with strictly positive width and height, in row order.
    pub boxes: Vec<CsvBox>,
    /// Rows with a missing or non-numeric value in a resolved column.
    pub unparsable_rows: usize,
    /// Rows that parsed but had a non-positive width or height.
    pub degenerate_rows: usize,
}

/// One row as written by the migrator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxCsvRow {
    pub item: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: i64,
}

/// Column index per field, resolved once from the header row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ColumnMap {
    x: Option<usize>,
    y: Option<usize>,
    width: Option<usize>,
    height: Option<usize>,
    label: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        Self {
            x: resolve_column(headers, &X_ALIASES),
            y: resolve_column(headers, &Y_ALIASES),
            width: resolve_column(headers, &WIDTH_ALIASES),
            height: resolve_column(headers, &HEIGHT_ALIASES),
            label: resolve_column(headers, &LABEL_ALIASES),
        }
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Option<CsvBox> {
        let x = coordinate(record, self.x)?;
        let y = coordinate(record, self.y)?;
        let width = coordinate(record, self.width)?;
        let height = coordinate(record, self.height)?;
        let label = match self.label {
            Some(idx) => record.get(idx)?.parse::<i64>().ok()?,
            None => DEFAULT_LABEL,
        };
        Some(CsvBox {
            bbox: BBoxXYWH::new(x, y, width, height),
            category_id: CategoryId::new(label),
        })
    }
}

fn resolve_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    first_match(aliases.iter(), |alias| {
        headers.iter().position(|header| header == *alias)
    })
}

fn coordinate(record: &csv::StringRecord, column: Option<usize>) -> Option<f64> {
    match column {
        Some(idx) => record.get(idx)?.parse::<f64>().ok(),
        None => Some(0.0),
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Reads the boxes from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened or its header row cannot be
/// read. Bad data rows never produce an error.
pub fn read_box_csv(path: &Path) -> Result<ParsedBoxes, LeafcocoError> {
    let file = File::open(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    parse_boxes(BufReader::new(file)).map_err(|source| LeafcocoError::CsvParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads boxes from a CSV string.
///
/// Useful for testing without file I/O.
pub fn from_box_csv_str(csv_str: &str) -> Result<ParsedBoxes, csv::Error> {
    parse_boxes(csv_str.as_bytes())
}

/// Reads boxes from raw CSV bytes.
pub fn from_box_csv_slice(bytes: &[u8]) -> Result<ParsedBoxes, csv::Error> {
    parse_boxes(bytes)
}

/// Fuzz-only entrypoint for box CSV parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_box_csv(bytes: &[u8]) -> Result<ParsedBoxes, LeafcocoError> {
    parse_boxes(bytes).map_err(|source| LeafcocoError::CsvParse {
        path: Path::new("<fuzz>").to_path_buf(),
        source,
    })
}

/// Writes the migrator's CSV. An empty `rows` slice produces a header-only
/// file.
pub fn write_box_csv(path: &Path, rows: &[BoxCsvRow]) -> Result<(), LeafcocoError> {
    let file = File::create(path).map_err(|source| LeafcocoError::io_at(path, source))?;
    let csv_err = |source| LeafcocoError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(BOX_CSV_HEADER).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| LeafcocoError::io_at(path, e.into_error()))?
        .flush()
        .map_err(|source| LeafcocoError::io_at(path, source))
}

fn parse_boxes<R: Read>(reader: R) -> Result<ParsedBoxes, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.headers()?);
    let mut parsed = ParsedBoxes::default();

    for result in csv_reader.records() {
        let Some(csv_box) = result.ok().and_then(|record| columns.parse_row(&record)) else {
            parsed.unparsable_rows += 1;
            continue;
        };

        if csv_box.bbox.is_valid() {
            parsed.boxes.push(csv_box);
        } else {
            parsed.degenerate_rows += 1;
        }
    }

    Ok(parsed)
}

// ============================================================================
// Tests
// ============================================================================
