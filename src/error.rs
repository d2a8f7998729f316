use std::path::PathBuf;
use thiserror::Error;

/// The main error type for leafcoco operations.
///
/// Most variants describe a single bad record (one JSON file, one CSV, one
/// image). The pipelines catch those, log them and move on; only output
/// failures travel all the way up to [`crate::run`].
#[derive(Debug, Error)]
pub enum LeafcocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse CSV from {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image dimensions {width}x{height} at {path} do not fit in u32")]
    ImageDimensionOverflow {
        path: PathBuf,
        width: usize,
        height: usize,
    },

    #[error("Failed to render report as JSON: {0}")]
    ReportRender(#[source] serde_json::Error),
}

impl LeafcocoError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LeafcocoError::IoAt {
            path: path.into(),
            source,
        }
    }
}
