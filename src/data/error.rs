use thiserror::Error;

/// Fatal failure while reading or normalizing the postings source.
///
/// Any of these aborts the whole load: the dashboard never runs on a
/// partially loaded table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: '{value}' in column '{column}' is not a date")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Malformed source: {0}")]
    Malformed(String),
}
