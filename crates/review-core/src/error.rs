use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading review exports.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// A CSV file could not be opened.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header lacks one of the fixed review columns.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    /// A directory was given but holds no CSV files.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
