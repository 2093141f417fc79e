use std::path::PathBuf;

use crate::ingest::IngestError;
use crate::writer::WriterError;

/// Errors that can occur while enriching a dataset with protein occurrences
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// The dataset to enrich does not exist
    #[error("Dataset does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// Input and output resolve to the same file
    #[error("Refusing to overwrite the input dataset in place: {}", .0.display())]
    SameFile(PathBuf),

    /// A column the enrichment needs is absent or has the wrong type
    #[error("Column '{column}' is unusable: {reason}")]
    InvalidColumn {
        /// Column name
        column: String,
        /// What is wrong with it
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failure reading the sequence database
    #[error("Sequence database error: {0}")]
    IngestError(#[from] IngestError),

    /// Failure reading the input dataset
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Failure assembling the enriched batches
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Failure writing the enriched dataset
    #[error("Writer error: {0}")]
    WriterError(#[from] WriterError),
}
