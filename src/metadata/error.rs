use std::path::PathBuf;

/// Errors that can occur during metadata processing
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// I/O error reading a metadata file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The metadata file does not exist
    #[error("Metadata file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Invalid mzTab header line
    #[error("Invalid mzTab metadata: {0}")]
    InvalidFormat(String),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
