use crate::schema::SchemaValidationError;

/// Errors that can occur during writing
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library during array operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library during file writing
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error processing footer metadata
    #[error("Metadata error: {0}")]
    MetadataError(#[from] crate::metadata::MetadataError),

    /// Invalid partition policy or output path, raised before any file is opened
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A batch does not match the declared output schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaValidationError),
}
