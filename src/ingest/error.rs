use std::path::PathBuf;

/// Errors raised while reading identification, quantification or FASTA inputs
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The input file does not exist
    #[error("Input file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// I/O error while reading an input
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed delimited text
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// A required column is absent from the header
    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn {
        /// Column name
        column: String,
        /// Input being read
        source_name: String,
    },

    /// A cell could not be interpreted
    #[error("Invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        /// Column name
        column: String,
        /// Offending cell
        value: String,
        /// 1-based line number
        line: u64,
    },
}

impl IngestError {
    pub(crate) fn missing_column(column: &str, source_name: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            source_name: source_name.to_string(),
        }
    }
}
