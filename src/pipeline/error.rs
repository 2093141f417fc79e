use crate::automaton::VocabularyError;
use crate::ingest::IngestError;
use crate::metadata::MetadataError;
use crate::writer::WriterError;

/// Errors that abort a conversion run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The identification header could not be read
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),

    /// The modification vocabulary or selection is invalid
    #[error("Modification vocabulary error: {0}")]
    VocabularyError(#[from] VocabularyError),

    /// An input stream could not be read
    #[error("Input error: {0}")]
    IngestError(#[from] IngestError),

    /// Records could not be assembled into a batch
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// The output dataset could not be written
    #[error("Writer error: {0}")]
    WriterError(#[from] WriterError),
}
