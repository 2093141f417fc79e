//! Error types for peptidoform parsing

/// Errors raised while parsing a single peptidoform.
///
/// These are recoverable per record: the caller keeps the record and flags it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeptidoformError {
    /// The peptidoform string was empty
    #[error("Empty peptidoform")]
    Empty,

    /// A marker delimiter has no partner
    #[error("Unbalanced modification marker in '{raw}' at offset {position}")]
    Unbalanced {
        /// The offending peptidoform
        raw: String,
        /// Byte offset of the unmatched delimiter
        position: usize,
    },

    /// A well-formed marker names a token outside the vocabulary
    #[error("Unknown modification '{token}' in '{raw}'")]
    UnknownModification {
        /// The offending peptidoform
        raw: String,
        /// Text between the delimiters
        token: String,
    },

    /// A character that is neither a residue nor part of a marker
    #[error("Invalid residue '{found}' in '{raw}' at offset {position}")]
    InvalidResidue {
        /// The offending peptidoform
        raw: String,
        /// Byte offset of the character
        position: usize,
        /// The character found
        found: char,
    },

    /// A marker or terminal dash that is not attached to a site
    #[error("Modification not attached to a site in '{raw}' at offset {position}")]
    DanglingModification {
        /// The offending peptidoform
        raw: String,
        /// Byte offset of the marker or dash
        position: usize,
    },
}

impl PeptidoformError {
    /// The raw peptidoform that failed to parse, if any
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Unbalanced { raw, .. }
            | Self::UnknownModification { raw, .. }
            | Self::InvalidResidue { raw, .. }
            | Self::DanglingModification { raw, .. } => Some(raw),
        }
    }
}
