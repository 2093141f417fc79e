//! # Input Readers
//!
//! Streaming readers for the three external inputs of a conversion:
//!
//! - [`PsmReader`]: PSM section of an mzTab identification file
//! - [`QuantificationReader`]: MSstats input table, pulled in bounded chunks
//! - [`FastaReader`]: protein database used to locate peptides
//!
//! Peptidoforms written in dotted parenthesis notation are rewritten into the
//! bracket notation understood by [`crate::peptidoform::PeptidoformParser`]
//! before they become part of a composite key, so both streams agree.

mod error;
mod fasta;
mod msstats;
mod mztab;
mod notation;

#[cfg(test)]
mod tests;

pub use error::IngestError;
pub use fasta::{fasta_accession, read_proteins, FastaReader, FastaRecord};
pub use msstats::QuantificationReader;
pub use mztab::PsmReader;
pub use notation::to_bracket_notation;
