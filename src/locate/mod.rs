//! # Protein Occurrence Mapping
//!
//! Locates every exact occurrence of a peptide in the proteins it was
//! assigned to, and rewrites existing datasets with the resulting
//! `protein_start_positions` / `protein_end_positions` columns.
//!
//! Positions are 0-based and inclusive. A peptide absent from a protein
//! contributes no positions; it is not an error.

mod enrich;
mod error;
mod mapper;

#[cfg(test)]
mod tests;

pub use enrich::{enrich_dataset, LocateStats};
pub use error::LocateError;
pub use mapper::{ProteinOccurrence, ProteinOccurrenceMapper};
