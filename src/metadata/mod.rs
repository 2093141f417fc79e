//! # Metadata Module
//!
//! Dataset-level context that is read once per run and then passed explicitly
//! into every component that needs it:
//!
//! 1. **Modification vocabulary**: the closed set of modification tokens of a
//!    dataset with their accession, mass delta and searched site
//!
//! 2. **Identification metadata**: run index to source file names, protein
//!    global q-values and declared PSM scores, parsed from the mzTab header
//!
//! 3. **Dataset metadata**: provenance embedded in the Parquet footer of every
//!    file this crate writes

mod dataset;
mod error;
mod modification;
mod mztab;

#[cfg(test)]
mod tests;

pub use dataset::{DatasetMetadata, FileType};
pub use error::MetadataError;
pub use modification::{unimod_mass_delta, ModificationInfo, ModificationKind, ModificationMap};
pub use mztab::{IdentificationMetadata, ScoreName};

pub(crate) use mztab::parse_optional_f64;
