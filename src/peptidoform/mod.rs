//! # Peptidoform Parsing
//!
//! Turns a peptide string with inline modification markers into its canonical
//! (marker-free) sequence plus an ordered list of annotations.
//!
//! ## Notation
//!
//! ```text
//! [Acetyl]-PEM[Oxidation]S[Phospho]K-[Amidated]
//! ^^^^^^^^^                          ^^^^^^^^^^^
//! N-terminal                         C-terminal
//! ```
//!
//! - Residues are uppercase ASCII letters.
//! - A marker directly after a residue modifies that residue.
//! - Markers before the first residue are N-terminal and end with `-`.
//! - Markers after a trailing `-` are C-terminal.
//! - Several markers may be stacked on one site; they keep their written order.
//!
//! ## Positions
//!
//! Annotation positions are 0-based residue indices. The N-terminus is `-1`
//! and the C-terminus is the sequence length, so `PEP[Oxidation]TIDE` yields
//! `PEPTIDE` with one annotation at position 2.

mod error;
mod parser;


pub use error::PeptidoformError;
pub use parser::PeptidoformParser;

use std::fmt;

use crate::automaton::{MARKER_CLOSE, MARKER_OPEN};

/// Position written for N-terminal modifications
pub const N_TERM_POSITION: i32 = -1;

/// Where a modification sits on the peptide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModificationSite {
    /// Before the first residue
    NTerm,
    /// On the residue at this 0-based index
    Residue(usize),
    /// After the last residue
    CTerm,
}

impl ModificationSite {
    /// Flat integer position for a sequence of the given length
    pub fn to_position(self, sequence_len: usize) -> i32 {
        match self {
            Self::NTerm => N_TERM_POSITION,
            Self::Residue(index) => index as i32,
            Self::CTerm => sequence_len as i32,
        }
    }

    /// Inverse of [`ModificationSite::to_position`]
    pub fn from_position(position: i32, sequence_len: usize) -> Option<Self> {
        if position == N_TERM_POSITION {
            return Some(Self::NTerm);
        }
        let index = usize::try_from(position).ok()?;
        match index.cmp(&sequence_len) {
            std::cmp::Ordering::Less => Some(Self::Residue(index)),
            std::cmp::Ordering::Equal => Some(Self::CTerm),
            std::cmp::Ordering::Greater => None,
        }
    }
}

/// A modification placed on a canonical sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationAnnotation {
    /// Site of the modification
    pub site: ModificationSite,
    /// Vocabulary token, e.g. "Oxidation"
    pub token: String,
    /// Ontology accession, e.g. "UNIMOD:35"
    pub accession: Option<String>,
    /// Monoisotopic mass delta in Da
    pub mass_delta: Option<f64>,
}

impl ModificationAnnotation {
    /// Flat integer position for a sequence of the given length
    pub fn position(&self, sequence_len: usize) -> i32 {
        self.site.to_position(sequence_len)
    }
}

/// A parsed peptidoform
#[derive(Debug, Clone, PartialEq)]
pub struct Peptidoform {
    /// Sequence with every marker removed
    pub sequence: String,
    /// Annotations ordered by position, stacked ones in written order
    pub annotations: Vec<ModificationAnnotation>,
}

impl Peptidoform {
    /// Annotation positions as written to the output columns
    pub fn positions(&self) -> Vec<i32> {
        let len = self.sequence.len();
        self.annotations.iter().map(|a| a.position(len)).collect()
    }
}

fn write_marker(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    write!(f, "{MARKER_OPEN}{token}{MARKER_CLOSE}")
}

/// Renders the peptidoform back into marker notation
impl fmt::Display for Peptidoform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut annotations = self.annotations.iter().peekable();

        let mut has_n_term = false;
        while let Some(a) = annotations.next_if(|a| a.site == ModificationSite::NTerm) {
            write_marker(f, &a.token)?;
            has_n_term = true;
        }
        if has_n_term {
            f.write_str("-")?;
        }

        for (index, residue) in self.sequence.chars().enumerate() {
            write!(f, "{residue}")?;
            while let Some(a) = annotations.next_if(|a| a.site == ModificationSite::Residue(index)) {
                write_marker(f, &a.token)?;
            }
        }

        let mut has_c_term = false;
        for a in annotations.filter(|a| a.site == ModificationSite::CTerm) {
            if !has_c_term {
                f.write_str("-")?;
                has_c_term = true;
            }
            write_marker(f, &a.token)?;
        }
        Ok(())
    }
}
