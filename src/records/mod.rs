//! # Record Types
//!
//! Explicit, fixed-shape record structs for every stage of the pipeline:
//!
//! - [`IdentificationRecord`]: one PSM read from the identification file
//! - [`QuantificationRecord`]: one row of the quantification table
//! - [`BestMatchEntry`]: the identification payload retained per composite key
//! - [`FeatureRecord`]: a quantification row reconciled with its best match
//! - [`PsmRecord`]: an identification row with its parsed peptidoform
//!
//! Optional columns are `Option` fields rather than columns injected at runtime.

mod scan;

#[cfg(test)]
mod tests;

pub use scan::{reference_file_name, scan_number};

use serde::{Deserialize, Serialize};

use crate::peptidoform::ModificationAnnotation;

/// A named search engine score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalScore {
    /// Score name, e.g. "percolator:Q value"
    pub name: String,
    /// Score value, missing when the engine reported none
    pub value: Option<f64>,
}

impl AdditionalScore {
    /// Create a score
    pub fn new(name: &str, value: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// A free-form auxiliary parameter carried alongside an identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvParam {
    /// Parameter name
    pub name: String,
    /// Parameter value
    pub value: Option<String>,
}

impl CvParam {
    /// Create a parameter
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: value.map(str::to_string),
        }
    }
}

/// Key correlating identification and quantification records
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey {
    /// Source file name (run)
    pub source_file: String,
    /// Raw peptidoform string
    pub peptidoform: String,
    /// Precursor charge
    pub charge: Option<i32>,
}

impl CompositeKey {
    /// Create a key
    pub fn new(source_file: &str, peptidoform: &str, charge: Option<i32>) -> Self {
        Self {
            source_file: source_file.to_string(),
            peptidoform: peptidoform.to_string(),
            charge,
        }
    }
}

/// One peptide-spectrum match from the identification stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdentificationRecord {
    /// Source file name (run) the spectrum came from
    pub source_file: String,
    /// Raw peptidoform string
    pub peptidoform: String,
    /// Precursor charge
    pub charge: Option<i32>,
    /// Posterior error probability, lower is more confident
    pub error_probability: Option<f64>,
    /// Theoretical precursor m/z
    pub calculated_mz: Option<f64>,
    /// Experimental precursor m/z
    pub observed_mz: Option<f64>,
    /// Protein accessions, in file order
    pub protein_accessions: Vec<String>,
    /// Decoy flag
    pub is_decoy: Option<bool>,
    /// Search engine scores
    pub additional_scores: Vec<AdditionalScore>,
    /// Auxiliary parameters
    pub cv_params: Vec<CvParam>,
    /// Retention time in seconds
    pub retention_time: Option<f64>,
    /// Scan identifier derived from the spectra reference
    pub scan: Option<String>,
}

impl IdentificationRecord {
    /// Create a record with the key fields set
    pub fn new(source_file: &str, peptidoform: &str, charge: Option<i32>) -> Self {
        Self {
            source_file: source_file.to_string(),
            peptidoform: peptidoform.to_string(),
            charge,
            ..Default::default()
        }
    }

    /// Composite key of this record
    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(&self.source_file, &self.peptidoform, self.charge)
    }
}

/// The identification payload retained for one composite key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BestMatchEntry {
    /// Posterior error probability of the retained record
    pub error_probability: Option<f64>,
    /// Theoretical precursor m/z
    pub calculated_mz: Option<f64>,
    /// Experimental precursor m/z
    pub observed_mz: Option<f64>,
    /// Protein accessions
    pub protein_accessions: Vec<String>,
    /// Decoy flag
    pub is_decoy: Option<bool>,
    /// Search engine scores
    pub additional_scores: Vec<AdditionalScore>,
    /// Auxiliary parameters
    pub cv_params: Vec<CvParam>,
}

impl From<IdentificationRecord> for BestMatchEntry {
    fn from(record: IdentificationRecord) -> Self {
        Self {
            error_probability: record.error_probability,
            calculated_mz: record.calculated_mz,
            observed_mz: record.observed_mz,
            protein_accessions: record.protein_accessions,
            is_decoy: record.is_decoy,
            additional_scores: record.additional_scores,
            cv_params: record.cv_params,
        }
    }
}

/// Source file and scan of the most confident spectrum for a peptidoform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReference {
    /// Source file name
    pub reference_file_name: String,
    /// Scan identifier
    pub scan: String,
}

/// One row of the quantification stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuantificationRecord {
    /// Source file name (run)
    pub source_file: String,
    /// Raw peptidoform string
    pub peptidoform: String,
    /// Precursor charge
    pub charge: Option<i32>,
    /// Feature intensity
    pub intensity: Option<f64>,
    /// Protein accessions of the quantified protein group
    pub protein_accessions: Vec<String>,
    /// Retention time in seconds
    pub retention_time: Option<f64>,
    /// Experimental condition
    pub condition: Option<String>,
    /// Biological replicate
    pub biological_replicate: Option<String>,
    /// Run identifier in the experimental design
    pub run: Option<String>,
    /// Fraction identifier
    pub fraction: Option<String>,
    /// Isobaric label channel
    pub channel: Option<String>,
}

impl QuantificationRecord {
    /// Create a record with the key fields set
    pub fn new(source_file: &str, peptidoform: &str, charge: Option<i32>) -> Self {
        Self {
            source_file: source_file.to_string(),
            peptidoform: peptidoform.to_string(),
            charge,
            ..Default::default()
        }
    }

    /// Composite key of this record
    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(&self.source_file, &self.peptidoform, self.charge)
    }
}

/// A quantification record reconciled with its best identification
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// The quantification row this feature was derived from
    pub quantification: QuantificationRecord,
    /// Unmodified sequence, missing when the peptidoform failed to parse
    pub sequence: Option<String>,
    /// Modification annotations, missing when the peptidoform failed to parse
    pub modifications: Option<Vec<ModificationAnnotation>>,
    /// Best identification for the composite key (left join: missing on no match)
    pub best_match: Option<BestMatchEntry>,
    /// Global q-value of the protein group
    pub pg_global_qvalue: Option<f64>,
    /// Most confident spectrum for this peptidoform and charge
    pub scan_reference: Option<ScanReference>,
    /// Start positions of the peptide in its proteins
    pub protein_start_positions: Option<Vec<i32>>,
    /// End positions of the peptide in its proteins
    pub protein_end_positions: Option<Vec<i32>>,
}

impl FeatureRecord {
    /// Whether the protein group maps to a single protein
    pub fn is_unique(&self) -> bool {
        self.quantification.protein_accessions.len() == 1
    }
}

/// An identification record with its parsed peptidoform
#[derive(Debug, Clone, PartialEq)]
pub struct PsmRecord {
    /// The identification row
    pub identification: IdentificationRecord,
    /// Unmodified sequence, missing when the peptidoform failed to parse
    pub sequence: Option<String>,
    /// Modification annotations, missing when the peptidoform failed to parse
    pub modifications: Option<Vec<ModificationAnnotation>>,
}
