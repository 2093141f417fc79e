//! Column names shared by the feature and PSM schemas

/// Canonical sequence with every modification marker removed (MS:1000888)
pub const SEQUENCE: &str = "sequence";
/// Peptidoform as written in the input (MS:1000889)
pub const PEPTIDOFORM: &str = "peptidoform";
/// Ordered modification annotations
pub const MODIFICATIONS: &str = "modifications";
/// Precursor charge state (MS:1000041)
pub const PRECURSOR_CHARGE: &str = "precursor_charge";
/// Posterior error probability of the identification (MS:1001493)
pub const POSTERIOR_ERROR_PROBABILITY: &str = "posterior_error_probability";
/// Theoretical precursor m/z
pub const CALCULATED_MZ: &str = "calculated_mz";
/// Experimental precursor m/z (MS:1000744)
pub const OBSERVED_MZ: &str = "observed_mz";
/// Protein accessions of a PSM
pub const PROTEIN_ACCESSIONS: &str = "protein_accessions";
/// Protein accessions of the best matching PSM of a feature
pub const MP_ACCESSIONS: &str = "mp_accessions";
/// Protein group accessions of a feature
pub const PG_ACCESSIONS: &str = "pg_accessions";
/// Decoy flag, 1 for decoy, 0 for target (MS:1002217)
pub const IS_DECOY: &str = "is_decoy";
/// Named search engine scores
pub const ADDITIONAL_SCORES: &str = "additional_scores";
/// Auxiliary parameters
pub const CV_PARAMS: &str = "cv_params";
/// Global q-value of the protein group
pub const PG_GLOBAL_QVALUE: &str = "pg_global_qvalue";
/// 1 when the protein group has a single member
pub const UNIQUE: &str = "unique";
/// Feature intensity (MS:1000042)
pub const INTENSITY: &str = "intensity";
/// Source file the record came from
pub const REFERENCE_FILE_NAME: &str = "reference_file_name";
/// Experimental condition
pub const CONDITION: &str = "condition";
/// Biological replicate
pub const BIOLOGICAL_REPLICATE: &str = "biological_replicate";
/// Run identifier
pub const RUN: &str = "run";
/// Fraction identifier
pub const FRACTION: &str = "fraction";
/// Isobaric label channel
pub const CHANNEL: &str = "channel";
/// Retention time in seconds (MS:1000016)
pub const RT: &str = "rt";
/// Source file of the most confident spectrum
pub const SCAN_REFERENCE_FILE_NAME: &str = "scan_reference_file_name";
/// Scan of the most confident spectrum (MS:1000797)
pub const SCAN: &str = "scan";
/// 0-based start of the peptide in each protein
pub const PROTEIN_START_POSITIONS: &str = "protein_start_positions";
/// 0-based inclusive end of the peptide in each protein
pub const PROTEIN_END_POSITIONS: &str = "protein_end_positions";

// Nested struct fields

/// Modification position within the canonical sequence
pub const MOD_POSITION: &str = "position";
/// Modification token or score/parameter name
pub const NAME: &str = "name";
/// Modification accession
pub const MOD_ACCESSION: &str = "accession";
/// Modification mass delta
pub const MOD_MASS_DELTA: &str = "mass_delta";
/// Score or parameter value
pub const VALUE: &str = "value";
/// Item field name of every list column
pub const LIST_ITEM: &str = "item";
