//! # Output Schemas
//!
//! Fixed Apache Arrow schemas for the two dataset kinds this crate writes.
//! Every record batch handed to the writer must match one of them exactly.
//!
//! ## Feature schema
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | sequence | Utf8 (nullable) | Canonical sequence, null when the peptidoform failed to parse |
//! | peptidoform | Utf8 | Peptidoform as read |
//! | modifications | `List<Struct>` (nullable) | position, name, accession, mass_delta |
//! | precursor_charge | Int32 (nullable) | Charge state |
//! | posterior_error_probability | Float64 (nullable) | From the best identification |
//! | calculated_mz | Float64 (nullable) | From the best identification |
//! | observed_mz | Float64 (nullable) | From the best identification |
//! | mp_accessions | `List<Utf8>` (nullable) | Proteins of the best identification |
//! | is_decoy | Int32 (nullable) | 1 decoy, 0 target |
//! | additional_scores | `List<Struct>` (nullable) | name, value |
//! | cv_params | `List<Struct>` (nullable) | name, value |
//! | pg_accessions | `List<Utf8>` (nullable) | Quantified protein group |
//! | pg_global_qvalue | Float64 (nullable) | Protein group q-value |
//! | unique | Int32 (nullable) | 1 when the group has one protein |
//! | intensity | Float64 (nullable) | Feature intensity |
//! | reference_file_name | Utf8 | Run the feature was quantified in |
//! | condition .. channel | Utf8 (nullable) | Experimental design |
//! | rt | Float64 (nullable) | Retention time in seconds |
//! | scan_reference_file_name | Utf8 (nullable) | Run of the best spectrum |
//! | scan | Utf8 (nullable) | Scan of the best spectrum |
//! | protein_start_positions | `List<Int32>` (nullable) | 0-based occurrence starts |
//! | protein_end_positions | `List<Int32>` (nullable) | 0-based inclusive occurrence ends |
//!
//! The PSM schema shares the peptide, identification and occurrence columns
//! and adds `protein_accessions`, `reference_file_name`, `rt` and `scan`.

mod builders;
/// Column name constants.
pub mod columns;
mod constants;
mod validation;

#[cfg(test)]
mod tests;

pub use builders::{
    cv_param_fields, create_feature_schema, create_feature_schema_arc, create_psm_schema,
    create_psm_schema_arc, list_item_field, list_of, modification_fields, score_fields,
};
pub use columns::*;
pub use constants::*;
pub use validation::{is_partitionable, validate_schema, SchemaValidationError};
