//! # quantms.io - Reconciled Proteomics Datasets in Parquet
//!
//! `quantmsio` merges the output of independent identification and
//! quantification tools into one annotated, schema-fixed columnar dataset.
//!
//! ## Key Features
//!
//! - **Multi-pattern Peptidoform Parsing**: A per-dataset Aho-Corasick automaton
//!   over the modification vocabulary finds every inline marker in one scan.
//!
//! - **Streaming Reconciliation**: The identification stream is folded into a
//!   best-match index once; quantification rows are then left-joined against
//!   it in bounded chunks.
//!
//! - **Partitioned Output**: One Parquet file overall, or one per distinct value
//!   of a partition column, opened lazily and always finalized.
//!
//! - **Protein Occurrence Mapping**: Exact start/end positions of each peptide
//!   in its proteins, filled into an existing dataset.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quantmsio::pipeline::{FeaturePipeline, PipelineConfig};
//! use quantmsio::schema::PRECURSOR_CHARGE;
//! use quantmsio::writer::PartitionPolicy;
//!
//! let config = PipelineConfig::default()
//!     .with_partition(PartitionPolicy::from_column(Some(PRECURSOR_CHARGE)));
//!
//! let stats = FeaturePipeline::with_config(config)
//!     .run("search.mzTab", "msstats_in.csv", "features.parquet")?;
//! println!("{}", stats);
//! # Ok::<(), quantmsio::pipeline::PipelineError>(())
//! ```
//!
//! ## Parsing Peptidoforms
//!
//! ```rust
//! use std::sync::Arc;
//! use quantmsio::automaton::TokenAutomaton;
//! use quantmsio::metadata::ModificationInfo;
//! use quantmsio::peptidoform::PeptidoformParser;
//!
//! let automaton = TokenAutomaton::build([("Oxidation", ModificationInfo::new("UNIMOD:35"))])?;
//! let parser = PeptidoformParser::new(Arc::new(automaton));
//!
//! let parsed = parser.parse("PEP[Oxidation]TIDE").unwrap();
//! assert_eq!(parsed.sequence, "PEPTIDE");
//! assert_eq!(parsed.positions(), vec![2]);
//! # Ok::<(), quantmsio::automaton::VocabularyError>(())
//! ```
//!
//! ## Reading Output
//!
//! Output files are standard Parquet and can be read with any
//! Parquet-compatible tool:
//!
//! ```sql
//! -- DuckDB
//! SELECT sequence, precursor_charge, intensity FROM read_parquet('features-*.parquet')
//! WHERE posterior_error_probability < 0.01;
//! ```
//!
//! ## Architecture
//!
//! - [`automaton`]: modification token vocabulary compiled into a matcher
//! - [`peptidoform`]: inline marker notation into sequence plus annotations
//! - [`index`]: best identification per composite key
//! - [`merge`]: chunked left join of quantification rows
//! - [`writer`]: schema-checked, optionally partitioned Parquet output
//! - [`locate`]: peptide positions in protein sequences
//! - [`schema`]: fixed feature and PSM schemas
//! - [`records`]: typed records for every pipeline stage
//! - [`metadata`]: mzTab header context and footer provenance
//! - [`ingest`]: mzTab, MSstats and FASTA readers
//! - [`pipeline`]: end-to-end conversions
//!
//! ### File Footer Metadata
//!
//! - `quantmsio:version`: library version
//! - `quantmsio:file_type`: `feature` or `psm`
//! - `quantmsio:creation_date`: RFC 3339 timestamp
//! - `quantmsio:uuid`: dataset identifier
//! - `quantmsio:partition`: partition column, when partitioned
//! - `quantmsio:metadata`: full dataset metadata as JSON

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod automaton;
pub mod index;
pub mod ingest;
pub mod locate;
pub mod merge;
pub mod metadata;
pub mod peptidoform;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::automaton::{TokenAutomaton, TokenSelection, VocabularyError};
    pub use crate::index::{BestMatchIndex, BestMatchIndexBuilder, IndexStats};
    pub use crate::ingest::{FastaReader, IngestError, PsmReader, QuantificationReader};
    pub use crate::locate::{enrich_dataset, LocateError, ProteinOccurrence, ProteinOccurrenceMapper};
    pub use crate::merge::{MergeConfig, MergeStats, ReconciliationMerge};
    pub use crate::metadata::{
        DatasetMetadata, FileType, IdentificationMetadata, ModificationInfo, ModificationMap,
    };
    pub use crate::peptidoform::{
        ModificationAnnotation, ModificationSite, Peptidoform, PeptidoformError, PeptidoformParser,
    };
    pub use crate::pipeline::{
        FeaturePipeline, PipelineConfig, PipelineError, PipelineStats, PsmPipeline,
    };
    pub use crate::records::{
        BestMatchEntry, CompositeKey, FeatureRecord, IdentificationRecord, PsmRecord,
        QuantificationRecord,
    };
    pub use crate::schema::{create_feature_schema, create_psm_schema, validate_schema};
    pub use crate::writer::{
        features_to_record_batch, psms_to_record_batch, CompressionType, PartitionPolicy,
        PartitionedWriter, WriterConfig, WriterError,
    };
}
