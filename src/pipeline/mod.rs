//! # Conversion Pipelines
//!
//! End-to-end runs that turn search results into Parquet datasets:
//!
//! - [`FeaturePipeline`]: mzTab + MSstats table into a feature dataset
//! - [`PsmPipeline`]: mzTab into a PSM dataset
//!
//! A feature run reads the whole identification stream into the best-match
//! index before the first quantification chunk is pulled. Configuration
//! problems (such as an unknown partition column) surface before any input is
//! read. Once the output writer exists it is finalized on every exit path,
//! so files written before a failure stay readable.

mod error;
mod feature;
mod psm;


use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::warn;

pub use error::PipelineError;
pub use feature::FeaturePipeline;
pub use psm::PsmPipeline;

use crate::automaton::TokenAutomaton;
use crate::index::IndexStats;
use crate::merge::{MergeConfig, MergeStats};
use crate::metadata::IdentificationMetadata;
use crate::peptidoform::PeptidoformParser;
use crate::writer::{DatasetWriterStats, PartitionPolicy, WriterConfig};

/// Configuration for a conversion run
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Output file settings
    pub writer_config: WriterConfig,
    /// Chunking and run limits
    pub merge_config: MergeConfig,
    /// Output partitioning
    pub partition: PartitionPolicy,
    /// Modification tokens to annotate; all when `None`
    pub selected_modifications: Option<Vec<String>>,
    /// Only keep identifications of these proteins
    pub protein_filter: Option<Vec<String>>,
}

impl PipelineConfig {
    /// Configuration optimized for maximum compression
    pub fn max_compression() -> Self {
        Self {
            writer_config: WriterConfig::max_compression(),
            ..Default::default()
        }
    }

    /// Configuration optimized for fast writing
    pub fn fast_write() -> Self {
        Self {
            writer_config: WriterConfig::fast_write(),
            ..Default::default()
        }
    }

    /// Balanced configuration (default)
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Set the partition policy
    pub fn with_partition(mut self, partition: PartitionPolicy) -> Self {
        self.partition = partition;
        self
    }

    /// Set the chunking and limits
    pub fn with_merge_config(mut self, merge_config: MergeConfig) -> Self {
        self.merge_config = merge_config;
        self
    }

    /// Restrict annotation to a subset of modification tokens
    pub fn with_selected_modifications(mut self, tokens: Option<Vec<String>>) -> Self {
        self.selected_modifications = tokens;
        self
    }

    /// Restrict identifications to a set of proteins
    pub fn with_protein_filter(mut self, accessions: Option<Vec<String>>) -> Self {
        self.protein_filter = accessions;
        self
    }

    /// Build the peptidoform parser for a dataset's vocabulary
    fn parser(&self, metadata: &IdentificationMetadata) -> Result<PeptidoformParser, PipelineError> {
        let automaton = Arc::new(TokenAutomaton::from_modifications(&metadata.modifications)?);
        Ok(match &self.selected_modifications {
            Some(tokens) => {
                let selection = automaton.select(tokens)?;
                PeptidoformParser::with_selection(automaton, selection)
            }
            None => PeptidoformParser::new(automaton),
        })
    }
}

/// Statistics from a conversion run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Best-match index counters; empty for PSM runs
    pub index: IndexStats,
    /// Row counters
    pub merge: MergeStats,
    /// Output files
    pub writer: DatasetWriterStats,
    /// Whether a chunk or time limit ended the run
    pub stopped_early: bool,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index.records_observed > 0 {
            writeln!(f, "{}", self.index)?;
        }
        writeln!(f, "{}", self.merge)?;
        writeln!(f, "{}", self.writer)?;
        if self.stopped_early {
            writeln!(f, "Stopped early at the configured limit")?;
        }
        write!(f, "Elapsed: {:.2}s", self.elapsed.as_secs_f64())
    }
}

/// Whether the run may pull another chunk, warning once when a limit is hit
fn next_chunk_allowed(
    config: &MergeConfig,
    stats: &mut PipelineStats,
    started: Instant,
) -> bool {
    if config.allows_next_chunk(stats.merge.chunks, started) {
        return true;
    }
    warn!(
        "Stopping after {} chunk(s) and {:.1}s at the configured limit",
        stats.merge.chunks,
        started.elapsed().as_secs_f64()
    );
    stats.stopped_early = true;
    false
}
