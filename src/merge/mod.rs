//! # Reconciliation Merge
//!
//! Left-joins quantification records against a finalized [`BestMatchIndex`],
//! one bounded chunk at a time:
//!
//! 1. look up the composite key; a miss leaves the identification fields null
//! 2. parse the peptidoform; a failure leaves sequence and modifications null
//! 3. attach the protein group q-value and the best scan reference
//!
//! Every input row yields exactly one output row, in input order. Chunk size
//! only bounds memory; the merged rows do not depend on it.
//!
//! With the `parallel` feature, rows of a chunk are resolved on the rayon
//! thread pool; the index and parser are only read.


use std::fmt;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::index::BestMatchIndex;
use crate::metadata::IdentificationMetadata;
use crate::peptidoform::{ModificationAnnotation, PeptidoformError, PeptidoformParser};
use crate::records::{FeatureRecord, QuantificationRecord};

/// Default number of quantification rows per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Chunking and run limits for the merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    /// Quantification rows per chunk
    pub chunk_size: usize,
    /// Stop after this many chunks
    pub max_chunks: Option<usize>,
    /// Stop pulling chunks once this much time has elapsed
    pub max_wall_time: Option<Duration>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_chunks: None,
            max_wall_time: None,
        }
    }
}

impl MergeConfig {
    /// Set the chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Limit the number of chunks
    pub fn with_max_chunks(mut self, max_chunks: Option<usize>) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Limit the wall time
    pub fn with_max_wall_time(mut self, max_wall_time: Option<Duration>) -> Self {
        self.max_wall_time = max_wall_time;
        self
    }

    /// Whether another chunk may be pulled after `chunks_done` chunks
    pub fn allows_next_chunk(&self, chunks_done: usize, started: Instant) -> bool {
        if self.max_chunks.is_some_and(|max| chunks_done >= max) {
            return false;
        }
        !self
            .max_wall_time
            .is_some_and(|max| started.elapsed() >= max)
    }
}

/// Counters for merged rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows merged
    pub rows: usize,
    /// Rows that found an identification
    pub matched: usize,
    /// Rows whose peptidoform failed to parse
    pub parse_failures: usize,
    /// Chunks merged
    pub chunks: usize,
}

impl MergeStats {
    /// Rows without an identification
    pub fn unmatched(&self) -> usize {
        self.rows - self.matched
    }
}

impl AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.rows += other.rows;
        self.matched += other.matched;
        self.parse_failures += other.parse_failures;
        self.chunks += other.chunks;
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merged {} rows in {} chunk(s): {} matched, {} unmatched, {} parse failures",
            self.rows,
            self.chunks,
            self.matched,
            self.unmatched(),
            self.parse_failures
        )
    }
}

/// Output of one merged chunk
#[derive(Debug, Clone)]
pub struct MergedChunk {
    /// One feature per input row, in input order
    pub features: Vec<FeatureRecord>,
    /// Counters for this chunk
    pub stats: MergeStats,
}

/// Canonical sequence and annotations of a peptidoform, or the parse error
pub(crate) fn parse_fields(
    parser: &PeptidoformParser,
    raw: &str,
) -> (
    Option<String>,
    Option<Vec<ModificationAnnotation>>,
    Option<PeptidoformError>,
) {
    match parser.parse(raw) {
        Ok(parsed) => (Some(parsed.sequence), Some(parsed.annotations), None),
        Err(e) => (None, None, Some(e)),
    }
}

/// Joins quantification records with a finalized index
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationMerge<'a> {
    index: &'a BestMatchIndex,
    parser: &'a PeptidoformParser,
    metadata: &'a IdentificationMetadata,
}

impl<'a> ReconciliationMerge<'a> {
    /// Create a merge over a finalized index
    pub fn new(
        index: &'a BestMatchIndex,
        parser: &'a PeptidoformParser,
        metadata: &'a IdentificationMetadata,
    ) -> Self {
        Self {
            index,
            parser,
            metadata,
        }
    }

    /// Resolve one quantification record into a feature.
    ///
    /// A parse failure is returned alongside the feature, which is kept with
    /// null sequence and modifications.
    pub fn resolve(&self, record: QuantificationRecord) -> (FeatureRecord, Option<PeptidoformError>) {
        let best_match = self.index.lookup(&record.key()).cloned();
        let scan_reference = self
            .index
            .best_scan(&record.peptidoform, record.charge)
            .cloned();
        let accessions = best_match
            .as_ref()
            .map(|b| b.protein_accessions.as_slice())
            .filter(|a| !a.is_empty())
            .unwrap_or(record.protein_accessions.as_slice());
        let pg_global_qvalue = self.metadata.protein_qvalue(accessions);
        let (sequence, modifications, error) = parse_fields(self.parser, &record.peptidoform);

        let feature = FeatureRecord {
            quantification: record,
            sequence,
            modifications,
            best_match,
            pg_global_qvalue,
            scan_reference,
            protein_start_positions: None,
            protein_end_positions: None,
        };
        (feature, error)
    }

    /// Resolve a whole chunk, preserving row order
    pub fn merge_chunk(&self, chunk: Vec<QuantificationRecord>) -> MergedChunk {
        #[cfg(feature = "parallel")]
        let resolved: Vec<_> = chunk.into_par_iter().map(|r| self.resolve(r)).collect();
        #[cfg(not(feature = "parallel"))]
        let resolved: Vec<_> = chunk.into_iter().map(|r| self.resolve(r)).collect();

        let mut stats = MergeStats {
            rows: resolved.len(),
            chunks: 1,
            ..Default::default()
        };
        let mut features = Vec::with_capacity(resolved.len());
        for (feature, error) in resolved {
            if feature.best_match.is_some() {
                stats.matched += 1;
            }
            if let Some(e) = error {
                warn!("Keeping row with unparsed peptidoform: {e}");
                stats.parse_failures += 1;
            }
            features.push(feature);
        }

        debug!("{stats}");
        MergedChunk { features, stats }
    }
}
