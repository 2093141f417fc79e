use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use super::{next_chunk_allowed, PipelineConfig, PipelineError, PipelineStats};
use crate::index::{BestMatchIndex, BestMatchIndexBuilder};
use crate::ingest::{PsmReader, QuantificationReader};
use crate::merge::ReconciliationMerge;
use crate::metadata::{DatasetMetadata, FileType, IdentificationMetadata};
use crate::schema::create_feature_schema_arc;
use crate::writer::{features_to_record_batch_with_schema, PartitionedWriter};

/// Converts an mzTab identification file and an MSstats table into a feature dataset
#[derive(Debug, Clone, Default)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    /// Create a pipeline with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The run configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the conversion, writing to `output` (or partition files next to it)
    pub fn run<P, Q, R>(&self, mztab: P, msstats: Q, output: R) -> Result<PipelineStats, PipelineError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        let started = Instant::now();
        let (mztab, msstats) = (mztab.as_ref(), msstats.as_ref());
        let schema = create_feature_schema_arc();
        self.config.partition.validate(&schema)?;

        let metadata = IdentificationMetadata::from_mztab_file(mztab)?;
        let parser = self.config.parser(&metadata)?;
        let dataset = DatasetMetadata::new(FileType::Feature)
            .with_source_file(mztab.display().to_string())
            .with_source_file(msstats.display().to_string())
            .with_modifications(parser.automaton().tokens());

        let mut writer = PartitionedWriter::new(
            output,
            schema.clone(),
            &dataset,
            self.config.partition.clone(),
            self.config.writer_config.clone(),
        )?;
        let mut quantification = QuantificationReader::open(msstats)?;

        let mut stats = PipelineStats::default();
        let index = self.build_index(mztab, &metadata)?;
        stats.index = index.stats();

        let merge = ReconciliationMerge::new(&index, &parser, &metadata);
        let mut merge_all = || -> Result<(), PipelineError> {
            let merge_config = &self.config.merge_config;
            while next_chunk_allowed(merge_config, &mut stats, started) {
                let chunk = quantification.next_chunk(merge_config.chunk_size)?;
                if chunk.is_empty() {
                    break;
                }
                let merged = merge.merge_chunk(chunk);
                let batch = features_to_record_batch_with_schema(&merged.features, schema.clone())?;
                writer.write(&batch)?;
                stats.merge += merged.stats;
            }
            Ok(())
        };
        let merged = merge_all();
        let finished = writer.finish();
        merged?;
        stats.writer = finished?;
        stats.elapsed = started.elapsed();

        info!("{}", stats.merge);
        Ok(stats)
    }

    /// Fold the whole identification stream into a finalized index
    fn build_index(
        &self,
        mztab: &Path,
        metadata: &IdentificationMetadata,
    ) -> Result<BestMatchIndex, PipelineError> {
        let mut reader = PsmReader::open(mztab, metadata)?;
        if let Some(accessions) = &self.config.protein_filter {
            reader = reader.with_protein_filter(accessions.iter().cloned());
        }

        let mut builder = BestMatchIndexBuilder::new();
        for record in reader.by_ref() {
            builder.observe(record?);
        }
        debug!(
            "Read {} PSM rows, kept {}",
            reader.rows_read(),
            builder.records_observed()
        );
        Ok(builder.finalize())
    }
}
