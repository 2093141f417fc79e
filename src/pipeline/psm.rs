use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use super::{next_chunk_allowed, PipelineConfig, PipelineError, PipelineStats};
use crate::ingest::PsmReader;
use crate::merge::{parse_fields, MergeStats};
use crate::metadata::{DatasetMetadata, FileType, IdentificationMetadata};
use crate::peptidoform::PeptidoformParser;
use crate::records::{IdentificationRecord, PsmRecord};
use crate::schema::create_psm_schema_arc;
use crate::writer::{psms_to_record_batch_with_schema, PartitionedWriter};

/// Converts the PSM section of an mzTab file into a PSM dataset
#[derive(Debug, Clone, Default)]
pub struct PsmPipeline {
    config: PipelineConfig,
}

impl PsmPipeline {
    /// Create a pipeline with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the conversion, writing to `output` (or partition files next to it)
    pub fn run<P, R>(&self, mztab: P, output: R) -> Result<PipelineStats, PipelineError>
    where
        P: AsRef<Path>,
        R: AsRef<Path>,
    {
        let started = Instant::now();
        let mztab = mztab.as_ref();
        let schema = create_psm_schema_arc();
        self.config.partition.validate(&schema)?;

        let metadata = IdentificationMetadata::from_mztab_file(mztab)?;
        let parser = self.config.parser(&metadata)?;
        let dataset = DatasetMetadata::new(FileType::Psm)
            .with_source_file(mztab.display().to_string())
            .with_modifications(parser.automaton().tokens());

        let mut writer = PartitionedWriter::new(
            output,
            schema.clone(),
            &dataset,
            self.config.partition.clone(),
            self.config.writer_config.clone(),
        )?;
        let mut reader = PsmReader::open(mztab, &metadata)?;
        if let Some(accessions) = &self.config.protein_filter {
            reader = reader.with_protein_filter(accessions.iter().cloned());
        }

        let mut stats = PipelineStats::default();
        let mut convert_all = || -> Result<(), PipelineError> {
            let merge_config = &self.config.merge_config;
            let chunk_size = merge_config.chunk_size.max(1);
            while next_chunk_allowed(merge_config, &mut stats, started) {
                let chunk = reader
                    .by_ref()
                    .take(chunk_size)
                    .collect::<Result<Vec<_>, _>>()?;
                if chunk.is_empty() {
                    break;
                }
                let (records, chunk_stats) = to_psm_records(&parser, chunk);
                let batch = psms_to_record_batch_with_schema(&records, schema.clone())?;
                writer.write(&batch)?;
                stats.merge += chunk_stats;
            }
            Ok(())
        };
        let converted = convert_all();
        let finished = writer.finish();
        converted?;
        stats.writer = finished?;
        stats.elapsed = started.elapsed();

        info!("{}", stats.merge);
        Ok(stats)
    }
}

/// Parse the peptidoform of every identification in a chunk
fn to_psm_records(
    parser: &PeptidoformParser,
    chunk: Vec<IdentificationRecord>,
) -> (Vec<PsmRecord>, MergeStats) {
    let mut stats = MergeStats {
        rows: chunk.len(),
        matched: chunk.len(),
        chunks: 1,
        ..Default::default()
    };
    let records = chunk
        .into_iter()
        .map(|identification| {
            let (sequence, modifications, error) = parse_fields(parser, &identification.peptidoform);
            if let Some(e) = error {
                warn!("Keeping PSM with unparsed peptidoform: {e}");
                stats.parse_failures += 1;
            }
            PsmRecord {
                identification,
                sequence,
                modifications,
            }
        })
        .collect();
    (records, stats)
}
