use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File};
use std::path::Path;

use arrow::array::{Array, AsArray, GenericListArray};
use arrow::datatypes::{DataType, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use parquet::file::metadata::ParquetMetaData;

use super::error::LocateError;
use super::mapper::ProteinOccurrenceMapper;
use crate::ingest::read_proteins;
use crate::schema::{
    PG_ACCESSIONS, PROTEIN_ACCESSIONS, PROTEIN_END_POSITIONS, PROTEIN_START_POSITIONS, SEQUENCE,
};
use crate::writer::{int_list, DatasetFileWriter, WriterConfig, WriterStats};

/// Footer keys carried over from the input dataset
const FOOTER_PREFIX: &str = "quantmsio:";

/// Summary of an enrichment pass
#[derive(Debug, Clone, Default)]
pub struct LocateStats {
    /// Rows rewritten
    pub rows: usize,
    /// Rows whose peptide was found in at least one of its proteins
    pub rows_located: usize,
    /// Total occurrences written
    pub occurrences: usize,
    /// Distinct accessions referenced by the dataset
    pub proteins_requested: usize,
    /// Referenced accessions found in the sequence database
    pub proteins_loaded: usize,
    /// Output file statistics
    pub output: WriterStats,
}

impl fmt::Display for LocateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Located {} of {} rows ({} occurrences)",
            self.rows_located, self.rows, self.occurrences
        )?;
        writeln!(
            f,
            "Proteins: {} of {} referenced accessions found",
            self.proteins_loaded, self.proteins_requested
        )?;
        write!(f, "{}", self.output)
    }
}

/// Column positions the enrichment reads and replaces
#[derive(Debug, Clone, Copy)]
struct EnrichColumns {
    sequence: usize,
    accessions: usize,
    start: usize,
    end: usize,
}

impl EnrichColumns {
    fn resolve(schema: &Schema) -> Result<Self, LocateError> {
        let index = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| LocateError::InvalidColumn {
                    column: name.to_string(),
                    reason: "not present in the dataset".to_string(),
                })
        };
        // PSM datasets carry protein_accessions; feature datasets locate against the quantified group
        let accessions = index(PROTEIN_ACCESSIONS).or_else(|_| index(PG_ACCESSIONS))?;

        let columns = Self {
            sequence: index(SEQUENCE)?,
            accessions,
            start: index(PROTEIN_START_POSITIONS)?,
            end: index(PROTEIN_END_POSITIONS)?,
        };

        expect_type(schema, columns.sequence, |t| matches!(t, DataType::Utf8))?;
        expect_type(schema, columns.accessions, |t| {
            matches!(t, DataType::List(item) if item.data_type() == &DataType::Utf8)
        })?;
        Ok(columns)
    }
}

fn expect_type(
    schema: &Schema,
    index: usize,
    accepts: impl Fn(&DataType) -> bool,
) -> Result<(), LocateError> {
    let field = schema.field(index);
    if accepts(field.data_type()) {
        Ok(())
    } else {
        Err(LocateError::InvalidColumn {
            column: field.name().clone(),
            reason: format!("unexpected type {:?}", field.data_type()),
        })
    }
}

/// Non-null accessions of one row
fn row_accessions(list: &GenericListArray<i32>, row: usize) -> Vec<String> {
    if list.is_null(row) {
        return Vec::new();
    }
    let values = list.value(row);
    values
        .as_string_opt::<i32>()
        .map(|strings| strings.iter().flatten().map(str::to_string).collect())
        .unwrap_or_default()
}

fn list_column<'a>(
    batch: &'a RecordBatch,
    index: usize,
) -> Result<&'a GenericListArray<i32>, LocateError> {
    batch
        .column(index)
        .as_list_opt::<i32>()
        .ok_or_else(|| LocateError::InvalidColumn {
            column: batch.schema().field(index).name().clone(),
            reason: "expected a list column".to_string(),
        })
}

fn quantmsio_footer(metadata: &ParquetMetaData) -> HashMap<String, String> {
    metadata
        .file_metadata()
        .key_value_metadata()
        .into_iter()
        .flatten()
        .filter(|kv| kv.key.starts_with(FOOTER_PREFIX))
        .filter_map(|kv| kv.value.clone().map(|value| (kv.key.clone(), value)))
        .collect()
}

/// Accessions referenced anywhere in the dataset, reading only that column
fn collect_accessions(input: &Path, column: usize) -> Result<HashSet<String>, LocateError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(input)?)?;
    let mask = ProjectionMask::roots(builder.parquet_schema(), [column]);
    let reader = builder.with_projection(mask).build()?;

    let mut accessions = HashSet::new();
    for batch in reader {
        let batch = batch?;
        let list = list_column(&batch, 0)?;
        for row in 0..list.len() {
            accessions.extend(row_accessions(list, row));
        }
    }
    Ok(accessions)
}

fn locate_batch(
    mapper: &mut ProteinOccurrenceMapper,
    batch: &RecordBatch,
    columns: EnrichColumns,
    stats: &mut LocateStats,
) -> Result<RecordBatch, LocateError> {
    let sequences = batch
        .column(columns.sequence)
        .as_string_opt::<i32>()
        .ok_or_else(|| LocateError::InvalidColumn {
            column: SEQUENCE.to_string(),
            reason: "expected a string column".to_string(),
        })?;
    let accessions = list_column(batch, columns.accessions)?;

    let mut starts = Vec::with_capacity(batch.num_rows());
    let mut ends = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        if sequences.is_null(row) {
            starts.push(None);
            ends.push(None);
            continue;
        }
        let proteins = row_accessions(accessions, row);
        let (start, end) = mapper.positions(sequences.value(row), &proteins);
        if !start.is_empty() {
            stats.rows_located += 1;
            stats.occurrences += start.len();
        }
        starts.push(Some(start));
        ends.push(Some(end));
    }
    stats.rows += batch.num_rows();

    let mut arrays = batch.columns().to_vec();
    arrays[columns.start] = int_list(starts)?;
    arrays[columns.end] = int_list(ends)?;
    Ok(RecordBatch::try_new(batch.schema(), arrays)?)
}

/// Rewrite a feature or PSM dataset with its protein occurrence columns filled in.
///
/// The dataset is read twice: once for the referenced accessions, which
/// bounds the sequences loaded from `fasta`, and once to rewrite each batch.
/// Rows with a null sequence keep null position lists. The output keeps the
/// input schema and its `quantmsio:` footer entries.
pub fn enrich_dataset(
    input: &Path,
    fasta: &Path,
    output: &Path,
    config: &WriterConfig,
) -> Result<LocateStats, LocateError> {
    if !input.exists() {
        return Err(LocateError::MissingFile(input.to_path_buf()));
    }
    if output.exists() && fs::canonicalize(input)? == fs::canonicalize(output)? {
        return Err(LocateError::SameFile(output.to_path_buf()));
    }

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(input)?)?;
    let schema = builder.schema().clone();
    let footer = quantmsio_footer(builder.metadata());
    let columns = EnrichColumns::resolve(&schema)?;

    let accessions = collect_accessions(input, columns.accessions)?;
    let proteins = read_proteins(fasta, &accessions)?;
    let mut stats = LocateStats {
        proteins_requested: accessions.len(),
        proteins_loaded: proteins.len(),
        ..Default::default()
    };
    info!(
        "Locating peptides in {} of {} referenced proteins",
        stats.proteins_loaded, stats.proteins_requested
    );

    let reader = builder.build()?;
    let mut mapper = ProteinOccurrenceMapper::new(proteins);
    let mut writer = DatasetFileWriter::new_file(output, schema, config, &footer)?;

    let copy = || -> Result<(), LocateError> {
        for batch in reader {
            let located = locate_batch(&mut mapper, &batch?, columns, &mut stats)?;
            writer.write(&located)?;
        }
        Ok(())
    };
    let copied = copy();
    let finished = writer.finish();
    copied?;
    stats.output = finished?;

    debug!("Searched {} distinct peptides", mapper.cached_peptides());
    info!("Enriched {}: {} rows", output.display(), stats.rows);
    Ok(stats)
}
