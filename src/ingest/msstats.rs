use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::mztab::split_accessions;
use super::notation::to_bracket_notation;
use super::IngestError;
use crate::records::{reference_file_name, QuantificationRecord};

/// Columns every quantification table must declare
const REQUIRED_COLUMNS: [&str; 5] = [
    "ProteinName",
    "PeptideSequence",
    "PrecursorCharge",
    "Intensity",
    "Reference",
];

/// One row of an MSstats input table
#[derive(Debug, Deserialize)]
struct MsstatsRow {
    #[serde(rename = "ProteinName")]
    protein_name: String,
    #[serde(rename = "PeptideSequence")]
    peptide_sequence: String,
    #[serde(rename = "PrecursorCharge", deserialize_with = "csv::invalid_option")]
    precursor_charge: Option<i32>,
    #[serde(rename = "Intensity", deserialize_with = "csv::invalid_option")]
    intensity: Option<f64>,
    #[serde(rename = "Reference")]
    reference: String,
    #[serde(rename = "Condition", default)]
    condition: Option<String>,
    #[serde(rename = "BioReplicate", default)]
    bio_replicate: Option<String>,
    #[serde(rename = "Run", default)]
    run: Option<String>,
    #[serde(rename = "Fraction", default)]
    fraction: Option<String>,
    #[serde(rename = "Channel", default)]
    channel: Option<String>,
    #[serde(
        rename = "RetentionTime",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    retention_time: Option<f64>,
}

/// "NA" is how R writes a missing cell
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "NA")
}

impl From<MsstatsRow> for QuantificationRecord {
    fn from(row: MsstatsRow) -> Self {
        let mut record = QuantificationRecord::new(
            &reference_file_name(&row.reference),
            &to_bracket_notation(row.peptide_sequence.trim()),
            row.precursor_charge,
        );
        record.intensity = row.intensity.filter(|v| !v.is_nan());
        record.protein_accessions = split_accessions(&row.protein_name);
        record.retention_time = row.retention_time.filter(|v| !v.is_nan());
        record.condition = present(row.condition);
        record.biological_replicate = present(row.bio_replicate);
        record.run = present(row.run);
        record.fraction = present(row.fraction);
        record.channel = present(row.channel);
        record
    }
}

/// Streams an MSstats input table as [`QuantificationRecord`]s.
///
/// Comma separated by default; files ending in `.tsv` or `.txt` are read as
/// tab separated.
pub struct QuantificationReader<R: Read> {
    rows: csv::DeserializeRecordsIntoIter<R, MsstatsRow>,
    rows_read: usize,
}

impl QuantificationReader<BufReader<File>> {
    /// Open a quantification table, failing if it does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IngestError::MissingFile(path.to_path_buf()));
        }
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") | Some("txt") => b'\t',
            _ => b',',
        };
        let file = File::open(path)?;
        Self::from_reader(
            BufReader::new(file),
            delimiter,
            &path.display().to_string(),
        )
    }
}

impl<R: Read> QuantificationReader<R> {
    /// Read a table from any reader, checking the header up front
    pub fn from_reader(reader: R, delimiter: u8, source_name: &str) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?;
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(IngestError::missing_column(column, source_name));
            }
        }

        Ok(Self {
            rows: reader.into_deserialize(),
            rows_read: 0,
        })
    }

    /// Pull up to `chunk_size` records; an empty chunk means the table is exhausted
    pub fn next_chunk(&mut self, chunk_size: usize) -> Result<Vec<QuantificationRecord>, IngestError> {
        let mut chunk = Vec::with_capacity(chunk_size.min(1 << 16));
        while chunk.len() < chunk_size.max(1) {
            match self.next() {
                Some(record) => chunk.push(record?),
                None => break,
            }
        }
        Ok(chunk)
    }

    /// Number of rows read so far
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }
}

impl<R: Read> Iterator for QuantificationReader<R> {
    type Item = Result<QuantificationRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.rows_read += 1;
        Some(row.map(QuantificationRecord::from).map_err(IngestError::from))
    }
}
