use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use log::{debug, warn};

use super::notation::to_bracket_notation;
use super::IngestError;
use crate::metadata::{parse_optional_f64, IdentificationMetadata};
use crate::records::{scan_number, AdditionalScore, CvParam, IdentificationRecord};

const PEPTIDOFORM_COLUMN: &str = "opt_global_cv_MS:1000889_peptidoform_sequence";
const SEQUENCE_COLUMN: &str = "sequence";
const CHARGE_COLUMN: &str = "charge";
const ERROR_PROBABILITY_COLUMN: &str = "opt_global_Posterior_Error_Probability_score";
const CALCULATED_MZ_COLUMN: &str = "calc_mass_to_charge";
const OBSERVED_MZ_COLUMN: &str = "exp_mass_to_charge";
const ACCESSION_COLUMN: &str = "accession";
const DECOY_COLUMN: &str = "opt_global_cv_MS:1002217_decoy_peptide";
const RETENTION_TIME_COLUMN: &str = "retention_time";
const SPECTRA_REF_COLUMN: &str = "spectra_ref";
const OPTIONAL_PREFIX: &str = "opt_global_";

/// Column positions of the PSM section, resolved from its PSH header line
#[derive(Debug, Clone)]
struct PsmColumns {
    peptidoform: usize,
    spectra_ref: usize,
    charge: Option<usize>,
    error_probability: Option<usize>,
    calculated_mz: Option<usize>,
    observed_mz: Option<usize>,
    accession: Option<usize>,
    decoy: Option<usize>,
    retention_time: Option<usize>,
    scores: Vec<(String, usize)>,
    params: Vec<(String, usize)>,
}

impl PsmColumns {
    fn from_header(
        header: &StringRecord,
        metadata: &IdentificationMetadata,
        source_name: &str,
    ) -> Result<Self, IngestError> {
        let find = |name: &str| header.iter().position(|c| c == name);

        let peptidoform = find(PEPTIDOFORM_COLUMN)
            .or_else(|| find(SEQUENCE_COLUMN))
            .ok_or_else(|| IngestError::missing_column(SEQUENCE_COLUMN, source_name))?;
        let spectra_ref = find(SPECTRA_REF_COLUMN)
            .ok_or_else(|| IngestError::missing_column(SPECTRA_REF_COLUMN, source_name))?;

        let mut columns = Self {
            peptidoform,
            spectra_ref,
            charge: find(CHARGE_COLUMN),
            error_probability: find(ERROR_PROBABILITY_COLUMN),
            calculated_mz: find(CALCULATED_MZ_COLUMN),
            observed_mz: find(OBSERVED_MZ_COLUMN),
            accession: find(ACCESSION_COLUMN),
            decoy: find(DECOY_COLUMN),
            retention_time: find(RETENTION_TIME_COLUMN),
            scores: metadata
                .score_names
                .iter()
                .filter_map(|score| find(score.column.as_str()).map(|i| (score.name.clone(), i)))
                .collect(),
            params: Vec::new(),
        };

        let consumed: HashSet<usize> = [
            Some(columns.peptidoform),
            columns.error_probability,
            columns.decoy,
        ]
        .into_iter()
        .flatten()
        .collect();
        columns.params = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !consumed.contains(i))
            .filter_map(|(i, name)| {
                name.strip_prefix(OPTIONAL_PREFIX)
                    .map(|param| (param.to_string(), i))
            })
            .collect();

        Ok(columns)
    }
}

/// Streams the PSM section of an mzTab file as [`IdentificationRecord`]s.
///
/// Lines outside the PSH/PSM section are skipped. Optional columns that the
/// file lacks are left as `None`.
pub struct PsmReader<'a, R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    metadata: &'a IdentificationMetadata,
    columns: Option<PsmColumns>,
    protein_filter: Option<HashSet<String>>,
    source_name: String,
    rows_read: usize,
}

impl<'a> PsmReader<'a, BufReader<File>> {
    /// Open an mzTab file
    pub fn open<P: AsRef<Path>>(
        path: P,
        metadata: &'a IdentificationMetadata,
    ) -> Result<Self, IngestError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IngestError::MissingFile(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self::from_reader(
            BufReader::new(file),
            metadata,
            &path.display().to_string(),
        ))
    }
}

impl<'a, R: Read> PsmReader<'a, R> {
    /// Read PSMs from any reader; `source_name` is used in error messages
    pub fn from_reader(reader: R, metadata: &'a IdentificationMetadata, source_name: &str) -> Self {
        let records = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            metadata,
            columns: None,
            protein_filter: None,
            source_name: source_name.to_string(),
            rows_read: 0,
        }
    }

    /// Keep only PSMs assigned to at least one of these proteins
    pub fn with_protein_filter<I, S>(mut self, accessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protein_filter = Some(accessions.into_iter().map(Into::into).collect());
        self
    }

    /// Number of PSM rows read so far, including filtered rows
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn keep(&self, record: &IdentificationRecord) -> bool {
        self.protein_filter.as_ref().map_or(true, |filter| {
            record
                .protein_accessions
                .iter()
                .any(|accession| filter.contains(accession))
        })
    }

    fn read_row(
        &self,
        row: &StringRecord,
        columns: &PsmColumns,
    ) -> Result<IdentificationRecord, IngestError> {
        let line = row.position().map_or(0, |p| p.line());
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
        };
        let invalid = |column: &str, value: &str| IngestError::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
            line,
        };
        let float = |index: Option<usize>| cell(index).and_then(parse_optional_f64);

        let spectra_ref = cell(Some(columns.spectra_ref))
            .ok_or_else(|| invalid(SPECTRA_REF_COLUMN, ""))?;
        let source_file = self
            .metadata
            .source_file(spectra_ref)
            .ok_or_else(|| invalid(SPECTRA_REF_COLUMN, spectra_ref))?;
        let peptidoform = cell(Some(columns.peptidoform))
            .ok_or_else(|| invalid(SEQUENCE_COLUMN, ""))?;

        let charge = cell(columns.charge)
            .map(|v| parse_charge(v).ok_or_else(|| invalid(CHARGE_COLUMN, v)))
            .transpose()?;
        let is_decoy = cell(columns.decoy)
            .map(|v| parse_flag(v).ok_or_else(|| invalid(DECOY_COLUMN, v)))
            .transpose()?;

        let mut record =
            IdentificationRecord::new(source_file, &to_bracket_notation(peptidoform), charge);
        record.error_probability = float(columns.error_probability);
        record.calculated_mz = float(columns.calculated_mz);
        record.observed_mz = float(columns.observed_mz);
        record.protein_accessions = cell(columns.accession)
            .map(split_accessions)
            .unwrap_or_default();
        record.is_decoy = is_decoy;
        // Multiple retention times are separated by '|'; the first is the precursor's
        record.retention_time = cell(columns.retention_time)
            .and_then(|v| v.split('|').next())
            .and_then(parse_optional_f64);
        record.additional_scores = columns
            .scores
            .iter()
            .map(|(name, i)| AdditionalScore::new(name, float(Some(*i))))
            .collect();
        record.cv_params = columns
            .params
            .iter()
            .map(|(name, i)| CvParam::new(name, cell(Some(*i))))
            .collect();
        record.scan = Some(scan_number(spectra_ref));

        Ok(record)
    }
}

impl<R: Read> Iterator for PsmReader<'_, R> {
    type Item = Result<IdentificationRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.records.next() {
                Some(Ok(row)) => row,
                Some(Err(e)) => return Some(Err(e.into())),
                None => {
                    if self.columns.is_none() {
                        warn!("No PSM section found in {}", self.source_name);
                    }
                    return None;
                }
            };

            match row.get(0) {
                Some("PSH") => {
                    match PsmColumns::from_header(&row, self.metadata, &self.source_name) {
                        Ok(columns) => {
                            debug!(
                                "PSM header of {}: {} score columns, {} optional columns",
                                self.source_name,
                                columns.scores.len(),
                                columns.params.len()
                            );
                            self.columns = Some(columns);
                        }
                        Err(e) => return Some(Err(e)),
                    }
                }
                Some("PSM") => {
                    let Some(columns) = &self.columns else {
                        return Some(Err(IngestError::missing_column("PSH", &self.source_name)));
                    };
                    let result = self.read_row(&row, columns);
                    self.rows_read += 1;
                    match result {
                        Ok(record) if !self.keep(&record) => continue,
                        other => return Some(other),
                    }
                }
                _ => continue,
            }
        }
    }
}

/// Split a `;`-joined accession cell
pub(crate) fn split_accessions(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_charge(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX))
            .map(|v| v as i32)
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        v if v.eq_ignore_ascii_case("true") => Some(true),
        v if v.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
