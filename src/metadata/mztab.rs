use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::modification::{unimod_mass_delta, ModificationInfo, ModificationKind, ModificationMap};
use super::MetadataError;
use crate::records::reference_file_name;

/// Column of the protein section holding the global protein q-value
const PROTEIN_QVALUE_COLUMN: &str = "best_search_engine_score[1]";

/// A search engine score declared in the mzTab header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreName {
    /// Score name, e.g. "percolator:Q value"
    pub name: String,
    /// PSM section column carrying the value, e.g. "search_engine_score[1]"
    pub column: String,
}

/// Dataset-level context parsed from an identification file header.
///
/// Immutable once built; passed explicitly into the components that need it.
#[derive(Debug, Clone, Default)]
pub struct IdentificationMetadata {
    /// Modification token vocabulary
    pub modifications: ModificationMap,
    /// Run index (e.g. "ms_run[1]") to source file name
    pub ms_runs: HashMap<String, String>,
    /// Protein accession to global q-value
    pub protein_qvalues: HashMap<String, f64>,
    /// Declared PSM scores, in declaration order
    pub score_names: Vec<ScoreName>,
}

impl IdentificationMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the header sections of an mzTab file
    pub fn from_mztab_file<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MetadataError::MissingFile(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_mztab_reader(BufReader::new(file))
    }

    /// Parse the MTD and protein sections from a reader, stopping at the PSM header
    pub fn from_mztab_reader<R: Read>(reader: R) -> Result<Self, MetadataError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut metadata = Self::new();
        // (slot, token, info) in file order
        let mut modifications: Vec<(String, String, ModificationInfo)> = Vec::new();
        let mut sites: HashMap<String, String> = HashMap::new();
        let mut qvalue_column: Option<usize> = None;

        for result in reader.records() {
            let record = result?;
            match record.get(0) {
                Some("MTD") => {
                    let key = record.get(1).unwrap_or_default();
                    let value = record.get(2).unwrap_or_default();
                    if let Some(run) = key.strip_suffix("-location") {
                        if run.starts_with("ms_run[") {
                            metadata
                                .ms_runs
                                .insert(run.to_string(), reference_file_name(value));
                        }
                    } else if key.starts_with("psm_search_engine_score[") {
                        let param = CvParamText::parse(value)?;
                        let index = &key["psm_".len()..];
                        metadata.score_names.push(ScoreName {
                            name: param.name,
                            column: index.to_string(),
                        });
                    } else if let Some(kind) = modification_kind(key) {
                        if let Some(slot) = key.strip_suffix("-site") {
                            sites.insert(slot.to_string(), value.to_string());
                        } else if !key.contains('-') {
                            let param = CvParamText::parse(value)?;
                            // "No fixed modifications searched" and similar placeholders
                            if param.accession.starts_with("UNIMOD:") {
                                let mut info =
                                    ModificationInfo::new(&param.accession).with_kind(kind);
                                info.mass_delta = unimod_mass_delta(&param.accession);
                                modifications.push((key.to_string(), param.name, info));
                            }
                        }
                    }
                }
                Some("PRH") => {
                    qvalue_column = record.iter().position(|c| c == PROTEIN_QVALUE_COLUMN);
                }
                Some("PRT") => {
                    if let (Some(accession), Some(column)) = (record.get(1), qvalue_column) {
                        if let Some(qvalue) = record.get(column).and_then(parse_optional_f64) {
                            metadata.protein_qvalues.insert(accession.to_string(), qvalue);
                        }
                    }
                }
                Some("PSH") => break,
                _ => {}
            }
        }

        // A token searched in several slots keeps its first slot and the union of sites
        let mut merged: BTreeMap<String, ModificationInfo> = BTreeMap::new();
        for (slot, token, mut info) in modifications {
            info.site = sites.get(&slot).cloned();
            match merged.entry(token) {
                Entry::Vacant(entry) => {
                    entry.insert(info);
                }
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    existing.site = match (existing.site.take(), info.site) {
                        (Some(first), Some(site)) => Some(format!("{first},{site}")),
                        (first, site) => first.or(site),
                    };
                }
            }
        }
        metadata.modifications = merged.into_iter().collect();

        debug!(
            "Parsed mzTab header: {} runs, {}, {} scores, {} protein q-values",
            metadata.ms_runs.len(),
            metadata.modifications,
            metadata.score_names.len(),
            metadata.protein_qvalues.len()
        );

        Ok(metadata)
    }

    /// Resolve the source file of a spectra reference such as
    /// `ms_run[1]:controllerType=0 controllerNumber=1 scan=42`
    pub fn source_file(&self, spectra_ref: &str) -> Option<&str> {
        let (run, _) = spectra_ref.split_once(':')?;
        self.ms_runs.get(run).map(String::as_str)
    }

    /// Global q-value of a protein group given its accessions
    pub fn protein_qvalue(&self, accessions: &[String]) -> Option<f64> {
        match accessions {
            [] => None,
            [single] => self.protein_qvalues.get(single).copied(),
            many => self.protein_qvalues.get(&many.join(";")).copied(),
        }
    }
}

fn modification_kind(key: &str) -> Option<ModificationKind> {
    if key.starts_with("fixed_mod[") {
        Some(ModificationKind::Fixed)
    } else if key.starts_with("variable_mod[") {
        Some(ModificationKind::Variable)
    } else {
        None
    }
}

/// Parse a numeric mzTab cell, treating "null" and NaN as missing
pub(crate) fn parse_optional_f64(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Accession and name of a bracketed mzTab parameter: `[label, accession, name, value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CvParamText {
    pub(crate) accession: String,
    pub(crate) name: String,
}

impl CvParamText {
    pub(crate) fn parse(text: &str) -> Result<Self, MetadataError> {
        let inner = text
            .trim()
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .ok_or_else(|| MetadataError::InvalidFormat(format!("not a parameter: {text}")))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 4 {
            return Err(MetadataError::InvalidFormat(format!(
                "parameter needs 4 fields: {text}"
            )));
        }
        // Names may themselves contain commas
        let name = parts[2..parts.len() - 1].join(", ");
        Ok(Self {
            accession: parts[1].to_string(),
            name,
        })
    }
}
