use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use log::debug;

use super::IngestError;

/// One protein entry of a FASTA database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Protein accession
    pub accession: String,
    /// Residue sequence, uppercase with whitespace removed
    pub sequence: String,
}

/// Accession of a FASTA header line (without the leading `>`).
///
/// UniProt style ids `sp|P12345|NAME_HUMAN` yield the second `|` field,
/// anything else yields the first whitespace-separated token.
pub fn fasta_accession(header: &str) -> &str {
    let id = header.split_ascii_whitespace().next().unwrap_or_default();
    let mut fields = id.split('|');
    match (fields.next(), fields.next()) {
        (Some(_), Some(accession)) if !accession.is_empty() => accession,
        _ => id,
    }
}

/// Streams protein entries from a FASTA file
pub struct FastaReader<R: BufRead> {
    lines: Lines<R>,
    current: Option<FastaRecord>,
    accessions: Option<HashSet<String>>,
}

impl FastaReader<BufReader<File>> {
    /// Open a FASTA file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IngestError::MissingFile(path.to_path_buf()));
        }
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> FastaReader<R> {
    /// Read entries from a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            current: None,
            accessions: None,
        }
    }

    /// Only yield entries whose accession is in `accessions`
    pub fn with_accessions(mut self, accessions: HashSet<String>) -> Self {
        self.accessions = Some(accessions);
        self
    }

    fn start(&self, header: &str) -> Option<FastaRecord> {
        let accession = fasta_accession(header);
        let wanted = self
            .accessions
            .as_ref()
            .map_or(true, |wanted| wanted.contains(accession));
        wanted.then(|| FastaRecord {
            accession: accession.to_string(),
            sequence: String::new(),
        })
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(e.into())),
                None => return self.current.take().map(Ok),
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('>') {
                let next = self.start(header);
                if let Some(done) = std::mem::replace(&mut self.current, next) {
                    return Some(Ok(done));
                }
            } else if let Some(record) = &mut self.current {
                record.sequence.extend(
                    line.chars()
                        .filter(|c| !c.is_whitespace() && *c != '*')
                        .map(|c| c.to_ascii_uppercase()),
                );
            }
        }
    }
}

/// Load the sequences of the given proteins, keyed by accession.
///
/// When an accession appears more than once, the first entry wins.
pub fn read_proteins<P: AsRef<Path>>(
    path: P,
    accessions: &HashSet<String>,
) -> Result<HashMap<String, String>, IngestError> {
    let mut proteins = HashMap::with_capacity(accessions.len());
    for record in FastaReader::open(path)?.with_accessions(accessions.clone()) {
        let record = record?;
        proteins.entry(record.accession).or_insert(record.sequence);
    }
    debug!(
        "Loaded {} of {} requested protein sequences",
        proteins.len(),
        accessions.len()
    );
    Ok(proteins)
}
