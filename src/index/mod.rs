//! # Best-Match Index
//!
//! Folds the whole identification stream into one entry per composite key
//! `(source_file, peptidoform, charge)`, keeping the record with the lowest
//! error probability. Alongside it keeps the best spectrum per
//! `(peptidoform, charge)` across all runs.
//!
//! Building and querying are separate types: [`BestMatchIndexBuilder`] only
//! accepts records, and [`BestMatchIndexBuilder::finalize`] consumes it into a
//! read-only [`BestMatchIndex`]. A partially built index cannot be queried.
//!
//! ## Replacement rule
//!
//! | stored | candidate | result |
//! |--------|-----------|--------|
//! | 0.05 | 0.01 | replaced |
//! | 0.01 | 0.01 | kept (first seen wins) |
//! | 0.01 | missing/NaN | kept |
//! | missing | 0.01 | replaced |
//! | missing | missing | kept |

#[cfg(test)]
mod tests;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use log::info;

use crate::records::{BestMatchEntry, CompositeKey, IdentificationRecord, ScanReference};

/// Whether a candidate error probability replaces the stored one
pub fn improves(candidate: Option<f64>, current: Option<f64>) -> bool {
    let valid = |p: Option<f64>| p.filter(|p| !p.is_nan());
    match (valid(candidate), valid(current)) {
        (Some(candidate), Some(current)) => candidate < current,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Counters collected while building the index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Identification records folded in
    pub records_observed: usize,
    /// Distinct composite keys
    pub distinct_keys: usize,
    /// Times a stored entry was replaced by a better record
    pub replacements: usize,
    /// Distinct (peptidoform, charge) pairs with a best scan
    pub scan_references: usize,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Indexed {} identifications into {} keys ({} replacements, {} scan references)",
            self.records_observed, self.distinct_keys, self.replacements, self.scan_references
        )
    }
}

#[derive(Debug, Clone)]
struct ScanCandidate {
    error_probability: Option<f64>,
    reference: ScanReference,
}

type ScanMap<T> = HashMap<String, HashMap<Option<i32>, T>>;

/// Accumulates identification records; see the module docs for the rule
#[derive(Debug, Default)]
pub struct BestMatchIndexBuilder {
    entries: HashMap<CompositeKey, BestMatchEntry>,
    best_scans: ScanMap<ScanCandidate>,
    stats: IndexStats,
}

impl BestMatchIndexBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one identification record into the index
    pub fn observe(&mut self, record: IdentificationRecord) {
        self.stats.records_observed += 1;

        if let Some(scan) = &record.scan {
            self.observe_scan(&record, scan);
        }

        match self.entries.entry(record.key()) {
            Entry::Vacant(entry) => {
                entry.insert(BestMatchEntry::from(record));
            }
            Entry::Occupied(mut entry) => {
                if improves(record.error_probability, entry.get().error_probability) {
                    entry.insert(BestMatchEntry::from(record));
                    self.stats.replacements += 1;
                }
            }
        }
    }

    fn observe_scan(&mut self, record: &IdentificationRecord, scan: &str) {
        let by_charge = self
            .best_scans
            .entry(record.peptidoform.clone())
            .or_default();
        let candidate = || ScanCandidate {
            error_probability: record.error_probability,
            reference: ScanReference {
                reference_file_name: record.source_file.clone(),
                scan: scan.to_string(),
            },
        };
        match by_charge.entry(record.charge) {
            Entry::Vacant(entry) => {
                entry.insert(candidate());
            }
            Entry::Occupied(mut entry) => {
                if improves(record.error_probability, entry.get().error_probability) {
                    entry.insert(candidate());
                }
            }
        }
    }

    /// Fold every record of an iterator
    pub fn observe_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = IdentificationRecord>,
    {
        for record in records {
            self.observe(record);
        }
    }

    /// Number of records observed so far
    pub fn records_observed(&self) -> usize {
        self.stats.records_observed
    }

    /// Freeze the index for lookup
    pub fn finalize(self) -> BestMatchIndex {
        let best_scans: ScanMap<ScanReference> = self
            .best_scans
            .into_iter()
            .map(|(peptidoform, by_charge)| {
                let by_charge = by_charge
                    .into_iter()
                    .map(|(charge, candidate)| (charge, candidate.reference))
                    .collect();
                (peptidoform, by_charge)
            })
            .collect();

        let stats = IndexStats {
            distinct_keys: self.entries.len(),
            scan_references: best_scans.values().map(HashMap::len).sum(),
            ..self.stats
        };
        info!("{stats}");

        BestMatchIndex {
            entries: self.entries,
            best_scans,
            stats,
        }
    }
}

impl FromIterator<IdentificationRecord> for BestMatchIndex {
    fn from_iter<I: IntoIterator<Item = IdentificationRecord>>(records: I) -> Self {
        let mut builder = BestMatchIndexBuilder::new();
        builder.observe_all(records);
        builder.finalize()
    }
}

/// Finalized, read-only best-match index. Safe to share across threads.
#[derive(Debug, Default)]
pub struct BestMatchIndex {
    entries: HashMap<CompositeKey, BestMatchEntry>,
    best_scans: ScanMap<ScanReference>,
    stats: IndexStats,
}

impl BestMatchIndex {
    /// Best identification payload for a key; `None` is a normal miss
    pub fn lookup(&self, key: &CompositeKey) -> Option<&BestMatchEntry> {
        self.entries.get(key)
    }

    /// Most confident spectrum for a peptidoform and charge, across runs
    pub fn best_scan(&self, peptidoform: &str, charge: Option<i32>) -> Option<&ScanReference> {
        self.best_scans
            .get(peptidoform)
            .and_then(|by_charge| by_charge.get(&charge))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no identification was indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build statistics
    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}
