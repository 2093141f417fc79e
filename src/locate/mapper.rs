use std::collections::HashMap;

use memchr::memmem::Finder;

/// One exact occurrence of a peptide in a protein sequence.
///
/// Positions are 0-based and inclusive: `sequence[start..=end] == peptide`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinOccurrence {
    /// Peptide sequence
    pub peptide: String,
    /// Accession of the protein it was found in
    pub protein_accession: String,
    /// First residue of the occurrence
    pub start: usize,
    /// Last residue of the occurrence
    pub end: usize,
}

/// Locates peptides in a fixed protein dictionary.
///
/// A substring finder is compiled once per distinct peptide and reused for
/// every protein it is searched in.
#[derive(Default)]
pub struct ProteinOccurrenceMapper {
    proteins: HashMap<String, String>,
    finders: HashMap<String, Finder<'static>>,
}

impl ProteinOccurrenceMapper {
    /// Create a mapper over accession to sequence
    pub fn new(proteins: HashMap<String, String>) -> Self {
        Self {
            proteins,
            finders: HashMap::new(),
        }
    }

    /// Number of proteins in the dictionary
    pub fn protein_count(&self) -> usize {
        self.proteins.len()
    }

    /// Number of distinct peptides searched so far
    pub fn cached_peptides(&self) -> usize {
        self.finders.len()
    }

    /// Sequence of a protein
    pub fn sequence(&self, accession: &str) -> Option<&str> {
        self.proteins.get(accession).map(String::as_str)
    }

    /// Every occurrence of `peptide` in each listed protein.
    ///
    /// Results follow the accession order, then ascending start. Overlapping
    /// occurrences are all reported. Accessions missing from the dictionary
    /// and empty peptides yield nothing.
    pub fn occurrences<S: AsRef<str>>(
        &mut self,
        peptide: &str,
        accessions: &[S],
    ) -> Vec<ProteinOccurrence> {
        if peptide.is_empty() {
            return Vec::new();
        }
        if !self.finders.contains_key(peptide) {
            self.finders
                .insert(peptide.to_string(), Finder::new(peptide).into_owned());
        }
        let finder = &self.finders[peptide];

        let mut found = Vec::new();
        for accession in accessions {
            let accession = accession.as_ref();
            let Some(sequence) = self.proteins.get(accession) else {
                continue;
            };
            found.extend(
                find_overlapping(finder, sequence.as_bytes()).map(|start| ProteinOccurrence {
                    peptide: peptide.to_string(),
                    protein_accession: accession.to_string(),
                    start,
                    end: start + peptide.len() - 1,
                }),
            );
        }
        found
    }

    /// Start and end columns for one row, in the order of [`Self::occurrences`]
    pub fn positions<S: AsRef<str>>(
        &mut self,
        peptide: &str,
        accessions: &[S],
    ) -> (Vec<i32>, Vec<i32>) {
        self.occurrences(peptide, accessions)
            .into_iter()
            .map(|o| (to_i32(o.start), to_i32(o.end)))
            .unzip()
    }
}

fn to_i32(position: usize) -> i32 {
    i32::try_from(position).unwrap_or(i32::MAX)
}

/// Start offsets of `finder`'s needle in `haystack`, overlaps included
fn find_overlapping<'h>(
    finder: &'h Finder<'static>,
    haystack: &'h [u8],
) -> impl Iterator<Item = usize> + 'h {
    let mut from = 0;
    std::iter::from_fn(move || {
        let start = from + finder.find(haystack.get(from..)?)?;
        from = start + 1;
        Some(start)
    })
}
