use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a modification was searched as fixed or variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModificationKind {
    /// Fixed (static) modification
    Fixed,
    /// Variable modification
    #[default]
    Variable,
}

/// Metadata attached to one modification token
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModificationInfo {
    /// Ontology accession (e.g. "UNIMOD:35")
    pub accession: Option<String>,
    /// Monoisotopic mass delta in Da
    pub mass_delta: Option<f64>,
    /// Residue(s) or terminus the modification was searched on
    pub site: Option<String>,
    /// Fixed or variable
    pub kind: ModificationKind,
}

impl ModificationInfo {
    /// Create modification metadata with an accession
    pub fn new(accession: &str) -> Self {
        Self {
            accession: Some(accession.to_string()),
            ..Default::default()
        }
    }

    /// Set the mass delta
    pub fn with_mass_delta(mut self, mass_delta: f64) -> Self {
        self.mass_delta = Some(mass_delta);
        self
    }

    /// Set the searched site
    pub fn with_site(mut self, site: &str) -> Self {
        self.site = Some(site.to_string());
        self
    }

    /// Set the modification kind
    pub fn with_kind(mut self, kind: ModificationKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Closed vocabulary of modification tokens for one dataset.
///
/// Tokens are kept in sorted order so that anything derived from the map
/// (automaton pattern ids, footer metadata) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModificationMap {
    entries: BTreeMap<String, ModificationInfo>,
}

impl ModificationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, replacing any previous metadata for it
    pub fn insert(&mut self, token: impl Into<String>, info: ModificationInfo) {
        self.entries.insert(token.into(), info);
    }

    /// Metadata for a token
    pub fn get(&self, token: &str) -> Option<&ModificationInfo> {
        self.entries.get(token)
    }

    /// Whether the token is part of the vocabulary
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// Iterate tokens with their metadata in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModificationInfo)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate tokens in sorted order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ModificationInfo)> for ModificationMap {
    fn from_iter<I: IntoIterator<Item = (S, ModificationInfo)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (token, info) in iter {
            map.insert(token, info);
        }
        map
    }
}

impl fmt::Display for ModificationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.tokens().collect();
        write!(f, "{} modification(s): {}", tokens.len(), tokens.join(", "))
    }
}

/// Monoisotopic mass delta of common UNIMOD modifications, by accession.
///
/// mzTab modification parameters carry the accession and name only.
pub fn unimod_mass_delta(accession: &str) -> Option<f64> {
    let mass = match accession {
        "UNIMOD:1" => 42.010565,   // Acetyl
        "UNIMOD:2" => -0.984016,   // Amidated
        "UNIMOD:4" => 57.021464,   // Carbamidomethyl
        "UNIMOD:7" => 0.984016,    // Deamidated
        "UNIMOD:21" => 79.966331,  // Phospho
        "UNIMOD:27" => -18.010565, // Glu->pyro-Glu
        "UNIMOD:28" => -17.026549, // Gln->pyro-Glu
        "UNIMOD:34" => 14.01565,   // Methyl
        "UNIMOD:35" => 15.994915,  // Oxidation
        "UNIMOD:36" => 28.0313,    // Dimethyl
        "UNIMOD:121" => 114.042927, // GG
        "UNIMOD:214" => 144.102063, // iTRAQ4plex
        "UNIMOD:259" => 8.014199,  // Label:13C(6)15N(2)
        "UNIMOD:267" => 10.008269, // Label:13C(6)15N(4)
        "UNIMOD:737" => 229.162932, // TMT6plex
        _ => return None,
    };
    Some(mass)
}
