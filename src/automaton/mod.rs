//! # Token Automaton
//!
//! Multi-pattern matcher over the closed modification vocabulary of a dataset.
//!
//! Every token is compiled as its full marker (`[Oxidation]`), so a match always
//! spans a complete, delimited marker and a short token can never fire inside a
//! longer one. The automaton is built once per run and is read-only afterwards;
//! it is `Send + Sync` and can be shared across parser instances and threads.
//!
//! ```
//! use quantmsio::automaton::TokenAutomaton;
//! use quantmsio::metadata::ModificationInfo;
//!
//! let automaton = TokenAutomaton::build([
//!     ("Oxidation", ModificationInfo::new("UNIMOD:35")),
//!     ("Phospho", ModificationInfo::new("UNIMOD:21")),
//! ])?;
//!
//! let hits: Vec<_> = automaton.find_markers("PEM[Oxidation]S[Phospho]K").collect();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(automaton.token(hits[0].token), "Oxidation");
//! assert_eq!((hits[0].start, hits[0].end), (3, 14));
//! # Ok::<(), quantmsio::automaton::VocabularyError>(())
//! ```

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;

use crate::metadata::{ModificationInfo, ModificationMap};

/// Opening delimiter of an inline modification marker
pub const MARKER_OPEN: char = '[';
/// Closing delimiter of an inline modification marker
pub const MARKER_CLOSE: char = ']';

/// Errors raised while building the vocabulary automaton
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    /// A token was the empty string
    #[error("Empty modification token")]
    EmptyToken,

    /// A token contains one of the marker delimiters
    #[error("Modification token '{0}' contains a marker delimiter")]
    DelimiterInToken(String),

    /// A selected token is not part of the vocabulary
    #[error("Modification token '{0}' is not part of the vocabulary")]
    UnknownToken(String),

    /// Error from the automaton construction
    #[error("Failed to build modification automaton: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

/// Index of a token in the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(usize);

impl TokenId {
    /// Position of the token in vocabulary order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A complete marker found in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Token the marker names
    pub token: TokenId,
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset one past the closing delimiter
    pub end: usize,
}

/// Multi-pattern matcher for a fixed modification vocabulary
#[derive(Debug, Clone)]
pub struct TokenAutomaton {
    matcher: Option<AhoCorasick>,
    tokens: Vec<String>,
    info: Vec<ModificationInfo>,
    ids: HashMap<String, TokenId>,
}

impl TokenAutomaton {
    /// Build an automaton from tokens and their metadata.
    ///
    /// Duplicate tokens are collapsed; the first occurrence keeps its metadata.
    /// An empty vocabulary is valid and never matches.
    pub fn build<I, S>(vocabulary: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = (S, ModificationInfo)>,
        S: Into<String>,
    {
        let mut tokens = Vec::new();
        let mut info = Vec::new();
        let mut ids = HashMap::new();

        for (token, metadata) in vocabulary {
            let token = token.into();
            if token.is_empty() {
                return Err(VocabularyError::EmptyToken);
            }
            if token.contains([MARKER_OPEN, MARKER_CLOSE]) {
                return Err(VocabularyError::DelimiterInToken(token));
            }
            if ids.contains_key(&token) {
                continue;
            }
            ids.insert(token.clone(), TokenId(tokens.len()));
            tokens.push(token);
            info.push(metadata);
        }

        let matcher = if tokens.is_empty() {
            None
        } else {
            let markers = tokens
                .iter()
                .map(|token| format!("{MARKER_OPEN}{token}{MARKER_CLOSE}"));
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(markers)?,
            )
        };

        debug!("Built modification automaton over {} token(s)", tokens.len());

        Ok(Self {
            matcher,
            tokens,
            info,
            ids,
        })
    }

    /// Build an automaton over every token of a modification map
    pub fn from_modifications(modifications: &ModificationMap) -> Result<Self, VocabularyError> {
        Self::build(
            modifications
                .iter()
                .map(|(token, info)| (token, info.clone())),
        )
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token text for an id
    pub fn token(&self, id: TokenId) -> &str {
        &self.tokens[id.0]
    }

    /// Metadata for a token id
    pub fn info(&self, id: TokenId) -> &ModificationInfo {
        &self.info[id.0]
    }

    /// Id of a token, if it is part of the vocabulary
    pub fn token_id(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    /// Iterate tokens in vocabulary order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Find all non-overlapping markers in a text with a single linear scan
    pub fn find_markers<'a>(&'a self, text: &'a str) -> impl Iterator<Item = MarkerMatch> + 'a {
        self.matcher
            .iter()
            .flat_map(move |matcher| matcher.find_iter(text))
            .map(|m| MarkerMatch {
                token: TokenId(m.pattern().as_usize()),
                start: m.start(),
                end: m.end(),
            })
    }

    /// Select every token of the vocabulary
    pub fn select_all(&self) -> TokenSelection {
        TokenSelection {
            selected: vec![true; self.tokens.len()],
        }
    }

    /// Select a subset of the vocabulary
    pub fn select<I, S>(&self, tokens: I) -> Result<TokenSelection, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = vec![false; self.tokens.len()];
        for token in tokens {
            let token = token.as_ref();
            let id = self
                .token_id(token)
                .ok_or_else(|| VocabularyError::UnknownToken(token.to_string()))?;
            selected[id.0] = true;
        }
        Ok(TokenSelection { selected })
    }
}

/// Subset of an automaton's tokens that should be annotated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSelection {
    selected: Vec<bool>,
}

impl TokenSelection {
    /// Whether a token is selected
    pub fn contains(&self, id: TokenId) -> bool {
        self.selected.get(id.0).copied().unwrap_or(false)
    }

    /// Number of selected tokens
    pub fn len(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
