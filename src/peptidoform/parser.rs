//! Single-pass peptidoform parser driven by the token automaton

use std::sync::Arc;

use crate::automaton::{TokenAutomaton, TokenId, TokenSelection, MARKER_CLOSE, MARKER_OPEN};

use super::{ModificationAnnotation, ModificationSite, Peptidoform, PeptidoformError};

/// Where the scan is relative to the residues
#[derive(Debug, Clone, Copy)]
enum State {
    /// No residue yet; markers here are N-terminal
    Leading { first_marker: Option<usize> },
    /// Consumed the dash closing the N-terminal markers
    AfterNTerm { dash: usize },
    /// At least one residue consumed
    Body,
    /// Consumed the dash opening the C-terminal markers
    CTerm { dash: usize, has_marker: bool },
}

/// Parser for peptidoform strings.
///
/// Cheap to clone: the automaton is shared, the selection is a bit vector.
#[derive(Debug, Clone)]
pub struct PeptidoformParser {
    automaton: Arc<TokenAutomaton>,
    selection: TokenSelection,
}

impl PeptidoformParser {
    /// Parser that annotates every token of the vocabulary
    pub fn new(automaton: Arc<TokenAutomaton>) -> Self {
        let selection = automaton.select_all();
        Self {
            automaton,
            selection,
        }
    }

    /// Parser that annotates only the selected tokens.
    ///
    /// Markers of other vocabulary tokens are still removed from the sequence.
    pub fn with_selection(automaton: Arc<TokenAutomaton>, selection: TokenSelection) -> Self {
        Self {
            automaton,
            selection,
        }
    }

    /// The shared automaton
    pub fn automaton(&self) -> &TokenAutomaton {
        &self.automaton
    }

    /// Parse a peptidoform into its canonical sequence and annotations
    pub fn parse(&self, raw: &str) -> Result<Peptidoform, PeptidoformError> {
        if raw.is_empty() {
            return Err(PeptidoformError::Empty);
        }

        let bytes = raw.as_bytes();
        let mut markers = self.automaton.find_markers(raw).peekable();
        let mut sequence = String::with_capacity(raw.len());
        let mut annotations = Vec::new();
        let mut state = State::Leading { first_marker: None };
        let mut cursor = 0;

        while cursor < bytes.len() {
            match bytes[cursor] {
                b'[' => {
                    let marker = match markers.next_if(|m| m.start == cursor) {
                        Some(marker) => marker,
                        None => return Err(malformed_marker(raw, cursor)),
                    };
                    let site = match &mut state {
                        State::Leading { first_marker } => {
                            first_marker.get_or_insert(cursor);
                            ModificationSite::NTerm
                        }
                        State::AfterNTerm { .. } => {
                            return Err(PeptidoformError::DanglingModification {
                                raw: raw.to_string(),
                                position: cursor,
                            })
                        }
                        State::Body => ModificationSite::Residue(sequence.len() - 1),
                        State::CTerm { has_marker, .. } => {
                            *has_marker = true;
                            ModificationSite::CTerm
                        }
                    };
                    if self.selection.contains(marker.token) {
                        annotations.push(self.annotate(site, marker.token));
                    }
                    cursor = marker.end;
                }
                b']' => {
                    return Err(PeptidoformError::Unbalanced {
                        raw: raw.to_string(),
                        position: cursor,
                    })
                }
                b'-' => {
                    state = match state {
                        State::Leading {
                            first_marker: Some(_),
                        } => State::AfterNTerm { dash: cursor },
                        State::Body => State::CTerm {
                            dash: cursor,
                            has_marker: false,
                        },
                        _ => return Err(invalid_residue(raw, cursor)),
                    };
                    cursor += 1;
                }
                byte if byte.is_ascii_uppercase() => {
                    match state {
                        State::Leading {
                            first_marker: Some(position),
                        } => {
                            return Err(PeptidoformError::DanglingModification {
                                raw: raw.to_string(),
                                position,
                            })
                        }
                        State::CTerm { .. } => return Err(invalid_residue(raw, cursor)),
                        _ => {}
                    }
                    sequence.push(char::from(byte));
                    state = State::Body;
                    cursor += 1;
                }
                _ => return Err(invalid_residue(raw, cursor)),
            }
        }

        match state {
            State::Leading {
                first_marker: Some(position),
            }
            | State::AfterNTerm { dash: position }
            | State::CTerm {
                dash: position,
                has_marker: false,
            } => Err(PeptidoformError::DanglingModification {
                raw: raw.to_string(),
                position,
            }),
            _ => Ok(Peptidoform {
                sequence,
                annotations,
            }),
        }
    }

    fn annotate(&self, site: ModificationSite, token: TokenId) -> ModificationAnnotation {
        let info = self.automaton.info(token);
        ModificationAnnotation {
            site,
            token: self.automaton.token(token).to_string(),
            accession: info.accession.clone(),
            mass_delta: info.mass_delta,
        }
    }
}

/// Classify a `[` the automaton did not match
fn malformed_marker(raw: &str, open: usize) -> PeptidoformError {
    let rest = &raw[open + 1..];
    match rest.find([MARKER_OPEN, MARKER_CLOSE]) {
        Some(offset) if rest[offset..].starts_with(MARKER_CLOSE) => {
            PeptidoformError::UnknownModification {
                raw: raw.to_string(),
                token: rest[..offset].to_string(),
            }
        }
        _ => PeptidoformError::Unbalanced {
            raw: raw.to_string(),
            position: open,
        },
    }
}

fn invalid_residue(raw: &str, position: usize) -> PeptidoformError {
    PeptidoformError::InvalidResidue {
        raw: raw.to_string(),
        position,
        found: raw[position..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}
