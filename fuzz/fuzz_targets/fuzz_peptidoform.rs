#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use quantmsio::automaton::TokenAutomaton;
use quantmsio::ingest::to_bracket_notation;
use quantmsio::metadata::ModificationInfo;
use quantmsio::peptidoform::PeptidoformParser;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(automaton) = TokenAutomaton::build([
        ("Oxidation", ModificationInfo::new("UNIMOD:35")),
        ("Phospho", ModificationInfo::new("UNIMOD:21")),
        ("Acetyl", ModificationInfo::new("UNIMOD:1")),
    ]) else {
        return;
    };
    let parser = PeptidoformParser::new(Arc::new(automaton));

    // Errors are fine, panics are not
    let normalized = to_bracket_notation(raw);
    if let Ok(parsed) = parser.parse(&normalized) {
        // A successful parse must render back into something that parses the same way
        let rendered = parsed.to_string();
        assert_eq!(parser.parse(&rendered).ok(), Some(parsed));
    }
});
