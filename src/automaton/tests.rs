use super::*;

fn vocabulary(tokens: &[&str]) -> Vec<(String, ModificationInfo)> {
    tokens
        .iter()
        .map(|t| (t.to_string(), ModificationInfo::default()))
        .collect()
}

#[test]
fn test_empty_vocabulary_matches_nothing() {
    let automaton = TokenAutomaton::build(Vec::<(String, ModificationInfo)>::new()).unwrap();
    assert!(automaton.is_empty());
    assert_eq!(automaton.find_markers("PEP[Oxidation]TIDE").count(), 0);
    assert!(automaton.select_all().is_empty());
}

#[test]
fn test_duplicates_are_collapsed() {
    let mut tokens = vocabulary(&["Oxidation", "Phospho"]);
    tokens.push((
        "Oxidation".to_string(),
        ModificationInfo::new("UNIMOD:35"),
    ));
    let automaton = TokenAutomaton::build(tokens).unwrap();

    assert_eq!(automaton.len(), 2);
    let id = automaton.token_id("Oxidation").unwrap();
    // first occurrence keeps its metadata
    assert_eq!(automaton.info(id).accession, None);
}

#[test]
fn test_rejects_invalid_tokens() {
    assert!(matches!(
        TokenAutomaton::build(vocabulary(&[""])),
        Err(VocabularyError::EmptyToken)
    ));
    assert!(matches!(
        TokenAutomaton::build(vocabulary(&["Ox]idation"])),
        Err(VocabularyError::DelimiterInToken(_))
    ));
}

#[test]
fn test_prefix_token_does_not_fire_inside_longer_marker() {
    let automaton = TokenAutomaton::build(vocabulary(&["Ox", "Oxidation"])).unwrap();
    let hits: Vec<_> = automaton.find_markers("M[Oxidation]K[Ox]").collect();

    assert_eq!(hits.len(), 2);
    assert_eq!(automaton.token(hits[0].token), "Oxidation");
    assert_eq!((hits[0].start, hits[0].end), (1, 12));
    assert_eq!(automaton.token(hits[1].token), "Ox");
    assert_eq!((hits[1].start, hits[1].end), (13, 17));
}

#[test]
fn test_bare_token_without_delimiters_is_not_a_marker() {
    let automaton = TokenAutomaton::build(vocabulary(&["K"])).unwrap();
    assert_eq!(automaton.find_markers("PEPKTIDEK").count(), 0);
    assert_eq!(automaton.find_markers("PEPK[K]").count(), 1);
}

#[test]
fn test_selection() {
    let automaton = TokenAutomaton::build(vocabulary(&["Acetyl", "Oxidation", "Phospho"])).unwrap();
    let selection = automaton.select(["Phospho"]).unwrap();

    assert_eq!(selection.len(), 1);
    assert!(selection.contains(automaton.token_id("Phospho").unwrap()));
    assert!(!selection.contains(automaton.token_id("Oxidation").unwrap()));

    assert!(matches!(
        automaton.select(["Methyl"]),
        Err(VocabularyError::UnknownToken(t)) if t == "Methyl"
    ));
}

#[test]
fn test_from_modification_map() {
    let map: ModificationMap = [
        ("Phospho", ModificationInfo::new("UNIMOD:21")),
        ("Oxidation", ModificationInfo::new("UNIMOD:35")),
    ]
    .into_iter()
    .collect();
    let automaton = TokenAutomaton::from_modifications(&map).unwrap();

    let tokens: Vec<&str> = automaton.tokens().collect();
    assert_eq!(tokens, vec!["Oxidation", "Phospho"]);
    let id = automaton.token_id("Phospho").unwrap();
    assert_eq!(automaton.info(id).accession.as_deref(), Some("UNIMOD:21"));
}
