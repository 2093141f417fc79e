use super::*;

fn psm(source_file: &str, peptidoform: &str, charge: i32, pep: Option<f64>) -> IdentificationRecord {
    let mut record = IdentificationRecord::new(source_file, peptidoform, Some(charge));
    record.error_probability = pep;
    record
}

fn with_mz(mut record: IdentificationRecord, mz: f64) -> IdentificationRecord {
    record.calculated_mz = Some(mz);
    record
}

fn with_scan(mut record: IdentificationRecord, scan: &str) -> IdentificationRecord {
    record.scan = Some(scan.to_string());
    record
}

#[test]
fn test_improves() {
    assert!(improves(Some(0.01), Some(0.05)));
    assert!(!improves(Some(0.05), Some(0.01)));
    assert!(!improves(Some(0.01), Some(0.01)));
    assert!(improves(Some(0.5), None));
    assert!(!improves(None, Some(0.5)));
    assert!(!improves(None, None));
    assert!(!improves(Some(f64::NAN), Some(0.5)));
    assert!(improves(Some(0.5), Some(f64::NAN)));
}

#[test]
fn test_lower_error_probability_wins() {
    let index: BestMatchIndex = [
        with_mz(psm("A", "PEP[Oxidation]TIDE", 2, Some(0.05)), 1.0),
        with_mz(psm("A", "PEP[Oxidation]TIDE", 2, Some(0.01)), 2.0),
    ]
    .into_iter()
    .collect();

    let entry = index
        .lookup(&CompositeKey::new("A", "PEP[Oxidation]TIDE", Some(2)))
        .unwrap();
    assert_eq!(entry.error_probability, Some(0.01));
    assert_eq!(entry.calculated_mz, Some(2.0));
    assert_eq!(index.len(), 1);
    assert_eq!(index.stats().replacements, 1);
}

#[test]
fn test_equal_error_probability_keeps_first_seen() {
    let mut builder = BestMatchIndexBuilder::new();
    builder.observe(with_mz(psm("A", "PEPTIDE", 2, Some(0.01)), 1.0));
    builder.observe(with_mz(psm("A", "PEPTIDE", 2, Some(0.01)), 2.0));
    builder.observe(with_mz(psm("A", "PEPTIDE", 2, Some(0.02)), 3.0));
    let index = builder.finalize();

    let entry = index.lookup(&CompositeKey::new("A", "PEPTIDE", Some(2))).unwrap();
    assert_eq!(entry.calculated_mz, Some(1.0));
    assert_eq!(index.stats().replacements, 0);
}

#[test]
fn test_missing_error_probability() {
    let index: BestMatchIndex = [
        with_mz(psm("A", "PEPTIDE", 2, None), 1.0),
        with_mz(psm("A", "PEPTIDE", 2, Some(0.3)), 2.0),
        with_mz(psm("A", "PEPTIDE", 2, None), 3.0),
        with_mz(psm("B", "PEPTIDE", 2, None), 4.0),
    ]
    .into_iter()
    .collect();

    let a = index.lookup(&CompositeKey::new("A", "PEPTIDE", Some(2))).unwrap();
    assert_eq!(a.calculated_mz, Some(2.0));
    // a new key is stored even without a probability
    let b = index.lookup(&CompositeKey::new("B", "PEPTIDE", Some(2))).unwrap();
    assert_eq!(b.calculated_mz, Some(4.0));
}

#[test]
fn test_keys_are_distinct_per_component() {
    let index: BestMatchIndex = [
        psm("A", "PEPTIDE", 2, Some(0.01)),
        psm("B", "PEPTIDE", 2, Some(0.01)),
        psm("A", "PEPTIDE", 3, Some(0.01)),
        psm("A", "PEPTIDEK", 2, Some(0.01)),
    ]
    .into_iter()
    .collect();

    assert_eq!(index.len(), 4);
    assert_eq!(index.stats().records_observed, 4);
    assert!(index.lookup(&CompositeKey::new("C", "PEPTIDE", Some(2))).is_none());
    assert!(index.lookup(&CompositeKey::new("A", "PEPTIDE", None)).is_none());
}

#[test]
fn test_best_scan_spans_runs() {
    let index: BestMatchIndex = [
        with_scan(psm("A", "PEPTIDE", 2, Some(0.05)), "100"),
        with_scan(psm("B", "PEPTIDE", 2, Some(0.001)), "200"),
        with_scan(psm("C", "PEPTIDE", 2, Some(0.001)), "300"),
        with_scan(psm("A", "PEPTIDE", 3, Some(0.2)), "400"),
        psm("A", "PEPTIDEK", 2, Some(0.01)),
    ]
    .into_iter()
    .collect();

    let best = index.best_scan("PEPTIDE", Some(2)).unwrap();
    assert_eq!(best.reference_file_name, "B");
    assert_eq!(best.scan, "200");
    assert_eq!(index.best_scan("PEPTIDE", Some(3)).unwrap().scan, "400");
    assert!(index.best_scan("PEPTIDEK", Some(2)).is_none());
    assert_eq!(index.stats().scan_references, 2);
}

#[test]
fn test_empty_index() {
    let index = BestMatchIndexBuilder::new().finalize();
    assert!(index.is_empty());
    assert!(index.lookup(&CompositeKey::new("A", "PEPTIDE", Some(2))).is_none());
}
