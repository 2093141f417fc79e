use super::*;

#[test]
fn test_scan_number_thermo() {
    assert_eq!(
        scan_number("ms_run[1]:controllerType=0 controllerNumber=1 scan=4012"),
        "4012"
    );
}

#[test]
fn test_scan_number_index() {
    assert_eq!(scan_number("ms_run[2]:index=7"), "7");
    assert_eq!(scan_number("ms_run[2]:frame=3 scanStart=10"), "3,10");
}

#[test]
fn test_scan_number_without_numbers() {
    assert_eq!(scan_number("ms_run[1]:spectrum_title"), "spectrum_title");
}

#[test]
fn test_reference_file_name() {
    assert_eq!(reference_file_name("file:///data/run_a.mzML"), "run_a");
    assert_eq!(reference_file_name("run_b.raw"), "run_b");
    assert_eq!(reference_file_name("C:\\raw\\run_c.d"), "run_c");
    assert_eq!(reference_file_name("plain"), "plain");
}

#[test]
fn test_keys_match_between_streams() {
    let mut identification = IdentificationRecord::new("run_a", "PEPTIDE", Some(2));
    identification.error_probability = Some(0.01);
    let quantification = QuantificationRecord::new("run_a", "PEPTIDE", Some(2));
    assert_eq!(identification.key(), quantification.key());

    let other_charge = QuantificationRecord::new("run_a", "PEPTIDE", Some(3));
    assert_ne!(identification.key(), other_charge.key());
}

#[test]
fn test_best_match_entry_from_identification() {
    let mut record = IdentificationRecord::new("run_a", "PEPTIDE", Some(2));
    record.error_probability = Some(0.02);
    record.protein_accessions = vec!["P1".to_string()];
    record.is_decoy = Some(false);
    record.additional_scores = vec![AdditionalScore::new("percolator:Q value", Some(0.001))];

    let entry = BestMatchEntry::from(record);
    assert_eq!(entry.error_probability, Some(0.02));
    assert_eq!(entry.protein_accessions, vec!["P1"]);
    assert_eq!(entry.is_decoy, Some(false));
    assert_eq!(entry.additional_scores.len(), 1);
}
