use std::collections::HashSet;
use std::io::Cursor;

use super::*;
use crate::metadata::IdentificationMetadata;
use crate::records::AdditionalScore;

fn row(cells: &[&str]) -> String {
    let mut line = cells.join("\t");
    line.push('\n');
    line
}

fn mztab() -> String {
    let mut text = String::new();
    text += &row(&["MTD", "ms_run[1]-location", "file:///data/run_a.mzML"]);
    text += &row(&["MTD", "ms_run[2]-location", "file:///data/run_b.mzML"]);
    text += &row(&["MTD", "variable_mod[1]", "[UNIMOD, UNIMOD:35, Oxidation, ]"]);
    text += &row(&[
        "MTD",
        "psm_search_engine_score[1]",
        "[MS, MS:1001491, percolator:Q value, ]",
    ]);
    text += &row(&[
        "PSH",
        "sequence",
        "accession",
        "charge",
        "calc_mass_to_charge",
        "exp_mass_to_charge",
        "retention_time",
        "spectra_ref",
        "search_engine_score[1]",
        "opt_global_cv_MS:1000889_peptidoform_sequence",
        "opt_global_Posterior_Error_Probability_score",
        "opt_global_cv_MS:1002217_decoy_peptide",
        "opt_global_consensus_support",
    ]);
    text += &row(&[
        "PSM",
        "PEPMTIDE",
        "P1;P2",
        "2",
        "450.7",
        "450.71",
        "1200.5|1201.0",
        "ms_run[1]:controllerType=0 controllerNumber=1 scan=4012",
        "0.001",
        ".PEPM(Oxidation)TIDE.",
        "0.01",
        "0",
        "null",
    ]);
    text += &row(&[
        "PSM",
        "KLMN",
        "P3",
        "3.0",
        "null",
        "null",
        "null",
        "ms_run[2]:index=7",
        "null",
        "KLMN",
        "null",
        "1",
        "0.5",
    ]);
    text
}

fn metadata(text: &str) -> IdentificationMetadata {
    IdentificationMetadata::from_mztab_reader(text.as_bytes()).unwrap()
}

#[test]
fn test_psm_reader_maps_columns() {
    let text = mztab();
    let metadata = metadata(&text);
    let records: Vec<_> = PsmReader::from_reader(text.as_bytes(), &metadata, "test.mzTab")
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.source_file, "run_a");
    assert_eq!(first.peptidoform, "PEPM[Oxidation]TIDE");
    assert_eq!(first.charge, Some(2));
    assert_eq!(first.error_probability, Some(0.01));
    assert_eq!(first.calculated_mz, Some(450.7));
    assert_eq!(first.observed_mz, Some(450.71));
    assert_eq!(first.protein_accessions, vec!["P1", "P2"]);
    assert_eq!(first.is_decoy, Some(false));
    assert_eq!(first.retention_time, Some(1200.5));
    assert_eq!(first.scan.as_deref(), Some("4012"));
    assert_eq!(
        first.additional_scores,
        vec![AdditionalScore::new("percolator:Q value", Some(0.001))]
    );
    assert_eq!(first.cv_params.len(), 1);
    assert_eq!(first.cv_params[0].name, "consensus_support");
    assert_eq!(first.cv_params[0].value, None);

    let second = &records[1];
    assert_eq!(second.source_file, "run_b");
    assert_eq!(second.charge, Some(3));
    assert_eq!(second.error_probability, None);
    assert_eq!(second.calculated_mz, None);
    assert_eq!(second.is_decoy, Some(true));
    assert_eq!(second.scan.as_deref(), Some("7"));
    assert_eq!(second.additional_scores[0].value, None);
    assert_eq!(second.cv_params[0].value.as_deref(), Some("0.5"));
}

#[test]
fn test_psm_reader_protein_filter() {
    let text = mztab();
    let metadata = metadata(&text);
    let mut reader =
        PsmReader::from_reader(text.as_bytes(), &metadata, "test.mzTab").with_protein_filter(["P3"]);

    let record = reader.next().unwrap().unwrap();
    assert_eq!(record.peptidoform, "KLMN");
    assert!(reader.next().is_none());
    assert_eq!(reader.rows_read(), 2);
}

#[test]
fn test_psm_reader_unknown_run_is_invalid() {
    let mut text = mztab();
    text += &row(&[
        "PSM", "AAA", "P1", "2", "1", "1", "1", "ms_run[9]:scan=1", "0.1", "AAA", "0.1", "0", "null",
    ]);
    let metadata = metadata(&text);
    let results: Vec<_> = PsmReader::from_reader(text.as_bytes(), &metadata, "test.mzTab").collect();

    assert_eq!(results.len(), 3);
    assert!(matches!(
        &results[2],
        Err(IngestError::InvalidValue { column, line: 8, .. }) if column == "spectra_ref"
    ));
}

#[test]
fn test_psm_reader_requires_spectra_ref() {
    let text = row(&["PSH", "sequence", "charge"]) + &row(&["PSM", "AAA", "2"]);
    let metadata = IdentificationMetadata::new();
    let mut reader = PsmReader::from_reader(text.as_bytes(), &metadata, "broken.mzTab");

    assert!(matches!(
        reader.next(),
        Some(Err(IngestError::MissingColumn { ref column, .. })) if column == "spectra_ref"
    ));
}

#[test]
fn test_psm_reader_missing_file() {
    let metadata = IdentificationMetadata::new();
    let err = PsmReader::open("/nonexistent/input.mzTab", &metadata).err().unwrap();
    assert!(matches!(err, IngestError::MissingFile(_)));
}

const MSSTATS: &str = "\
ProteinName,PeptideSequence,PrecursorCharge,FragmentIon,ProductCharge,IsotopeLabelType,Condition,BioReplicate,Run,Intensity,Reference
P1;P2,.PEPM(Oxidation)TIDE.,2,NA,0,L,ctrl,1,1,1000.5,run_a.mzML
P3,KLMN,3,NA,0,L,treat,2,2,NA,/data/run_b.mzML
";

#[test]
fn test_quantification_reader_maps_columns() {
    let records: Vec<_> = QuantificationReader::from_reader(MSSTATS.as_bytes(), b',', "msstats")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.source_file, "run_a");
    assert_eq!(first.peptidoform, "PEPM[Oxidation]TIDE");
    assert_eq!(first.charge, Some(2));
    assert_eq!(first.intensity, Some(1000.5));
    assert_eq!(first.protein_accessions, vec!["P1", "P2"]);
    assert_eq!(first.condition.as_deref(), Some("ctrl"));
    assert_eq!(first.biological_replicate.as_deref(), Some("1"));
    assert_eq!(first.run.as_deref(), Some("1"));
    assert_eq!(first.fraction, None);
    assert_eq!(first.channel, None);
    assert_eq!(first.retention_time, None);

    let second = &records[1];
    assert_eq!(second.source_file, "run_b");
    assert_eq!(second.intensity, None);
}

#[test]
fn test_quantification_reader_chunks() {
    let mut reader = QuantificationReader::from_reader(MSSTATS.as_bytes(), b',', "msstats").unwrap();

    assert_eq!(reader.next_chunk(1).unwrap().len(), 1);
    assert_eq!(reader.next_chunk(10).unwrap().len(), 1);
    assert!(reader.next_chunk(10).unwrap().is_empty());
    assert_eq!(reader.rows_read(), 2);
}

#[test]
fn test_quantification_reader_missing_column() {
    let table = "ProteinName,PeptideSequence,Intensity,Reference\nP1,PEPTIDE,1.0,run_a\n";
    let err = QuantificationReader::from_reader(table.as_bytes(), b',', "msstats")
        .err()
        .unwrap();
    assert!(matches!(
        err,
        IngestError::MissingColumn { ref column, .. } if column == "PrecursorCharge"
    ));
}

#[test]
fn test_quantification_reader_missing_file() {
    let err = QuantificationReader::open("/nonexistent/msstats.csv").err().unwrap();
    assert!(matches!(err, IngestError::MissingFile(_)));
}

#[test]
fn test_bracket_notation() {
    assert_eq!(to_bracket_notation("PEPTIDE"), "PEPTIDE");
    assert_eq!(to_bracket_notation("PEP[Oxidation]TIDE"), "PEP[Oxidation]TIDE");
    assert_eq!(to_bracket_notation(".PEPTIDE."), "PEPTIDE");
    assert_eq!(
        to_bracket_notation(".(Acetyl)PEM(Oxidation)K.(Amidated)"),
        "[Acetyl]-PEM[Oxidation]K-[Amidated]"
    );
    assert_eq!(to_bracket_notation("(Acetyl)PEPTIDE"), "[Acetyl]-PEPTIDE");
    assert_eq!(
        to_bracket_notation("PEPK(Label:13C(6))"),
        "PEPK[Label:13C(6)]"
    );
    assert_eq!(to_bracket_notation("PEP(Oxidation"), "PEP(Oxidation");
}

#[test]
fn test_interior_dot_is_kept_and_rejected() {
    use std::sync::Arc;

    use crate::automaton::TokenAutomaton;
    use crate::metadata::ModificationInfo;
    use crate::peptidoform::{PeptidoformError, PeptidoformParser};

    assert_eq!(to_bracket_notation("A.B"), "A.B");
    assert_eq!(to_bracket_notation(".PEP.TIDE."), "PEP.TIDE");
    assert_eq!(
        to_bracket_notation("PEM(Oxidation).K.(Amidated)"),
        "PEM[Oxidation].K-[Amidated]"
    );

    let automaton = TokenAutomaton::build([("Oxidation", ModificationInfo::new("UNIMOD:35"))]).unwrap();
    let parser = PeptidoformParser::new(Arc::new(automaton));
    assert!(matches!(
        parser.parse(&to_bracket_notation("A.B")),
        Err(PeptidoformError::InvalidResidue { position: 1, found: '.', .. })
    ));
}

const FASTA: &str = "\
>sp|P12345|PROT1_HUMAN Protein one
MPEPTIDEK
LMN*
; comment
>P67890 plain header
acdef
>sp|P99999|PROT3_HUMAN
QQQ
";

#[test]
fn test_fasta_reader() {
    let records: Vec<_> = FastaReader::new(Cursor::new(FASTA))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        records,
        vec![
            FastaRecord {
                accession: "P12345".to_string(),
                sequence: "MPEPTIDEKLMN".to_string()
            },
            FastaRecord {
                accession: "P67890".to_string(),
                sequence: "ACDEF".to_string()
            },
            FastaRecord {
                accession: "P99999".to_string(),
                sequence: "QQQ".to_string()
            },
        ]
    );
}

#[test]
fn test_fasta_reader_filters_accessions() {
    let wanted: HashSet<String> = ["P67890".to_string()].into_iter().collect();
    let records: Vec<_> = FastaReader::new(Cursor::new(FASTA))
        .with_accessions(wanted)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sequence, "ACDEF");
}

#[test]
fn test_fasta_accession() {
    assert_eq!(fasta_accession("sp|P12345|NAME_HUMAN desc"), "P12345");
    assert_eq!(fasta_accession("P12345 desc"), "P12345");
    assert_eq!(fasta_accession("DECOY_P1"), "DECOY_P1");
    assert_eq!(fasta_accession(""), "");
}

#[test]
fn test_read_proteins_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.fasta");
    std::fs::write(&path, FASTA).unwrap();

    let wanted: HashSet<String> = ["P12345", "P99999", "MISSING"]
        .into_iter()
        .map(str::to_string)
        .collect();
    let proteins = read_proteins(&path, &wanted).unwrap();

    assert_eq!(proteins.len(), 2);
    assert_eq!(proteins["P99999"], "QQQ");
}
