use std::collections::HashMap;
use std::fs::File;

use arrow::array::{Array, AsArray};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::*;
use crate::records::{IdentificationRecord, PsmRecord};
use crate::schema::{create_psm_schema_arc, PROTEIN_END_POSITIONS, PROTEIN_START_POSITIONS};
use crate::writer::{psms_to_record_batch, DatasetFileWriter, WriterConfig};

fn proteins() -> HashMap<String, String> {
    [
        ("P1", "MKPEPTIDEKPEPTIDE"),
        ("P2", "AAAAA"),
        ("P3", "GGGPEPTIDE"),
    ]
    .into_iter()
    .map(|(a, s)| (a.to_string(), s.to_string()))
    .collect()
}

fn brute_force(peptide: &str, protein: &str) -> Vec<usize> {
    if peptide.is_empty() || peptide.len() > protein.len() {
        return Vec::new();
    }
    (0..=protein.len() - peptide.len())
        .filter(|&i| &protein[i..i + peptide.len()] == peptide)
        .collect()
}

#[test]
fn test_all_occurrences_in_accession_order() {
    let mut mapper = ProteinOccurrenceMapper::new(proteins());
    let found = mapper.occurrences("PEPTIDE", &["P3", "P1"]);

    let spans: Vec<(&str, usize, usize)> = found
        .iter()
        .map(|o| (o.protein_accession.as_str(), o.start, o.end))
        .collect();
    assert_eq!(spans, vec![("P3", 3, 9), ("P1", 2, 8), ("P1", 10, 16)]);

    let protein = mapper.sequence("P1").unwrap().to_string();
    for o in &found {
        let sequence = mapper.sequence(&o.protein_accession).unwrap();
        assert_eq!(&sequence[o.start..=o.end], "PEPTIDE");
    }
    assert_eq!(&protein[2..=8], "PEPTIDE");
}

#[test]
fn test_overlapping_occurrences_are_reported() {
    let mut mapper = ProteinOccurrenceMapper::new(proteins());
    let (starts, ends) = mapper.positions("AAA", &["P2"]);
    assert_eq!(starts, vec![0, 1, 2]);
    assert_eq!(ends, vec![2, 3, 4]);
}

#[test]
fn test_missing_protein_and_absent_peptide() {
    let mut mapper = ProteinOccurrenceMapper::new(proteins());
    assert!(mapper.occurrences("PEPTIDE", &["P2", "UNKNOWN"]).is_empty());
    assert!(mapper.occurrences("", &["P1"]).is_empty());
    assert!(mapper.occurrences::<String>("PEPTIDE", &[]).is_empty());
}

#[test]
fn test_finder_is_built_once_per_peptide() {
    let mut mapper = ProteinOccurrenceMapper::new(proteins());
    for _ in 0..3 {
        mapper.occurrences("PEPTIDE", &["P1", "P3"]);
    }
    mapper.occurrences("AA", &["P2"]);
    assert_eq!(mapper.cached_peptides(), 2);
    assert_eq!(mapper.protein_count(), 3);
}

#[test]
fn test_matches_brute_force_scan() {
    let proteins = proteins();
    let mut mapper = ProteinOccurrenceMapper::new(proteins.clone());
    for peptide in ["P", "PE", "PEPTIDE", "EK", "A", "AAAAA", "AAAAAA", "K", "GGG", "X"] {
        for (accession, sequence) in &proteins {
            let starts: Vec<usize> = mapper
                .occurrences(peptide, &[accession])
                .iter()
                .map(|o| o.start)
                .collect();
            assert_eq!(starts, brute_force(peptide, sequence), "{peptide} in {accession}");
        }
    }
}

fn psm(peptide: Option<&str>, accessions: &[&str]) -> PsmRecord {
    let mut identification =
        IdentificationRecord::new("run_a", peptide.unwrap_or("PEP[Bad"), Some(2));
    identification.protein_accessions = accessions.iter().map(|a| a.to_string()).collect();
    PsmRecord {
        identification,
        sequence: peptide.map(str::to_string),
        modifications: peptide.map(|_| Vec::new()),
    }
}

fn write_psm_dataset(path: &std::path::Path, records: &[PsmRecord]) {
    let footer: HashMap<String, String> = [
        ("quantmsio:file_type".to_string(), "psm".to_string()),
        ("other:key".to_string(), "dropped".to_string()),
    ]
    .into_iter()
    .collect();
    let mut writer = DatasetFileWriter::new_file(
        path,
        create_psm_schema_arc(),
        &WriterConfig::default(),
        &footer,
    )
    .unwrap();
    writer.write(&psms_to_record_batch(records).unwrap()).unwrap();
    writer.finish().unwrap();
}

fn write_fasta(path: &std::path::Path) {
    std::fs::write(
        path,
        ">sp|P1|ONE_HUMAN\nMKPEPTIDEK\nPEPTIDE\n>sp|P3|THREE_HUMAN\nGGGPEPTIDE\n>sp|P9|UNUSED\nPEPTIDE\n",
    )
    .unwrap();
}

#[test]
fn test_enrich_psm_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("psm.parquet");
    let output = dir.path().join("psm-located.parquet");
    let fasta = dir.path().join("db.fasta");

    write_psm_dataset(
        &input,
        &[
            psm(Some("PEPTIDE"), &["P1", "P3"]),
            psm(Some("KLMN"), &["P1"]),
            psm(None, &["P1"]),
        ],
    );
    write_fasta(&fasta);

    let stats = enrich_dataset(&input, &fasta, &output, &WriterConfig::default()).unwrap();
    assert_eq!(stats.rows, 3);
    assert_eq!(stats.rows_located, 1);
    assert_eq!(stats.occurrences, 3);
    assert_eq!(stats.proteins_requested, 2);
    assert_eq!(stats.proteins_loaded, 2);

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&output).unwrap()).unwrap();
    let kv = builder.metadata().file_metadata().key_value_metadata().unwrap();
    assert!(kv.iter().any(|e| e.key == "quantmsio:file_type"));
    assert!(!kv.iter().any(|e| e.key == "other:key"));

    let batch = builder.build().unwrap().next().unwrap().unwrap();
    let starts = batch
        .column_by_name(PROTEIN_START_POSITIONS)
        .unwrap()
        .as_list::<i32>();
    let ends = batch
        .column_by_name(PROTEIN_END_POSITIONS)
        .unwrap()
        .as_list::<i32>();

    let row = |list: &arrow::array::ListArray, i: usize| -> Vec<i32> {
        list.value(i)
            .as_primitive::<arrow::datatypes::Int32Type>()
            .values()
            .to_vec()
    };
    assert_eq!(row(starts, 0), vec![2, 10, 3]);
    assert_eq!(row(ends, 0), vec![8, 16, 9]);
    assert!(row(starts, 1).is_empty());
    assert!(!starts.is_null(1));
    assert!(starts.is_null(2));
    assert!(ends.is_null(2));
}

#[test]
fn test_enrich_rejects_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("psm.parquet");
    let fasta = dir.path().join("db.fasta");
    write_psm_dataset(&input, &[psm(Some("PEPTIDE"), &["P1"])]);
    write_fasta(&fasta);

    let err = enrich_dataset(&input, &fasta, &input, &WriterConfig::default()).unwrap_err();
    assert!(matches!(err, LocateError::SameFile(_)));
}

#[test]
fn test_enrich_missing_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("psm.parquet");
    let output = dir.path().join("out.parquet");
    let fasta = dir.path().join("missing.fasta");

    let err = enrich_dataset(&input, &fasta, &output, &WriterConfig::default()).unwrap_err();
    assert!(matches!(err, LocateError::MissingFile(_)));

    write_psm_dataset(&input, &[psm(Some("PEPTIDE"), &["P1"])]);
    let err = enrich_dataset(&input, &fasta, &output, &WriterConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        LocateError::IngestError(crate::ingest::IngestError::MissingFile(_))
    ));
}
