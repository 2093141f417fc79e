use super::*;
use crate::schema::{KEY_FILE_TYPE, KEY_METADATA, KEY_PARTITION};

const HEADER: &str = "MTD\tmzTab-version\t1.0.0\n\
MTD\tms_run[1]-location\tfile:///data/run_a.mzML\n\
MTD\tms_run[2]-location\tfile:///data/run_b.mzML\n\
MTD\tfixed_mod[1]\t[UNIMOD, UNIMOD:4, Carbamidomethyl, ]\n\
MTD\tfixed_mod[1]-site\tC\n\
MTD\tvariable_mod[1]\t[UNIMOD, UNIMOD:35, Oxidation, ]\n\
MTD\tvariable_mod[1]-site\tM\n\
MTD\tpsm_search_engine_score[1]\t[MS, MS:1001491, percolator:Q value, ]\n\
MTD\tpsm_search_engine_score[2]\t[MS, MS:1002053, MS-GF:SpecEValue, ]\n\
\n\
PRH\taccession\tdescription\tbest_search_engine_score[1]\n\
PRT\tP12345\tfirst\t0.001\n\
PRT\tP67890\tsecond\tnull\n\
\n\
PSH\tsequence\tPSM_ID\n\
PSM\tPEPTIDE\t1\n";

#[test]
fn test_parse_mztab_header() {
    let metadata = IdentificationMetadata::from_mztab_reader(HEADER.as_bytes()).unwrap();

    assert_eq!(metadata.ms_runs.len(), 2);
    assert_eq!(metadata.ms_runs["ms_run[1]"], "run_a");
    assert_eq!(metadata.ms_runs["ms_run[2]"], "run_b");

    assert_eq!(metadata.modifications.len(), 2);
    let oxidation = metadata.modifications.get("Oxidation").unwrap();
    assert_eq!(oxidation.accession.as_deref(), Some("UNIMOD:35"));
    assert_eq!(oxidation.site.as_deref(), Some("M"));
    assert_eq!(oxidation.kind, ModificationKind::Variable);
    assert!((oxidation.mass_delta.unwrap() - 15.994915).abs() < 1e-9);

    let carbamidomethyl = metadata.modifications.get("Carbamidomethyl").unwrap();
    assert_eq!(carbamidomethyl.kind, ModificationKind::Fixed);

    assert_eq!(
        metadata.score_names,
        vec![
            ScoreName {
                name: "percolator:Q value".to_string(),
                column: "search_engine_score[1]".to_string(),
            },
            ScoreName {
                name: "MS-GF:SpecEValue".to_string(),
                column: "search_engine_score[2]".to_string(),
            },
        ]
    );

    assert_eq!(metadata.protein_qvalues.len(), 1);
    assert_eq!(metadata.protein_qvalues["P12345"], 0.001);
}

#[test]
fn test_placeholder_modification_is_skipped() {
    let header = "MTD\tfixed_mod[1]\t[MS, MS:1002453, No fixed modifications searched, ]\n";
    let metadata = IdentificationMetadata::from_mztab_reader(header.as_bytes()).unwrap();
    assert!(metadata.modifications.is_empty());
}

#[test]
fn test_source_file_from_spectra_ref() {
    let metadata = IdentificationMetadata::from_mztab_reader(HEADER.as_bytes()).unwrap();
    assert_eq!(
        metadata.source_file("ms_run[2]:controllerType=0 controllerNumber=1 scan=17"),
        Some("run_b")
    );
    assert_eq!(metadata.source_file("ms_run[9]:scan=1"), None);
    assert_eq!(metadata.source_file("no-run-prefix"), None);
}

#[test]
fn test_protein_qvalue_lookup() {
    let mut metadata = IdentificationMetadata::new();
    metadata.protein_qvalues.insert("P1".to_string(), 0.01);
    metadata.protein_qvalues.insert("P1;P2".to_string(), 0.02);

    assert_eq!(metadata.protein_qvalue(&["P1".to_string()]), Some(0.01));
    assert_eq!(
        metadata.protein_qvalue(&["P1".to_string(), "P2".to_string()]),
        Some(0.02)
    );
    assert_eq!(metadata.protein_qvalue(&[]), None);
}

#[test]
fn test_invalid_parameter() {
    let header = "MTD\tvariable_mod[1]\tOxidation\n";
    let result = IdentificationMetadata::from_mztab_reader(header.as_bytes());
    assert!(matches!(result, Err(MetadataError::InvalidFormat(_))));
}

#[test]
fn test_missing_mztab_file() {
    let result = IdentificationMetadata::from_mztab_file("/definitely/not/here.mzTab");
    assert!(matches!(result, Err(MetadataError::MissingFile(_))));
}

#[test]
fn test_token_in_several_slots_merges_sites() {
    let header = "MTD\tvariable_mod[1]\t[UNIMOD, UNIMOD:35, Oxidation, ]\n\
MTD\tvariable_mod[1]-site\tM\n\
MTD\tvariable_mod[2]\t[UNIMOD, UNIMOD:21, Phospho, ]\n\
MTD\tvariable_mod[2]-site\tS\n\
MTD\tvariable_mod[3]\t[UNIMOD, UNIMOD:21, Phospho, ]\n\
MTD\tvariable_mod[3]-site\tT\n\
MTD\tvariable_mod[4]\t[UNIMOD, UNIMOD:21, Phospho, ]\n\
MTD\tvariable_mod[4]-site\tY\n";

    for _ in 0..8 {
        let metadata = IdentificationMetadata::from_mztab_reader(header.as_bytes()).unwrap();
        assert_eq!(metadata.modifications.len(), 2);
        let phospho = metadata.modifications.get("Phospho").unwrap();
        assert_eq!(phospho.site.as_deref(), Some("S,T,Y"));
        assert_eq!(phospho.kind, ModificationKind::Variable);
        assert_eq!(phospho.accession.as_deref(), Some("UNIMOD:21"));
    }
}

#[test]
fn test_dataset_metadata_footer() {
    let metadata = DatasetMetadata::new(FileType::Feature)
        .with_source_file("experiment.mzTab")
        .with_modifications(["Oxidation", "Phospho"])
        .with_partition(Some("precursor_charge"));

    let footer = metadata.to_parquet_metadata().unwrap();
    assert_eq!(footer[KEY_FILE_TYPE], "feature");
    assert_eq!(footer[KEY_PARTITION], "precursor_charge");

    let restored = DatasetMetadata::from_json(&footer[KEY_METADATA]).unwrap();
    assert_eq!(restored.uuid, metadata.uuid);
    assert_eq!(restored.modifications, vec!["Oxidation", "Phospho"]);
}

#[test]
fn test_modification_map_is_sorted() {
    let map: ModificationMap = [
        ("Phospho", ModificationInfo::new("UNIMOD:21")),
        ("Acetyl", ModificationInfo::new("UNIMOD:1")),
        ("Oxidation", ModificationInfo::new("UNIMOD:35")),
    ]
    .into_iter()
    .collect();

    let tokens: Vec<&str> = map.tokens().collect();
    assert_eq!(tokens, vec!["Acetyl", "Oxidation", "Phospho"]);
    assert_eq!(map.to_string(), "3 modification(s): Acetyl, Oxidation, Phospho");
}
