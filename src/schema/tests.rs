use super::*;
use arrow::datatypes::{DataType, Field, Schema};

#[test]
fn test_feature_schema_creation() {
    let schema = create_feature_schema();
    assert_eq!(schema.fields().len(), 26);

    assert!(schema.field_with_name(columns::SEQUENCE).is_ok());
    assert!(schema.field_with_name(columns::PG_GLOBAL_QVALUE).is_ok());
    assert!(schema.field_with_name(columns::SCAN_REFERENCE_FILE_NAME).is_ok());
    assert!(schema.field_with_name(columns::PROTEIN_ACCESSIONS).is_err());

    let peptidoform = schema.field_with_name(columns::PEPTIDOFORM).unwrap();
    assert!(!peptidoform.is_nullable());
}

#[test]
fn test_psm_schema_creation() {
    let schema = create_psm_schema();
    assert_eq!(schema.fields().len(), 16);
    assert!(schema.field_with_name(columns::PROTEIN_ACCESSIONS).is_ok());
    assert!(schema.field_with_name(columns::INTENSITY).is_err());
}

#[test]
fn test_nested_column_types() {
    let schema = create_feature_schema();

    let modifications = schema.field_with_name(columns::MODIFICATIONS).unwrap();
    match modifications.data_type() {
        DataType::List(item) => {
            assert_eq!(item.name(), columns::LIST_ITEM);
            assert_eq!(item.data_type(), &DataType::Struct(modification_fields()));
        }
        other => panic!("expected list, found {other:?}"),
    }

    let starts = schema
        .field_with_name(columns::PROTEIN_START_POSITIONS)
        .unwrap();
    assert_eq!(starts.data_type(), &list_of(DataType::Int32));
}

#[test]
fn test_cv_metadata() {
    let schema = create_feature_schema();
    let charge = schema.field_with_name(columns::PRECURSOR_CHARGE).unwrap();
    assert_eq!(charge.metadata().get("cv_accession").unwrap(), "MS:1000041");
    assert_eq!(schema.metadata().get(KEY_VERSION).unwrap(), QUANTMSIO_VERSION);
}

#[test]
fn test_schema_validation() {
    let schema = create_feature_schema();
    assert!(validate_schema(&schema, &schema).is_ok());
    // metadata does not take part in validation
    let bare = Schema::new(schema.fields().clone());
    assert!(validate_schema(&schema, &bare).is_ok());

    assert!(matches!(
        validate_schema(&schema, &create_psm_schema()),
        Err(SchemaValidationError::MissingColumn(_))
    ));
}

#[test]
fn test_schema_validation_type_mismatch() {
    let expected = Schema::new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ]);
    let actual = Schema::new(vec![
        Field::new("a", DataType::Int64, true),
        Field::new("b", DataType::Utf8, true),
    ]);
    assert!(matches!(
        validate_schema(&expected, &actual),
        Err(SchemaValidationError::TypeMismatch { column, .. }) if column == "a"
    ));
}

#[test]
fn test_schema_validation_order_and_extra_columns() {
    let expected = Schema::new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
    ]);
    let swapped = Schema::new(vec![
        Field::new("b", DataType::Utf8, true),
        Field::new("a", DataType::Int32, true),
    ]);
    assert!(matches!(
        validate_schema(&expected, &swapped),
        Err(SchemaValidationError::ColumnOrder { expected: 0, found: 1, .. })
    ));

    let extra = Schema::new(vec![
        Field::new("a", DataType::Int32, true),
        Field::new("b", DataType::Utf8, true),
        Field::new("c", DataType::Utf8, true),
    ]);
    assert!(matches!(
        validate_schema(&expected, &extra),
        Err(SchemaValidationError::UnexpectedColumn(c)) if c == "c"
    ));
}

#[test]
fn test_partitionable_types() {
    assert!(is_partitionable(&DataType::Int32));
    assert!(is_partitionable(&DataType::Utf8));
    assert!(!is_partitionable(&DataType::Float64));
    assert!(!is_partitionable(&list_of(DataType::Utf8)));
}
