use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, FieldRef, Fields, Schema, SchemaBuilder};

use super::columns;
use super::constants::{KEY_SCHEMA_DESCRIPTION, KEY_VERSION, QUANTMSIO_VERSION};

/// Creates a Field with CV term metadata annotation
fn field_with_cv(name: &str, data_type: DataType, nullable: bool, cv_accession: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("cv_accession".to_string(), cv_accession.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

/// Nullable item field named `item`, shared by every list column
pub fn list_item_field(item: DataType) -> FieldRef {
    Arc::new(Field::new(columns::LIST_ITEM, item, true))
}

/// `List<item>` with a nullable item field named `item`
pub fn list_of(item: DataType) -> DataType {
    DataType::List(list_item_field(item))
}

/// Fields of one modification annotation
pub fn modification_fields() -> Fields {
    Fields::from(vec![
        Field::new(columns::MOD_POSITION, DataType::Int32, false),
        Field::new(columns::NAME, DataType::Utf8, false),
        Field::new(columns::MOD_ACCESSION, DataType::Utf8, true),
        Field::new(columns::MOD_MASS_DELTA, DataType::Float64, true),
    ])
}

/// Fields of one named score
pub fn score_fields() -> Fields {
    Fields::from(vec![
        Field::new(columns::NAME, DataType::Utf8, false),
        Field::new(columns::VALUE, DataType::Float64, true),
    ])
}

/// Fields of one auxiliary parameter
pub fn cv_param_fields() -> Fields {
    Fields::from(vec![
        Field::new(columns::NAME, DataType::Utf8, false),
        Field::new(columns::VALUE, DataType::Utf8, true),
    ])
}

/// Columns shared by the head of both schemas
fn push_peptide_columns(builder: &mut SchemaBuilder) {
    builder.push(field_with_cv(
        columns::SEQUENCE,
        DataType::Utf8,
        true,
        "MS:1000888", // stripped peptide sequence
    ));
    builder.push(field_with_cv(
        columns::PEPTIDOFORM,
        DataType::Utf8,
        false,
        "MS:1000889", // peptidoform sequence
    ));
    builder.push(Field::new(
        columns::MODIFICATIONS,
        list_of(DataType::Struct(modification_fields())),
        true,
    ));
    builder.push(field_with_cv(
        columns::PRECURSOR_CHARGE,
        DataType::Int32,
        true,
        "MS:1000041", // charge state
    ));
    builder.push(field_with_cv(
        columns::POSTERIOR_ERROR_PROBABILITY,
        DataType::Float64,
        true,
        "MS:1001493", // posterior error probability
    ));
    builder.push(Field::new(columns::CALCULATED_MZ, DataType::Float64, true));
    builder.push(field_with_cv(
        columns::OBSERVED_MZ,
        DataType::Float64,
        true,
        "MS:1000744", // selected ion m/z
    ));
}

/// Identification payload columns, after the accession column
fn push_identification_columns(builder: &mut SchemaBuilder) {
    builder.push(field_with_cv(
        columns::IS_DECOY,
        DataType::Int32,
        true,
        "MS:1002217", // decoy peptide
    ));
    builder.push(Field::new(
        columns::ADDITIONAL_SCORES,
        list_of(DataType::Struct(score_fields())),
        true,
    ));
    builder.push(Field::new(
        columns::CV_PARAMS,
        list_of(DataType::Struct(cv_param_fields())),
        true,
    ));
}

fn push_occurrence_columns(builder: &mut SchemaBuilder) {
    builder.push(Field::new(
        columns::PROTEIN_START_POSITIONS,
        list_of(DataType::Int32),
        true,
    ));
    builder.push(Field::new(
        columns::PROTEIN_END_POSITIONS,
        list_of(DataType::Int32),
        true,
    ));
}

fn with_schema_metadata(schema: Schema, description: &str) -> Schema {
    let mut metadata = HashMap::new();
    metadata.insert(KEY_VERSION.to_string(), QUANTMSIO_VERSION.to_string());
    metadata.insert(KEY_SCHEMA_DESCRIPTION.to_string(), description.to_string());
    schema.with_metadata(metadata)
}

/// Creates the feature Arrow schema.
///
/// One row per quantification record, left-joined with its best identification.
///
/// # Example
///
/// ```
/// use quantmsio::schema::create_feature_schema;
///
/// let schema = create_feature_schema();
/// assert_eq!(schema.fields().len(), 26);
/// ```
pub fn create_feature_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    push_peptide_columns(&mut builder);
    builder.push(Field::new(
        columns::MP_ACCESSIONS,
        list_of(DataType::Utf8),
        true,
    ));
    push_identification_columns(&mut builder);

    // Quantification columns
    builder.push(Field::new(
        columns::PG_ACCESSIONS,
        list_of(DataType::Utf8),
        true,
    ));
    builder.push(Field::new(columns::PG_GLOBAL_QVALUE, DataType::Float64, true));
    builder.push(Field::new(columns::UNIQUE, DataType::Int32, true));
    builder.push(field_with_cv(
        columns::INTENSITY,
        DataType::Float64,
        true,
        "MS:1000042", // peak intensity
    ));
    builder.push(Field::new(
        columns::REFERENCE_FILE_NAME,
        DataType::Utf8,
        false,
    ));
    builder.push(Field::new(columns::CONDITION, DataType::Utf8, true));
    builder.push(Field::new(columns::BIOLOGICAL_REPLICATE, DataType::Utf8, true));
    builder.push(Field::new(columns::RUN, DataType::Utf8, true));
    builder.push(Field::new(columns::FRACTION, DataType::Utf8, true));
    builder.push(Field::new(columns::CHANNEL, DataType::Utf8, true));
    builder.push(field_with_cv(
        columns::RT,
        DataType::Float64,
        true,
        "MS:1000016", // scan start time
    ));

    // Best scan reference
    builder.push(Field::new(
        columns::SCAN_REFERENCE_FILE_NAME,
        DataType::Utf8,
        true,
    ));
    builder.push(field_with_cv(
        columns::SCAN,
        DataType::Utf8,
        true,
        "MS:1000797", // peak list scans
    ));

    push_occurrence_columns(&mut builder);

    with_schema_metadata(
        builder.finish(),
        "Quantification features reconciled with their best identification",
    )
}

/// Returns an Arc-wrapped feature schema for shared ownership
pub fn create_feature_schema_arc() -> Arc<Schema> {
    Arc::new(create_feature_schema())
}

/// Creates the PSM Arrow schema.
///
/// # Example
///
/// ```
/// use quantmsio::schema::create_psm_schema;
///
/// let schema = create_psm_schema();
/// assert_eq!(schema.fields().len(), 16);
/// ```
pub fn create_psm_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    push_peptide_columns(&mut builder);
    builder.push(Field::new(
        columns::PROTEIN_ACCESSIONS,
        list_of(DataType::Utf8),
        true,
    ));
    push_identification_columns(&mut builder);
    builder.push(Field::new(
        columns::REFERENCE_FILE_NAME,
        DataType::Utf8,
        false,
    ));
    builder.push(field_with_cv(
        columns::RT,
        DataType::Float64,
        true,
        "MS:1000016", // scan start time
    ));
    builder.push(field_with_cv(
        columns::SCAN,
        DataType::Utf8,
        true,
        "MS:1000797", // peak list scans
    ));
    push_occurrence_columns(&mut builder);

    with_schema_metadata(builder.finish(), "Peptide-spectrum matches")
}

/// Returns an Arc-wrapped PSM schema for shared ownership
pub fn create_psm_schema_arc() -> Arc<Schema> {
    Arc::new(create_psm_schema())
}
