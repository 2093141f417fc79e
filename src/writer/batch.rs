//! Conversion of record structs into Arrow record batches

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, ListArray, StringArray, StructArray};
use arrow::buffer::{NullBuffer, OffsetBuffer, ScalarBuffer};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::peptidoform::ModificationAnnotation;
use crate::records::{
    AdditionalScore, BestMatchEntry, CvParam, FeatureRecord, IdentificationRecord, PsmRecord,
};
use crate::schema::{
    create_feature_schema_arc, create_psm_schema_arc, cv_param_fields, list_item_field,
    modification_fields, score_fields,
};

/// Build a list column from per-row optional item sequences.
///
/// `values` turns the flattened items of every row into the child array.
fn build_list<T, V, I>(
    item: DataType,
    rows: I,
    values: impl FnOnce(Vec<T>) -> Result<ArrayRef, ArrowError>,
) -> Result<ArrayRef, ArrowError>
where
    I: IntoIterator<Item = Option<V>>,
    V: IntoIterator<Item = T>,
{
    let mut offsets = vec![0i32];
    let mut validity = Vec::new();
    let mut items = Vec::new();

    for row in rows {
        match row {
            Some(row) => {
                items.extend(row);
                validity.push(true);
            }
            None => validity.push(false),
        }
        let offset = i32::try_from(items.len())
            .map_err(|_| ArrowError::ComputeError("list column exceeds i32 offsets".into()))?;
        offsets.push(offset);
    }

    let values = values(items)?;
    let list = ListArray::try_new(
        list_item_field(item),
        OffsetBuffer::new(ScalarBuffer::from(offsets)),
        values,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(list))
}

fn string_list<'a, V, I>(rows: I) -> Result<ArrayRef, ArrowError>
where
    I: IntoIterator<Item = Option<V>>,
    V: IntoIterator<Item = &'a str>,
{
    build_list(DataType::Utf8, rows, |items: Vec<&str>| {
        Ok(Arc::new(StringArray::from(items)) as ArrayRef)
    })
}

pub(crate) fn int_list<V, I>(rows: I) -> Result<ArrayRef, ArrowError>
where
    I: IntoIterator<Item = Option<V>>,
    V: IntoIterator<Item = i32>,
{
    build_list(DataType::Int32, rows, |items: Vec<i32>| {
        Ok(Arc::new(Int32Array::from(items)) as ArrayRef)
    })
}

fn modification_list<'a, V, I>(rows: I) -> Result<ArrayRef, ArrowError>
where
    I: IntoIterator<Item = Option<V>>,
    V: IntoIterator<Item = (i32, &'a ModificationAnnotation)>,
{
    build_list(
        DataType::Struct(modification_fields()),
        rows,
        |items: Vec<(i32, &ModificationAnnotation)>| {
            let columns: Vec<ArrayRef> = vec![
                Arc::new(Int32Array::from_iter_values(items.iter().map(|(p, _)| *p))),
                Arc::new(StringArray::from_iter_values(
                    items.iter().map(|(_, a)| a.token.as_str()),
                )),
                Arc::new(StringArray::from_iter(
                    items.iter().map(|(_, a)| a.accession.as_deref()),
                )),
                Arc::new(Float64Array::from_iter(items.iter().map(|(_, a)| a.mass_delta))),
            ];
            Ok(Arc::new(StructArray::try_new(modification_fields(), columns, None)?) as ArrayRef)
        },
    )
}

fn score_list<'a, V, I>(rows: I) -> Result<ArrayRef, ArrowError>
where
    I: IntoIterator<Item = Option<V>>,
    V: IntoIterator<Item = &'a AdditionalScore>,
{
    build_list(
        DataType::Struct(score_fields()),
        rows,
        |items: Vec<&AdditionalScore>| {
            let columns: Vec<ArrayRef> = vec![
                Arc::new(StringArray::from_iter_values(items.iter().map(|s| s.name.as_str()))),
                Arc::new(Float64Array::from_iter(items.iter().map(|s| s.value))),
            ];
            Ok(Arc::new(StructArray::try_new(score_fields(), columns, None)?) as ArrayRef)
        },
    )
}

fn cv_param_list<'a, V, I>(rows: I) -> Result<ArrayRef, ArrowError>
where
    I: IntoIterator<Item = Option<V>>,
    V: IntoIterator<Item = &'a CvParam>,
{
    build_list(
        DataType::Struct(cv_param_fields()),
        rows,
        |items: Vec<&CvParam>| {
            let columns: Vec<ArrayRef> = vec![
                Arc::new(StringArray::from_iter_values(items.iter().map(|p| p.name.as_str()))),
                Arc::new(StringArray::from_iter(items.iter().map(|p| p.value.as_deref()))),
            ];
            Ok(Arc::new(StructArray::try_new(cv_param_fields(), columns, None)?) as ArrayRef)
        },
    )
}

/// Annotations paired with their flat positions
fn positioned<'a>(
    sequence: Option<&str>,
    modifications: Option<&'a Vec<ModificationAnnotation>>,
) -> Option<impl Iterator<Item = (i32, &'a ModificationAnnotation)>> {
    let len = sequence.map_or(0, str::len);
    modifications.map(move |mods| mods.iter().map(move |a| (a.position(len), a)))
}

fn strings<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(StringArray::from_iter(values))
}

fn floats(values: impl Iterator<Item = Option<f64>>) -> ArrayRef {
    Arc::new(Float64Array::from_iter(values))
}

fn ints(values: impl Iterator<Item = Option<i32>>) -> ArrayRef {
    Arc::new(Int32Array::from_iter(values))
}

/// Convert feature records into a batch of the feature schema
pub fn features_to_record_batch(records: &[FeatureRecord]) -> Result<RecordBatch, ArrowError> {
    features_to_record_batch_with_schema(records, create_feature_schema_arc())
}

/// Same as [`features_to_record_batch`] with a prebuilt schema
pub fn features_to_record_batch_with_schema(
    records: &[FeatureRecord],
    schema: SchemaRef,
) -> Result<RecordBatch, ArrowError> {
    fn best(r: &FeatureRecord) -> Option<&BestMatchEntry> {
        r.best_match.as_ref()
    }

    let columns: Vec<ArrayRef> = vec![
        strings(records.iter().map(|r| r.sequence.as_deref())),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.quantification.peptidoform.as_str()),
        )),
        modification_list(
            records
                .iter()
                .map(|r| positioned(r.sequence.as_deref(), r.modifications.as_ref())),
        )?,
        ints(records.iter().map(|r| r.quantification.charge)),
        floats(records.iter().map(|r| best(r).and_then(|b| b.error_probability))),
        floats(records.iter().map(|r| best(r).and_then(|b| b.calculated_mz))),
        floats(records.iter().map(|r| best(r).and_then(|b| b.observed_mz))),
        string_list(
            records
                .iter()
                .map(|r| best(r).map(|b| b.protein_accessions.iter().map(String::as_str))),
        )?,
        ints(
            records
                .iter()
                .map(|r| best(r).and_then(|b| b.is_decoy).map(i32::from)),
        ),
        score_list(records.iter().map(|r| best(r).map(|b| b.additional_scores.iter())))?,
        cv_param_list(records.iter().map(|r| best(r).map(|b| b.cv_params.iter())))?,
        string_list(records.iter().map(|r| {
            Some(
                r.quantification
                    .protein_accessions
                    .iter()
                    .map(String::as_str),
            )
        }))?,
        floats(records.iter().map(|r| r.pg_global_qvalue)),
        ints(records.iter().map(|r| Some(i32::from(r.is_unique())))),
        floats(records.iter().map(|r| r.quantification.intensity)),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| r.quantification.source_file.as_str()),
        )),
        strings(records.iter().map(|r| r.quantification.condition.as_deref())),
        strings(
            records
                .iter()
                .map(|r| r.quantification.biological_replicate.as_deref()),
        ),
        strings(records.iter().map(|r| r.quantification.run.as_deref())),
        strings(records.iter().map(|r| r.quantification.fraction.as_deref())),
        strings(records.iter().map(|r| r.quantification.channel.as_deref())),
        floats(records.iter().map(|r| r.quantification.retention_time)),
        strings(records.iter().map(|r| {
            r.scan_reference
                .as_ref()
                .map(|s| s.reference_file_name.as_str())
        })),
        strings(
            records
                .iter()
                .map(|r| r.scan_reference.as_ref().map(|s| s.scan.as_str())),
        ),
        int_list(
            records
                .iter()
                .map(|r| r.protein_start_positions.as_ref().map(|p| p.iter().copied())),
        )?,
        int_list(
            records
                .iter()
                .map(|r| r.protein_end_positions.as_ref().map(|p| p.iter().copied())),
        )?,
    ];

    RecordBatch::try_new(schema, columns)
}

/// Convert PSM records into a batch of the PSM schema
pub fn psms_to_record_batch(records: &[PsmRecord]) -> Result<RecordBatch, ArrowError> {
    psms_to_record_batch_with_schema(records, create_psm_schema_arc())
}

/// Same as [`psms_to_record_batch`] with a prebuilt schema
pub fn psms_to_record_batch_with_schema(
    records: &[PsmRecord],
    schema: SchemaRef,
) -> Result<RecordBatch, ArrowError> {
    fn id(r: &PsmRecord) -> &IdentificationRecord {
        &r.identification
    }
    let no_positions = || records.iter().map(|_| None::<Vec<i32>>);

    let columns: Vec<ArrayRef> = vec![
        strings(records.iter().map(|r| r.sequence.as_deref())),
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| id(r).peptidoform.as_str()),
        )),
        modification_list(
            records
                .iter()
                .map(|r| positioned(r.sequence.as_deref(), r.modifications.as_ref())),
        )?,
        ints(records.iter().map(|r| id(r).charge)),
        floats(records.iter().map(|r| id(r).error_probability)),
        floats(records.iter().map(|r| id(r).calculated_mz)),
        floats(records.iter().map(|r| id(r).observed_mz)),
        string_list(
            records
                .iter()
                .map(|r| Some(id(r).protein_accessions.iter().map(String::as_str))),
        )?,
        ints(records.iter().map(|r| id(r).is_decoy.map(i32::from))),
        score_list(records.iter().map(|r| Some(id(r).additional_scores.iter())))?,
        cv_param_list(records.iter().map(|r| Some(id(r).cv_params.iter())))?,
        Arc::new(StringArray::from_iter_values(
            records.iter().map(|r| id(r).source_file.as_str()),
        )),
        floats(records.iter().map(|r| id(r).retention_time)),
        strings(records.iter().map(|r| id(r).scan.as_deref())),
        int_list(no_positions())?,
        int_list(no_positions())?,
    ];

    RecordBatch::try_new(schema, columns)
}
