use arrow::datatypes::{DataType, Schema};

/// Validates that a schema conforms exactly to an expected output schema.
///
/// Every expected column must be present with the same type and in the same
/// position, and no other column may appear. Schema-level and field-level
/// metadata are ignored.
pub fn validate_schema(expected: &Schema, actual: &Schema) -> Result<(), SchemaValidationError> {
    for (position, field) in expected.fields().iter().enumerate() {
        let (found_position, found) = actual
            .column_with_name(field.name())
            .ok_or_else(|| SchemaValidationError::MissingColumn(field.name().to_string()))?;

        if found.data_type() != field.data_type() {
            return Err(SchemaValidationError::TypeMismatch {
                column: field.name().to_string(),
                expected: format!("{:?}", field.data_type()),
                found: format!("{:?}", found.data_type()),
            });
        }
        if found_position != position {
            return Err(SchemaValidationError::ColumnOrder {
                column: field.name().to_string(),
                expected: position,
                found: found_position,
            });
        }
    }

    if let Some(extra) = actual
        .fields()
        .iter()
        .find(|f| expected.field_with_name(f.name()).is_err())
    {
        return Err(SchemaValidationError::UnexpectedColumn(
            extra.name().to_string(),
        ));
    }

    Ok(())
}

/// Whether a column type can be used to split output into partitions
pub fn is_partitionable(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::Boolean
    )
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column that is not part of the output schema
    #[error("Unexpected column: {0}")]
    UnexpectedColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },

    /// A column is present but at the wrong position
    #[error("Column '{column}' at position {found}, expected position {expected}")]
    ColumnOrder {
        /// Name of the misplaced column
        column: String,
        /// Expected position
        expected: usize,
        /// Actual position
        found: usize,
    },
}
