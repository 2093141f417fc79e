use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::MetadataError;
use crate::schema::{
    KEY_CREATION_DATE, KEY_FILE_TYPE, KEY_METADATA, KEY_PARTITION, KEY_UUID, KEY_VERSION,
    QUANTMSIO_VERSION,
};

/// Kind of dataset stored in a Parquet file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Reconciled quantification features
    Feature,
    /// Peptide-spectrum matches
    Psm,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Feature => write!(f, "feature"),
            FileType::Psm => write!(f, "psm"),
        }
    }
}

/// Provenance embedded in the footer of every output file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Dataset kind
    pub file_type: FileType,
    /// Version of this library
    pub software_version: String,
    /// RFC 3339 creation timestamp
    pub creation_date: String,
    /// Unique dataset identifier
    pub uuid: String,
    /// Input files the dataset was derived from
    #[serde(default)]
    pub source_files: Vec<String>,
    /// Modification vocabulary tokens
    #[serde(default)]
    pub modifications: Vec<String>,
    /// Partition column, when the dataset is split into several files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
}

impl DatasetMetadata {
    /// Create metadata for a new dataset, stamped with the current time and a fresh UUID
    pub fn new(file_type: FileType) -> Self {
        Self {
            file_type,
            software_version: QUANTMSIO_VERSION.to_string(),
            creation_date: chrono::Utc::now().to_rfc3339(),
            uuid: uuid::Uuid::new_v4().to_string(),
            source_files: Vec::new(),
            modifications: Vec::new(),
            partition: None,
        }
    }

    /// Record an input file
    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_files.push(path.into());
        self
    }

    /// Record the modification vocabulary
    pub fn with_modifications<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifications = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Record the partition column
    pub fn with_partition(mut self, column: Option<&str>) -> Self {
        self.partition = column.map(str::to_string);
        self
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert to a HashMap suitable for Parquet key_value_metadata
    pub fn to_parquet_metadata(&self) -> Result<HashMap<String, String>, MetadataError> {
        let mut map = HashMap::new();
        map.insert(KEY_VERSION.to_string(), self.software_version.clone());
        map.insert(KEY_FILE_TYPE.to_string(), self.file_type.to_string());
        map.insert(KEY_CREATION_DATE.to_string(), self.creation_date.clone());
        map.insert(KEY_UUID.to_string(), self.uuid.clone());
        if let Some(partition) = &self.partition {
            map.insert(KEY_PARTITION.to_string(), partition.clone());
        }
        map.insert(KEY_METADATA.to_string(), self.to_json()?);
        Ok(map)
    }
}
