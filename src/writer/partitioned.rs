use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray, UInt32Array};
use arrow::compute::take;
use arrow::datatypes::{
    DataType, Int16Type, Int32Type, Int64Type, Int8Type, SchemaRef, UInt16Type, UInt32Type,
    UInt8Type,
};
use arrow::record_batch::RecordBatch;
use log::{debug, info, warn};

use crate::metadata::DatasetMetadata;
use crate::schema::{is_partitionable, validate_schema};

use super::config::WriterConfig;
use super::error::WriterError;
use super::file_writer::DatasetFileWriter;
use super::stats::{DatasetWriterStats, PartitionFileStats};

/// How batches are distributed over output files
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PartitionPolicy {
    /// Every batch goes to the configured output path
    #[default]
    Single,
    /// One file per distinct value of the named column
    Column(String),
}

impl PartitionPolicy {
    /// Partition by a column, or not at all when `None`
    pub fn from_column(column: Option<&str>) -> Self {
        column.map_or(Self::Single, |c| Self::Column(c.to_string()))
    }

    /// The partition column, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Single => None,
            Self::Column(column) => Some(column),
        }
    }

    /// Check the policy against a schema without touching the filesystem
    pub fn validate(&self, schema: &SchemaRef) -> Result<(), WriterError> {
        match self {
            Self::Single => Ok(()),
            Self::Column(column) => resolve_partition_column(schema, column).map(|_| ()),
        }
    }
}

/// A distinct value of the partition column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionValue {
    /// Null cell
    Null,
    /// Integer cell of any width
    Int(i64),
    /// Boolean cell
    Bool(bool),
    /// Text cell
    Text(String),
}

impl PartitionValue {
    fn from_array(array: &dyn Array, row: usize) -> Result<Self, WriterError> {
        if array.is_null(row) {
            return Ok(Self::Null);
        }
        let value = match array.data_type() {
            DataType::Utf8 => Self::Text(array.as_string::<i32>().value(row).to_string()),
            DataType::LargeUtf8 => Self::Text(array.as_string::<i64>().value(row).to_string()),
            DataType::Int8 => Self::Int(array.as_primitive::<Int8Type>().value(row).into()),
            DataType::Int16 => Self::Int(array.as_primitive::<Int16Type>().value(row).into()),
            DataType::Int32 => Self::Int(array.as_primitive::<Int32Type>().value(row).into()),
            DataType::Int64 => Self::Int(array.as_primitive::<Int64Type>().value(row)),
            DataType::UInt8 => Self::Int(array.as_primitive::<UInt8Type>().value(row).into()),
            DataType::UInt16 => Self::Int(array.as_primitive::<UInt16Type>().value(row).into()),
            DataType::UInt32 => Self::Int(array.as_primitive::<UInt32Type>().value(row).into()),
            DataType::Boolean => Self::Bool(array.as_boolean().value(row)),
            other => {
                return Err(WriterError::ConfigurationError(format!(
                    "cannot partition on a {other:?} column"
                )))
            }
        };
        Ok(value)
    }

    /// The value as it appears in a file name
    pub fn file_component(&self) -> String {
        self.to_string()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for PartitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

struct OpenPartition {
    path: PathBuf,
    writer: DatasetFileWriter<File>,
}

/// Writer that splits a stream of record batches over one file per partition.
///
/// Files are opened lazily on the first row for their partition and reused for
/// every later batch. [`PartitionedWriter::finish`] closes all of them; a writer
/// dropped without `finish` closes its files and logs a warning.
///
/// ```no_run
/// use quantmsio::metadata::{DatasetMetadata, FileType};
/// use quantmsio::schema::create_feature_schema_arc;
/// use quantmsio::writer::{PartitionPolicy, PartitionedWriter, WriterConfig};
///
/// let mut writer = PartitionedWriter::new(
///     "features.parquet",
///     create_feature_schema_arc(),
///     &DatasetMetadata::new(FileType::Feature),
///     PartitionPolicy::Column("precursor_charge".to_string()),
///     WriterConfig::default(),
/// )?;
/// // writer.write(&batch)?;
/// let stats = writer.finish()?;
/// println!("{stats}");
/// # Ok::<(), quantmsio::writer::WriterError>(())
/// ```
pub struct PartitionedWriter {
    base_path: PathBuf,
    schema: SchemaRef,
    policy: PartitionPolicy,
    partition_index: Option<usize>,
    config: WriterConfig,
    footer: HashMap<String, String>,
    writers: HashMap<PartitionValue, OpenPartition>,
    open_order: Vec<PartitionValue>,
    used_paths: HashSet<PathBuf>,
    rows_written: usize,
}

impl PartitionedWriter {
    /// Create a writer; no file is opened until the first non-empty write.
    ///
    /// A partition column that is empty, unknown to the schema, or of a type
    /// that cannot be partitioned on is rejected here.
    pub fn new<P: AsRef<Path>>(
        base_path: P,
        schema: SchemaRef,
        metadata: &DatasetMetadata,
        policy: PartitionPolicy,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        let base_path = base_path.as_ref().to_path_buf();
        if base_path.file_stem().is_none() {
            return Err(WriterError::ConfigurationError(format!(
                "output path '{}' has no file name",
                base_path.display()
            )));
        }

        let partition_index = match &policy {
            PartitionPolicy::Single => None,
            PartitionPolicy::Column(column) => Some(resolve_partition_column(&schema, column)?),
        };

        let footer = metadata
            .clone()
            .with_partition(policy.column())
            .to_parquet_metadata()?;

        Ok(Self {
            base_path,
            schema,
            policy,
            partition_index,
            config,
            footer,
            writers: HashMap::new(),
            open_order: Vec::new(),
            used_paths: HashSet::new(),
            rows_written: 0,
        })
    }

    /// The partition policy
    pub fn policy(&self) -> &PartitionPolicy {
        &self.policy
    }

    /// Number of files currently open
    pub fn open_files(&self) -> usize {
        self.writers.len()
    }

    /// Rows written so far across all partitions
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append a batch, splitting it by partition value when partitioned
    pub fn write(&mut self, batch: &RecordBatch) -> Result<(), WriterError> {
        validate_schema(&self.schema, batch.schema().as_ref())?;
        if batch.num_rows() == 0 {
            return Ok(());
        }

        let Some(index) = self.partition_index else {
            return self.write_partition(PartitionValue::Null, batch);
        };

        let mut groups = split_rows(batch.column(index))?;
        if groups.len() == 1 {
            let (value, _) = groups.remove(0);
            return self.write_partition(value, batch);
        }

        for (value, rows) in groups {
            let indices = UInt32Array::from(rows);
            let columns = batch
                .columns()
                .iter()
                .map(|column| take(column.as_ref(), &indices, None))
                .collect::<Result<Vec<_>, _>>()?;
            let part = RecordBatch::try_new(batch.schema(), columns)?;
            self.write_partition(value, &part)?;
        }
        Ok(())
    }

    fn write_partition(
        &mut self,
        value: PartitionValue,
        batch: &RecordBatch,
    ) -> Result<(), WriterError> {
        let partition = match self.writers.entry(value) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = match self.partition_index {
                    None => self.base_path.clone(),
                    Some(_) => partition_path(&self.base_path, entry.key(), &self.used_paths),
                };
                info!("Opening output file {}", path.display());
                let writer = DatasetFileWriter::new_file(
                    &path,
                    self.schema.clone(),
                    &self.config,
                    &self.footer,
                )?;
                self.used_paths.insert(path.clone());
                self.open_order.push(entry.key().clone());
                entry.insert(OpenPartition { path, writer })
            }
        };

        partition.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Close every file that was opened, in opening order.
    ///
    /// All files are closed even if one fails; the first failure is returned.
    pub fn finish(mut self) -> Result<DatasetWriterStats, WriterError> {
        let files = self.close_all()?;
        let stats = DatasetWriterStats {
            rows_written: self.rows_written,
            files,
        };
        info!("{stats}");
        Ok(stats)
    }

    fn close_all(&mut self) -> Result<Vec<PartitionFileStats>, WriterError> {
        let mut files = Vec::with_capacity(self.open_order.len());
        let mut first_error = None;

        for value in std::mem::take(&mut self.open_order) {
            let Some(partition) = self.writers.remove(&value) else {
                continue;
            };
            match partition.writer.finish() {
                Ok(stats) => {
                    debug!("Closed {}: {}", partition.path.display(), stats);
                    files.push(PartitionFileStats {
                        path: partition.path,
                        partition: self.partition_index.map(|_| value.to_string()),
                        stats,
                    });
                }
                Err(e) => {
                    warn!("Failed to close {}: {}", partition.path.display(), e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(files),
        }
    }
}

impl Drop for PartitionedWriter {
    fn drop(&mut self) {
        if self.writers.is_empty() {
            return;
        }
        warn!(
            "Partitioned writer dropped without finish, closing {} file(s)",
            self.writers.len()
        );
        if let Err(e) = self.close_all() {
            warn!("Error while closing output files: {e}");
        }
    }
}

fn resolve_partition_column(schema: &SchemaRef, column: &str) -> Result<usize, WriterError> {
    if column.is_empty() {
        return Err(WriterError::ConfigurationError(
            "partition column name is empty".to_string(),
        ));
    }
    let (index, field) = schema.column_with_name(column).ok_or_else(|| {
        WriterError::ConfigurationError(format!("unknown partition column '{column}'"))
    })?;
    if !is_partitionable(field.data_type()) {
        return Err(WriterError::ConfigurationError(format!(
            "cannot partition on column '{column}' of type {:?}",
            field.data_type()
        )));
    }
    Ok(index)
}

/// Row indices per distinct value, in first-encounter order
fn split_rows(column: &ArrayRef) -> Result<Vec<(PartitionValue, Vec<u32>)>, WriterError> {
    let mut groups: Vec<(PartitionValue, Vec<u32>)> = Vec::new();
    let mut lookup: HashMap<PartitionValue, usize> = HashMap::new();

    for row in 0..column.len() {
        let value = PartitionValue::from_array(column.as_ref(), row)?;
        let slot = match lookup.get(&value) {
            Some(&slot) => slot,
            None => {
                lookup.insert(value.clone(), groups.len());
                groups.push((value, Vec::new()));
                groups.len() - 1
            }
        };
        groups[slot].1.push(row as u32);
    }
    Ok(groups)
}

/// `<stem>-<value>.<ext>` next to the base path, made unique among used paths
fn partition_path(base: &Path, value: &PartitionValue, used: &HashSet<PathBuf>) -> PathBuf {
    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let extension = base.extension().map(|e| e.to_string_lossy());
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    let component = value.file_component();

    let name = |suffix: Option<usize>| {
        let mut name = format!("{stem}-{component}");
        if let Some(n) = suffix {
            name.push_str(&format!("-{n}"));
        }
        if let Some(ext) = &extension {
            name.push('.');
            name.push_str(ext);
        }
        parent.join(name)
    };

    let mut path = name(None);
    let mut n = 2;
    while used.contains(&path) {
        path = name(Some(n));
        n += 1;
    }
    path
}
