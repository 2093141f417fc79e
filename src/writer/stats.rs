use std::fmt;
use std::path::PathBuf;

/// Statistics from one completed output file
#[derive(Debug, Clone, Default)]
pub struct WriterStats {
    /// Number of rows written to the file
    pub rows_written: usize,
    /// Number of record batches appended
    pub batches_written: usize,
    /// Number of Parquet row groups written
    pub row_groups_written: usize,
    /// Uncompressed size of the row group data in bytes
    pub uncompressed_bytes: u64,
    /// Compressed size of the column chunks in bytes, excluding the footer
    pub compressed_bytes: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows ({} batches) in {} row groups",
            self.rows_written, self.batches_written, self.row_groups_written
        )
    }
}

/// Statistics for one partition file
#[derive(Debug, Clone)]
pub struct PartitionFileStats {
    /// Path of the finished file
    pub path: PathBuf,
    /// Partition value, `None` when unpartitioned
    pub partition: Option<String>,
    /// File statistics
    pub stats: WriterStats,
}

impl fmt::Display for PartitionFileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.partition {
            Some(value) => write!(f, "{} [{}]: {}", self.path.display(), value, self.stats),
            None => write!(f, "{}: {}", self.path.display(), self.stats),
        }
    }
}

/// Statistics from a finished partitioned writer
#[derive(Debug, Clone, Default)]
pub struct DatasetWriterStats {
    /// Total rows written across all files
    pub rows_written: usize,
    /// One entry per file, in the order the files were opened
    pub files: Vec<PartitionFileStats>,
}

impl DatasetWriterStats {
    /// Number of output files created
    pub fn files_written(&self) -> usize {
        self.files.len()
    }
}

impl fmt::Display for DatasetWriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows across {} file(s)",
            self.rows_written,
            self.files.len()
        )
    }
}
