use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::WriterStats;

/// Streaming writer for one Parquet file of a fixed schema
pub struct DatasetFileWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    rows_written: usize,
    batches_written: usize,
}

impl DatasetFileWriter<File> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        schema: SchemaRef,
        config: &WriterConfig,
        footer: &HashMap<String, String>,
    ) -> Result<Self, WriterError> {
        let file = File::create(path)?;
        Self::new(file, schema, config, footer)
    }
}

impl<W: Write + Send> DatasetFileWriter<W> {
    /// Create a new writer to any Write implementation
    pub fn new(
        writer: W,
        schema: SchemaRef,
        config: &WriterConfig,
        footer: &HashMap<String, String>,
    ) -> Result<Self, WriterError> {
        let props = config.to_writer_properties(footer);
        let writer = ArrowWriter::try_new(writer, schema, Some(props))?;

        Ok(Self {
            writer,
            rows_written: 0,
            batches_written: 0,
        })
    }

    /// Append a batch; the caller has validated its schema
    pub fn write(&mut self, batch: &RecordBatch) -> Result<(), WriterError> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        self.batches_written += 1;
        Ok(())
    }

    /// Flush any buffered data and finalize the file
    pub fn finish(self) -> Result<WriterStats, WriterError> {
        let file_metadata = self.writer.close()?;

        Ok(WriterStats {
            rows_written: self.rows_written,
            batches_written: self.batches_written,
            row_groups_written: file_metadata.row_groups.len(),
            uncompressed_bytes: file_metadata
                .row_groups
                .iter()
                .map(|rg| rg.total_byte_size as u64)
                .sum(),
            compressed_bytes: file_metadata
                .row_groups
                .iter()
                .flat_map(|rg| rg.columns.iter())
                .filter_map(|chunk| chunk.meta_data.as_ref())
                .map(|meta| meta.total_compressed_size as u64)
                .sum(),
        })
    }

    /// Flush any buffered data, finalize the file, and return the underlying writer
    #[cfg(test)]
    pub fn finish_into_inner(self) -> Result<W, WriterError> {
        let inner = self.writer.into_inner()?;
        Ok(inner)
    }

    /// Rows appended so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}
