//! # Dataset Writer Module
//!
//! Writes fixed-schema record batches to Parquet, optionally split into one
//! file per distinct value of a partition column.
//!
//! ## Design Principles
//!
//! 1. **Streaming Architecture**: Batches are appended as they arrive; only
//!    the Parquet writer's row-group buffer is held per open file.
//!
//! 2. **Lazy Partitions**: A partition's file is opened on the first row that
//!    carries its value and reused for every later batch.
//!
//! 3. **Strict Schema**: Every batch is validated against the declared schema
//!    before anything is written.
//!
//! 4. **Self-Contained Files**: Provenance is embedded in the Parquet footer's
//!    key_value_metadata.
//!
//! 5. **Configurable Compression**: Supports ZSTD (default), Snappy, and uncompressed.

mod batch;
mod config;
mod error;
mod file_writer;
mod partitioned;
mod stats;


pub(crate) use batch::int_list;
pub use batch::{
    features_to_record_batch, features_to_record_batch_with_schema, psms_to_record_batch,
    psms_to_record_batch_with_schema,
};
pub use config::{CompressionType, WriterConfig};
pub use error::WriterError;
pub use file_writer::DatasetFileWriter;
pub use partitioned::{PartitionPolicy, PartitionValue, PartitionedWriter};
pub use stats::{DatasetWriterStats, PartitionFileStats, WriterStats};
