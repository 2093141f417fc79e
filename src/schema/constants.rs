/// Version written into every output footer
pub const QUANTMSIO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension of output datasets
pub const PARQUET_EXTENSION: &str = "parquet";

/// Metadata key for the library version in the Parquet footer
pub const KEY_VERSION: &str = "quantmsio:version";

/// Metadata key for the dataset kind (`feature` or `psm`)
pub const KEY_FILE_TYPE: &str = "quantmsio:file_type";

/// Metadata key for the RFC 3339 creation timestamp
pub const KEY_CREATION_DATE: &str = "quantmsio:creation_date";

/// Metadata key for the dataset UUID
pub const KEY_UUID: &str = "quantmsio:uuid";

/// Metadata key for the partition column, present only when partitioned
pub const KEY_PARTITION: &str = "quantmsio:partition";

/// Metadata key for the full JSON dataset description
pub const KEY_METADATA: &str = "quantmsio:metadata";

/// Schema-level metadata key describing the table layout
pub const KEY_SCHEMA_DESCRIPTION: &str = "quantmsio:schema_description";
