use anyhow::{Context, Result};
use std::path::PathBuf;

use quantmsio::metadata::DatasetMetadata;
use quantmsio::schema::KEY_METADATA;

/// Display information about a quantms.io Parquet file
pub fn run(file: PathBuf) -> Result<()> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::fs::File;

    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let file_handle = File::open(&file).context("Failed to open file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file_handle)
        .context("Failed to read Parquet file")?;

    let metadata = builder.metadata();
    let file_metadata = metadata.file_metadata();

    println!("quantms.io File Information");
    println!("===========================");
    println!("File: {}", file.display());
    println!();

    println!("File Statistics:");
    println!("  Row groups: {}", metadata.num_row_groups());
    println!("  Total rows: {}", file_metadata.num_rows());
    println!("  Schema columns: {}", builder.schema().fields().len());
    println!();

    if let Some(kv_metadata) = file_metadata.key_value_metadata() {
        let dataset = kv_metadata
            .iter()
            .find(|kv| kv.key == KEY_METADATA)
            .and_then(|kv| kv.value.as_deref())
            .map(DatasetMetadata::from_json)
            .transpose()
            .context("Malformed dataset metadata in footer")?;

        if let Some(dataset) = dataset {
            println!("Dataset:");
            println!("  Type: {}", dataset.file_type);
            println!("  Created: {}", dataset.creation_date);
            println!("  Software version: {}", dataset.software_version);
            println!("  UUID: {}", dataset.uuid);
            if let Some(partition) = &dataset.partition {
                println!("  Partitioned by: {}", partition);
            }
            for source in &dataset.source_files {
                println!("  Source: {}", source);
            }
            if !dataset.modifications.is_empty() {
                println!("  Modifications: {}", dataset.modifications.join(", "));
            }
            println!();
        }

        println!("Metadata Keys:");
        for kv in kv_metadata {
            let value_preview = kv
                .value
                .as_ref()
                .map(|v| {
                    if v.len() > 100 {
                        let cut = (0..=100).rev().find(|i| v.is_char_boundary(*i)).unwrap_or(0);
                        format!("{}... ({} bytes)", &v[..cut], v.len())
                    } else {
                        v.clone()
                    }
                })
                .unwrap_or_else(|| "<null>".to_string());
            println!("  {}: {}", kv.key, value_preview);
        }
        println!();
    }

    println!("Schema:");
    for (i, field) in builder.schema().fields().iter().enumerate() {
        let nullable = if field.is_nullable() { "" } else { ", not null" };
        println!("  {:3}. {} ({}{})", i + 1, field.name(), field.data_type(), nullable);
    }

    Ok(())
}
