use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use quantmsio::pipeline::{FeaturePipeline, PipelineConfig};

/// Merge identifications and quantifications into a feature dataset
pub fn run(mztab: PathBuf, msstats: PathBuf, output: PathBuf, config: PipelineConfig) -> Result<()> {
    info!("quantms.io feature conversion");
    info!("=============================");
    info!("Identifications: {}", mztab.display());
    info!("Quantifications: {}", msstats.display());
    info!("Output: {}", output.display());
    if let Some(column) = config.partition.column() {
        info!("Partitioned by: {}", column);
    }
    info!("Chunk size: {}", config.merge_config.chunk_size);

    let stats = FeaturePipeline::with_config(config)
        .run(&mztab, &msstats, &output)
        .context("Feature conversion failed")?;

    info!("Conversion complete!");
    info!("{}", stats);
    for file in &stats.writer.files {
        info!("  {}", file);
    }

    Ok(())
}
