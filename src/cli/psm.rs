use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use quantmsio::pipeline::{PipelineConfig, PsmPipeline};

/// Convert the PSMs of an mzTab file into a PSM dataset
pub fn run(mztab: PathBuf, output: PathBuf, config: PipelineConfig) -> Result<()> {
    info!("quantms.io PSM conversion");
    info!("=========================");
    info!("Identifications: {}", mztab.display());
    info!("Output: {}", output.display());

    let stats = PsmPipeline::with_config(config)
        .run(&mztab, &output)
        .context("PSM conversion failed")?;

    info!("Conversion complete!");
    info!("{}", stats);
    for file in &stats.writer.files {
        info!("  {}", file);
    }

    Ok(())
}
