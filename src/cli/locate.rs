use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use super::Profile;
use quantmsio::locate::enrich_dataset;

/// Fill in protein occurrence columns of an existing dataset
pub fn run(input: PathBuf, fasta: PathBuf, output: PathBuf, profile: Profile) -> Result<()> {
    info!("Locating peptides of {} in {}", input.display(), fasta.display());

    let stats = enrich_dataset(&input, &fasta, &output, &profile.writer_config())
        .with_context(|| format!("Failed to enrich {}", input.display()))?;

    info!("{}", stats);
    info!("Output: {}", output.display());
    Ok(())
}
