//! # quantms.io Converter
//!
//! A command-line tool that reconciles proteomics identification and
//! quantification results into annotated Parquet datasets.
//!
//! ## Usage
//!
//! ```bash
//! # Merge identifications and quantifications into features
//! quantmsio feature --mztab search.mzTab --msstats msstats_in.csv -o features.parquet
//!
//! # One file per precursor charge
//! quantmsio feature --mztab search.mzTab --msstats msstats_in.csv -o features.parquet --partition charge
//!
//! # Peptide-spectrum matches
//! quantmsio psm --mztab search.mzTab -o psm.parquet
//!
//! # Add protein start/end positions
//! quantmsio locate psm.parquet --fasta db.fasta -o psm-located.parquet
//!
//! # Inspect an output file
//! quantmsio info features.parquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
