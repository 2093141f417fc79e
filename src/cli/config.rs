//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # quantmsio.toml
//! [conversion]
//! chunk_size = 50000
//! compression_level = 15
//! row_group_size = 200000
//! partition = "precursor_charge"
//! max_chunks = 10
//! max_seconds = 600
//! ```
//!
//! Explicit command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for quantmsio.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Settings shared by the conversion commands.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionConfig {
    /// Quantification rows merged per chunk.
    pub chunk_size: Option<usize>,

    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Number of rows per Parquet row group.
    pub row_group_size: Option<usize>,

    /// Column to split the output on.
    pub partition: Option<String>,

    /// Stop after this many chunks.
    pub max_chunks: Option<usize>,

    /// Stop pulling chunks after this many seconds.
    pub max_seconds: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file if one was given, otherwise use empty settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}
