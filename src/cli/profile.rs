//! Conversion profiles for common use cases.
//!
//! Profiles provide sensible defaults for compression and chunking,
//! hiding low-level Parquet settings from end users.

use std::fmt;
use std::str::FromStr;

use quantmsio::writer::WriterConfig;

/// Conversion profiles for common use cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    /// Prioritize speed over compression.
    ///
    /// - Compression: Snappy
    /// - Row group size: 50,000 rows
    /// - Chunk size: 200,000 quantification rows
    Fast,

    /// Balance between speed and compression (default).
    ///
    /// - Compression: ZSTD level 3
    /// - Row group size: 100,000 rows
    /// - Chunk size: 100,000 quantification rows
    #[default]
    Balanced,

    /// Maximum compression, slower conversion.
    ///
    /// - Compression: ZSTD level 22
    /// - Row group size: 500,000 rows
    /// - Chunk size: 50,000 quantification rows
    MaxCompression,
}

impl Profile {
    /// Writer settings for this profile
    pub fn writer_config(&self) -> WriterConfig {
        match self {
            Profile::Fast => WriterConfig::fast_write(),
            Profile::Balanced => WriterConfig::balanced(),
            Profile::MaxCompression => WriterConfig::max_compression(),
        }
    }

    /// Quantification rows merged per chunk
    pub fn chunk_size(&self) -> usize {
        match self {
            Profile::Fast => 200_000,
            Profile::Balanced => 100_000,
            Profile::MaxCompression => 50_000,
        }
    }

    /// Returns all available profile names.
    pub fn variants() -> &'static [&'static str] {
        &["fast", "balanced", "max-compression"]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Fast => write!(f, "fast"),
            Profile::Balanced => write!(f, "balanced"),
            Profile::MaxCompression => write!(f, "max-compression"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Profile::Fast),
            "balanced" | "default" => Ok(Profile::Balanced),
            "max-compression" | "maxcompression" | "max" => Ok(Profile::MaxCompression),
            _ => Err(format!(
                "Unknown profile '{}'. Valid options: {}",
                s,
                Profile::variants().join(", ")
            )),
        }
    }
}
