use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use quantmsio::merge::MergeConfig;
use quantmsio::pipeline::PipelineConfig;
use quantmsio::schema::{PRECURSOR_CHARGE, REFERENCE_FILE_NAME};
use quantmsio::writer::{CompressionType, PartitionPolicy};

mod feature;
mod info;
mod locate;
mod psm;

mod config;
mod profile;

pub use config::{Config, ConversionConfig};
pub use profile::Profile;

/// quantms.io - Reconcile identification and quantification results into Parquet
#[derive(Parser)]
#[command(name = "quantmsio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Conversion profile for optimizing speed vs compression.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ProfileArg {
    /// Prioritize speed over compression
    Fast,
    /// Balance between speed and compression
    #[default]
    Balanced,
    /// Maximum compression, slower conversion
    MaxCompression,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fast => Profile::Fast,
            ProfileArg::Balanced => Profile::Balanced,
            ProfileArg::MaxCompression => Profile::MaxCompression,
        }
    }
}

/// Column to split the output dataset on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PartitionArg {
    /// One file per precursor charge
    Charge,
    /// One file per source run
    #[value(name = "reference_file_name")]
    ReferenceFileName,
}

impl PartitionArg {
    fn column(self) -> &'static str {
        match self {
            PartitionArg::Charge => PRECURSOR_CHARGE,
            PartitionArg::ReferenceFileName => REFERENCE_FILE_NAME,
        }
    }
}

/// Flags shared by the `feature` and `psm` commands
#[derive(Args, Debug, Clone, Default)]
pub struct ConversionArgs {
    /// Conversion profile (fast, balanced, max-compression)
    #[arg(short = 'p', long, default_value = "balanced", value_enum)]
    profile: ProfileArg,

    /// Split the output into one file per value of this column
    #[arg(long, value_enum)]
    partition: Option<PartitionArg>,

    /// Only annotate these modifications (comma separated tokens)
    #[arg(long, value_delimiter = ',')]
    modifications: Option<Vec<String>>,

    /// Only keep identifications of these proteins (comma separated accessions)
    #[arg(long = "protein", value_delimiter = ',')]
    proteins: Option<Vec<String>>,

    /// Stop after this many chunks
    #[arg(long)]
    max_chunks: Option<usize>,

    /// Stop pulling chunks after this many seconds
    #[arg(long)]
    max_seconds: Option<u64>,

    // === Advanced tuning flags (hidden from --help) ===
    /// Rows merged per chunk (default: profile-dependent)
    #[arg(short = 'b', long, hide = true)]
    chunk_size: Option<usize>,

    /// Compression level for ZSTD (1-22, default: profile-dependent)
    #[arg(short = 'c', long, hide = true)]
    compression_level: Option<i32>,

    /// Row group size (number of rows per row group)
    #[arg(short = 'r', long, hide = true)]
    row_group_size: Option<usize>,
}

impl ConversionArgs {
    /// Resolve flags over file settings over the profile defaults
    pub fn pipeline_config(&self, file: &ConversionConfig) -> PipelineConfig {
        let profile = Profile::from(self.profile);

        let mut writer_config = profile.writer_config();
        if let Some(level) = self.compression_level.or(file.compression_level) {
            writer_config.compression = CompressionType::Zstd(level);
        }
        if let Some(size) = self.row_group_size.or(file.row_group_size) {
            writer_config.row_group_size = size;
        }

        let merge_config = MergeConfig::default()
            .with_chunk_size(
                self.chunk_size
                    .or(file.chunk_size)
                    .unwrap_or_else(|| profile.chunk_size()),
            )
            .with_max_chunks(self.max_chunks.or(file.max_chunks))
            .with_max_wall_time(
                self.max_seconds
                    .or(file.max_seconds)
                    .map(Duration::from_secs),
            );

        let partition = match self.partition {
            Some(arg) => PartitionPolicy::from_column(Some(arg.column())),
            None => PartitionPolicy::from_column(file.partition.as_deref()),
        };

        PipelineConfig {
            writer_config,
            merge_config,
            partition,
            selected_modifications: self.modifications.clone(),
            protein_filter: self.proteins.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge an mzTab file and an MSstats table into a feature dataset
    Feature {
        /// Identification file (mzTab)
        #[arg(long, value_name = "MZTAB")]
        mztab: PathBuf,

        /// Quantification table (MSstats input)
        #[arg(long, value_name = "MSSTATS")]
        msstats: PathBuf,

        /// Output Parquet file (partition files are written next to it)
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        args: ConversionArgs,
    },

    /// Convert the PSM section of an mzTab file into a PSM dataset
    Psm {
        /// Identification file (mzTab)
        #[arg(long, value_name = "MZTAB")]
        mztab: PathBuf,

        /// Output Parquet file (partition files are written next to it)
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        args: ConversionArgs,
    },

    /// Fill in protein start and end positions of a feature or PSM dataset
    Locate {
        /// Dataset to enrich
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Protein database (FASTA)
        #[arg(long, value_name = "FASTA")]
        fasta: PathBuf,

        /// Enriched output file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Conversion profile (fast, balanced, max-compression)
        #[arg(short = 'p', long, default_value = "balanced", value_enum)]
        profile: ProfileArg,
    },

    /// Display information about a quantms.io Parquet file
    Info {
        /// Input Parquet file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let file_config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Feature {
            mztab,
            msstats,
            output,
            args,
        } => feature::run(mztab, msstats, output, args.pipeline_config(&file_config.conversion)),
        Commands::Psm { mztab, output, args } => {
            psm::run(mztab, output, args.pipeline_config(&file_config.conversion))
        }
        Commands::Locate {
            input,
            fasta,
            output,
            profile,
        } => locate::run(input, fasta, output, Profile::from(profile)),
        Commands::Info { file } => info::run(file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_args(argv: &[&str]) -> ConversionArgs {
        let mut full = vec!["quantmsio", "feature", "--mztab", "a.mzTab", "--msstats", "b.csv", "-o", "out.parquet"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Feature { args, .. } => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_flags_override_file_settings() {
        let file = ConversionConfig {
            chunk_size: Some(10),
            compression_level: Some(9),
            partition: Some("reference_file_name".to_string()),
            max_chunks: Some(4),
            ..Default::default()
        };
        let args = feature_args(&["--partition", "charge", "-b", "20"]);
        let config = args.pipeline_config(&file);

        assert_eq!(config.partition.column(), Some(PRECURSOR_CHARGE));
        assert_eq!(config.merge_config.chunk_size, 20);
        assert_eq!(config.merge_config.max_chunks, Some(4));
        assert_eq!(config.writer_config.compression, CompressionType::Zstd(9));
    }

    #[test]
    fn test_profile_defaults_apply_without_overrides() {
        let args = feature_args(&["-p", "fast", "--modifications", "Oxidation,Phospho"]);
        let config = args.pipeline_config(&ConversionConfig::default());

        assert_eq!(config.merge_config.chunk_size, Profile::Fast.chunk_size());
        assert_eq!(config.writer_config.compression, CompressionType::Snappy);
        assert_eq!(config.partition, PartitionPolicy::Single);
        assert_eq!(
            config.selected_modifications,
            Some(vec!["Oxidation".to_string(), "Phospho".to_string()])
        );
    }

    #[test]
    fn test_partition_value_names() {
        let args = feature_args(&["--partition", "reference_file_name", "--max-seconds", "5"]);
        let config = args.pipeline_config(&ConversionConfig::default());
        assert_eq!(config.partition.column(), Some(REFERENCE_FILE_NAME));
        assert_eq!(config.merge_config.max_wall_time, Some(Duration::from_secs(5)));
    }
}
