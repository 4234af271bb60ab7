//! CLI argument definitions for xtf

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use xtf::WideSamplePolicy;

#[derive(Parser)]
#[command(name = "xtf")]
#[command(about = "Inspect eXtended Triton Format sonar files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print pretty JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Reduction for 4-byte samples (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub wide_samples: Option<WideSamples>,

    /// Log filter, e.g. "xtf=debug"
    #[arg(long, global = true)]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the file header, channels and record statistics
    #[command(visible_alias = "i")]
    Info {
        /// Path to .xtf file
        input: PathBuf,
    },

    /// List the offset and type of every record
    #[command(visible_alias = "x")]
    Index {
        /// Path to .xtf file
        input: PathBuf,

        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Fully decode the record at an offset
    #[command(visible_alias = "d")]
    Decode {
        /// Path to .xtf file
        input: PathBuf,

        /// Byte offset of the record, as printed by `index`
        #[arg(short, long)]
        offset: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WideSamples {
    /// Divide by 259, as existing viewers do
    Legacy,
    /// Keep the most significant byte
    Scaled,
}

impl From<WideSamples> for WideSamplePolicy {
    fn from(value: WideSamples) -> Self {
        match value {
            WideSamples::Legacy => WideSamplePolicy::Legacy,
            WideSamples::Scaled => WideSamplePolicy::Scaled,
        }
    }
}
