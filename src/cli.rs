//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use refmerge_core::KeepStrategy;

/// Default output file for `dedupe`.
pub const DEFAULT_DEDUPE_OUTPUT: &str = "no_duplicates_consolidated.csv";

/// Default output file for `consolidate`.
pub const DEFAULT_CONSOLIDATE_OUTPUT: &str = "consolidated_output.csv";

/// Default column mapping file for `consolidate`.
pub const DEFAULT_MAPPING_FILE: &str = "column_mapping.json";

/// Consolidate and deduplicate bibliographic database exports.
///
/// Refmerge maps ScienceDirect, Scopus and Web of Science exports onto one
/// unified schema and removes records that share a DOI.
#[derive(Parser, Debug)]
#[command(name = "refmerge")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove duplicate records from a consolidated CSV based on DOI
    Dedupe(DedupeArgs),
    /// Combine ScienceDirect, Scopus and Web of Science exports into one CSV
    Consolidate(ConsolidateArgs),
    /// Convert a folder of RIS files into one CSV
    RisToCsv(RisToCsvArgs),
    /// Inspect effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective dedupe settings and the config file in use
    Show,
}

/// Keep-strategy as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Keep the record with the most populated fields
    #[value(name = "most_complete", alias = "most-complete")]
    MostComplete,
    /// Keep the first record in input order
    First,
    /// Keep the last record in input order
    Last,
}

impl From<StrategyArg> for KeepStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::MostComplete => Self::MostComplete,
            StrategyArg::First => Self::First,
            StrategyArg::Last => Self::Last,
        }
    }
}

/// Arguments for `dedupe`.
#[derive(Args, Debug, Clone, Default)]
pub struct DedupeArgs {
    /// Input CSV file to deduplicate
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = DEFAULT_DEDUPE_OUTPUT)]
    pub output: PathBuf,

    /// Strategy for keeping records [default: most_complete]
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Do not merge Source_Database information from duplicates
    #[arg(long)]
    pub no_merge_sources: bool,

    /// Name of the DOI column [default: DOI]
    #[arg(short = 'd', long)]
    pub doi_column: Option<String>,

    /// Name of the provenance column [default: Source_Database]
    #[arg(long)]
    pub provenance_column: Option<String>,

    /// Print the run report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `consolidate`.
#[derive(Args, Debug, Clone)]
pub struct ConsolidateArgs {
    /// Path to ScienceDirect CSV file
    #[arg(long, visible_alias = "sd")]
    pub sciencedirect: PathBuf,

    /// Path to Scopus CSV file
    #[arg(long, visible_alias = "sc")]
    pub scopus: PathBuf,

    /// Path to Web of Science CSV file
    #[arg(long, visible_alias = "wos")]
    pub webofscience: PathBuf,

    /// Path to column mapping JSON file
    #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
    pub config: PathBuf,

    /// Output CSV file path
    #[arg(short, long, default_value = DEFAULT_CONSOLIDATE_OUTPUT)]
    pub output: PathBuf,

    /// Do not add Source_Database column
    #[arg(long)]
    pub no_source_column: bool,
}

/// Output format for `ris-to-csv`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Excel workbook
    Xlsx,
    /// Both CSV and XLSX
    Both,
}

impl ExportFormat {
    /// True when a CSV file is written.
    pub fn writes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    /// True when an XLSX file is written.
    pub fn writes_xlsx(self) -> bool {
        matches!(self, Self::Xlsx | Self::Both)
    }
}

/// Arguments for `ris-to-csv`.
#[derive(Args, Debug, Clone)]
pub struct RisToCsvArgs {
    /// Input folder containing .ris files
    #[arg(short, long, default_value = "ris")]
    pub input: PathBuf,

    /// Output folder
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Output filename without extension
    #[arg(short, long, default_value = "exported")]
    pub filename: String,

    /// Output format
    #[arg(short = 't', long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}
