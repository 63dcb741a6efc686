//! Command-line arguments of `relaysig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use relaysig_model::SignalKind;

#[derive(Parser)]
#[command(
    name = "relaysig",
    version,
    about = "Normalize protective-relay signal names from COMTRADE and XRIO files",
    long_about = "Parse COMTRADE recordings and XRIO relay exports, resolve their signal names\n\
                  to standard COMTRADE names, and curate the alias store that remembers\n\
                  every resolution."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: relaysig.toml in the working directory, if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Alias store file (overrides the settings file).
    #[arg(long = "store", value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Per-model catalog CSV (overrides the settings file).
    #[arg(long = "catalog", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a COMTRADE recording (.cfg or .dat).
    Comtrade(ComtradeArgs),

    /// Extract relay identity and signals from an XRIO export.
    Xrio(XrioArgs),

    /// Resolve the signal names of an XRIO export to standard names.
    Validate(ValidateArgs),

    /// Inspect and curate the alias store.
    #[command(subcommand)]
    Alias(AliasCommand),

    /// Browse standard signal catalogs.
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

#[derive(Args)]
pub struct ComtradeArgs {
    /// Path to the .cfg or .dat file.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Also read the ASCII data file and report the sample count.
    #[arg(long = "samples")]
    pub samples: bool,
}

#[derive(Args)]
pub struct XrioArgs {
    /// Path to the XRIO export.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// List the block names found in the document and exit.
    #[arg(long = "blocks", conflicts_with = "raw")]
    pub blocks: bool,

    /// Print the raw XML of one block (e.g. A1RADR).
    #[arg(long = "raw", value_name = "BLOCK")]
    pub raw: Option<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the XRIO export.
    #[arg(value_name = "XRIO")]
    pub xrio: PathBuf,

    /// COMTRADE configuration whose channel names take part in matching.
    #[arg(long = "comtrade", value_name = "CFG")]
    pub comtrade: Option<PathBuf>,

    /// List candidate standard names for unresolved signals.
    #[arg(long = "suggest")]
    pub suggest: bool,

    /// Number of candidates per unresolved signal (overrides the settings file).
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum AliasCommand {
    /// List stored aliases.
    List {
        /// Only aliases of this relay model.
        #[arg(long = "model")]
        model: Option<String>,

        /// Only aliases classified under this protection function.
        #[arg(long = "function")]
        function: Option<String>,
    },

    /// Search names, standard names, models and functions.
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Record a curated alias.
    Add {
        #[arg(value_name = "MODEL")]
        model: String,

        #[arg(value_name = "RELAY_NAME")]
        name: String,

        #[arg(value_name = "STANDARD_NAME")]
        standard: String,

        #[arg(long = "kind", value_enum, default_value = "analog")]
        kind: KindArg,

        /// Protection function label (default: classified from the relay name).
        #[arg(long = "function")]
        function: Option<String>,
    },

    /// Delete an alias.
    Remove {
        #[arg(value_name = "MODEL")]
        model: String,

        #[arg(value_name = "RELAY_NAME")]
        name: String,
    },

    /// Merge aliases from an exported file.
    Import {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Write all aliases to a file.
    Export {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Show standard names, grouped by category or by block for a model.
    Show {
        /// Relay model to show from the catalog file.
        #[arg(long = "model")]
        model: Option<String>,

        #[arg(long = "kind", value_enum)]
        kind: Option<KindArg>,
    },

    /// List the relay models in the catalog file.
    Models,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Analog,
    Binary,
}

impl From<KindArg> for SignalKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Analog => Self::Analog,
            KindArg::Binary => Self::Binary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
