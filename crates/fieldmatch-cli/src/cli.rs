//! CLI argument definitions for the field matcher.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmatch",
    version,
    about = "Fuzzy field matcher - copy values between differently shaped objects",
    long_about = "Match the fields of a captured source object to the fields of a target type.\n\n\
                  Fields are paired by path, name, taught aliases, built-in synonyms and\n\
                  name similarity, then assigned one-to-one by a greedy or exact solver."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match a source object against a target type and optionally apply the values.
    Match(MatchArgs),

    /// Manage taught aliases.
    Alias(AliasArgs),

    /// List the built-in default name mappings.
    Defaults(DefaultsArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Schema describing the source and target types.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// JSON document holding the source object.
    #[arg(long = "source", value_name = "FILE")]
    pub source: PathBuf,

    /// Schema type of the source object.
    #[arg(long = "source-type", value_name = "TYPE")]
    pub source_type: String,

    /// Schema type to match against.
    #[arg(long = "target-type", value_name = "TYPE")]
    pub target_type: String,

    /// Target document to apply matched values into.
    #[arg(long = "target", value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Where to write the updated target (default: overwrite --target).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Alias store to consult (overrides the settings file).
    #[arg(long = "aliases", value_name = "FILE")]
    pub aliases: Option<PathBuf>,

    /// Matcher settings file.
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Use the exact (Hungarian) solver.
    #[arg(long = "exact", conflicts_with = "greedy")]
    pub exact: bool,

    /// Use the greedy solver.
    #[arg(long = "greedy")]
    pub greedy: bool,

    /// Ignore the built-in default name mappings.
    #[arg(long = "no-defaults")]
    pub no_defaults: bool,

    /// How to print the match report.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Args)]
pub struct AliasArgs {
    /// Alias store file.
    #[arg(
        long = "store",
        value_name = "FILE",
        default_value = "fieldmatch-aliases.json",
        global = true
    )]
    pub store: PathBuf,

    #[command(subcommand)]
    pub action: AliasCommand,
}

#[derive(Subcommand)]
pub enum AliasCommand {
    /// Teach an alias, replacing any existing one for the same source field.
    Add {
        /// Owning type of the source field.
        #[arg(long = "owner", value_name = "TYPE")]
        owner: String,
        #[arg(long = "source", value_name = "FIELD")]
        source: String,
        #[arg(long = "target", value_name = "FIELD")]
        target: String,
    },
    /// Forget the alias of a source field.
    Remove {
        #[arg(long = "owner", value_name = "TYPE")]
        owner: String,
        #[arg(long = "source", value_name = "FIELD")]
        source: String,
    },
    /// Print all aliases.
    List,
}

#[derive(Parser)]
pub struct DefaultsArgs {
    /// Show the table as listed, without derived reverse mappings.
    #[arg(long = "one-way")]
    pub one_way: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Plain,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
