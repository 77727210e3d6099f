// offense-norm/src/cli.rs
//! This file defines the command-line interface (CLI) for the offense-norm application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "offense-norm",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Normalize free-text criminal offense descriptions",
    long_about = "offense-norm canonicalizes free-text offense descriptions (\"W/O LIC\", \"CSC 2ND DEG\", \"POSS CS SCH II\") into a lowercase, single-spaced surface form by applying an ordered catalog of substitution and removal rules. Semantically identical offenses collapse to the same string before they reach a text classifier.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a normalizer configuration file (YAML).
    #[arg(
        long = "config",
        value_name = "FILE",
        global = true,
        env = "OFFENSE_NORM_CONFIG",
        help = "Path to a normalizer configuration file (YAML)."
    )]
    pub config: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `offense-norm` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalizes offense descriptions, one output line per input record.
    #[command(about = "Normalize offense descriptions, one output line per input record.")]
    Normalize(NormalizeCommand),

    /// Shows every pipeline step that changed a single description.
    #[command(about = "Show every pipeline step that changed a single description.")]
    Explain(ExplainCommand),

    /// Inspects and validates rule catalogs.
    #[command(subcommand, about = "Inspect and validate rule catalogs.")]
    Rules(RulesCommand),
}

/// Selects which catalog to build. Overrides the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Catalog version to use (defaults to the catalog's default version).
    #[arg(
        long = "catalog-version",
        value_name = "VERSION",
        env = "OFFENSE_NORM_CATALOG_VERSION",
        help = "Catalog version to use (e.g. 'legacy', 'standard', 'extended')."
    )]
    pub catalog_version: Option<String>,

    /// Extra rules merged on top of the built-in catalog.
    #[arg(long = "rules", value_name = "FILE", help = "YAML file of extra rules merged on top of the built-in catalog.")]
    pub rules: Option<PathBuf>,
}

/// Arguments for the `normalize` command.
#[derive(Parser, Debug)]
pub struct NormalizeCommand {
    /// Descriptions to normalize. Reads records from a file or stdin when empty.
    #[arg(value_name = "TEXT", help = "Descriptions to normalize; one output line each.")]
    pub text: Vec<String>,

    /// Path to an input file, one record per line (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", conflicts_with = "text", help = "Read records from a file, one per line.")]
    pub input_file: Option<PathBuf>,

    /// Write normalized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Disable memoization of repeated records.
    #[arg(long = "no-cache", help = "Normalize every record, even repeated ones.")]
    pub no_cache: bool,

    /// Number of parallel workers.
    #[arg(
        long,
        short = 'j',
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Number of parallel workers; output order is preserved."
    )]
    pub jobs: u16,
}

/// Arguments for the `explain` command.
#[derive(Parser, Debug)]
pub struct ExplainCommand {
    /// The description to explain.
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Emit the trace as JSON.
    #[arg(long, help = "Emit the trace as JSON.")]
    pub json: bool,
}

/// Subcommands of `rules`.
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Lists every rule of a catalog in execution order.
    #[command(about = "List every rule of a catalog in execution order.")]
    List {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Emit the rule list as JSON.
        #[arg(long, help = "Emit the rule list as JSON.")]
        json: bool,
    },

    /// Lists the versions of the built-in catalog.
    #[command(about = "List the versions of the built-in catalog.")]
    Versions,

    /// Builds every version of a catalog file and reports broken rules.
    #[command(about = "Build every version of a catalog file and report broken rules.")]
    Validate {
        /// The catalog file (YAML) to validate.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
