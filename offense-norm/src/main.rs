// offense-norm/src/main.rs
//! offense-norm entry point.
//!
//! Loads `.env`, initializes logging, and dispatches to the selected command.

use anyhow::Result;
use clap::Parser;
use log::{debug, LevelFilter};

use offense_norm::cli::{Cli, Commands};
use offense_norm::commands::{explain, normalize, rules};
use offense_norm::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is the normal case.
    let dotenv = dotenvy::dotenv();

    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    let config_path = args.config.as_deref();
    match args.command {
        Commands::Normalize(cmd) => normalize::run_normalize(cmd, config_path).await,
        Commands::Explain(cmd) => explain::run_explain(cmd, config_path),
        Commands::Rules(cmd) => rules::run_rules(cmd, config_path),
    }
}
