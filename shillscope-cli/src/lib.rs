//! Command-line interface for Shillscope's feature extraction.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod extract;

pub use error::CliError;

use extract::{ExtractArgs, run_extract};

const ARG_RATINGS: &str = "ratings";
const ARG_INAUTHENTIC_USERS: &str = "inauthentic-users";
const ARG_OUTPUT: &str = "output";
const ARG_RATING_SCALE: &str = "rating-scale";
const ARG_THREADS: &str = "threads";
const ENV_RATINGS: &str = "SHILLSCOPE_CMDS_EXTRACT_RATINGS";

/// Run the Shillscope CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Extract(args) => run_extract(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "shillscope",
    about = "Behavioural feature extraction for shilling-attack detection",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract one labelled feature row per user from a ratings document.
    Extract(ExtractArgs),
}

#[cfg(test)]
mod tests;
