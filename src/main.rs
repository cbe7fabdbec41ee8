//! # Addon Repository CLI
//!
//! Binary entry point for the `addon-repo` command-line tool: parses arguments
//! with `clap`, runs the selected command, and lets `anyhow` print the single
//! descriptive error (with a non-zero exit status) when something fails.
//!
//! All of the build logic lives in the `addon_repo` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
