//! # webconfig CLI
//!
//! Binary entry point for the `webconfig` command-line tool.
//!
//! It parses arguments with `clap`, runs the requested command, and lets
//! `anyhow` report fatal errors with a non-zero exit. Everything else lives
//! in the `webconfig` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
