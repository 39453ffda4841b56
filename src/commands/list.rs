//! List command implementation
//!
//! `--list-hostnames` prints every hostname a run would configure, one per
//! line, and writes nothing. Output is meant for scripts, so no markers.

use anyhow::Result;
use webconfig::pipeline;
use webconfig::prompt::FixedAnswer;
use webconfig::settings::Mode;

use crate::cli::Cli;
use crate::commands::prepare;

/// Execute the list command
pub fn execute(cli: &Cli) -> Result<()> {
    // read-only runs never prompt
    let ctx = prepare(cli, Mode::ReadOnly, &FixedAnswer(true))?;
    for name in pipeline::list_hostnames(&ctx.settings)? {
        println!("{}", name);
    }
    Ok(())
}
