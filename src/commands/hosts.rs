//! Remove-hosts command implementation
//!
//! `--remove-hosts` deletes every hosts file line this tool appended, as
//! recorded in the global config, and then clears that record.

use anyhow::Result;
use webconfig::hosts::{remove_hostnames, HostsFile};
use webconfig::output::Marker;
use webconfig::prompt::Decider;

use crate::cli::Cli;
use crate::commands::{prepare, run_mode};

/// Execute the remove-hosts command
pub fn execute(cli: &Cli, decider: &dyn Decider) -> Result<()> {
    let mut ctx = prepare(cli, run_mode(cli), decider)?;
    let mut hosts = HostsFile::load(&cli.hosts_file)?;

    let removed = remove_hostnames(&mut hosts, &mut ctx.global, &ctx.files);
    ctx.save_global()?;

    println!(
        "{}",
        ctx.output.line(
            Marker::Done,
            &format!(
                "removed {} entries from {}",
                removed,
                cli.hosts_file.display()
            )
        )
    );
    Ok(())
}
