//! Generate command implementation
//!
//! The default run:
//! 1. First-run setup of the config root
//! 2. Discovery, link farm and stanza generation
//! 3. Hosts file entries for every generated hostname
//! 4. nginx config check and restart

use anyhow::Result;
use log::{debug, warn};
use webconfig::filesystem::WriteOutcome;
use webconfig::hosts::{add_hostnames, HostsFile, HostsReport};
use webconfig::nginx::{check_config, WebServer};
use webconfig::output::{Marker, OutputConfig};
use webconfig::pipeline::{self, RunReport};
use webconfig::prompt::Decider;
use webconfig::settings::Mode;

use crate::cli::Cli;
use crate::commands::{prepare, run_mode, Context};

/// Execute the generate command
pub fn execute(cli: &Cli, decider: &dyn Decider) -> Result<()> {
    let mut ctx = prepare(cli, run_mode(cli), decider)?;
    debug!(
        "projects dir {}, config root {}",
        ctx.settings.projects_dir().display(),
        ctx.layout().root().display()
    );

    let report = pipeline::run(&ctx.settings)?;
    print_generation(&ctx, &report);

    if cli.add_hosts() != Some(false) {
        provision_hosts(cli, &mut ctx, &report)?;
    }

    let manifest = ctx.layout().manifest_path();
    let Some(server) = WebServer::locate() else {
        warn!(
            "Couldn't find nginx. Make sure this line is in the http block of your nginx conf:\n  include {};",
            manifest.display()
        );
        return Ok(());
    };
    check_config(&server.read_config(), &manifest);

    let restart = match cli.restart_nginx() {
        Some(restart) => restart,
        None => decider.agree("Restart nginx?", true)?,
    };
    if restart {
        if let Err(e) = server.restart(&ctx.files) {
            warn!("{}", e);
        }
    }
    Ok(())
}

fn print_generation(ctx: &Context, report: &RunReport) {
    let count = |outcome: WriteOutcome| {
        report
            .generated
            .iter()
            .filter(|g| g.outcome == outcome)
            .count()
    };
    let total = report.generated.len();
    let message = format!(
        "{} for {} ({} new, {} changed, {} unchanged)",
        counted(total, "stanza"),
        counted(report.registry.projects().len(), "project"),
        count(WriteOutcome::Created),
        count(WriteOutcome::Replaced),
        count(WriteOutcome::Unchanged),
    );
    let marker = if ctx.settings.mode == Mode::Test {
        Marker::DryRun
    } else {
        Marker::Done
    };
    println!("{}", ctx.output.line(marker, &message));
}

/// `1 project`, `2 projects`.
fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

fn provision_hosts(cli: &Cli, ctx: &mut Context, report: &RunReport) -> Result<()> {
    let mut hosts = match HostsFile::load(&cli.hosts_file) {
        Ok(hosts) => hosts,
        Err(e) => {
            warn!("couldn't read {}: {}", cli.hosts_file.display(), e);
            return Ok(());
        }
    };
    let names = report.hostnames(&ctx.settings);
    let result = add_hostnames(&mut hosts, &names, &mut ctx.global, &ctx.files);
    print_hosts(&ctx.output, &result);
    if !result.added.is_empty() {
        ctx.save_global()?;
    }
    Ok(())
}

fn print_hosts(output: &OutputConfig, report: &HostsReport) {
    if !report.already_correct.is_empty() {
        println!(
            "{}",
            output.line(
                Marker::Done,
                &format!(
                    "{} hosts were already setup correctly",
                    report.already_correct.len()
                )
            )
        );
    }
    if !report.added.is_empty() {
        println!(
            "{}",
            output.line(Marker::Done, "The following hostnames were added for 127.0.0.1:")
        );
        for name in &report.added {
            println!("  {}", name);
        }
    }
    if !report.mismatched.is_empty() {
        println!(
            "{}",
            output.line(
                Marker::Attention,
                "The following hostnames were present, but didn't map to 127.0.0.1:"
            )
        );
        let pad = report
            .mismatched
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);
        for (name, address) in &report.mismatched {
            println!("  {:>pad$} -> {}", name, address, pad = pad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counted_pluralizes() {
        assert_eq!(counted(1, "project"), "1 project");
        assert_eq!(counted(0, "stanza"), "0 stanzas");
        assert_eq!(counted(3, "stanza"), "3 stanzas");
    }
}
