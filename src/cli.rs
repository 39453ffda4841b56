//! CLI argument parsing and command dispatch

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{Level, LevelFilter};
use webconfig::defaults::{CONFIG_DIR_ENV, HOSTS_FILE, HOSTS_FILE_ENV};
use webconfig::prompt::ConsolePrompter;

use crate::commands;

/// webconfig - nginx/Passenger virtual hosts for every app in your projects dir
#[derive(Parser, Debug)]
#[command(name = "webconfig")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// A project, or a directory of projects (defaults to the configured projects dir)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Only generate for this environment (repeatable)
    #[arg(short = 'e', long = "environment", value_name = "ENV")]
    pub environments: Vec<String>,

    /// Print the hostnames that would be configured and exit without writing
    #[arg(long, conflicts_with = "remove_hosts")]
    pub list_hostnames: bool,

    /// Add generated hostnames to the hosts file (the default)
    #[arg(long, overrides_with = "no_add_hosts")]
    pub add_hosts: bool,

    /// Leave the hosts file alone
    #[arg(long, overrides_with = "add_hosts")]
    pub no_add_hosts: bool,

    /// Remove every hosts file entry this tool has added, then exit
    #[arg(long)]
    pub remove_hosts: bool,

    /// Restart nginx without asking
    #[arg(long, overrides_with = "no_restart_nginx")]
    pub restart_nginx: bool,

    /// Don't restart nginx
    #[arg(long, overrides_with = "restart_nginx")]
    pub no_restart_nginx: bool,

    /// Create the config root without asking on first run
    #[arg(long)]
    pub create_config_root: bool,

    /// Config root directory (defaults to ~/.webconfig)
    #[arg(short = 'l', long, value_name = "PATH", env = CONFIG_DIR_ENV)]
    pub config_root: Option<PathBuf>,

    /// Projects directory, overriding the global config
    #[arg(long, value_name = "PATH")]
    pub projects_dir: Option<PathBuf>,

    /// Hosts file to edit
    #[arg(long, value_name = "PATH", env = HOSTS_FILE_ENV, default_value = HOSTS_FILE)]
    pub hosts_file: PathBuf,

    /// Show detailed progress information
    #[arg(short, long)]
    pub verbose: bool,

    /// Log every change instead of making it
    #[arg(short, long)]
    pub test_mode: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// `Some(false)` when `--no-add-hosts` was given.
    pub fn add_hosts(&self) -> Option<bool> {
        tri_state(self.add_hosts, self.no_add_hosts)
    }

    /// `None` when neither restart flag was given, meaning ask.
    pub fn restart_nginx(&self) -> Option<bool> {
        tri_state(self.restart_nginx, self.no_restart_nginx)
    }

    fn level(&self) -> LevelFilter {
        if self.verbose {
            return LevelFilter::Debug;
        }
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    fn init_logging(&self) {
        // Everything goes to stdout; warnings carry a prefix.
        let _ = env_logger::Builder::new()
            .filter_level(self.level())
            .target(env_logger::Target::Stdout)
            .format(|buf, record| match record.level() {
                Level::Error => writeln!(buf, "Error: {}", record.args()),
                Level::Warn => writeln!(buf, "Warning: {}", record.args()),
                _ => writeln!(buf, "{}", record.args()),
            })
            .try_init();
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();
        let decider = ConsolePrompter;

        if self.list_hostnames {
            commands::list::execute(&self)
        } else if self.remove_hosts {
            commands::hosts::execute(&self, &decider)
        } else {
            commands::generate::execute(&self, &decider)
        }
    }
}

fn tri_state(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
