//! # CLI Command Implementations
//!
//! One module per thing the binary can be asked to do:
//!
//! - `generate`: the default run (link farm, stanzas, hosts, nginx).
//! - `list`: `--list-hostnames`, read-only.
//! - `hosts`: `--remove-hosts`.
//!
//! Each exposes an `execute` function. They share [`prepare`], which turns
//! the parsed flags and the global config into run [`Settings`].

pub mod generate;
pub mod hosts;
pub mod list;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use webconfig::defaults::default_config_root;
use webconfig::error::Error;
use webconfig::filesystem::FileOps;
use webconfig::global_config::{self, GlobalConfig};
use webconfig::layout::Layout;
use webconfig::output::OutputConfig;
use webconfig::prompt::Decider;
use webconfig::settings::{Mode, Settings};

use crate::cli::Cli;

/// Everything a command needs after start-up.
pub struct Context {
    pub settings: Settings,
    pub global: GlobalConfig,
    pub files: FileOps,
    pub output: OutputConfig,
}

impl Context {
    pub fn layout(&self) -> &Layout {
        &self.settings.layout
    }

    pub fn save_global(&self) -> Result<()> {
        self.global.save(self.layout(), &self.files)?;
        Ok(())
    }
}

fn existing_dir(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("No such directory: {}", path.display()))
}

/// Resolve the config root, run first-time setup if needed, and build the
/// run settings.
pub fn prepare(cli: &Cli, mode: Mode, decider: &dyn Decider) -> Result<Context> {
    let config_root = match &cli.config_root {
        Some(root) => std::path::absolute(root)?,
        None => default_config_root().ok_or(Error::HomeNotFound)?,
    };
    let layout = Layout::new(config_root);

    let target = cli.dir.as_deref().map(existing_dir).transpose()?;
    let explicit_projects_dir = cli.projects_dir.as_deref().map(existing_dir).transpose()?;
    let first_run_dir = match (&explicit_projects_dir, &target) {
        (Some(dir), _) | (None, Some(dir)) => dir.clone(),
        (None, None) => env::current_dir()?,
    };

    let files = FileOps::new(mode);
    let confirmed =
        cli.create_config_root || explicit_projects_dir.is_some() || mode == Mode::ReadOnly;
    let global = global_config::load_or_create(&layout, &first_run_dir, confirmed, decider, &files)?;

    let projects_dir = match explicit_projects_dir {
        Some(dir) => dir,
        None => std::path::absolute(global.projects_dir(&layout)?)?,
    };
    let start_dir = target.unwrap_or_else(|| projects_dir.clone());

    let settings = Settings::new(projects_dir, layout)
        .with_start_dir(start_dir)
        .with_mode(mode)
        .with_environments(cli.environments.clone());

    Ok(Context {
        settings,
        global,
        files,
        output: OutputConfig::from_env_and_flag(&cli.color),
    })
}

/// `Test` under `--test-mode`, else `Live`.
pub fn run_mode(cli: &Cli) -> Mode {
    if cli.test_mode {
        Mode::Test
    } else {
        Mode::Live
    }
}
