//! The global config file, `<config-root>/global_config.yml`.
//!
//! ```yaml
//! projects_dirs:
//! - /home/me/projects
//! hosts:
//! - shop-development.local
//! ```
//!
//! `hosts` records the hostnames this tool added to the hostname table so
//! they can be removed again later.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filesystem::{read_optional, FileOps};
use crate::layout::Layout;
use crate::prompt::Decider;

/// Persistent settings shared by every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub projects_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl GlobalConfig {
    /// Read the global config, or `None` if it has never been written.
    pub fn load(layout: &Layout) -> Result<Option<Self>> {
        let path = layout.global_config_path();
        match read_optional(&path)? {
            Some(text) => {
                let config = serde_yaml::from_str::<Option<GlobalConfig>>(&text).map_err(|e| {
                    Error::ConfigParse {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                })?;
                Ok(Some(config.unwrap_or_default()))
            }
            None => Ok(None),
        }
    }

    pub fn save(&self, layout: &Layout, files: &FileOps) -> Result<()> {
        files.write(&layout.global_config_path(), &serde_yaml::to_string(self)?)
    }

    /// The first configured projects directory.
    pub fn projects_dir(&self, layout: &Layout) -> Result<&Path> {
        self.projects_dirs
            .first()
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::NoProjectsDir {
                path: layout.global_config_path(),
            })
    }

    /// Remember that `host` was added to the hostname table.
    pub fn record_host(&mut self, host: &str) {
        if !self.hosts.iter().any(|h| h == host) {
            self.hosts.push(host.to_string());
        }
    }
}

/// Load the global config, creating the config root on first use.
///
/// On first use `projects_dir` becomes the configured projects directory.
/// Unless `confirmed` is set, `decider` is asked first; declining aborts.
pub fn load_or_create(
    layout: &Layout,
    projects_dir: &Path,
    confirmed: bool,
    decider: &dyn Decider,
    files: &FileOps,
) -> Result<GlobalConfig> {
    if let Some(config) = GlobalConfig::load(layout)? {
        return Ok(config);
    }

    if !confirmed {
        info!("It looks like this is the first time you've run me.");
        let question = format!("setup {} as your projects dir?", projects_dir.display());
        if !decider.agree(&question, true)? {
            return Err(Error::SetupDeclined);
        }
        info!("setting up config dir {}", layout.root().display());
    }

    files.create_dir_all(layout.root())?;
    let config = GlobalConfig {
        projects_dirs: vec![projects_dir.to_path_buf()],
        hosts: Vec::new(),
    };
    config.save(layout, files)?;
    Ok(config)
}
