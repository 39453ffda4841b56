//! Sites: anything that gets its own virtual host.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::Layout;
use crate::project::Project;
use crate::shared_host::{MountKey, SharedHost, SymlinkDirectory};

/// One virtual host source.
#[derive(Debug, Clone, Copy)]
pub enum Site<'a> {
    /// A single project answering on its own hostnames.
    Project(&'a Project),
    /// Projects combined under a hostname they all declare.
    Shared(&'a SharedHost),
    /// A hand-built directory of links to projects.
    SymlinkDir(&'a SymlinkDirectory),
}

impl Site<'_> {
    pub fn environments(&self) -> Vec<String> {
        match self {
            Site::Project(project) => project.environments().to_vec(),
            Site::Shared(host) => vec![host.environment().to_string()],
            Site::SymlinkDir(dir) => dir.environments(),
        }
    }

    /// Hostnames for `env`. A project leaves out names taken over by a
    /// shared host.
    pub fn server_names(&self, env: &str, shared: &HashSet<&str>) -> Vec<String> {
        match self {
            Site::Project(project) => project
                .server_names(env)
                .iter()
                .filter(|name| !shared.contains(name.as_str()))
                .cloned()
                .collect(),
            Site::Shared(host) => vec![host.server_name().to_string()],
            Site::SymlinkDir(dir) => vec![dir.server_name(env)],
        }
    }

    pub fn port(&self, env: &str) -> Result<u16> {
        match self {
            Site::Project(project) => match project.port(env) {
                Some(port) => Ok(port),
                None => project.deterministic_port(env),
            },
            Site::Shared(host) => host.port(),
            Site::SymlinkDir(dir) => dir.port(env),
        }
    }

    /// Path under the vhost directory the stanzas are written to.
    pub fn relative_path(&self, projects_dir: &Path) -> Result<PathBuf> {
        match self {
            Site::Project(project) => project.relative_path(projects_dir),
            Site::Shared(host) => Ok(PathBuf::from(host.server_name())),
            Site::SymlinkDir(dir) => dir.relative_path(projects_dir),
        }
    }

    /// The `root` directive. Projects and symlink directories are reached
    /// through `links/<env>` so moving the projects directory only means
    /// updating those links.
    pub fn document_root(&self, env: &str, layout: &Layout, projects_dir: &Path) -> Result<PathBuf> {
        match self {
            Site::Project(project) => Ok(layout
                .environment_link(env)
                .join(project.relative_path(projects_dir)?)
                .join("public")),
            Site::Shared(host) => Ok(layout.shared_host_dir(host.server_name())),
            Site::SymlinkDir(dir) => Ok(layout
                .environment_link(env)
                .join(dir.relative_path(projects_dir)?)),
        }
    }

    /// Key for memoizing the mount plan, for sites that have one.
    pub fn mount_key(&self) -> Option<MountKey> {
        match self {
            Site::Project(_) => None,
            Site::Shared(host) => Some(host.key()),
            Site::SymlinkDir(dir) => Some(dir.key()),
        }
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Site::Project(project) => project.path().display().to_string(),
            Site::Shared(host) => host.server_name().to_string(),
            Site::SymlinkDir(dir) => dir.path().display().to_string(),
        }
    }
}
