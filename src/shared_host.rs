//! Shared hosts: several projects served from one hostname.
//!
//! When two or more distinct projects declare the same server name for an
//! environment they are combined into a [`SharedHost`]. The web server then
//! serves one virtual host whose document root is a directory of symlinks,
//! one per project, and mounts each project under its own sub-URI.
//!
//! A [`SymlinkDirectory`] is the hand-built form of the same thing: a
//! directory among the projects made of nothing but symlinks to projects'
//! `public` directories.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::defaults::ROOT_LINK_NAME;
use crate::error::{Error, Result};
use crate::filesystem::{resolve_link, FileOps};
use crate::port;
use crate::project::{is_project_dir, normalize_name, relative_to, Project};

/// Identity of a mount plan within one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MountKey {
    Shared {
        server_name: String,
        environment: String,
    },
    Directory(PathBuf),
}

/// How member applications are laid out under a shared hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountPlan {
    /// Mount point `/` redirects to, when a root application exists.
    pub redirect: Option<String>,
    /// One sub-URI per member, in member order.
    pub base_uris: Vec<String>,
}

/// Projects sharing one server name in one environment.
#[derive(Debug, Clone)]
pub struct SharedHost {
    server_name: String,
    environment: String,
    members: Vec<Project>,
}

impl SharedHost {
    /// Combine `members` under `server_name`.
    ///
    /// Fails when more than one member claims to be the root application.
    pub fn new(server_name: String, environment: String, members: Vec<Project>) -> Result<Self> {
        let roots: Vec<String> = members
            .iter()
            .filter(|p| p.is_root_member(&environment))
            .map(|p| p.name().to_string())
            .collect();
        if roots.len() > 1 {
            return Err(Error::MultipleRootMembers {
                server_name,
                environment,
                members: roots,
            });
        }
        Ok(Self {
            server_name,
            environment,
            members,
        })
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn members(&self) -> &[Project] {
        &self.members
    }

    pub fn key(&self) -> MountKey {
        MountKey::Shared {
            server_name: self.server_name.clone(),
            environment: self.environment.clone(),
        }
    }

    /// The member flagged with `relative_root_url_root`.
    pub fn root_member(&self) -> Option<&Project> {
        self.members
            .iter()
            .find(|p| p.is_root_member(&self.environment))
    }

    /// Sum of the members' deterministic ports, reduced into the pool.
    pub fn port(&self) -> Result<u16> {
        let ports = self
            .members
            .iter()
            .map(|p| p.deterministic_port(&self.environment))
            .collect::<Result<Vec<_>>>()?;
        Ok(port::reduce_sum(ports))
    }

    /// Mount points for the stanza. Warns when there is no root member.
    pub fn mount_plan(&self) -> MountPlan {
        let redirect = self.root_member().map(|p| p.mount_name(&self.environment));
        if redirect.is_none() {
            warn!(
                "Couldn't find a root application for {} ({}). Set relative_root_url_root in one app's {} section to be redirected to it when visiting '/'",
                self.server_name, self.environment, self.environment
            );
        }
        MountPlan {
            redirect,
            base_uris: self
                .members
                .iter()
                .map(|p| p.mount_name(&self.environment))
                .collect(),
        }
    }
}

/// A directory of symlinks to projects' `public` directories.
#[derive(Debug, Clone)]
pub struct SymlinkDirectory {
    path: PathBuf,
    name: String,
    /// `(link name, resolved target)` for every child, sorted by name.
    links: Vec<(String, PathBuf)>,
    members: Vec<Project>,
}

impl SymlinkDirectory {
    /// Read the links in `path`, reusing already loaded `known` projects.
    pub fn load(path: &Path, known: &[Project], files: &FileOps) -> Result<Self> {
        let mut entries: Vec<PathBuf> = fs::read_dir(path)?
            .flatten()
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .map(|e| e.path())
            .collect();
        entries.sort();

        let mut links = Vec::new();
        let mut members: Vec<Project> = Vec::new();
        for entry in entries {
            let link_name = entry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let target = match resolve_link(&entry) {
                Ok(target) => target,
                Err(_) => {
                    warn!("couldn't resolve symlink '{}', skipping", entry.display());
                    continue;
                }
            };
            links.push((link_name.clone(), target.clone()));
            if link_name == ROOT_LINK_NAME {
                continue;
            }

            let project_dir = match target.parent() {
                Some(parent) if is_project_dir(parent) => parent.to_path_buf(),
                _ => {
                    warn!(
                        "symlink '{}' doesn't point into a project, skipping",
                        entry.display()
                    );
                    continue;
                }
            };
            if members.iter().any(|m| m.realpath() == project_dir) {
                continue;
            }
            let member = match known.iter().find(|p| p.realpath() == project_dir) {
                Some(project) => project.clone(),
                None => Project::load(&project_dir, files)?,
            };
            members.push(member);
        }

        let name = path
            .file_name()
            .map(|n| normalize_name(&n.to_string_lossy()))
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            name,
            links,
            members,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn members(&self) -> &[Project] {
        &self.members
    }

    pub fn key(&self) -> MountKey {
        MountKey::Directory(self.path.clone())
    }

    /// Every environment any member declares, in first-seen order.
    pub fn environments(&self) -> Vec<String> {
        let mut environments: Vec<String> = Vec::new();
        for env in self.members.iter().flat_map(|m| m.environments()) {
            if !environments.contains(env) {
                environments.push(env.clone());
            }
        }
        environments
    }

    pub fn server_name(&self, env: &str) -> String {
        format!("{}-{}.local", self.name, env)
    }

    pub fn port(&self, env: &str) -> Result<u16> {
        let ports = self
            .members
            .iter()
            .map(|p| p.deterministic_port(env))
            .collect::<Result<Vec<_>>>()?;
        Ok(port::reduce_sum(ports))
    }

    /// Location relative to `projects_dir`, without resolving the directory
    /// itself (it may be a symlink).
    pub fn relative_path(&self, projects_dir: &Path) -> Result<PathBuf> {
        let parent = self.path.parent().unwrap_or(Path::new("/"));
        let parent = fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
        match self.path.file_name() {
            Some(name) => relative_to(&parent.join(name), projects_dir),
            None => relative_to(&parent, projects_dir),
        }
    }

    /// Mount points taken from the link names. The `root` link redirects
    /// to whichever sibling shares its target.
    pub fn mount_plan(&self) -> MountPlan {
        let root_target = self
            .links
            .iter()
            .find(|(name, _)| name == ROOT_LINK_NAME)
            .map(|(_, target)| target);
        let redirect = root_target.and_then(|target| {
            self.links
                .iter()
                .find(|(name, t)| name != ROOT_LINK_NAME && t == target)
                .map(|(name, _)| name.clone())
        });
        if redirect.is_none() {
            warn!(
                "Couldn't find root link in {}. Specify a symlink named 'root' that points to one of the other symlinks if you want to be redirected to that app when visiting '/'",
                self.path.display()
            );
        }
        MountPlan {
            redirect,
            base_uris: self
                .links
                .iter()
                .filter(|(name, _)| name != ROOT_LINK_NAME)
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }
}
