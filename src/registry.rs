//! The project registry.
//!
//! Holds every site found in one run and works out which projects have to
//! share a virtual host. Projects are indexed by the server names they
//! declare; a name claimed by two or more distinct projects (by canonical
//! path) becomes a [`SharedHost`]. A name may only ever be claimed for one
//! environment.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::discovery::Discovery;
use crate::error::{Error, Result};
use crate::filesystem::FileOps;
use crate::project::Project;
use crate::shared_host::{SharedHost, SymlinkDirectory};
use crate::site::Site;

/// Everything discovered in one run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    projects: Vec<Project>,
    shared_hosts: Vec<SharedHost>,
    symlink_dirs: Vec<SymlinkDirectory>,
}

impl Registry {
    /// Load every discovered directory and resolve shared hosts.
    ///
    /// Projects reached through more than one path are kept once.
    pub fn build(discovery: &Discovery, files: &FileOps) -> Result<Self> {
        let mut projects: Vec<Project> = Vec::new();
        for path in &discovery.projects {
            let project = Project::load(path, files)?;
            if projects.contains(&project) {
                debug!("{} is an alias of a known project", path.display());
                continue;
            }
            projects.push(project);
        }

        let shared_hosts = resolve_shared_hosts(&projects)?;

        let symlink_dirs = discovery
            .symlink_dirs
            .iter()
            .map(|path| SymlinkDirectory::load(path, &projects, files))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            projects,
            shared_hosts,
            symlink_dirs,
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn shared_hosts(&self) -> &[SharedHost] {
        &self.shared_hosts
    }

    pub fn symlink_dirs(&self) -> &[SymlinkDirectory] {
        &self.symlink_dirs
    }

    /// Server names served by a shared host rather than a single project.
    pub fn shared_server_names(&self) -> HashSet<&str> {
        self.shared_hosts.iter().map(|h| h.server_name()).collect()
    }

    /// Every site, projects first, then shared hosts, then symlink
    /// directories, each in discovery order.
    pub fn sites(&self) -> Vec<Site<'_>> {
        self.projects
            .iter()
            .map(Site::Project)
            .chain(self.shared_hosts.iter().map(Site::Shared))
            .chain(self.symlink_dirs.iter().map(Site::SymlinkDir))
            .collect()
    }

    /// Every environment any site declares, in first-seen order.
    pub fn environments(&self) -> Vec<String> {
        let mut environments: Vec<String> = Vec::new();
        for site in self.sites() {
            for env in site.environments() {
                if !environments.contains(&env) {
                    environments.push(env);
                }
            }
        }
        environments
    }

    /// Every hostname the sites answer to, once each, for the environments
    /// `wanted` accepts.
    pub fn hostnames<F>(&self, wanted: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for project in &self.projects {
            for (name, env) in project.server_name_env_pairs() {
                if wanted(env) && seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        for dir in &self.symlink_dirs {
            for env in dir.environments() {
                let name = dir.server_name(&env);
                if wanted(&env) && seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

struct Bucket<'a> {
    server_name: &'a str,
    environment: &'a str,
    projects: Vec<&'a Project>,
}

/// Group projects by declared server name and keep the names claimed by
/// at least two distinct projects.
pub fn resolve_shared_hosts(projects: &[Project]) -> Result<Vec<SharedHost>> {
    let mut buckets: Vec<Bucket<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for project in projects {
        for (server_name, env) in project.server_name_env_pairs() {
            let slot = *index.entry(server_name).or_insert_with(|| {
                buckets.push(Bucket {
                    server_name,
                    environment: env,
                    projects: Vec::new(),
                });
                buckets.len() - 1
            });
            let bucket = &mut buckets[slot];
            if bucket.environment != env {
                return Err(Error::HostnameEnvironmentConflict {
                    server_name: server_name.to_string(),
                    first: bucket.environment.to_string(),
                    second: env.to_string(),
                });
            }
            if !bucket.projects.contains(&project) {
                bucket.projects.push(project);
            }
        }
    }

    buckets
        .into_iter()
        .filter(|bucket| bucket.projects.len() > 1)
        .map(|bucket| {
            SharedHost::new(
                bucket.server_name.to_string(),
                bucket.environment.to_string(),
                bucket.projects.into_iter().cloned().collect(),
            )
        })
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::defaults::PROJECT_CONFIG_FILENAME;
    use crate::discovery::discover;
    use crate::settings::Mode;
    use std::fs;
    use std::os::unix::fs::symlink;
    use std::path::Path;
    use tempfile::TempDir;

    fn make_app(root: &Path, name: &str, config: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("config/environments")).unwrap();
        fs::create_dir_all(dir.join("public")).unwrap();
        fs::write(dir.join("config/environment.rb"), name).unwrap();
        for env in ["development", "production", "test"] {
            fs::write(dir.join(format!("config/environments/{}.rb", env)), env).unwrap();
        }
        if let Some(config) = config {
            fs::write(dir.join(PROJECT_CONFIG_FILENAME), config).unwrap();
        }
    }

    fn build(root: &Path) -> Result<Registry> {
        Registry::build(&discover(root, root).unwrap(), &FileOps::new(Mode::Live))
    }

    #[test]
    fn test_shared_host_detected() {
        let temp = TempDir::new().unwrap();
        make_app(temp.path(), "alone", None);
        make_app(
            temp.path(),
            "bar",
            Some("development:\n  relative_root_url: /bar\n  server_names:\n  - bar.local\n  - shared.local\n"),
        );
        make_app(
            temp.path(),
            "foo",
            Some("development:\n  relative_root_url: /foo\n  relative_root_url_root: true\n  server_names:\n  - shared.local\n"),
        );

        let registry = build(temp.path()).unwrap();

        assert_eq!(registry.projects().len(), 3);
        assert_eq!(registry.shared_hosts().len(), 1);
        let host = &registry.shared_hosts()[0];
        assert_eq!(host.server_name(), "shared.local");
        assert_eq!(host.environment(), "development");
        let members: Vec<_> = host.members().iter().map(|m| m.name()).collect();
        assert_eq!(members, vec!["bar", "foo"]);
    }

    #[test]
    fn test_environment_conflict_is_fatal() {
        let temp = TempDir::new().unwrap();
        make_app(
            temp.path(),
            "bar",
            Some("development:\n  server_names:\n  - shared.local\n"),
        );
        make_app(
            temp.path(),
            "foo",
            Some("test:\n  server_names:\n  - shared.local\n"),
        );

        let err = build(temp.path()).unwrap_err();

        match err {
            Error::HostnameEnvironmentConflict {
                server_name,
                first,
                second,
            } => {
                assert_eq!(server_name, "shared.local");
                assert_eq!(first, "development");
                assert_eq!(second, "test");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_aliases_do_not_make_shared_host() {
        let temp = TempDir::new().unwrap();
        make_app(temp.path(), "app", None);
        let projects_dir = temp.path();
        let app = Project::load(&projects_dir.join("app"), &FileOps::new(Mode::Live)).unwrap();
        let alias_root = TempDir::new().unwrap();
        symlink(projects_dir.join("app"), alias_root.path().join("alias")).unwrap();
        let alias = Project::load(&alias_root.path().join("alias"), &FileOps::new(Mode::Live)).unwrap();

        let shared = resolve_shared_hosts(&[app, alias]).unwrap();

        assert!(shared.is_empty());
    }

    #[test]
    fn test_build_deduplicates_aliases() {
        let temp = TempDir::new().unwrap();
        make_app(temp.path(), "app", None);
        let discovery = Discovery {
            projects: vec![temp.path().join("app"), temp.path().join("app/../app")],
            symlink_dirs: vec![],
        };

        let registry = Registry::build(&discovery, &FileOps::new(Mode::Live)).unwrap();

        assert_eq!(registry.projects().len(), 1);
    }

    #[test]
    fn test_hostnames_listed_once() {
        let temp = TempDir::new().unwrap();
        make_app(temp.path(), "alone", None);
        make_app(
            temp.path(),
            "bar",
            Some("development:\n  server_names:\n  - shared.local\n"),
        );
        make_app(
            temp.path(),
            "foo",
            Some("development:\n  server_names:\n  - shared.local\n"),
        );

        let registry = build(temp.path()).unwrap();
        let all = registry.hostnames(|_| true);

        assert_eq!(
            all,
            vec![
                "alone-development.local",
                "alone-production.local",
                "alone-test.local",
                "shared.local",
                "bar-production.local",
                "bar-test.local",
                "foo-production.local",
                "foo-test.local",
            ]
        );
        let development = registry.hostnames(|env| env == "development");
        assert_eq!(development, vec!["alone-development.local", "shared.local"]);
    }

    #[test]
    fn test_environments_union() {
        let temp = TempDir::new().unwrap();
        make_app(temp.path(), "alone", Some("staging:\n  port: 41000\n"));

        let registry = build(temp.path()).unwrap();

        assert_eq!(
            registry.environments(),
            vec!["development", "production", "test", "staging"]
        );
    }
}
