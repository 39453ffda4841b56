//! Projects: application directories discovered on disk.
//!
//! A [`Project`] is identified by its canonical path, so reaching the same
//! directory through two symlinked aliases yields two equal values.

use std::collections::BTreeMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use log::debug;

use crate::defaults::{PROJECT_CONFIG_FILENAME, PROJECT_MARKER};
use crate::error::{Error, Result};
use crate::filesystem::{read_optional, FileOps};
use crate::port;
use crate::project_config::{synthesize, EnvironmentSettings, ProjectConfig, EXAMPLE_TEXT};

/// Whether `dir` is a project: it carries the marker file and is not
/// itself a symlink.
pub fn is_project_dir(dir: &Path) -> bool {
    let is_symlink = fs::symlink_metadata(dir)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    !is_symlink && dir.join(PROJECT_MARKER).exists()
}

/// Environments a project ships with: the basenames of
/// `config/environments/*.rb`, sorted.
pub fn discover_environments(dir: &Path) -> Result<Vec<String>> {
    let pattern = format!(
        "{}/config/environments/*.rb",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut environments = Vec::new();
    for path in glob::glob(&pattern)?.flatten() {
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            environments.push(name.to_string());
        }
    }
    environments.sort();
    Ok(environments)
}

/// Lowercased basename with every run of non-alphanumerics collapsed to a
/// single hyphen and no hyphen at either end.
pub fn normalize_name(basename: &str) -> String {
    let mut name = String::with_capacity(basename.len());
    for c in basename.chars() {
        if c.is_alphanumeric() {
            name.extend(c.to_lowercase());
        } else if !name.ends_with('-') {
            name.push('-');
        }
    }
    name.trim_matches('-').to_string()
}

/// A deployable application directory.
#[derive(Debug, Clone)]
pub struct Project {
    path: PathBuf,
    realpath: PathBuf,
    name: String,
    environments: Vec<String>,
    settings: BTreeMap<String, EnvironmentSettings>,
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.realpath == other.realpath
    }
}

impl Eq for Project {}

impl Hash for Project {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.realpath.hash(state);
    }
}

impl Project {
    /// Load the project at `path`, reading its `.webconfig.yml`.
    ///
    /// A missing config file is synthesized from defaults and written back
    /// through `files` with an explanatory header.
    pub fn load(path: &Path, files: &FileOps) -> Result<Self> {
        let realpath = fs::canonicalize(path)?;
        let name = realpath
            .file_name()
            .map(|n| normalize_name(&n.to_string_lossy()))
            .unwrap_or_default();
        let discovered = discover_environments(&realpath)?;

        let config_path = realpath.join(PROJECT_CONFIG_FILENAME);
        let existing = match read_optional(&config_path)? {
            Some(text) => Some(ProjectConfig::parse(&config_path, &text)?),
            None => None,
        };

        let mut environments = discovered;
        if let Some(config) = &existing {
            for env in config.environment_names() {
                if !environments.iter().any(|e| e == env) {
                    environments.push(env.to_string());
                }
            }
        }

        let contents = port::config_contents(&realpath)?;
        let mut settings = BTreeMap::new();
        for env in &environments {
            let defaults = EnvironmentSettings {
                port: port::port_from_contents(&contents, env),
                server_names: vec![format!("{}-{}.local", name, env)],
                relative_root_url: None,
                relative_root_url_root: false,
            };
            let resolved = match &existing {
                Some(config) => config.resolve(env, &defaults),
                None => defaults,
            };
            settings.insert(env.clone(), resolved);
        }

        if existing.is_none() {
            let body = synthesize(&settings, &environments).to_yaml()?;
            debug!("writing default config {}", config_path.display());
            files.write(&config_path, &format!("{}{}", EXAMPLE_TEXT, body))?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            realpath,
            name,
            environments,
            settings,
        })
    }

    /// The path the project was reached through.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The canonical path, which is the project's identity.
    pub fn realpath(&self) -> &Path {
        &self.realpath
    }

    /// Normalized basename, used in synthesized hostnames.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    pub fn settings(&self, env: &str) -> Option<&EnvironmentSettings> {
        self.settings.get(env)
    }

    /// Configured port for `env`.
    pub fn port(&self, env: &str) -> Option<u16> {
        self.settings(env).map(|s| s.port)
    }

    /// Port derived from the config files alone, ignoring `.webconfig.yml`.
    pub fn deterministic_port(&self, env: &str) -> Result<u16> {
        port::generate_port(&self.realpath, env)
    }

    pub fn server_names(&self, env: &str) -> &[String] {
        self.settings(env)
            .map(|s| s.server_names.as_slice())
            .unwrap_or(&[])
    }

    /// Every `(server_name, environment)` pair the project declares.
    pub fn server_name_env_pairs(&self) -> Vec<(&str, &str)> {
        self.environments
            .iter()
            .flat_map(|env| {
                self.server_names(env)
                    .iter()
                    .map(move |name| (name.as_str(), env.as_str()))
            })
            .collect()
    }

    /// Name of the directory this project is mounted as inside a shared
    /// host: the last segment of its relative root URL, else its name.
    pub fn mount_name(&self, env: &str) -> String {
        self.settings(env)
            .and_then(|s| s.relative_root_url.as_deref())
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.name.clone())
    }

    pub fn is_root_member(&self, env: &str) -> bool {
        self.settings(env)
            .map(|s| s.relative_root_url_root)
            .unwrap_or(false)
    }

    /// Directory the web server serves for this project.
    pub fn public_dir(&self) -> PathBuf {
        self.realpath.join("public")
    }

    /// Location relative to `projects_dir`.
    pub fn relative_path(&self, projects_dir: &Path) -> Result<PathBuf> {
        relative_to(&self.realpath, projects_dir)
    }
}

/// `path` relative to the canonical form of `projects_dir`.
pub fn relative_to(path: &Path, projects_dir: &Path) -> Result<PathBuf> {
    let base = fs::canonicalize(projects_dir).unwrap_or_else(|_| projects_dir.to_path_buf());
    path.strip_prefix(&base)
        .map(Path::to_path_buf)
        .map_err(|_| Error::OutsideProjectsDir {
            project: path.to_path_buf(),
            projects_dir: projects_dir.to_path_buf(),
        })
}
