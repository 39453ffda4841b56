//! # Per-Project Configuration
//!
//! Each project may carry a `.webconfig.yml` describing, per environment,
//! the port its virtual host listens on and the hostnames it answers to:
//!
//! ```yaml
//! development:
//!   port: 43273
//!   relative_root_url: /foo
//!   relative_root_url_root: true
//!   server_names:
//!   - sub-uri-app-foo-development.local
//!   - sub-uri-apps-development.local
//! test:
//!   port: 46677
//!   server_names:
//!   - app-test.local
//! ```
//!
//! Top-level keys whose value is a mapping are environment sections. Any
//! other top-level key is a shared default merged under every environment,
//! with the environment's own value winning. Keys written in the older
//! symbol form (`:development:`, `:port:`) are accepted.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Header written above a freshly generated config file.
pub const EXAMPLE_TEXT: &str = r#"# This YAML file describes the web server configuration for this project.
# Here's an example:
#
# test:
#   port: 46677
#   server_names:
#   - app-test.local
# development:
#   port: 43273
#   relative_root_url: /foo
#   relative_root_url_root: true
#   server_names:
#   - sub-uri-app-foo-development.local
#   - sub-uri-apps-development.local
# production:
#   port: 46767
#   server_names:
#   - app-production.local
#
# Visiting app-test.local will load the app in the test environment.
# Each vhost listens on its port on every hostname given, as well as on
# port 80 for those hostnames. In the example above "http://localhost:46767"
# and "http://app-production.local" both reach the app in production mode.
#
# The development section shows a relative_root_url app. All apps that share
# a server name and set relative_root_url are served from one virtual host.
# If another app had:
#
# development:
#   port: 44893
#   relative_root_url: /bar
#   server_names:
#   - sub-uri-app-bar-development.local
#   - sub-uri-apps-development.local
#
# then "http://sub-uri-apps-development.local/foo" reaches the first app and
# "http://sub-uri-apps-development.local/bar" the second. Because the foo app
# sets relative_root_url_root, "http://sub-uri-apps-development.local/"
# redirects to it.

"#;

/// One environment's settings as written in the file. Every field may be
/// omitted and filled from shared defaults or synthesized values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_root_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_root_url_root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_names: Option<Vec<String>>,
}

impl EnvironmentConfig {
    /// Fill every missing field from `fallback`.
    pub fn or(self, fallback: &EnvironmentConfig) -> EnvironmentConfig {
        EnvironmentConfig {
            port: self.port.or(fallback.port),
            relative_root_url: self
                .relative_root_url
                .or_else(|| fallback.relative_root_url.clone()),
            relative_root_url_root: self.relative_root_url_root.or(fallback.relative_root_url_root),
            server_names: self.server_names.or_else(|| fallback.server_names.clone()),
        }
    }
}

/// Fully resolved settings for one project in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSettings {
    pub port: u16,
    pub server_names: Vec<String>,
    pub relative_root_url: Option<String>,
    pub relative_root_url_root: bool,
}

/// The contents of a `.webconfig.yml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Environment sections, in file order.
    pub environments: Vec<(String, EnvironmentConfig)>,
    /// Top-level values shared by every environment.
    pub shared: EnvironmentConfig,
}

impl ProjectConfig {
    /// Parse the YAML text of a project config file.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let blank = text
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if blank {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text)?;
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Err(Error::ConfigParse {
                    path: path.to_path_buf(),
                    message: "expected a mapping of environments".to_string(),
                })
            }
        };

        let mut environments = Vec::new();
        let mut shared = Mapping::new();
        for (key, value) in strip_symbol_keys(mapping) {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(Error::ConfigParse {
                        path: path.to_path_buf(),
                        message: format!("unexpected key {:?}", other),
                    })
                }
            };
            match value {
                Value::Mapping(section) => {
                    let section = strip_symbol_keys(section);
                    let config = serde_yaml::from_value(Value::Mapping(section)).map_err(|e| {
                        Error::ConfigParse {
                            path: path.to_path_buf(),
                            message: format!("environment '{}': {}", name, e),
                        }
                    })?;
                    environments.push((name, config));
                }
                other => {
                    shared.insert(Value::String(name), other);
                }
            }
        }

        let shared = serde_yaml::from_value(Value::Mapping(shared)).map_err(|e| {
            Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            environments,
            shared,
        })
    }

    /// Render as YAML, shared defaults first, then environment sections.
    pub fn to_yaml(&self) -> Result<String> {
        let mut mapping = match serde_yaml::to_value(&self.shared)? {
            Value::Mapping(mapping) => mapping,
            _ => Mapping::new(),
        };
        for (name, config) in &self.environments {
            mapping.insert(Value::String(name.clone()), serde_yaml::to_value(config)?);
        }
        Ok(serde_yaml::to_string(&Value::Mapping(mapping))?)
    }

    /// The section for `env`, if the file has one.
    pub fn environment(&self, env: &str) -> Option<&EnvironmentConfig> {
        self.environments
            .iter()
            .find(|(name, _)| name == env)
            .map(|(_, config)| config)
    }

    /// Names of the environment sections, in file order.
    pub fn environment_names(&self) -> impl Iterator<Item = &str> {
        self.environments.iter().map(|(name, _)| name.as_str())
    }

    /// Resolve `env` against this file, falling back to `defaults` for
    /// anything neither the section nor the shared values provide.
    pub fn resolve(&self, env: &str, defaults: &EnvironmentSettings) -> EnvironmentSettings {
        let merged = self
            .environment(env)
            .cloned()
            .unwrap_or_default()
            .or(&self.shared);
        EnvironmentSettings {
            port: merged.port.unwrap_or(defaults.port),
            server_names: merged
                .server_names
                .unwrap_or_else(|| defaults.server_names.clone()),
            relative_root_url: merged
                .relative_root_url
                .or_else(|| defaults.relative_root_url.clone()),
            relative_root_url_root: merged
                .relative_root_url_root
                .unwrap_or(defaults.relative_root_url_root),
        }
    }
}

impl From<&EnvironmentSettings> for EnvironmentConfig {
    fn from(settings: &EnvironmentSettings) -> Self {
        EnvironmentConfig {
            port: Some(settings.port),
            relative_root_url: settings.relative_root_url.clone(),
            relative_root_url_root: settings.relative_root_url_root.then_some(true),
            server_names: Some(settings.server_names.clone()),
        }
    }
}

/// Turn `:name` keys into `name`.
fn strip_symbol_keys(mapping: Mapping) -> Mapping {
    mapping
        .into_iter()
        .map(|(key, value)| match key {
            Value::String(s) => {
                let stripped = s.strip_prefix(':').map(str::to_string).unwrap_or(s);
                (Value::String(stripped), value)
            }
            other => (other, value),
        })
        .collect()
}

/// A config file body holding `settings` for each environment in `order`.
pub fn synthesize(settings: &BTreeMap<String, EnvironmentSettings>, order: &[String]) -> ProjectConfig {
    ProjectConfig {
        environments: order
            .iter()
            .filter_map(|env| settings.get(env).map(|s| (env.clone(), s.into())))
            .collect(),
        shared: EnvironmentConfig::default(),
    }
}
