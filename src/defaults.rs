//! Default values for webconfig.
//!
//! This module provides centralized default values and well-known file
//! names, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// First port handed out by the deterministic allocator.
pub const STARTING_PORT: u16 = 40_000;

/// Number of ports in the allocator's pool.
pub const PORT_POOL_SIZE: u16 = 10_000;

/// Deepest directory level, relative to the projects directory, that is
/// searched for projects. Keeps fixture apps nested inside a project's test
/// tree from being picked up.
pub const MAX_PROJECT_DEPTH: usize = 3;

/// Name of the config root directory inside `$HOME`.
pub const CONFIG_DIR_NAME: &str = ".webconfig";

/// Environment variable overriding the config root.
pub const CONFIG_DIR_ENV: &str = "WEBCONFIG_DIR";

/// Per-project config file name.
pub const PROJECT_CONFIG_FILENAME: &str = ".webconfig.yml";

/// Global config file name inside the config root.
pub const GLOBAL_CONFIG_FILENAME: &str = "global_config.yml";

/// File whose presence marks a directory as a project.
pub const PROJECT_MARKER: &str = "config/environment.rb";

/// Name of the symlink marking the root application of a shared host.
pub const ROOT_LINK_NAME: &str = "root";

/// Loopback address provisioned hostnames resolve to.
pub const LOOPBACK: &str = "127.0.0.1";

/// Default hostname table.
pub const HOSTS_FILE: &str = "/etc/hosts";

/// Environment variable overriding the hostname table.
pub const HOSTS_FILE_ENV: &str = "WEBCONFIG_HOSTS_FILE";

/// Returns the default config root directory, `$HOME/.webconfig`.
///
/// Returns `None` when the home directory cannot be determined; callers
/// must then be given an explicit `--config-root`.
pub fn default_config_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
}
