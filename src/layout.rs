//! Paths inside the config root.
//!
//! ```text
//! <config-root>/
//!   global_config.yml
//!   links/<env>                     -> projects directory
//!   vhost/nginx/projects.conf       aggregate include manifest
//!   vhost/nginx/<path>/<env>.conf   one stanza per site and environment
//!   sub_uri_apps/<server_name>/     link farm for each shared host
//! ```

use std::path::{Path, PathBuf};

use crate::defaults::GLOBAL_CONFIG_FILENAME;

/// The directory tree this tool owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.root.join(GLOBAL_CONFIG_FILENAME)
    }

    pub fn links_dir(&self) -> PathBuf {
        self.root.join("links")
    }

    /// Symlink standing in for the projects directory in `env`'s stanzas.
    pub fn environment_link(&self, env: &str) -> PathBuf {
        self.links_dir().join(env)
    }

    pub fn vhost_dir(&self) -> PathBuf {
        self.root.join("vhost").join("nginx")
    }

    /// Where the stanza for `relative_path` in `env` is written.
    pub fn stanza_path(&self, relative_path: &Path, env: &str) -> PathBuf {
        self.vhost_dir()
            .join(relative_path)
            .join(format!("{}.conf", env))
    }

    /// The include manifest the web server's main config pulls in.
    pub fn manifest_path(&self) -> PathBuf {
        self.vhost_dir().join("projects.conf")
    }

    pub fn sub_uri_apps_dir(&self) -> PathBuf {
        self.root.join("sub_uri_apps")
    }

    /// Link farm directory for one shared host.
    pub fn shared_host_dir(&self, server_name: &str) -> PathBuf {
        self.sub_uri_apps_dir().join(server_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/home/me/.webconfig");
        assert_eq!(
            layout.global_config_path(),
            PathBuf::from("/home/me/.webconfig/global_config.yml")
        );
        assert_eq!(
            layout.environment_link("test"),
            PathBuf::from("/home/me/.webconfig/links/test")
        );
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/home/me/.webconfig/vhost/nginx/projects.conf")
        );
        assert_eq!(
            layout.shared_host_dir("apps.local"),
            PathBuf::from("/home/me/.webconfig/sub_uri_apps/apps.local")
        );
    }

    #[test]
    fn test_stanza_path_nests_relative_path() {
        let layout = Layout::new("/cfg");
        assert_eq!(
            layout.stanza_path(Path::new("clients/shop"), "production"),
            PathBuf::from("/cfg/vhost/nginx/clients/shop/production.conf")
        );
        assert_eq!(
            layout.stanza_path(Path::new(""), "test"),
            PathBuf::from("/cfg/vhost/nginx/test.conf")
        );
    }
}
