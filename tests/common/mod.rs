//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_standard_apps();
//!     fixture.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// `.webconfig.yml` bodies for the sample apps.
#[allow(dead_code)]
pub mod configs {
    /// Mounted at `/foo` on the shared host and its root application.
    pub const SUB_URI_FOO: &str = "development:
  relative_root_url: /foo
  relative_root_url_root: true
  server_names:
  - shared-development.local
";

    /// Mounted at `/bar` on the shared host.
    pub const SUB_URI_BAR: &str = "development:
  relative_root_url: /bar
  server_names:
  - shared-development.local
";

    /// Claims the shared hostname for the test environment instead.
    pub const CONFLICTING: &str = "test:
  server_names:
  - shared-development.local
";
}

/// A projects directory, a config root and a hosts file, all temporary.
pub struct TestFixture {
    projects: assert_fs::TempDir,
    config: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            projects: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            config: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a Rails-style app with development, test and production
    /// environments, and optionally a `.webconfig.yml`.
    pub fn with_app(self, path: &str, webconfig: Option<&str>) -> Self {
        let app = self.projects.child(path);
        app.child("config/environment.rb")
            .write_str(&format!("# {}\n", path))
            .expect("Failed to write environment.rb");
        for env in ["development", "test", "production"] {
            app.child(format!("config/environments/{}.rb", env))
                .write_str("")
                .expect("Failed to write environment file");
        }
        app.child("public/index.html")
            .write_str("<html></html>")
            .expect("Failed to write index.html");
        if let Some(body) = webconfig {
            app.child(".webconfig.yml")
                .write_str(body)
                .expect("Failed to write .webconfig.yml");
        }
        self
    }

    /// The stand-alone app plus the two apps sharing
    /// `shared-development.local`.
    pub fn with_standard_apps(self) -> Self {
        self.with_app("stand_alone_app", None)
            .with_app("sub_uri_app_bar", Some(configs::SUB_URI_BAR))
            .with_app("sub_uri_app_foo", Some(configs::SUB_URI_FOO))
    }

    pub fn projects_dir(&self) -> &Path {
        self.projects.path()
    }

    /// Config root passed with `-l`. Not created until a run creates it.
    pub fn config_root(&self) -> PathBuf {
        self.config.path().join("webconfig")
    }

    pub fn hosts_file(&self) -> PathBuf {
        self.config.path().join("hosts")
    }

    /// A path under the config root.
    pub fn generated(&self, relative: &str) -> PathBuf {
        self.config_root().join(relative)
    }

    #[allow(dead_code)]
    pub fn project(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.projects.child(path)
    }

    /// Generated stanza for a project path or hostname.
    #[allow(dead_code)]
    pub fn stanza(&self, relative: &str, env: &str) -> PathBuf {
        self.generated(&format!("vhost/nginx/{}/{}.conf", relative, env))
    }

    /// The binary, isolated from the user's environment.
    pub fn bare_command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("webconfig");
        cmd.current_dir(self.projects.path())
            .env_remove("WEBCONFIG_DIR")
            .env("WEBCONFIG_HOSTS_FILE", self.hosts_file())
            .env("NO_COLOR", "1");
        cmd
    }

    /// A non-interactive run over the projects directory that leaves the
    /// hosts file and nginx alone.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = self.bare_command();
        cmd.arg("--no-add-hosts")
            .arg("--no-restart-nginx")
            .arg("--create-config-root")
            .arg("-l")
            .arg(self.config_root())
            .arg(self.projects.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
