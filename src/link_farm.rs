//! The link farm under the config root.
//!
//! Generated `root` directives never point at project directories directly.
//! `links/<env>` stands in for the projects directory, and each shared host
//! gets `sub_uri_apps/<server_name>/` holding one link per member plus a
//! `root` link for the application `/` redirects to.

use std::path::Path;

use crate::defaults::ROOT_LINK_NAME;
use crate::error::Result;
use crate::filesystem::{FileOps, LinkOutcome};
use crate::layout::Layout;
use crate::shared_host::SharedHost;

/// Creates the symlinks stanzas refer to.
pub struct LinkFarm<'a> {
    layout: &'a Layout,
    files: FileOps,
}

impl<'a> LinkFarm<'a> {
    pub fn new(layout: &'a Layout, files: FileOps) -> Self {
        Self { layout, files }
    }

    /// Point `links/<env>` at `projects_dir` for every environment.
    pub fn link_environments(
        &self,
        environments: &[String],
        projects_dir: &Path,
    ) -> Result<Vec<LinkOutcome>> {
        self.files.create_dir_all(&self.layout.links_dir())?;
        environments
            .iter()
            .map(|env| {
                self.files
                    .ensure_symlink(projects_dir, &self.layout.environment_link(env))
            })
            .collect()
    }

    /// Build `sub_uri_apps/<server_name>/` for one shared host.
    pub fn link_shared_host(&self, host: &SharedHost) -> Result<Vec<LinkOutcome>> {
        let dir = self.layout.shared_host_dir(host.server_name());
        self.files.create_dir_all(&dir)?;

        let env = host.environment();
        let mut outcomes = Vec::new();
        for member in host.members() {
            outcomes.push(
                self.files
                    .ensure_symlink(&member.public_dir(), &dir.join(member.mount_name(env)))?,
            );
        }
        if let Some(root) = host.root_member() {
            outcomes.push(
                self.files
                    .ensure_symlink(&root.public_dir(), &dir.join(ROOT_LINK_NAME))?,
            );
        }
        Ok(outcomes)
    }
}
