//! Virtual host generation.
//!
//! Renders a [`Stanza`] for every site and environment, writes it to
//! `vhost/nginx/<path>/<env>.conf`, and finally rewrites the include
//! manifest so it lists every stanza ever generated, sorted.
//!
//! An existing stanza that differs from the freshly rendered one is
//! overwritten after a warning.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::filesystem::{read_optional, FileOps, WriteOutcome};
use crate::registry::Registry;
use crate::settings::Settings;
use crate::shared_host::{MountKey, MountPlan};
use crate::site::Site;
use crate::stanza::Stanza;

/// One stanza file produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub environment: String,
    pub outcome: WriteOutcome,
}

/// Writes stanzas for one run.
pub struct Generator<'a> {
    settings: &'a Settings,
    files: FileOps,
    /// Mount plans computed so far, so each missing-root warning is
    /// printed once per run.
    mounts: HashMap<MountKey, MountPlan>,
}

impl<'a> Generator<'a> {
    pub fn new(settings: &'a Settings, files: FileOps) -> Self {
        Self {
            settings,
            files,
            mounts: HashMap::new(),
        }
    }

    fn mount_plan(&mut self, site: &Site<'_>) -> MountPlan {
        let Some(key) = site.mount_key() else {
            return MountPlan::default();
        };
        self.mounts
            .entry(key)
            .or_insert_with(|| match site {
                Site::Shared(host) => host.mount_plan(),
                Site::SymlinkDir(dir) => dir.mount_plan(),
                Site::Project(_) => MountPlan::default(),
            })
            .clone()
    }

    /// Build the stanza for `site` in `env`.
    pub fn stanza(&mut self, site: &Site<'_>, env: &str, shared: &HashSet<&str>) -> Result<Stanza> {
        let plan = self.mount_plan(site);
        Ok(Stanza {
            port: site.port(env)?,
            server_names: site.server_names(env, shared),
            root: site.document_root(env, &self.settings.layout, self.settings.projects_dir())?,
            environment: env.to_string(),
            redirect: plan.redirect,
            base_uris: plan.base_uris,
        })
    }

    /// Render and write the stanza for `site` in `env`.
    pub fn write_site(
        &mut self,
        site: &Site<'_>,
        env: &str,
        shared: &HashSet<&str>,
    ) -> Result<GeneratedFile> {
        let contents = self.stanza(site, env, shared)?.to_string();
        let relative = site.relative_path(self.settings.projects_dir())?;
        let path = self.settings.layout.stanza_path(&relative, env);
        debug!("{} ({}) -> {}", site.describe(), env, path.display());
        let outcome = self.files.write_tracked(&path, &contents)?;
        Ok(GeneratedFile {
            path,
            environment: env.to_string(),
            outcome,
        })
    }

    /// Write every stanza the registry calls for, then the manifest.
    pub fn generate(&mut self, registry: &Registry) -> Result<Vec<GeneratedFile>> {
        let shared = registry.shared_server_names();
        let mut generated = Vec::new();
        for site in registry.sites() {
            for env in site.environments() {
                if self.settings.wants_environment(&env) {
                    generated.push(self.write_site(&site, &env, &shared)?);
                }
            }
        }
        let paths: Vec<PathBuf> = generated.iter().map(|g| g.path.clone()).collect();
        self.write_manifest(&paths)?;
        Ok(generated)
    }

    /// Merge `include` lines for `paths` into the manifest.
    ///
    /// Existing lines are kept; the result is deduplicated and sorted.
    pub fn write_manifest(&self, paths: &[PathBuf]) -> Result<()> {
        let manifest = self.settings.layout.manifest_path();
        let existing = read_optional(&manifest)?.unwrap_or_default();
        let lines: BTreeSet<String> = existing
            .lines()
            .map(str::to_string)
            .chain(paths.iter().map(|p| include_line(p)))
            .collect();
        let mut contents = String::new();
        for line in lines {
            contents.push_str(&line);
            contents.push('\n');
        }
        self.files.write(&manifest, &contents)
    }
}

fn include_line(path: &Path) -> String {
    format!("include {};", path.display())
}
