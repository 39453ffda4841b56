//! One complete run.
//!
//! 1. **Discovery**: classify directories under the start directory.
//! 2. **Registry**: load projects, resolve shared hosts.
//! 3. **Link farm**: `links/<env>` and `sub_uri_apps/<server_name>/`.
//! 4. **Generation**: stanzas and the include manifest.
//!
//! Hostname table edits and web server restarts are left to the caller.

use crate::discovery::discover;
use crate::error::Result;
use crate::filesystem::{FileOps, LinkOutcome};
use crate::generator::{GeneratedFile, Generator};
use crate::link_farm::LinkFarm;
use crate::registry::Registry;
use crate::settings::{Mode, Settings};

/// What a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub registry: Registry,
    pub links: Vec<LinkOutcome>,
    pub generated: Vec<GeneratedFile>,
}

impl RunReport {
    /// Hostnames the generated stanzas answer to.
    pub fn hostnames(&self, settings: &Settings) -> Vec<String> {
        self.registry
            .hostnames(|env| settings.wants_environment(env))
    }
}

/// Discover and load everything under `settings.start_dir`.
pub fn load_registry(settings: &Settings) -> Result<Registry> {
    let discovery = discover(&settings.start_dir, settings.projects_dir())?;
    Registry::build(&discovery, &FileOps::new(settings.mode))
}

/// Run discovery, link farm construction and generation.
pub fn run(settings: &Settings) -> Result<RunReport> {
    let files = FileOps::new(settings.mode);
    let registry = load_registry(settings)?;

    let farm = LinkFarm::new(&settings.layout, files);
    let environments: Vec<String> = registry
        .environments()
        .into_iter()
        .filter(|env| settings.wants_environment(env))
        .collect();
    let mut links = farm.link_environments(&environments, settings.projects_dir())?;
    for host in registry.shared_hosts() {
        if settings.wants_environment(host.environment()) {
            links.extend(farm.link_shared_host(host)?);
        }
    }

    let generated = Generator::new(settings, files).generate(&registry)?;

    Ok(RunReport {
        registry,
        links,
        generated,
    })
}

/// Hostnames a run would provision, without writing anything.
pub fn list_hostnames(settings: &Settings) -> Result<Vec<String>> {
    let read_only = settings.clone().with_mode(Mode::ReadOnly);
    let registry = load_registry(&read_only)?;
    Ok(registry.hostnames(|env| settings.wants_environment(env)))
}
