//! The system hostname table (`/etc/hosts`).
//!
//! Every line this tool appends ends with a `# webconfig` marker so it can
//! be told apart from lines the user wrote. Hostnames added are recorded in
//! the global config, and [`remove_hostnames`] deletes exactly those marked
//! lines again.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::defaults::LOOPBACK;
use crate::error::Result;
use crate::filesystem::{read_optional, FileOps};
use crate::global_config::GlobalConfig;

const MARKER: &str = "# webconfig";

/// An in-memory copy of a hosts file.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl HostsFile {
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Read `path`. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_optional(path)?.unwrap_or_default();
        Ok(Self::parse(path, &text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The address `name` is mapped to by the first line naming it.
    pub fn address_of(&self, name: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let mut fields = strip_comment(line).split_whitespace();
            let address = fields.next()?;
            fields.any(|n| n == name).then_some(address)
        })
    }

    /// Append a marked loopback entry for `name`.
    pub fn add(&mut self, name: &str) {
        self.lines.push(format!("{} {} {}", LOOPBACK, name, MARKER));
    }

    /// Remove marked lines mapping any of `names`. Returns how many went.
    pub fn remove_marked(&mut self, names: &[String]) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| {
            if !line.trim_end().ends_with(MARKER) {
                return true;
            }
            !strip_comment(line)
                .split_whitespace()
                .skip(1)
                .any(|n| names.iter().any(|h| h == n))
        });
        before - self.lines.len()
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the table back. Failure is a warning, not an error.
    pub fn save_or_warn(&self, files: &FileOps) {
        if let Err(e) = files.write(&self.path, &self.render()) {
            warn!("couldn't update {}: {}", self.path.display(), e);
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

/// How each requested hostname fared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostsReport {
    pub already_correct: Vec<String>,
    pub added: Vec<String>,
    /// Hostnames a dry run left out of the table.
    pub would_add: Vec<String>,
    /// Hostnames mapped somewhere else, with that address.
    pub mismatched: Vec<(String, String)>,
}

/// Map every name in `names` to the loopback address.
///
/// Names already present are left alone. Added names are recorded in
/// `global`; in a dry run nothing is recorded or written.
pub fn add_hostnames(
    hosts: &mut HostsFile,
    names: &[String],
    global: &mut GlobalConfig,
    files: &FileOps,
) -> HostsReport {
    let mut report = HostsReport::default();
    for name in names {
        match hosts.address_of(name) {
            Some(LOOPBACK) => report.already_correct.push(name.clone()),
            Some(other) => {
                warn!(
                    "{} is in {} but points to {}, not {}",
                    name,
                    hosts.path().display(),
                    other,
                    LOOPBACK
                );
                report.mismatched.push((name.clone(), other.to_string()));
            }
            None => {
                if files.is_live() {
                    hosts.add(name);
                    global.record_host(name);
                    report.added.push(name.clone());
                } else {
                    info!("would have added {} -> {}", name, LOOPBACK);
                    report.would_add.push(name.clone());
                }
            }
        }
    }
    if !report.added.is_empty() {
        hosts.save_or_warn(files);
    }
    report
}

/// Delete every entry recorded in `global`, then forget them.
pub fn remove_hostnames(hosts: &mut HostsFile, global: &mut GlobalConfig, files: &FileOps) -> usize {
    let removed = hosts.remove_marked(&global.hosts);
    if removed > 0 {
        hosts.save_or_warn(files);
    }
    global.hosts.clear();
    removed
}
