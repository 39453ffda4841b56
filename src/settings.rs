//! Run-wide settings.
//!
//! Everything that varies per invocation (where the projects live, where the
//! generated files go, whether mutations really happen) is gathered into one
//! immutable [`Settings`] value that callers hand to each component.

use std::path::{Path, PathBuf};

use crate::layout::Layout;

/// How filesystem mutations are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Perform every write.
    #[default]
    Live,
    /// Log each write as `test mode: ...` instead of performing it.
    Test,
    /// Skip every write without comment.
    ReadOnly,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory searched for projects; `links/<env>` points here.
    pub projects_dir: PathBuf,
    /// Where discovery starts. Either `projects_dir` or a single project.
    pub start_dir: PathBuf,
    pub layout: Layout,
    pub mode: Mode,
    /// Restricts generation to these environments when set.
    pub environments: Option<Vec<String>>,
}

impl Settings {
    pub fn new(projects_dir: impl Into<PathBuf>, layout: Layout) -> Self {
        let projects_dir = projects_dir.into();
        Self {
            start_dir: projects_dir.clone(),
            projects_dir,
            layout,
            mode: Mode::Live,
            environments: None,
        }
    }

    pub fn with_start_dir(mut self, start_dir: impl Into<PathBuf>) -> Self {
        self.start_dir = start_dir.into();
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_environments(mut self, environments: Vec<String>) -> Self {
        self.environments = if environments.is_empty() {
            None
        } else {
            Some(environments)
        };
        self
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Whether `env` passes the environment filter.
    pub fn wants_environment(&self, env: &str) -> bool {
        match &self.environments {
            Some(filter) => filter.iter().any(|e| e == env),
            None => true,
        }
    }
}
