//! # Error Handling
//!
//! This module defines the centralized error type for the `webconfig`
//! library. It uses the `thiserror` library to create a single `Error` enum
//! covering every fatal failure mode, with messages that name the offending
//! hostname, environment or path.
//!
//! Only fatal conditions are errors. Recoverable problems (a stanza that
//! drifted from its on-disk copy, a symlink that points somewhere
//! unexpected, a shared host without a root application) are reported with
//! `log::warn!` at the point where they are detected and the run continues.
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for webconfig operations
#[derive(Error, Debug)]
pub enum Error {
    /// Two projects claim the same hostname for different environments.
    #[error("can't have one hostname map to multiple environments: {server_name} is claimed for both {first} and {second}")]
    HostnameEnvironmentConflict {
        server_name: String,
        first: String,
        second: String,
    },

    /// More than one member of a shared host is flagged as its root application.
    #[error("shared host {server_name} ({environment}) has more than one root application: {}", members.join(", "))]
    MultipleRootMembers {
        server_name: String,
        environment: String,
        members: Vec<String>,
    },

    /// No config root was given and the home directory could not be found.
    #[error("Couldn't find $HOME; pass --config-root or set WEBCONFIG_DIR")]
    HomeNotFound,

    /// The user declined to create the config root on first run.
    #[error("for your first run you'll need to supply your projects dir")]
    SetupDeclined,

    /// The global config file exists but lists no projects directory.
    #[error("Global config {path} does not name a projects directory")]
    NoProjectsDir { path: PathBuf },

    /// A project lies outside the configured projects directory.
    #[error("Project {project} is not inside the projects directory {projects_dir}")]
    OutsideProjectsDir {
        project: PathBuf,
        projects_dir: PathBuf,
    },

    /// A per-project or global config file could not be interpreted.
    #[error("Invalid config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Running the web server binary failed.
    #[error("Web server command '{command}' failed: {message}")]
    WebServer { command: String, message: String },

    /// A filesystem operation failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A console prompt failed, wrapped from `dialoguer::Error`.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
