//! # webconfig
//!
//! Generates nginx/Passenger virtual hosts for every Rails-style application
//! under a projects directory, so each one is reachable on its own hostname
//! and on a port that stays the same from run to run.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::PathBuf;
//! use webconfig::port::port_from_contents;
//! use webconfig::stanza::Stanza;
//!
//! // Ports come from the project's config/ files and the environment name.
//! let port = port_from_contents(b"", "development");
//! assert!((40000..50000).contains(&port));
//!
//! let stanza = Stanza {
//!     port,
//!     server_names: vec!["shop-development.local".to_string()],
//!     root: PathBuf::from("/home/me/.webconfig/links/development/shop/public"),
//!     environment: "development".to_string(),
//!     redirect: None,
//!     base_uris: vec![],
//! };
//! assert!(stanza.to_string().contains("rails_env development;"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Projects (`project`, `project_config`)**: a directory holding
//!   `config/environment.rb`, with per-environment port and hostnames read
//!   from (or written to) its `.webconfig.yml`.
//! - **Shared hosts (`shared_host`)**: projects declaring the same hostname
//!   for one environment are served from one virtual host, each mounted on
//!   its own sub-URI.
//! - **Layout (`layout`)**: everything generated lives under the config root
//!   (`~/.webconfig` by default): the link farm, stanzas and the include
//!   manifest.
//! - **File operations (`filesystem`)**: every mutation goes through
//!   `FileOps`, which can log instead of write for dry runs.
//!
//! ## Execution Flow
//!
//! `pipeline::run` performs one pass:
//!
//! 1.  **Discovery**: classify directories below the start directory.
//! 2.  **Registry**: load projects, then group shared hostnames.
//! 3.  **Link farm**: `links/<env>` and `sub_uri_apps/<hostname>/`.
//! 4.  **Generation**: one stanza per site and environment, then the manifest.
//!
//! Hostname table edits (`hosts`) and nginx restarts (`nginx`) are driven by
//! the binary around that pass.

pub mod defaults;
pub mod discovery;
pub mod error;
pub mod filesystem;
pub mod generator;
pub mod global_config;
pub mod hosts;
pub mod layout;
pub mod link_farm;
pub mod nginx;
pub mod output;
pub mod pipeline;
pub mod port;
pub mod project;
pub mod project_config;
pub mod prompt;
pub mod registry;
pub mod settings;
pub mod shared_host;
pub mod site;
pub mod stanza;
