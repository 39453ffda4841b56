//! Deterministic port allocation.
//!
//! A project's port is derived from the bytes of every file under its
//! `config/` directory plus the environment name, so it stays stable across
//! runs and machines until the configuration itself changes:
//!
//! ```text
//! port = STARTING_PORT + (sha1(config files ++ env) as big integer) % PORT_POOL_SIZE
//! ```
//!
//! Files are concatenated in depth-first order with siblings sorted by file
//! name. Shared hosts do not hash; they reduce the sum of their members'
//! ports into the same pool (see [`reduce_sum`]).

use std::fs;
use std::path::Path;

use sha1::{Digest, Sha1};
use walkdir::WalkDir;

use crate::defaults::{PORT_POOL_SIZE, STARTING_PORT};
use crate::error::Result;

/// Concatenate the contents of every regular file under `<project>/config`.
///
/// Symlinks to files are followed; symlinked directories are not descended.
pub fn config_contents(project_dir: &Path) -> Result<Vec<u8>> {
    let config_dir = project_dir.join("config");
    let mut contents = Vec::new();
    for entry in WalkDir::new(&config_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.path().is_file() {
            contents.extend(fs::read(entry.path())?);
        }
    }
    Ok(contents)
}

/// Port for a project whose config files concatenate to `contents`.
pub fn port_from_contents(contents: &[u8], env: &str) -> u16 {
    let mut hasher = Sha1::new();
    hasher.update(contents);
    hasher.update(env.as_bytes());
    let digest = hasher.finalize();

    // The digest read as one big-endian integer, reduced as we go.
    let pool = u32::from(PORT_POOL_SIZE);
    let remainder = digest
        .iter()
        .fold(0u32, |acc, byte| (acc * 256 + u32::from(*byte)) % pool);
    STARTING_PORT + remainder as u16
}

/// Port for the project at `project_dir` in `env`.
pub fn generate_port(project_dir: &Path, env: &str) -> Result<u16> {
    Ok(port_from_contents(&config_contents(project_dir)?, env))
}

/// Fold a set of member ports into one port in the pool.
///
/// This is a single modular reduction of the plain sum, not a re-hash, so
/// the result moves whenever any member's port does.
pub fn reduce_sum<I>(ports: I) -> u16
where
    I: IntoIterator<Item = u16>,
{
    let sum: u64 = ports.into_iter().map(u64::from).sum();
    STARTING_PORT + (sum % u64::from(PORT_POOL_SIZE)) as u16
}
