//! The nginx binary: locating it, reading its main config, and restarting it.
//!
//! Nothing here is fatal to a run. Callers turn errors into warnings.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use regex::Regex;

use crate::error::{Error, Result};
use crate::filesystem::FileOps;

/// Where nginx lives when it isn't on `PATH`.
pub const FALLBACK_BINARY: &str = "/opt/nginx/sbin/nginx";

/// Line nginx needs so long generated hostnames fit its hash buckets.
pub const BUCKET_SIZE_LINE: &str = "server_names_hash_bucket_size 128;";

/// An nginx installation.
#[derive(Debug, Clone)]
pub struct WebServer {
    binary: PathBuf,
}

impl WebServer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// `nginx` on `PATH`, else [`FALLBACK_BINARY`] if it exists.
    pub fn locate() -> Option<Self> {
        which::which("nginx")
            .ok()
            .or_else(|| {
                let fallback = PathBuf::from(FALLBACK_BINARY);
                fallback.exists().then_some(fallback)
            })
            .map(Self::new)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Ask `nginx -t` which config file it loads.
    pub fn config_path(&self) -> Result<PathBuf> {
        let command = format!("{} -t", self.binary.display());
        let output = Command::new(&self.binary)
            .arg("-t")
            .output()
            .map_err(|e| Error::WebServer {
                command: command.clone(),
                message: e.to_string(),
            })?;
        // nginx reports on stderr
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
        parse_config_path(&text)?.ok_or_else(|| Error::WebServer {
            command,
            message: "no config file named in output".to_string(),
        })
    }

    /// Contents of the main config, or an empty string after a warning.
    pub fn read_config(&self) -> String {
        match self
            .config_path()
            .and_then(|path| fs::read_to_string(&path).map_err(Error::from))
        {
            Ok(conf) => conf,
            Err(e) => {
                warn!("Couldn't find/read nginx conf: {}", e);
                String::new()
            }
        }
    }

    /// `sudo nginx -s quit`, a one second pause, then `sudo nginx`.
    pub fn restart(&self, files: &FileOps) -> Result<()> {
        let binary = self.binary.display().to_string();
        if !files.is_live() {
            info!("test mode: restart {}", binary);
            return Ok(());
        }
        info!("Restarting nginx...");
        run_sudo(&[binary.as_str(), "-s", "quit"])?;
        thread::sleep(Duration::from_secs(1));
        run_sudo(&[binary.as_str()])
    }
}

fn run_sudo(args: &[&str]) -> Result<()> {
    let command = format!("sudo {}", args.join(" "));
    info!("running: {}", command);
    let status = Command::new("sudo")
        .args(args)
        .status()
        .map_err(|e| Error::WebServer {
            command: command.clone(),
            message: e.to_string(),
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::WebServer {
            command,
            message: status.to_string(),
        })
    }
}

/// Pull the config path out of `nginx -t` output.
pub fn parse_config_path(output: &str) -> Result<Option<PathBuf>> {
    let re = Regex::new(r"the configuration file (\S+) syntax is ok")?;
    Ok(re
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str())))
}

/// Lines missing from `conf` that generated stanzas depend on.
///
/// Each entry is a complete line the user should add to the `http` block.
pub fn missing_lines(conf: &str, manifest: &Path) -> Vec<String> {
    let mut missing = Vec::new();
    let manifest = manifest.display().to_string();
    if !conf
        .lines()
        .any(|line| line.contains("include") && line.contains(&manifest))
    {
        missing.push(format!("include {};", manifest));
    }
    if !conf.lines().any(|line| {
        line.split_whitespace()
            .collect::<Vec<_>>()
            .starts_with(&["server_names_hash_bucket_size", "128;"])
    }) {
        missing.push(BUCKET_SIZE_LINE.to_string());
    }
    missing
}

/// Warn about every line [`missing_lines`] finds.
pub fn check_config(conf: &str, manifest: &Path) -> Vec<String> {
    let missing = missing_lines(conf, manifest);
    for line in &missing {
        warn!(
            "Couldn't find the following line in your nginx conf. It should be in the http block:\n  {}",
            line
        );
    }
    missing
}
