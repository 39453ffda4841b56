//! The nginx/Passenger `server` block.

use std::fmt;
use std::path::PathBuf;

/// Fields interpolated into one generated `server` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    pub port: u16,
    pub server_names: Vec<String>,
    pub root: PathBuf,
    pub environment: String,
    /// Mount point `/` redirects to.
    pub redirect: Option<String>,
    /// Sub-URIs mounted with `passenger_base_uri`.
    pub base_uris: Vec<String>,
}

impl Stanza {
    /// Each name also matches its subdomains.
    fn server_name_list(&self) -> String {
        if self.server_names.is_empty() {
            return "\"\"".to_string();
        }
        self.server_names
            .iter()
            .map(|name| format!("{} *.{}", name, name))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Stanza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "server {{")?;
        writeln!(f, "    listen {};", self.port)?;
        writeln!(f, "    listen 80;")?;
        writeln!(f, "    server_name {};", self.server_name_list())?;
        writeln!(f, "    root {};", self.root.display())?;
        writeln!(f, "    passenger_enabled on;")?;
        writeln!(f)?;
        if let Some(app) = &self.redirect {
            writeln!(f, "    rewrite ^/$ /{} redirect;", app)?;
        }
        writeln!(f, "    rails_env {};", self.environment)?;
        writeln!(f, "    rails_spawn_method conservative;")?;
        writeln!(f)?;
        for uri in &self.base_uris {
            writeln!(f, "    passenger_base_uri /{};", uri)?;
        }
        writeln!(f, "    client_max_body_size 100m;")?;
        writeln!(f, "    client_body_timeout   300;")?;
        writeln!(f, "}}")
    }
}
