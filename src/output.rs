//! # Output Configuration
//!
//! Controls how summary lines look: emoji and color when the terminal can
//! show them, bracketed plain markers otherwise.
//!
//! Honoured settings:
//! - `--color=never|always|auto`
//! - `NO_COLOR` disables colors when set (https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stdout is not a TTY
//! - `TERM=dumb` disables colors
//!
//! ```rust,ignore
//! use webconfig::output::{OutputConfig, Marker};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{}", config.line(Marker::Done, "wrote 4 stanzas"));
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and the `--color` flag.
    ///
    /// `always` and `never` win over the environment; anything else detects.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // presence alone disables, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// A summary line led by `marker`.
    pub fn line(&self, marker: Marker, message: &str) -> String {
        let (glyph, plain) = marker.symbols();
        let lead = emoji(self, glyph, plain);
        if self.use_color {
            format!("{} {}", lead, marker.paint(message))
        } else {
            format!("{} {}", lead, message)
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kinds of summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Something was written or is already in place.
    Done,
    /// Something needs the user's attention.
    Attention,
    /// Nothing was written because of a dry run.
    DryRun,
}

impl Marker {
    fn symbols(self) -> (&'static str, &'static str) {
        match self {
            Marker::Done => ("✅", "[OK]"),
            Marker::Attention => ("⚠️", "[!!]"),
            Marker::DryRun => ("🔍", "[DRY RUN]"),
        }
    }

    fn paint(self, message: &str) -> String {
        match self {
            Marker::Done => style(message).green().to_string(),
            Marker::Attention => style(message).yellow().to_string(),
            Marker::DryRun => style(message).cyan().to_string(),
        }
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
