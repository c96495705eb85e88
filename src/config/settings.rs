//! Optional user settings file (`spill/config.toml`).
//!
//! ```toml
//! quiet = false
//! expand = true
//! override = false
//! ignore = ["share/info/dir"]
//! conflict_list = "/var/tmp/spill-conflicts"
//! ```
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::Options;
use super::toml_loader;

/// Defaults read from the settings file and merged under the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Show only warnings and errors.
    pub quiet: bool,
    /// Expand links to foreign package directories when needed.
    pub expand: bool,
    /// Replace conflicting foreign links.
    #[serde(rename = "override")]
    pub override_conflicts: bool,
    /// Extra relative paths to leave alone on every run.
    pub ignore: Vec<PathBuf>,
    /// Where to write the conflict list when none is given on the command line.
    pub conflict_list: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        toml_loader::load_config(path)
    }

    /// Default settings location: `$XDG_CONFIG_HOME/spill/config.toml`,
    /// falling back to `$HOME/.config/spill/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("spill").join("config.toml"))
    }

    /// Merge these settings under command-line `options`.
    ///
    /// Boolean switches are enabled if either side enables them.
    pub const fn apply_to(&self, options: &mut Options) {
        options.quiet |= self.quiet;
        options.expand |= self.expand;
        options.override_conflicts |= self.override_conflicts;
    }
}
