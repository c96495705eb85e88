//! Run configuration: resolved roots, package identity and options.
pub mod ignore;
pub mod settings;
pub mod toml_loader;

use std::path::{Path, PathBuf};

pub use ignore::IgnoreSet;
pub use settings::Settings;

use crate::error::ConfigError;
use crate::farm::{Installation, PackageId};
use crate::paths;

/// Behavior switches for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Only report warnings and errors.
    pub quiet: bool,
    /// Validate and report, change nothing.
    pub dry_run: bool,
    /// Expand links to foreign package directories when this package needs
    /// to put entries inside them.
    pub expand: bool,
    /// Skip the `bin`/`sbin`/`lib` sanity check.
    pub force: bool,
    /// Replace links that belong to other packages.
    pub override_conflicts: bool,
    /// Remove the previously recorded version before installing.
    pub upgrade: bool,
}

/// What the run does with the package.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Validate, then link the package into the destination.
    #[default]
    Install,
    /// Remove the package's links from the destination.
    Remove,
}

impl Mode {
    /// Command name used for the log file.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Remove => "remove",
        }
    }
}

/// Everything a run needs, resolved once up front and never changed.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Package tree that is read.
    pub source_root: PathBuf,
    /// Shared hierarchy that is written; always canonical.
    pub dest_root: PathBuf,
    /// Relative path from `dest_root` to `source_root`, present when the
    /// source was given as a relative path.
    pub relative: Option<PathBuf>,
    /// Identity of the package being processed.
    pub package: PackageId,
    /// Relative paths left alone.
    pub ignore: IgnoreSet,
    /// Behavior switches.
    pub options: Options,
    /// Install or remove.
    pub mode: Mode,
    /// File receiving the list of conflicting paths.
    pub conflict_list: Option<PathBuf>,
}

impl RunConfig {
    /// Resolve `source` and `dest` as given on the command line, with
    /// relative paths taken from `cwd`.
    ///
    /// An absolute source is used as written (with doubled and trailing
    /// separators removed) and links point at it absolutely. A relative
    /// source is canonicalized and links are made relative to it. The
    /// destination is always canonicalized.
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be canonicalized or the source does
    /// not end in `<name>/<version>`.
    pub fn resolve(source: &Path, dest: &Path, cwd: &Path) -> Result<Self, ConfigError> {
        let canonical = |path: &Path| {
            std::fs::canonicalize(cwd.join(path)).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        let dest_root = canonical(dest)?;
        let (source_root, relative) = if source.is_absolute() {
            (paths::clean_dir(source), None)
        } else {
            let source_root = canonical(source)?;
            let relative = paths::relative(&dest_root, &source_root);
            (source_root, Some(relative))
        };
        let package =
            PackageId::from_root(&source_root).ok_or_else(|| ConfigError::NoPackageIdentity {
                path: source.to_path_buf(),
            })?;

        Ok(Self {
            source_root,
            dest_root,
            relative,
            package,
            ignore: IgnoreSet::default(),
            options: Options::default(),
            mode: Mode::default(),
            conflict_list: None,
        })
    }

    /// Replace the options.
    #[must_use]
    pub const fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Replace the mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the ignore set.
    #[must_use]
    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// Set the conflict list file.
    #[must_use]
    pub fn with_conflict_list(mut self, path: Option<PathBuf>) -> Self {
        self.conflict_list = path;
        self
    }

    /// The installation this run processes.
    #[must_use]
    pub fn installation(&self) -> Installation {
        Installation {
            source_root: self.source_root.clone(),
            dest_root: self.dest_root.clone(),
            relative: self.relative.clone(),
            package: self.package.clone(),
        }
    }
}
