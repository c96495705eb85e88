//! Domain-specific error types for the symlink farm.
//!
//! Internal modules return typed errors built with [`thiserror`]; the command
//! layer and `main` convert them to [`anyhow::Error`] with the `?` operator
//! and attach context there.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError  run configuration could not be resolved, sanity check failed
//! FarmError    fatal traversal failure (unlistable directory, inconsistent state)
//! ExpandError  one step of directory expansion failed
//! RecordError  install record could not be read or written
//! RunError     a phase finished with a non-zero error tally
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning command-line input into a run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The source root does not end in `<name>/<version>`.
    #[error("cannot derive a package name and version from {}", .path.display())]
    NoPackageIdentity {
        /// Source root as given.
        path: PathBuf,
    },

    /// A root directory could not be canonicalized or inspected.
    #[error("cannot resolve {}: {source}", .path.display())]
    Io {
        /// Path that failed to resolve.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A root lacks every one of `bin`, `sbin` and `lib`.
    #[error("{role} {} does not look like a package tree (no bin, sbin or lib)", .path.display())]
    NotAPackageTree {
        /// Which root failed, `"source"` or `"destination"`.
        role: &'static str,
        /// The offending root.
        path: PathBuf,
    },
}

/// Fatal errors that abort a traversal outright.
///
/// Per-entry failures are counted in the traversal tally instead of being
/// returned through this type.
#[derive(Error, Debug)]
pub enum FarmError {
    /// A source directory could not be listed.
    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The install pass met a destination state that validation would have
    /// rejected, meaning the filesystem changed between the two passes.
    #[error("inconsistent state at {}: {detail}", .path.display())]
    InconsistentState {
        /// Destination entry.
        path: PathBuf,
        /// What was found there.
        detail: String,
    },
}

/// The individual steps of directory expansion, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandStep {
    /// Reading the link being expanded.
    ReadLink,
    /// Reading the permission bits of the linked directory.
    Stat,
    /// Listing the linked directory.
    List,
    /// Removing the link.
    Unlink,
    /// Creating the replacement directory.
    Mkdir,
    /// Creating one of the per-entry links.
    Link,
}

impl fmt::Display for ExpandStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadLink => "readlink",
            Self::Stat => "stat",
            Self::List => "list",
            Self::Unlink => "unlink",
            Self::Mkdir => "mkdir",
            Self::Link => "link",
        })
    }
}

/// A directory expansion step failed.
///
/// Failures after [`ExpandStep::Unlink`] leave the destination partially
/// expanded.
#[derive(Error, Debug)]
#[error("cannot expand {}: {step} failed: {source}", .path.display())]
pub struct ExpandError {
    /// The destination link being expanded, or the child link being created.
    pub path: PathBuf,
    /// Step that failed.
    pub step: ExpandStep,
    /// Underlying I/O error.
    pub source: io::Error,
}

/// Errors reading or writing the `.spill/<package>` install record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// An I/O operation on the record failed.
    #[error("cannot {action} install record {}: {source}", .path.display())]
    Io {
        /// What was being attempted (`"read"`, `"write"`, `"remove"`).
        action: &'static str,
        /// Record path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// A run phase completed but reported problems.
#[derive(Error, Debug)]
pub enum RunError {
    /// Validation found conflicts or errors; nothing was changed.
    #[error("{problems} problem(s) found; nothing was installed")]
    ValidationFailed {
        /// Number of failed entries.
        problems: usize,
    },

    /// Install hit errors after it had started changing the destination.
    #[error("{errors} error(s) during install; the package may only be partially installed")]
    PartiallyInstalled {
        /// Number of failed entries.
        errors: usize,
    },

    /// Removal could not remove every link it owns.
    #[error("{errors} error(s) while removing links")]
    RemovalFailed {
        /// Number of failed entries.
        errors: usize,
    },
}
