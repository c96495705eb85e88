//! The symlink farm: classification, traversal and the actions run over it.
//!
//! A package tree at `<prefix>/<name>/<version>` is merged into a shared
//! destination by mirroring its directory structure as symbolic links.
//! Every pass walks the *source* tree and looks at the matching destination
//! entry; see [`traverse`] for the walk and [`actions`] for what each pass
//! does with an entry.

pub mod actions;
pub mod classify;
pub mod conflicts;
pub mod context;
pub mod expand;
pub mod record;
pub mod sanity;
pub mod table;
pub mod traverse;
pub mod upgrade;

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::paths;

pub use context::{Context, Summary};

/// Package identity: the last two components of an installation root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    /// Package name, e.g. `foo` in `/opt/pkgs/foo/1.0`.
    pub name: OsString,
    /// Package version, e.g. `1.0` in `/opt/pkgs/foo/1.0`.
    pub version: OsString,
}

impl PackageId {
    /// Build an identity from explicit parts.
    #[must_use]
    pub fn new(name: impl Into<OsString>, version: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Extract `<name>/<version>` from the end of `root`.
    ///
    /// Returns `None` unless the last two components are both plain names.
    #[must_use]
    pub fn from_root(root: &Path) -> Option<Self> {
        let mut parts = root.components().rev();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(version)), Some(Component::Normal(name))) => {
                Some(Self::new(name, version))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.name.to_string_lossy(),
            self.version.to_string_lossy()
        )
    }
}

/// What a source entry is, as seen by `lstat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A real directory.
    Directory,
    /// Anything else: file, symlink, device.
    Other,
    /// The entry could not be examined.
    Unreadable {
        /// Why.
        reason: String,
    },
}

/// The state of a destination entry relative to the package being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing there.
    Absent,
    /// The entry exists but could not be examined, or is a link that cannot
    /// have been made by an install (too short, dangling).
    StatError {
        /// Why.
        reason: String,
    },
    /// A link pointing exactly where this package would point it.
    LinkExactMatch,
    /// A link into this package and version through a different root path.
    LinkSamePackageSameVersion {
        /// Identity found in the link target.
        other: PackageId,
    },
    /// A link into another version of this package.
    LinkSamePackageOtherVersion {
        /// Identity found in the link target.
        other: PackageId,
    },
    /// A link into another package, resolving to a directory.
    LinkForeignPackageDirectory {
        /// Identity found in the link target.
        other: PackageId,
    },
    /// A link into another package, resolving to a non-directory.
    LinkForeignPackageFile {
        /// Identity found in the link target.
        other: PackageId,
    },
    /// A link whose target does not look like any install.
    LinkUnrecognized {
        /// The raw link target.
        target: PathBuf,
    },
    /// A real directory.
    RealDirectory,
    /// A real file, device, fifo or socket.
    RealOther,
}

impl DestinationState {
    /// The package a link points into, for the link states that name one.
    #[must_use]
    pub const fn other_package(&self) -> Option<&PackageId> {
        match self {
            Self::LinkSamePackageSameVersion { other }
            | Self::LinkSamePackageOtherVersion { other }
            | Self::LinkForeignPackageDirectory { other }
            | Self::LinkForeignPackageFile { other } => Some(other),
            Self::Absent
            | Self::StatError { .. }
            | Self::LinkExactMatch
            | Self::LinkUnrecognized { .. }
            | Self::RealDirectory
            | Self::RealOther => None,
        }
    }
}

impl fmt::Display for DestinationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::StatError { reason } => write!(f, "cannot examine: {reason}"),
            Self::LinkExactMatch => f.write_str("already linked"),
            Self::LinkSamePackageSameVersion { other } => {
                write!(f, "linked to {other} via another path")
            }
            Self::LinkSamePackageOtherVersion { other } => write!(f, "linked to {other}"),
            Self::LinkForeignPackageDirectory { other } => {
                write!(f, "linked to a directory of {other}")
            }
            Self::LinkForeignPackageFile { other } => write!(f, "linked to a file of {other}"),
            Self::LinkUnrecognized { target } => {
                write!(f, "unrecognized link to {}", target.display())
            }
            Self::RealDirectory => f.write_str("a real directory"),
            Self::RealOther => f.write_str("a real file"),
        }
    }
}

/// One package tree mapped onto one destination.
///
/// The install pass runs over the current package; the upgrade pass runs a
/// second `Installation` built from the install record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    /// Root of the package tree that is read.
    pub source_root: PathBuf,
    /// Root of the shared hierarchy that is written.
    pub dest_root: PathBuf,
    /// Relative path from `dest_root` to `source_root`, when links are
    /// made relative.
    pub relative: Option<PathBuf>,
    /// Identity of the package at `source_root`.
    pub package: PackageId,
}

impl Installation {
    /// Source directory for `tail`.
    #[must_use]
    pub fn source_dir(&self, tail: &Path) -> PathBuf {
        paths::under(&self.source_root, tail)
    }

    /// Destination directory for `tail`.
    #[must_use]
    pub fn dest_dir(&self, tail: &Path) -> PathBuf {
        paths::under(&self.dest_root, tail)
    }

    /// What the install record for this installation points at.
    #[must_use]
    pub fn recorded_target(&self) -> &Path {
        self.relative.as_deref().unwrap_or(&self.source_root)
    }
}
