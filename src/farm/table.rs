//! The (source kind, destination state) decision table.
//!
//! Every action strategy starts from the same [`Step`]; they differ only in
//! what they do with it. Keeping the table in one exhaustive `match` means a
//! new [`DestinationState`] cannot be added without deciding its step here.

use std::fmt;

use super::{DestinationState, SourceKind};

/// What the table says should happen to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The source entry could not be examined.
    SourceError,
    /// Nothing in the way: create the link.
    Create,
    /// The destination entry could not be examined.
    Unexaminable,
    /// The correct link is already there.
    Keep,
    /// A link into this package from another version or path: replace it.
    Replace,
    /// A link to a foreign directory where this package has a directory:
    /// turn it into a real directory so both can share it.
    Expand,
    /// A link owned by something else; only replaced with override.
    Contested,
    /// A real directory meets a source directory: descend into both.
    Merge,
    /// A real file or directory sits where a link must go.
    Blocked,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SourceError => "source error",
            Self::Create => "create",
            Self::Unexaminable => "unexaminable",
            Self::Keep => "keep",
            Self::Replace => "replace",
            Self::Expand => "expand",
            Self::Contested => "contested",
            Self::Merge => "merge",
            Self::Blocked => "blocked",
        })
    }
}

/// Look up the step for an entry.
#[must_use]
pub const fn step_for(source: &SourceKind, dest: &DestinationState) -> Step {
    use DestinationState as D;
    use SourceKind as S;

    match (source, dest) {
        (S::Unreadable { .. }, _) => Step::SourceError,
        (S::Directory | S::Other, D::Absent) => Step::Create,
        (S::Directory | S::Other, D::StatError { .. }) => Step::Unexaminable,
        (S::Directory | S::Other, D::LinkExactMatch) => Step::Keep,
        (
            S::Directory | S::Other,
            D::LinkSamePackageSameVersion { .. } | D::LinkSamePackageOtherVersion { .. },
        ) => Step::Replace,
        (S::Directory, D::LinkForeignPackageDirectory { .. }) => Step::Expand,
        (
            S::Other,
            D::LinkForeignPackageDirectory { .. }
            | D::LinkForeignPackageFile { .. }
            | D::LinkUnrecognized { .. },
        )
        | (S::Directory, D::LinkForeignPackageFile { .. } | D::LinkUnrecognized { .. }) => {
            Step::Contested
        }
        (S::Directory, D::RealDirectory) => Step::Merge,
        (S::Other, D::RealDirectory) | (S::Directory | S::Other, D::RealOther) => Step::Blocked,
    }
}
