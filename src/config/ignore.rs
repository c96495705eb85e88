//! Exact-match exclusion of relative paths from a traversal.
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Relative paths (from the package root) that every pass skips.
///
/// Matching is exact on whole components; there is no globbing and an
/// ignored directory is skipped together with everything below it.
#[derive(Debug, Default, Clone)]
pub struct IgnoreSet {
    paths: HashSet<PathBuf>,
}

impl IgnoreSet {
    /// Build a set from user-supplied paths.
    ///
    /// Leading `/` and `.` components are dropped so `./share/info/dir`,
    /// `/share/info/dir` and `share/info/dir` all name the same entry.
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths.into_iter().map(|p| normalize(p.as_ref())).collect(),
        }
    }

    /// Return `true` if `relative` (e.g. `share/info/dir`) is excluded.
    #[must_use]
    pub fn contains(&self, relative: &Path) -> bool {
        self.paths.contains(relative)
    }

    /// Number of distinct ignored paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Return `true` if nothing is ignored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .collect()
}
