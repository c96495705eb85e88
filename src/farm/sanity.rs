//! Refuse to work on roots that do not look like package trees.
use std::path::Path;

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

/// Subdirectories of which at least one must exist in a package tree.
pub const STANDARD_DIRS: [&str; 3] = ["bin", "sbin", "lib"];

/// Check that `root` has a `bin`, `sbin` or `lib` directory (links to
/// directories count).
///
/// # Errors
///
/// Returns [`ConfigError::NotAPackageTree`] naming `role` otherwise.
pub fn check(fs: &dyn FileSystemOps, root: &Path, role: &'static str) -> Result<(), ConfigError> {
    let found = STANDARD_DIRS
        .iter()
        .any(|dir| fs.metadata(&root.join(dir)).is_ok_and(|m| m.is_dir()));
    if found {
        Ok(())
    } else {
        Err(ConfigError::NotAPackageTree {
            role,
            path: root.to_path_buf(),
        })
    }
}
