//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the classifier, traversal and
//! actions never call [`std::fs`] directly. Production code uses
//! [`SystemFileSystemOps`]; tests wrap it to inject failures.

use std::ffi::OsString;
use std::fs::{self, File, Metadata};
use std::io;
use std::os::unix::fs::DirBuilderExt as _;
use std::path::{Path, PathBuf};

/// Abstraction over the filesystem calls made by a farm run.
///
/// Every method maps onto a single system call (or a directory listing),
/// so a failure can always be attributed to one path.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Metadata of `path` itself, not following a final symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be examined.
    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Metadata of whatever `path` resolves to.
    ///
    /// Relative link targets resolve against the link's own directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` or a link it traverses is dangling.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// List the entry names of directory `path`.
    ///
    /// The listing is read completely before returning so no directory handle
    /// outlives the call. Order is whatever the filesystem returns.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Create a symbolic link at `link` whose content is `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `link` already exists or its parent is not writable.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Remove the symlink (or other non-directory entry) at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Create a single directory with permission bits `mode`
    /// (subject to the process umask).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Open the file at `path` for reading, following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    fn open(&self, path: &Path) -> io::Result<File>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::symlink_metadata(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }

    fn read_dir_names(&self, path: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        fs::DirBuilder::new().mode(mode).create(path)
    }

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }
}
