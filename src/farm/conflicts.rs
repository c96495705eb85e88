//! Collected destination paths that blocked validation.
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

/// Append-only list of conflicting destination paths, in discovery order.
#[derive(Debug, Default)]
pub struct ConflictLog {
    entries: RefCell<Vec<PathBuf>>,
}

impl ConflictLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path`.
    pub fn record(&self, path: &Path) {
        self.entries.borrow_mut().push(path.to_path_buf());
    }

    /// Copy of every recorded path.
    #[must_use]
    pub fn entries(&self) -> Vec<PathBuf> {
        self.entries.borrow().clone()
    }

    /// Number of recorded paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Return `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Write one path per line to `path`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let out = self
            .entries
            .borrow()
            .iter()
            .map(|entry| format!("{}\n", entry.display()))
            .collect::<String>();
        std::fs::write(path, out)
    }
}
