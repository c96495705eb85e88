//! Per-run state shared by every pass.
use std::cell::Cell;
use std::sync::Arc;

use super::conflicts::ConflictLog;
use crate::config::{IgnoreSet, Options};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Links created where nothing was.
    pub linked: usize,
    /// Links into another version of the package that were repointed.
    pub replaced: usize,
    /// Links that were already correct.
    pub unchanged: usize,
    /// Links removed by a soft delete.
    pub removed: usize,
    /// Foreign directory links turned into real directories.
    pub expanded: usize,
    /// Foreign links replaced because of override.
    pub overridden: usize,
    /// Entries a soft delete expected to find linked but did not.
    pub missing: usize,
}

/// Shared context for one run.
///
/// Holds the options, ignore set and conflict sink so that nothing about a
/// run lives in process-global state.
pub struct Context {
    /// Behavior switches for this run.
    pub options: Options,
    /// Relative paths skipped by every pass.
    pub ignore: IgnoreSet,
    /// Destination paths validation refused.
    pub conflicts: ConflictLog,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs: Arc<dyn FileSystemOps>,
    /// Logger for progress and problems.
    pub log: Arc<dyn Log>,
    summary: Cell<Summary>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("options", &self.options)
            .field("ignore", &self.ignore)
            .field("conflicts", &self.conflicts)
            .field("fs", &self.fs)
            .field("log", &"<dyn Log>")
            .field("summary", &self.summary.get())
            .finish()
    }
}

impl Context {
    /// Create a context that talks to the real filesystem.
    #[must_use]
    pub fn new(options: Options, ignore: IgnoreSet, log: Arc<dyn Log>) -> Self {
        Self::with_fs(options, ignore, log, Arc::new(SystemFileSystemOps))
    }

    /// Create a context with a custom filesystem implementation.
    #[must_use]
    pub fn with_fs(
        options: Options,
        ignore: IgnoreSet,
        log: Arc<dyn Log>,
        fs: Arc<dyn FileSystemOps>,
    ) -> Self {
        Self {
            options,
            ignore,
            conflicts: ConflictLog::new(),
            fs,
            log,
            summary: Cell::new(Summary::default()),
        }
    }

    /// Current counters.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.summary.get()
    }

    /// Update the counters.
    pub fn tally(&self, update: impl FnOnce(&mut Summary)) {
        let mut summary = self.summary.get();
        update(&mut summary);
        self.summary.set(summary);
    }

    /// Report a change that was made.
    pub fn note(&self, msg: &str) {
        self.log.info(msg);
    }

    /// Report a change that a dry run would make.
    pub fn preview(&self, msg: &str) {
        if self.options.dry_run {
            self.log.dry_run(msg);
        }
    }

    /// Report something odd that is not an error; demoted to debug when quiet.
    pub fn notice(&self, msg: &str) {
        if self.options.quiet {
            self.log.debug(msg);
        } else {
            self.log.warn(msg);
        }
    }
}
