//! Structured logger backed by [`tracing`] events.
use std::path::PathBuf;

use super::types::Log;
use super::utils::log_file_path;

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "spill::stage";
/// Tracing target for dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "spill::dry_run";

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger emitting [`tracing`] events.
///
/// Console formatting and the persistent log file at
/// `$XDG_CACHE_HOME/spill/<command>.log` are handled by the subscriber
/// installed with [`init_subscriber`](super::subscriber::init_subscriber);
/// the logger only remembers where that file lives so it can be reported.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Create a logger for `command` (`"install"` or `"remove"`).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Create a logger that reports `path` as its log file.
    #[cfg(test)]
    pub(crate) const fn with_log_file(path: PathBuf) -> Self {
        Self {
            log_file: Some(path),
        }
    }

    /// Return the log file path, if the cache directory was available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run preview message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}
