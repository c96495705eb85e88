//! In-memory logger that captures messages instead of emitting them.
use std::sync::Mutex;

use super::types::Log;

/// Severity of a captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A stage header.
    Stage,
    /// An informational message.
    Info,
    /// A debug message.
    Debug,
    /// A warning.
    Warn,
    /// An error.
    Error,
    /// A dry-run preview.
    DryRun,
}

/// Implement the methods of [`Log`] by pushing each message into
/// `self.entries` tagged with the corresponding [`Level`].
macro_rules! buffer_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push((Level::$level, msg.to_string()));
                }
            }
        )+
    };
}

/// Logger that records every message in memory.
///
/// Used where the caller wants to inspect what a run reported rather than
/// print it, such as the integration tests.
#[derive(Debug, Default)]
pub struct BufferedLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl BufferedLog {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured message, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Messages captured at `level`, in order.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg)
            .collect()
    }

    /// Return `true` if any message at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl Log for BufferedLog {
    buffer_log_methods!(
        stage => Stage,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
        dry_run => DryRun,
    );
}
