//! Log file location and timestamps.
use std::fs;
use std::path::PathBuf;

/// Return the `$XDG_CACHE_HOME/spill/` directory, creating it if needed.
pub(super) fn spill_cache_dir() -> Option<PathBuf> {
    let cache_dir = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map_or_else(
            || {
                std::env::var_os("HOME")
                    .map_or_else(|| PathBuf::from("."), PathBuf::from)
                    .join(".cache")
            },
            PathBuf::from,
        );
    let dir = cache_dir.join("spill");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Return the log file path under `$XDG_CACHE_HOME/spill/` (or `~/.cache/spill/`).
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(spill_cache_dir()?.join(format!("{command}.log")))
}

/// Current UTC time rendered with the `chrono` format string `format`.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
