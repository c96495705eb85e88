//! Top-level orchestration of an install or removal run.
pub mod install;
pub mod remove;

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Mode, RunConfig};
use crate::farm::{Context, PackageId, Summary, sanity};
use crate::logging::Log;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Package processed.
    pub package: PackageId,
    /// Install or remove.
    pub mode: Mode,
    /// Whether nothing was changed on purpose.
    pub dry_run: bool,
    /// Per-outcome counters.
    pub summary: Summary,
}

impl Report {
    fn new(config: &RunConfig, ctx: &Context) -> Self {
        Self {
            package: config.package.clone(),
            mode: config.mode,
            dry_run: config.options.dry_run,
            summary: ctx.summary(),
        }
    }

    /// One-line description of the counters, e.g. `3 linked, 1 replaced`.
    #[must_use]
    pub fn describe(&self) -> String {
        let s = &self.summary;
        let parts: Vec<String> = [
            (s.linked, "linked"),
            (s.replaced, "replaced"),
            (s.overridden, "overridden"),
            (s.expanded, "expanded"),
            (s.unchanged, "unchanged"),
            (s.removed, "removed"),
            (s.missing, "missing"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, what)| format!("{count} {what}"))
        .collect();
        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Write the summary through `log`.
    pub fn log_summary(&self, log: &dyn Log) {
        let suffix = if self.dry_run { " (dry run)" } else { "" };
        log.stage("Summary");
        log.info(&format!("{}: {}{suffix}", self.package, self.describe()));
    }
}

/// Run `config` against the real filesystem, logging through `log`.
///
/// # Errors
///
/// Returns an error if the sanity check fails or the selected mode reports
/// problems.
pub fn run(config: &RunConfig, log: Arc<dyn Log>) -> Result<Report> {
    let ctx = Context::new(config.options, config.ignore.clone(), log);
    run_in(config, &ctx)
}

/// Run `config` with an existing context.
///
/// # Errors
///
/// Returns an error if the sanity check fails or the selected mode reports
/// problems.
pub fn run_in(config: &RunConfig, ctx: &Context) -> Result<Report> {
    if !config.options.force {
        sanity::check(&*ctx.fs, &config.source_root, "source")?;
        sanity::check(&*ctx.fs, &config.dest_root, "destination")?;
    }

    match config.mode {
        Mode::Install => install::run(config, ctx)?,
        Mode::Remove => remove::run(config, ctx)?,
    }
    Ok(Report::new(config, ctx))
}
