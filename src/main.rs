//! `spill` command-line entry point.
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;

use spill::cli::Cli;
use spill::commands;
use spill::config::{IgnoreSet, Mode, Options, RunConfig, Settings};
use spill::logging::{self, Log, Logger};

fn main() -> ExitCode {
    let args = Cli::parse();
    let mode = if args.delete {
        Mode::Remove
    } else {
        Mode::Install
    };

    let settings = load_settings(args.config.as_deref());
    let quiet = args.quiet || settings.as_ref().is_ok_and(|s| s.quiet);
    logging::init_subscriber(args.verbose, quiet, mode.command());
    let log = Arc::new(Logger::new(mode.command()));

    let shared: Arc<dyn Log> = log.clone();
    let result = settings.and_then(|settings| run(&args, &settings, mode, &shared));
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    };
    if let Some(path) = log.log_path() {
        log.debug(&format!("log: {}", path.display()));
    }
    code
}

/// Load the settings file named on the command line, or the default one.
fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) if !path.exists() => {
            anyhow::bail!("settings file {} does not exist", path.display())
        }
        Some(path) => Settings::load(path),
        None => Settings::default_path()
            .map_or_else(|| Ok(Settings::default()), |path| Settings::load(&path)),
    }
}

fn run(args: &Cli, settings: &Settings, mode: Mode, log: &Arc<dyn Log>) -> Result<()> {
    let mut options = Options {
        quiet: args.quiet,
        dry_run: args.dry_run,
        expand: args.expand,
        force: args.force,
        override_conflicts: args.override_conflicts,
        upgrade: args.upgrade,
    };
    settings.apply_to(&mut options);

    let ignore: Vec<&PathBuf> = args.ignore.iter().chain(&settings.ignore).collect();
    let conflict_list = args
        .conflict_list
        .clone()
        .or_else(|| settings.conflict_list.clone());

    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let config = RunConfig::resolve(&args.source, &args.dest, &cwd)?
        .with_options(options)
        .with_mode(mode)
        .with_ignore(IgnoreSet::new(ignore))
        .with_conflict_list(conflict_list);

    let version = option_env!("SPILL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("spill {version}"));
    log.debug(&format!(
        "source {} (package {}), destination {}",
        config.source_root.display(),
        config.package,
        config.dest_root.display()
    ));

    let report = commands::run(&config, log.clone())?;
    report.log_summary(&**log);
    Ok(())
}
