// Shared helpers for integration tests.
//
// Builds a temporary layout with package trees under `pkgs/<name>/<version>`
// and a shared destination `dest/` holding an empty real `bin/`, then runs
// the install or remove sequence against it with a buffered log.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spill::commands::{self, Report};
use spill::config::{IgnoreSet, Mode, Options, RunConfig};
use spill::farm::Context;
use spill::logging::BufferedLog;

/// A temporary package prefix and destination backed by a
/// [`tempfile::TempDir`].
pub struct Layout {
    dir: tempfile::TempDir,
    root: PathBuf,
}

impl Layout {
    /// Create the layout with an empty `dest/bin`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = fs::canonicalize(dir.path()).expect("canonicalize temp dir");
        fs::create_dir_all(root.join("dest/bin")).expect("create dest/bin");
        Self { dir, root }
    }

    /// Canonical root of the layout.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination root.
    pub fn dest(&self) -> PathBuf {
        self.root.join("dest")
    }

    /// Absolute source root of `name/version`.
    pub fn source(&self, name: &str, version: &str) -> PathBuf {
        self.root.join("pkgs").join(name).join(version)
    }

    /// Create package `name/version` with `entries` (relative paths; a
    /// trailing `/` makes a directory, anything else a file whose content is
    /// `name-version`).
    pub fn package(&self, name: &str, version: &str, entries: &[&str]) -> PathBuf {
        let src = self.source(name, version);
        fs::create_dir_all(&src).expect("create package root");
        for entry in entries {
            let path = src.join(entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                fs::create_dir_all(&path).expect("create package dir");
            } else {
                fs::create_dir_all(path.parent().expect("entry has a parent"))
                    .expect("create parent dir");
                fs::write(&path, format!("{name}-{version}")).expect("write package file");
            }
        }
        src
    }

    /// Config for `name/version` given as an absolute path.
    pub fn config(&self, name: &str, version: &str) -> RunConfig {
        RunConfig::resolve(&self.source(name, version), Path::new("dest"), &self.root)
            .expect("resolve config")
    }

    /// Config for `name/version` given relative to the layout root.
    pub fn relative_config(&self, name: &str, version: &str) -> RunConfig {
        let source = Path::new("pkgs").join(name).join(version);
        RunConfig::resolve(&source, Path::new("dest"), &self.root).expect("resolve config")
    }

    /// Path under the destination.
    pub fn at(&self, rel: &str) -> PathBuf {
        self.dest().join(rel)
    }

    /// Link content of `dest/rel`.
    pub fn link_of(&self, rel: &str) -> PathBuf {
        fs::read_link(self.at(rel)).expect("destination entry is a link")
    }

    /// Whether `dest/rel` is a symbolic link.
    pub fn is_link(&self, rel: &str) -> bool {
        fs::symlink_metadata(self.at(rel)).is_ok_and(|m| m.file_type().is_symlink())
    }

    /// Whether `dest/rel` is a real directory.
    pub fn is_real_dir(&self, rel: &str) -> bool {
        fs::symlink_metadata(self.at(rel)).is_ok_and(|m| m.is_dir())
    }

    /// Whether anything exists at `dest/rel`, dangling links included.
    pub fn exists(&self, rel: &str) -> bool {
        fs::symlink_metadata(self.at(rel)).is_ok()
    }

    /// Content of the install record for `name`, if any.
    pub fn record(&self, name: &str) -> Option<PathBuf> {
        fs::read_link(self.dest().join(".spill").join(name)).ok()
    }

    /// Every path under `dest/`, relative to it, without following links
    /// and leaving out the `.spill` record directory.
    pub fn entries(&self) -> BTreeSet<PathBuf> {
        let dest = self.dest();
        let mut found = BTreeSet::new();
        let mut pending = vec![dest.clone()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir).expect("list dest dir") {
                let path = entry.expect("dest dir entry").path();
                let rel = path.strip_prefix(&dest).expect("under dest").to_path_buf();
                if rel == Path::new(".spill") {
                    continue;
                }
                if fs::symlink_metadata(&path).expect("stat dest entry").is_dir() {
                    pending.push(path);
                }
                found.insert(rel);
            }
        }
        found
    }
}

/// Options with only the flags a test cares about switched on.
pub fn options(set: impl FnOnce(&mut Options)) -> Options {
    let mut options = Options::default();
    set(&mut options);
    options
}

/// Install `config` with `options`.
pub fn install(config: RunConfig, options: Options) -> (anyhow::Result<Report>, Arc<BufferedLog>) {
    execute(config.with_options(options).with_mode(Mode::Install))
}

/// Install `config` with `options`, skipping `ignore`.
pub fn install_ignoring(
    config: RunConfig,
    options: Options,
    ignore: &[&str],
) -> (anyhow::Result<Report>, Arc<BufferedLog>) {
    execute(
        config
            .with_options(options)
            .with_mode(Mode::Install)
            .with_ignore(IgnoreSet::new(ignore)),
    )
}

/// Remove `config` with `options`.
pub fn remove(config: RunConfig, options: Options) -> (anyhow::Result<Report>, Arc<BufferedLog>) {
    execute(config.with_options(options).with_mode(Mode::Remove))
}

/// Run a fully built config against the real filesystem.
pub fn execute(config: RunConfig) -> (anyhow::Result<Report>, Arc<BufferedLog>) {
    let log = Arc::new(BufferedLog::new());
    let result = commands::run(&config, log.clone());
    (result, log)
}

/// Run a config with a caller-built context.
pub fn execute_in(config: &RunConfig, ctx: &Context) -> anyhow::Result<Report> {
    commands::run_in(config, ctx)
}
