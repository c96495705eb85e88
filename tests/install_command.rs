#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the install sequence.
//!
//! Each test builds package trees and a destination in a temporary
//! directory, runs [`spill::commands::run`] and inspects the links left
//! behind.

mod common;

use std::fs;
use std::os::unix::fs::symlink;

use common::*;
use spill::config::Options;
use spill::error::{ConfigError, RunError};
use spill::logging::Level;

// ---------------------------------------------------------------------------
// Fresh installs
// ---------------------------------------------------------------------------

/// A new package is merged into the real `bin` and its other top-level
/// directories are linked whole.
#[test]
fn fresh_install_merges_and_links() {
    let layout = Layout::new();
    let src = layout.package("foo", "1.0", &["bin/foo", "share/man/man1/foo.1"]);

    let (result, _log) = install(layout.config("foo", "1.0"), Options::default());
    let report = result.unwrap();

    assert!(layout.is_real_dir("bin"));
    assert_eq!(layout.link_of("bin/foo"), src.join("bin/foo"));
    assert_eq!(layout.link_of("share"), src.join("share"));
    assert_eq!(report.summary.linked, 2);
    assert_eq!(layout.record("foo"), Some(src));
}

/// Running the same install twice changes nothing the second time.
#[test]
fn reinstall_is_idempotent() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo", "share/doc/README"]);

    install(layout.config("foo", "1.0"), Options::default())
        .0
        .unwrap();
    let (result, _log) = install(layout.config("foo", "1.0"), Options::default());
    let report = result.unwrap();

    assert_eq!(report.summary.linked, 0);
    assert_eq!(report.summary.unchanged, 2);
    assert_eq!(report.describe(), "2 unchanged");
}

/// Links into another version of the same package are repointed.
#[test]
fn other_version_links_are_replaced() {
    let layout = Layout::new();
    let old = layout.package("foo", "0.9", &["bin/foo"]);
    let new = layout.package("foo", "1.0", &["bin/foo"]);
    symlink(old.join("bin/foo"), layout.at("bin/foo")).unwrap();

    let (result, _log) = install(layout.config("foo", "1.0"), Options::default());

    assert_eq!(result.unwrap().summary.replaced, 1);
    assert_eq!(layout.link_of("bin/foo"), new.join("bin/foo"));
}

/// Two packages sharing a real directory each get their own links.
#[test]
fn packages_share_real_directories() {
    let layout = Layout::new();
    let foo = layout.package("foo", "1.0", &["bin/foo"]);
    let bar = layout.package("bar", "2.1", &["bin/bar"]);

    install(layout.config("foo", "1.0"), Options::default())
        .0
        .unwrap();
    install(layout.config("bar", "2.1"), Options::default())
        .0
        .unwrap();

    assert_eq!(layout.link_of("bin/foo"), foo.join("bin/foo"));
    assert_eq!(layout.link_of("bin/bar"), bar.join("bin/bar"));
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

/// A real file in the way fails validation and nothing at all is changed.
#[test]
fn real_file_blocks_install_atomically() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo", "share/doc/README"]);
    fs::write(layout.at("bin/foo"), "local").unwrap();
    let conflicts = layout.root().join("conflicts.txt");

    let (result, log) = install(
        layout.config("foo", "1.0").with_conflict_list(Some(conflicts.clone())),
        Options::default(),
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RunError>(),
        Some(RunError::ValidationFailed { problems: 1 })
    ));
    assert!(!layout.exists("share"));
    assert_eq!(layout.record("foo"), None);
    assert_eq!(fs::read_to_string(layout.at("bin/foo")).unwrap(), "local");
    assert!(log.contains(Level::Error, "conflict at"));
    assert_eq!(
        fs::read_to_string(conflicts).unwrap(),
        format!("{}\n", layout.at("bin/foo").display())
    );
}

/// Every conflict is found, not just the first.
#[test]
fn all_conflicts_are_reported() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo", "bin/foo-config", "etc/foo.conf"]);
    fs::write(layout.at("bin/foo"), "").unwrap();
    fs::write(layout.at("bin/foo-config"), "").unwrap();
    fs::write(layout.at("etc"), "").unwrap();

    let (result, log) = install(layout.config("foo", "1.0"), Options::default());

    assert!(matches!(
        result.unwrap_err().downcast_ref::<RunError>(),
        Some(RunError::ValidationFailed { problems: 3 })
    ));
    assert_eq!(log.messages(Level::Error).len(), 3);
}

/// A clean run still truncates an existing conflict list.
#[test]
fn conflict_list_is_rewritten_when_clean() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo"]);
    let conflicts = layout.root().join("conflicts.txt");
    fs::write(&conflicts, "stale\n").unwrap();

    install(
        layout.config("foo", "1.0").with_conflict_list(Some(conflicts.clone())),
        Options::default(),
    )
    .0
    .unwrap();

    assert_eq!(fs::read_to_string(conflicts).unwrap(), "");
}

/// Another package's link is a conflict unless override is given.
#[test]
fn foreign_link_needs_override() {
    let layout = Layout::new();
    let foo = layout.package("foo", "1.0", &["bin/tool"]);
    let bar = layout.package("bar", "1.0", &["bin/tool"]);
    symlink(bar.join("bin/tool"), layout.at("bin/tool")).unwrap();

    let (result, log) = install(layout.config("foo", "1.0"), Options::default());
    assert!(result.is_err());
    assert!(log.contains(Level::Error, "use --override"));
    assert_eq!(layout.link_of("bin/tool"), bar.join("bin/tool"));

    let (result, log) = install(
        layout.config("foo", "1.0"),
        options(|o| o.override_conflicts = true),
    );
    assert_eq!(result.unwrap().summary.overridden, 1);
    assert_eq!(layout.link_of("bin/tool"), foo.join("bin/tool"));
    assert!(log.contains(Level::Warn, "overriding"));
    assert!(log.contains(Level::Warn, "content differs"));
}

/// A link that does not look like any install is contested too.
#[test]
fn unrecognized_link_is_contested() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo"]);
    symlink("/usr/bin/true", layout.at("bin/foo")).unwrap();

    let (result, log) = install(layout.config("foo", "1.0"), Options::default());

    assert!(result.is_err());
    assert!(log.contains(Level::Error, "unrecognized link to /usr/bin/true"));
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// A dry run reports what it would do and changes nothing.
#[test]
fn dry_run_changes_nothing() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo", "share/doc/README"]);

    let (result, log) = install(layout.config("foo", "1.0"), options(|o| o.dry_run = true));
    let report = result.unwrap();

    assert!(report.dry_run);
    assert!(!layout.exists("bin/foo"));
    assert!(!layout.exists("share"));
    assert_eq!(layout.record("foo"), None);
    assert!(log.contains(Level::DryRun, "bin/foo"));
    assert!(log.contains(Level::DryRun, "share"));
}

/// Ignored paths are skipped together with everything below them.
#[test]
fn ignored_paths_are_not_linked() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo", "share/info/dir", "lib/charset.alias"]);
    fs::create_dir(layout.at("lib")).unwrap();
    fs::write(layout.at("lib/charset.alias"), "system").unwrap();

    let (result, _log) = install_ignoring(
        layout.config("foo", "1.0"),
        Options::default(),
        &["lib/charset.alias", "./share"],
    );
    result.unwrap();

    assert!(layout.is_link("bin/foo"));
    assert!(!layout.exists("share"));
    assert_eq!(
        fs::read_to_string(layout.at("lib/charset.alias")).unwrap(),
        "system"
    );
}

/// A source without `bin`, `sbin` or `lib` is refused unless forced.
#[test]
fn sanity_check_and_force() {
    let layout = Layout::new();
    layout.package("docs", "1.0", &["share/doc/README"]);

    let (result, _log) = install(layout.config("docs", "1.0"), Options::default());
    assert!(matches!(
        result.unwrap_err().downcast_ref::<ConfigError>(),
        Some(ConfigError::NotAPackageTree { role: "source", .. })
    ));
    assert!(!layout.exists("share"));

    let (result, _log) = install(layout.config("docs", "1.0"), options(|o| o.force = true));
    result.unwrap();
    assert!(layout.is_link("share"));
}

/// A destination that has no standard directory is refused.
#[test]
fn destination_sanity_check() {
    let layout = Layout::new();
    layout.package("foo", "1.0", &["bin/foo"]);
    fs::remove_dir(layout.at("bin")).unwrap();

    let (result, _log) = install(layout.config("foo", "1.0"), Options::default());

    assert!(matches!(
        result.unwrap_err().downcast_ref::<ConfigError>(),
        Some(ConfigError::NotAPackageTree {
            role: "destination",
            ..
        })
    ));
}
