//! Destination entry classification.
//!
//! A destination link is attributed to a package by *shape*: if its target
//! ends in the same `tail/entry` suffix the entry has inside the package
//! tree, whatever precedes that suffix is taken as an installation root
//! and its last two components as the package identity.

use std::io;
use std::path::{Path, PathBuf};

use super::{DestinationState, PackageId};
use crate::operations::FileSystemOps;

/// What a correct link for one entry would look like.
#[derive(Debug, Clone, Copy)]
pub struct Expectation<'a> {
    /// The link target this package would write.
    pub target: &'a Path,
    /// The entry path relative to both roots, e.g. `bin/foo`.
    pub suffix: &'a Path,
    /// The package being processed.
    pub package: &'a PackageId,
}

/// Classify the live destination entry at `dest`.
#[must_use]
pub fn classify(fs: &dyn FileSystemOps, dest: &Path, expected: &Expectation<'_>) -> DestinationState {
    let meta = match fs.symlink_metadata(dest) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return DestinationState::Absent,
        Err(e) => {
            return DestinationState::StatError {
                reason: e.to_string(),
            };
        }
    };

    let file_type = meta.file_type();
    if file_type.is_dir() {
        DestinationState::RealDirectory
    } else if file_type.is_symlink() {
        match fs.read_link(dest) {
            Ok(target) => interpret_link(fs, &target, dest, expected),
            Err(e) => DestinationState::StatError {
                reason: format!("cannot read link: {e}"),
            },
        }
    } else {
        DestinationState::RealOther
    }
}

/// Classify the entry at `dest` as it will be once its parent directory has
/// been expanded, without expanding anything.
///
/// `virtual_target` is the link content expansion would write for the entry.
/// `dest` still resolves through the unexpanded link, so it reaches the same
/// object the future link will.
#[must_use]
pub fn classify_expanded(
    fs: &dyn FileSystemOps,
    virtual_target: &Path,
    dest: &Path,
    expected: &Expectation<'_>,
) -> DestinationState {
    match fs.symlink_metadata(dest) {
        Ok(_) => interpret_link(fs, virtual_target, dest, expected),
        Err(e) if e.kind() == io::ErrorKind::NotFound => DestinationState::Absent,
        Err(e) => DestinationState::StatError {
            reason: e.to_string(),
        },
    }
}

/// Attribute the link `target` found (or foreseen) at `link`.
fn interpret_link(
    fs: &dyn FileSystemOps,
    target: &Path,
    link: &Path,
    expected: &Expectation<'_>,
) -> DestinationState {
    if target == expected.target {
        return DestinationState::LinkExactMatch;
    }

    // An install link is at least "/" followed by the suffix.
    let shortest = Path::new("/").join(expected.suffix);
    if target.as_os_str().len() < shortest.as_os_str().len() {
        return DestinationState::StatError {
            reason: format!(
                "link target {} is too short to be an install link",
                target.display()
            ),
        };
    }
    if !target.ends_with(expected.suffix) {
        return unrecognized(target);
    }
    let target_len = target.components().count();
    let suffix_len = expected.suffix.components().count();
    let root: PathBuf = target.components().take(target_len - suffix_len).collect();
    let Some(other) = PackageId::from_root(&root) else {
        return unrecognized(target);
    };

    if other.name == expected.package.name {
        return if other.version == expected.package.version {
            DestinationState::LinkSamePackageSameVersion { other }
        } else {
            DestinationState::LinkSamePackageOtherVersion { other }
        };
    }

    match fs.metadata(link) {
        Ok(meta) if meta.is_dir() => DestinationState::LinkForeignPackageDirectory { other },
        Ok(_) => DestinationState::LinkForeignPackageFile { other },
        Err(e) => DestinationState::StatError {
            reason: format!("dangling link to {}: {e}", target.display()),
        },
    }
}

fn unrecognized(target: &Path) -> DestinationState {
    DestinationState::LinkUnrecognized {
        target: target.to_path_buf(),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::SystemFileSystemOps;
    use std::fs;
    use std::os::unix::fs::symlink;

    struct Fixture {
        dir: tempfile::TempDir,
        package: PackageId,
    }

    impl Fixture {
        /// `pkgs/foo/1.0/bin/foo`, `pkgs/bar/1.0/{bin/bar,share/}` and an
        /// empty `dest/`.
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path();
            fs::create_dir_all(root.join("pkgs/foo/1.0/bin")).unwrap();
            fs::write(root.join("pkgs/foo/1.0/bin/foo"), "foo").unwrap();
            fs::create_dir_all(root.join("pkgs/bar/1.0/bin")).unwrap();
            fs::create_dir_all(root.join("pkgs/bar/1.0/share")).unwrap();
            fs::write(root.join("pkgs/bar/1.0/bin/foo"), "bar").unwrap();
            fs::create_dir_all(root.join("dest/bin")).unwrap();
            Self {
                dir,
                package: PackageId::new("foo", "1.0"),
            }
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        fn classify(&self, dest: &str, suffix: &str) -> DestinationState {
            let target = self.path("pkgs/foo/1.0").join(suffix);
            let expected = Expectation {
                target: &target,
                suffix: Path::new(suffix),
                package: &self.package,
            };
            classify(&SystemFileSystemOps, &self.path(dest), &expected)
        }
    }

    #[test]
    fn absent() {
        let fx = Fixture::new();
        assert_eq!(fx.classify("dest/bin/foo", "bin/foo"), DestinationState::Absent);
    }

    #[test]
    fn real_directory_and_real_file() {
        let fx = Fixture::new();
        assert_eq!(fx.classify("dest/bin", "bin"), DestinationState::RealDirectory);
        fs::write(fx.path("dest/bin/foo"), "x").unwrap();
        assert_eq!(fx.classify("dest/bin/foo", "bin/foo"), DestinationState::RealOther);
    }

    #[test]
    fn exact_match() {
        let fx = Fixture::new();
        symlink(fx.path("pkgs/foo/1.0/bin/foo"), fx.path("dest/bin/foo")).unwrap();
        assert_eq!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkExactMatch
        );
    }

    #[test]
    fn same_package_other_version() {
        let fx = Fixture::new();
        symlink(fx.path("pkgs/foo/0.9/bin/foo"), fx.path("dest/bin/foo")).unwrap();
        assert_eq!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkSamePackageOtherVersion {
                other: PackageId::new("foo", "0.9")
            }
        );
    }

    #[test]
    fn same_package_same_version_via_other_path() {
        let fx = Fixture::new();
        symlink("/elsewhere/foo/1.0/bin/foo", fx.path("dest/bin/foo")).unwrap();
        assert_eq!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkSamePackageSameVersion {
                other: PackageId::new("foo", "1.0")
            }
        );
    }

    #[test]
    fn foreign_file_and_directory() {
        let fx = Fixture::new();
        symlink(fx.path("pkgs/bar/1.0/bin/foo"), fx.path("dest/bin/foo")).unwrap();
        symlink(fx.path("pkgs/bar/1.0/share"), fx.path("dest/share")).unwrap();
        let bar = PackageId::new("bar", "1.0");
        assert_eq!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkForeignPackageFile { other: bar.clone() }
        );
        assert_eq!(
            fx.classify("dest/share", "share"),
            DestinationState::LinkForeignPackageDirectory { other: bar }
        );
    }

    #[test]
    fn relative_foreign_link_resolves_from_link_directory() {
        let fx = Fixture::new();
        symlink("../../pkgs/bar/1.0/bin/foo", fx.path("dest/bin/foo")).unwrap();
        assert_eq!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkForeignPackageFile {
                other: PackageId::new("bar", "1.0")
            }
        );
    }

    #[test]
    fn dangling_foreign_link_is_stat_error() {
        let fx = Fixture::new();
        symlink("/gone/baz/2/bin/foo", fx.path("dest/bin/foo")).unwrap();
        assert!(matches!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::StatError { reason } if reason.contains("dangling")
        ));
    }

    #[test]
    fn short_target_is_stat_error() {
        let fx = Fixture::new();
        symlink("foo", fx.path("dest/bin/foo")).unwrap();
        assert!(matches!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::StatError { reason } if reason.contains("too short")
        ));
    }

    #[test]
    fn targets_shorter_than_root_plus_suffix_are_stat_errors() {
        let fx = Fixture::new();
        for target in ["/foo", "x/foo"] {
            symlink(target, fx.path("dest/bin/foo")).unwrap();
            assert!(
                matches!(
                    fx.classify("dest/bin/foo", "bin/foo"),
                    DestinationState::StatError { reason } if reason.contains("too short")
                ),
                "{target}"
            );
            fs::remove_file(fx.path("dest/bin/foo")).unwrap();
        }
    }

    #[test]
    fn unrecognized_links() {
        let fx = Fixture::new();
        symlink("/usr/lib/something/else", fx.path("dest/bin/foo")).unwrap();
        assert_eq!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkUnrecognized {
                target: PathBuf::from("/usr/lib/something/else")
            }
        );
        // Right suffix, but nothing in front of it to name a package.
        fs::remove_file(fx.path("dest/bin/foo")).unwrap();
        symlink("/bin/foo", fx.path("dest/bin/foo")).unwrap();
        assert!(matches!(
            fx.classify("dest/bin/foo", "bin/foo"),
            DestinationState::LinkUnrecognized { .. }
        ));
    }

    #[test]
    fn expanded_view_attributes_virtual_target() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.path("pkgs/bar/1.0/share/man")).unwrap();
        symlink(fx.path("pkgs/bar/1.0/share"), fx.path("dest/share")).unwrap();
        let virtual_target = fx.path("pkgs/bar/1.0/share/man");
        let target = fx.path("pkgs/foo/1.0/share/man");
        let expected = Expectation {
            target: &target,
            suffix: Path::new("share/man"),
            package: &fx.package,
        };
        assert_eq!(
            classify_expanded(
                &SystemFileSystemOps,
                &virtual_target,
                &fx.path("dest/share/man"),
                &expected
            ),
            DestinationState::LinkForeignPackageDirectory {
                other: PackageId::new("bar", "1.0")
            }
        );
        assert_eq!(
            classify_expanded(
                &SystemFileSystemOps,
                &fx.path("pkgs/bar/1.0/share/info"),
                &fx.path("dest/share/info"),
                &expected
            ),
            DestinationState::Absent
        );
    }
}
