//! Install records: `<dest>/.spill/<package-name>`, a symlink whose target is
//! the source root of the installed version.
//!
//! The target is relative to the destination root when the package was
//! installed with relative links, and absolute otherwise.

use std::io;
use std::path::{Path, PathBuf};

use super::context::Context;
use super::{Installation, PackageId};
use crate::error::RecordError;

/// Directory under the destination root holding install records.
pub const RECORD_DIR: &str = ".spill";

/// Path of the record for package `name` under `dest_root`.
#[must_use]
pub fn record_path(dest_root: &Path, name: &std::ffi::OsStr) -> PathBuf {
    dest_root.join(RECORD_DIR).join(name)
}

/// Point the record for `tree`'s package at `tree`'s source root.
///
/// # Errors
///
/// Returns an error if the record directory or link cannot be created.
pub fn write(ctx: &Context, tree: &Installation) -> Result<(), RecordError> {
    let dir = tree.dest_root.join(RECORD_DIR);
    match ctx.fs.symlink_metadata(&dir) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            ctx.fs
                .create_dir(&dir, 0o755)
                .map_err(|source| io_error("write", &dir, source))?;
        }
        Err(source) => return Err(io_error("write", &dir, source)),
    }

    let path = record_path(&tree.dest_root, &tree.package.name);
    if ctx.fs.symlink_metadata(&path).is_ok() {
        ctx.fs
            .remove_link(&path)
            .map_err(|source| io_error("write", &path, source))?;
    }
    ctx.fs
        .symlink(tree.recorded_target(), &path)
        .map_err(|source| io_error("write", &path, source))?;
    ctx.log.debug(&format!(
        "recorded {} -> {}",
        path.display(),
        tree.recorded_target().display()
    ));
    Ok(())
}

/// Read the recorded source root for package `name`, if there is a record.
///
/// # Errors
///
/// Returns an error if a record exists but cannot be read as a link.
pub fn read(
    ctx: &Context,
    dest_root: &Path,
    name: &std::ffi::OsStr,
) -> Result<Option<PathBuf>, RecordError> {
    let path = record_path(dest_root, name);
    match ctx.fs.read_link(&path) {
        Ok(target) => Ok(Some(target)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error("read", &path, source)),
    }
}

/// Delete the record for package `name`.
///
/// # Errors
///
/// Returns an error if the record cannot be removed.
pub fn remove(ctx: &Context, dest_root: &Path, name: &std::ffi::OsStr) -> Result<(), RecordError> {
    let path = record_path(dest_root, name);
    ctx.fs
        .remove_link(&path)
        .map_err(|source| io_error("remove", &path, source))
}

/// Rebuild the installation a record describes.
///
/// A relative record is resolved against `dest_root` and keeps its relative
/// form so the links it made can be recognized again. The identity comes
/// from the recorded path, falling back to `current` when the record is too
/// short to carry one.
#[must_use]
pub fn previous_installation(
    dest_root: &Path,
    current: &PackageId,
    recorded: &Path,
) -> Installation {
    let (source_root, relative) = if recorded.is_absolute() {
        (recorded.to_path_buf(), None)
    } else {
        (dest_root.join(recorded), Some(recorded.to_path_buf()))
    };
    Installation {
        source_root,
        dest_root: dest_root.to_path_buf(),
        relative,
        package: PackageId::from_root(recorded).unwrap_or_else(|| current.clone()),
    }
}

fn io_error(action: &'static str, path: &Path, source: io::Error) -> RecordError {
    RecordError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
