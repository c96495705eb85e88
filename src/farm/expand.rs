//! Directory expansion: replace a link to a foreign directory with a real
//! directory holding one link per entry of that foreign directory.
//!
//! After expansion the foreign package's files are reachable exactly as
//! before, and the new directory can also receive this package's links.

use std::ffi::OsStr;
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};

use super::context::Context;
use crate::error::{ExpandError, ExpandStep};

/// Link content for entry `name` of a directory that was a link to
/// `dir_target`.
///
/// An absolute target is extended in place. A relative one was relative to
/// the directory's parent and gains a leading `..` because the new link
/// lives one level deeper.
#[must_use]
pub fn child_target(dir_target: &Path, name: &OsStr) -> PathBuf {
    if dir_target.is_absolute() {
        dir_target.join(name)
    } else {
        Path::new("..").join(dir_target).join(name)
    }
}

/// Expand the link at `link`, returning how many child links were created.
///
/// The new directory takes the permission bits of the directory the link
/// resolved to.
///
/// # Errors
///
/// Returns the first failing step. Nothing is rolled back: a failure after
/// the link was removed leaves a partially populated directory (or none).
pub fn expand_link(ctx: &Context, link: &Path) -> Result<usize, ExpandError> {
    let fail = |step, source| ExpandError {
        path: link.to_path_buf(),
        step,
        source,
    };

    let target = ctx
        .fs
        .read_link(link)
        .map_err(|e| fail(ExpandStep::ReadLink, e))?;
    let mode = ctx
        .fs
        .metadata(link)
        .map_err(|e| fail(ExpandStep::Stat, e))?
        .permissions()
        .mode()
        & 0o7777;
    let names = ctx
        .fs
        .read_dir_names(link)
        .map_err(|e| fail(ExpandStep::List, e))?;

    ctx.fs
        .remove_link(link)
        .map_err(|e| fail(ExpandStep::Unlink, e))?;
    ctx.fs
        .create_dir(link, mode)
        .map_err(|e| fail(ExpandStep::Mkdir, e))?;

    for name in &names {
        let child = link.join(name);
        ctx.fs
            .symlink(&child_target(&target, name), &child)
            .map_err(|source| ExpandError {
                path: child,
                step: ExpandStep::Link,
                source,
            })?;
    }
    Ok(names.len())
}
