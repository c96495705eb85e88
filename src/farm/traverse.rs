//! Lock-step walk of a source tree and its destination.
//!
//! The engine lists one source directory, classifies each entry on both
//! sides and hands it to an [`Action`]. It never descends by itself:
//! actions call [`traverse`] again with [`Entry::descend`] when the decision
//! table says the two trees continue below an entry.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::actions::{Action, Outcome};
use super::classify::{self, Expectation};
use super::context::Context;
use super::expand::child_target;
use super::{DestinationState, Installation, SourceKind};
use crate::error::FarmError;

/// How the destination side of a directory is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Entries are classified as they are on disk.
    Live,
    /// The directory is still a link to a foreign directory and is looked at
    /// as if it had already been expanded.
    Expanded {
        /// Content of the link the directory would be replaced by, the base
        /// for each child's future link content.
        target: PathBuf,
    },
}

/// Position of a traversal inside an [`Installation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Directory path relative to both roots; empty at the top.
    pub tail: PathBuf,
    /// Relative prefix from the destination directory at `tail` back to the
    /// source root, when links are relative.
    pub relative: Option<PathBuf>,
    /// How the destination directory is observed.
    pub view: View,
}

impl Cursor {
    /// Cursor at the top of `tree`.
    #[must_use]
    pub fn root(tree: &Installation) -> Self {
        Self {
            tail: PathBuf::new(),
            relative: tree.relative.clone(),
            view: View::Live,
        }
    }

    /// Cursor for subdirectory `name`; the relative prefix gains one `..`.
    #[must_use]
    pub fn descend(&self, name: &Path, view: View) -> Self {
        Self {
            tail: self.tail.join(name),
            relative: self.relative.as_ref().map(|r| Path::new("..").join(r)),
            view,
        }
    }
}

/// One source entry with its classified destination counterpart.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Bare entry name.
    pub name: OsString,
    /// `tail/name`, relative to both roots.
    pub rel_path: PathBuf,
    /// Full path of the source entry.
    pub source_path: PathBuf,
    /// Full path of the destination entry.
    pub dest_path: PathBuf,
    /// The link content this package wants at `dest_path`.
    pub link_target: PathBuf,
    /// The link content `dest_path` will have after expansion, when the
    /// parent is viewed [`View::Expanded`].
    pub virtual_link: Option<PathBuf>,
    /// What the source entry is.
    pub source: SourceKind,
    /// What the destination entry is.
    pub dest: DestinationState,
    parent: Cursor,
}

impl Entry {
    /// Cursor for continuing the walk below this entry.
    #[must_use]
    pub fn descend(&self, view: View) -> Cursor {
        self.parent.descend(Path::new(&self.name), view)
    }

    fn classify(ctx: &Context, tree: &Installation, cursor: &Cursor, name: OsString) -> Self {
        let rel_path = cursor.tail.join(&name);
        let source_path = tree.source_dir(&rel_path);
        let dest_path = tree.dest_dir(&rel_path);
        let link_target = cursor.relative.as_ref().map_or_else(
            || source_path.clone(),
            |relative| relative.join(&rel_path),
        );

        let source = match ctx.fs.symlink_metadata(&source_path) {
            Ok(meta) if meta.is_dir() => SourceKind::Directory,
            Ok(_) => SourceKind::Other,
            Err(e) => SourceKind::Unreadable {
                reason: e.to_string(),
            },
        };

        let expected = Expectation {
            target: &link_target,
            suffix: &rel_path,
            package: &tree.package,
        };
        let (dest, virtual_link) = match &cursor.view {
            View::Live => (classify::classify(&*ctx.fs, &dest_path, &expected), None),
            View::Expanded { target } => {
                let virtual_link = child_target(target, &name);
                let dest =
                    classify::classify_expanded(&*ctx.fs, &virtual_link, &dest_path, &expected);
                (dest, Some(virtual_link))
            }
        };

        Self {
            name,
            rel_path,
            source_path,
            dest_path,
            link_target,
            virtual_link,
            source,
            dest,
            parent: cursor.clone(),
        }
    }
}

/// Walk the source directory at `cursor` and apply `action` to each entry.
///
/// Returns the number of failed entries, counting those below any entry
/// the action descended into. An entry whose source cannot be examined
/// counts once.
///
/// # Errors
///
/// Returns an error, abandoning the rest of the walk, if a source directory
/// cannot be listed or the action reports a fatal inconsistency.
pub fn traverse(
    ctx: &Context,
    tree: &Installation,
    action: &dyn Action,
    cursor: &Cursor,
) -> Result<usize, FarmError> {
    let source_dir = tree.source_dir(&cursor.tail);
    let names = ctx
        .fs
        .read_dir_names(&source_dir)
        .map_err(|source| FarmError::ReadDir {
            path: source_dir.clone(),
            source,
        })?;

    let mut errors = 0;
    for name in names {
        let rel_path = cursor.tail.join(&name);
        if ctx.ignore.contains(&rel_path) {
            ctx.log.debug(&format!(
                "{}: ignoring {}",
                action.label(),
                rel_path.display()
            ));
            continue;
        }

        let entry = Entry::classify(ctx, tree, cursor, name);
        if matches!(entry.source, SourceKind::Unreadable { .. }) {
            errors += 1;
        }
        errors += match action.visit(ctx, tree, &entry)? {
            Outcome::Done => 0,
            Outcome::Failed => 1,
            Outcome::Descended(below) => below,
        };
    }
    Ok(errors)
}
