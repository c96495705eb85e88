//! Lexical path helpers shared by the traversal, classifier and record code.
//!
//! Nothing here touches the filesystem.

use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt as _, OsStringExt as _};
use std::path::{Component, Path, PathBuf};

/// Join `name` onto `dir` with exactly one separator.
///
/// An empty `dir` stands for the filesystem root, so `join("", "bin")` is
/// `/bin`. This pairs with [`clean_dir`], which turns `/` into the empty path.
#[must_use]
pub fn join(dir: &Path, name: impl AsRef<Path>) -> PathBuf {
    if dir.as_os_str().is_empty() {
        Path::new("/").join(name)
    } else {
        dir.join(name)
    }
}

/// Append `tail` to `root`, returning `root` itself for an empty tail.
///
/// `Path::join("")` would add a trailing separator, which shows up in
/// messages and in conflict lists.
#[must_use]
pub fn under(root: &Path, tail: &Path) -> PathBuf {
    if tail.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        join(root, tail)
    }
}

/// Shortest relative path leading from directory `from` to `to`.
///
/// Both paths are expected to be absolute and free of `.`/`..` components.
/// Identical paths yield the empty path.
#[must_use]
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in to.iter().skip(common) {
        out.push(component);
    }
    out
}

/// Collapse repeated separators and strip a trailing one.
///
/// A bare `/` becomes the empty path; see [`join`].
#[must_use]
pub fn clean_dir(path: &Path) -> PathBuf {
    let bytes = path.as_os_str().as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if b == b'/' && out.last() == Some(&b'/') {
            continue;
        }
        out.push(b);
    }
    if out.last() == Some(&b'/') {
        out.pop();
    }
    PathBuf::from(OsString::from_vec(out))
}

/// Resolve `rel` against the directory `base` without consulting the
/// filesystem. Each `..` drops one component; an absolute `rel` wins.
#[must_use]
pub fn resolve(base: &Path, rel: &Path) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::RootDir => out = PathBuf::from("/"),
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
            Component::CurDir | Component::Prefix(_) => {}
        }
    }
    out
}
