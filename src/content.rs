//! Byte-for-byte file comparison used to annotate overridden conflicts.

use std::fmt;
use std::io::{self, BufRead as _, BufReader};
use std::path::Path;

use crate::operations::FileSystemOps;

/// Outcome of comparing two files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMatch {
    /// Both files hold the same bytes.
    Identical,
    /// The files differ in length or content.
    Differs,
    /// One of the files could not be read or is not a regular file.
    Unknown,
}

impl fmt::Display for ContentMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Identical => "content identical",
            Self::Differs => "content differs",
            Self::Unknown => "content not compared",
        })
    }
}

/// Compare the files at `a` and `b` through `fs`, following symlinks.
#[must_use]
pub fn compare(fs: &dyn FileSystemOps, a: &Path, b: &Path) -> ContentMatch {
    match files_equal(fs, a, b) {
        Ok(true) => ContentMatch::Identical,
        Ok(false) => ContentMatch::Differs,
        Err(_) => ContentMatch::Unknown,
    }
}

fn files_equal(fs: &dyn FileSystemOps, a: &Path, b: &Path) -> io::Result<bool> {
    let (meta_a, meta_b) = (fs.metadata(a)?, fs.metadata(b)?);
    if !meta_a.is_file() || !meta_b.is_file() {
        return Err(io::Error::other("not a regular file"));
    }
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let mut ra = BufReader::new(fs.open(a)?);
    let mut rb = BufReader::new(fs.open(b)?);
    loop {
        let (buf_a, buf_b) = (ra.fill_buf()?, rb.fill_buf()?);
        if buf_a.is_empty() && buf_b.is_empty() {
            return Ok(true);
        }
        let n = buf_a.len().min(buf_b.len());
        if n == 0 || buf_a.get(..n) != buf_b.get(..n) {
            return Ok(false);
        }
        ra.consume(n);
        rb.consume(n);
    }
}
