//! The three passes run over a package tree.
//!
//! | pass | mutates | purpose |
//! |------|---------|---------|
//! | [`Validate`] | never | find every conflict before anything changes |
//! | [`Install`] | yes | create, replace and expand links |
//! | [`SoftDelete`] | yes | remove exactly the links this package owns |

mod install;
mod soft_delete;
mod validate;

pub use install::Install;
pub use soft_delete::SoftDelete;
pub use validate::Validate;

use super::context::Context;
use super::traverse::Entry;
use super::Installation;
use crate::error::FarmError;

/// Result of visiting one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The entry was handled.
    Done,
    /// The entry failed; counts as one error.
    Failed,
    /// The action walked below the entry; carries the error count from there.
    Descended(usize),
}

/// A strategy applied to every entry of a traversal.
pub trait Action {
    /// Short name used in log messages.
    fn label(&self) -> &'static str;

    /// Handle one entry.
    ///
    /// # Errors
    ///
    /// Returns an error only for conditions that must abort the whole walk.
    fn visit(&self, ctx: &Context, tree: &Installation, entry: &Entry)
    -> Result<Outcome, FarmError>;
}

/// Report a source entry that could not be examined.
///
/// The traversal already counts such entries, so callers return
/// [`Outcome::Done`] afterwards.
fn report_source_error(ctx: &Context, entry: &Entry) {
    if let super::SourceKind::Unreadable { reason } = &entry.source {
        ctx.log.error(&format!(
            "cannot examine {}: {reason}",
            entry.source_path.display()
        ));
    }
}
