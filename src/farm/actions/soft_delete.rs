//! Soft-delete pass: remove the links an installation owns, nothing else.
use super::{Action, Outcome, report_source_error};
use crate::error::FarmError;
use crate::farm::context::Context;
use crate::farm::table::{Step, step_for};
use crate::farm::traverse::{Entry, View, traverse};
use crate::farm::Installation;

/// Removes exact-match links and descends into shared real directories.
///
/// Anything else found where a link was expected is reported and left
/// alone. Directories created by expansion are never removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftDelete;

impl Action for SoftDelete {
    fn label(&self) -> &'static str {
        "remove"
    }

    fn visit(
        &self,
        ctx: &Context,
        tree: &Installation,
        entry: &Entry,
    ) -> Result<Outcome, FarmError> {
        let dest = entry.dest_path.display();
        let outcome = match step_for(&entry.source, &entry.dest) {
            Step::Keep if ctx.options.dry_run => {
                ctx.tally(|s| s.removed += 1);
                ctx.preview(&format!("remove {dest}"));
                Outcome::Done
            }
            Step::Keep => match ctx.fs.remove_link(&entry.dest_path) {
                Ok(()) => {
                    ctx.tally(|s| s.removed += 1);
                    ctx.note(&format!("removed {dest}"));
                    Outcome::Done
                }
                Err(e) => {
                    ctx.log.error(&format!("cannot remove {dest}: {e}"));
                    Outcome::Failed
                }
            },
            Step::Merge => {
                Outcome::Descended(traverse(ctx, tree, self, &entry.descend(View::Live))?)
            }
            Step::SourceError => {
                report_source_error(ctx, entry);
                Outcome::Done
            }
            Step::Create
            | Step::Unexaminable
            | Step::Replace
            | Step::Expand
            | Step::Contested
            | Step::Blocked => {
                ctx.tally(|s| s.missing += 1);
                ctx.notice(&format!(
                    "expected link not found at {dest}: {}",
                    entry.dest
                ));
                Outcome::Done
            }
        };
        Ok(outcome)
    }
}
