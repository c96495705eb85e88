//! Install pass: make the destination match the package.
use super::{Action, Outcome, report_source_error};
use crate::error::FarmError;
use crate::farm::context::{Context, Summary};
use crate::farm::expand::expand_link;
use crate::farm::table::{Step, step_for};
use crate::farm::traverse::{Entry, View, traverse};
use crate::farm::Installation;

/// Creates, replaces and expands links.
///
/// Runs only after [`Validate`](super::Validate) approved the whole tree; a
/// state validation would have refused means the filesystem changed
/// underneath the run, and aborts it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Install;

impl Action for Install {
    fn label(&self) -> &'static str {
        "install"
    }

    fn visit(
        &self,
        ctx: &Context,
        tree: &Installation,
        entry: &Entry,
    ) -> Result<Outcome, FarmError> {
        let step = step_for(&entry.source, &entry.dest);
        let outcome = match step {
            Step::SourceError => {
                report_source_error(ctx, entry);
                Outcome::Done
            }
            Step::Create => link(ctx, entry, "linked", |s| s.linked += 1),
            Step::Keep => {
                ctx.tally(|s| s.unchanged += 1);
                ctx.log
                    .debug(&format!("{} is already linked", entry.dest_path.display()));
                Outcome::Done
            }
            Step::Replace => relink(ctx, entry, "replaced", |s| s.replaced += 1),
            Step::Contested if ctx.options.override_conflicts => {
                relink(ctx, entry, "overrode", |s| s.overridden += 1)
            }
            Step::Expand if ctx.options.expand => match expand_link(ctx, &entry.dest_path) {
                Ok(children) => {
                    ctx.tally(|s| s.expanded += 1);
                    ctx.note(&format!(
                        "expanded {} into {children} link(s)",
                        entry.dest_path.display()
                    ));
                    Outcome::Descended(traverse(ctx, tree, self, &entry.descend(View::Live))?)
                }
                Err(e) => {
                    ctx.log.error(&e.to_string());
                    Outcome::Failed
                }
            },
            Step::Merge => {
                Outcome::Descended(traverse(ctx, tree, self, &entry.descend(View::Live))?)
            }
            Step::Unexaminable | Step::Blocked | Step::Contested | Step::Expand => {
                return Err(FarmError::InconsistentState {
                    path: entry.dest_path.clone(),
                    detail: format!("{} (step '{step}' was not approved)", entry.dest),
                });
            }
        };
        Ok(outcome)
    }
}

/// Create the entry's link and count it with `bump`.
fn link(ctx: &Context, entry: &Entry, verb: &str, bump: fn(&mut Summary)) -> Outcome {
    match ctx.fs.symlink(&entry.link_target, &entry.dest_path) {
        Ok(()) => {
            ctx.tally(bump);
            ctx.note(&format!(
                "{verb} {} -> {}",
                entry.dest_path.display(),
                entry.link_target.display()
            ));
            Outcome::Done
        }
        Err(e) => {
            ctx.log.error(&format!(
                "cannot link {}: {e}",
                entry.dest_path.display()
            ));
            Outcome::Failed
        }
    }
}

/// Remove the existing link, then [`link`].
fn relink(ctx: &Context, entry: &Entry, verb: &str, bump: fn(&mut Summary)) -> Outcome {
    if let Err(e) = ctx.fs.remove_link(&entry.dest_path) {
        ctx.log.error(&format!(
            "cannot remove {}: {e}",
            entry.dest_path.display()
        ));
        return Outcome::Failed;
    }
    link(ctx, entry, verb, bump)
}
