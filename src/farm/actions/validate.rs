//! Validation pass: find every conflict without touching the destination.
use super::{Action, Outcome, report_source_error};
use crate::content;
use crate::error::FarmError;
use crate::farm::context::Context;
use crate::farm::table::{Step, step_for};
use crate::farm::traverse::{Entry, View, traverse};
use crate::farm::{Installation, SourceKind};

/// Checks that an install could complete, recording each blocking
/// destination path in the run's conflict log.
///
/// Directories that would need expanding are examined through a
/// [`View::Expanded`] instead of being expanded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validate;

impl Action for Validate {
    fn label(&self) -> &'static str {
        "validate"
    }

    fn visit(
        &self,
        ctx: &Context,
        tree: &Installation,
        entry: &Entry,
    ) -> Result<Outcome, FarmError> {
        let dest = entry.dest_path.display();
        let outcome = match step_for(&entry.source, &entry.dest) {
            Step::SourceError => {
                report_source_error(ctx, entry);
                Outcome::Done
            }
            Step::Create => {
                ctx.preview(&format!(
                    "link {dest} -> {}",
                    entry.link_target.display()
                ));
                Outcome::Done
            }
            Step::Keep => {
                ctx.log.debug(&format!("{dest} is already linked"));
                Outcome::Done
            }
            Step::Replace => {
                ctx.preview(&format!("replace {dest} ({})", entry.dest));
                Outcome::Done
            }
            Step::Unexaminable | Step::Blocked => conflict(ctx, entry, &entry.dest.to_string()),
            Step::Contested if ctx.options.override_conflicts => {
                let note = if entry.source == SourceKind::Other {
                    format!(
                        " ({})",
                        content::compare(&*ctx.fs, &entry.source_path, &entry.dest_path)
                    )
                } else {
                    String::new()
                };
                ctx.log
                    .warn(&format!("overriding {dest}: {}{note}", entry.dest));
                Outcome::Done
            }
            Step::Contested => conflict(
                ctx,
                entry,
                &format!("{} (use --override to replace it)", entry.dest),
            ),
            Step::Expand if ctx.options.expand => {
                let target = match &entry.virtual_link {
                    Some(target) => target.clone(),
                    None => match ctx.fs.read_link(&entry.dest_path) {
                        Ok(target) => target,
                        Err(e) => return Ok(conflict(ctx, entry, &format!("cannot read link: {e}"))),
                    },
                };
                ctx.preview(&format!("expand {dest} ({})", entry.dest));
                Outcome::Descended(traverse(
                    ctx,
                    tree,
                    self,
                    &entry.descend(View::Expanded { target }),
                )?)
            }
            Step::Expand => conflict(
                ctx,
                entry,
                &format!("{} (use --expand to share it)", entry.dest),
            ),
            Step::Merge => {
                Outcome::Descended(traverse(ctx, tree, self, &entry.descend(View::Live))?)
            }
        };
        Ok(outcome)
    }
}

fn conflict(ctx: &Context, entry: &Entry, why: &str) -> Outcome {
    ctx.conflicts.record(&entry.dest_path);
    ctx.log.error(&format!(
        "conflict at {}: {why}",
        entry.dest_path.display()
    ));
    Outcome::Failed
}
