//! Install command: validate, then link the package into the destination.
use anyhow::{Context as _, Result};

use crate::config::RunConfig;
use crate::error::RunError;
use crate::farm::actions::{Install, Validate};
use crate::farm::traverse::{Cursor, traverse};
use crate::farm::{Context, record, upgrade};

/// Run the install sequence: validate, flush the conflict list, optionally
/// remove the previous version, install, record.
///
/// # Errors
///
/// Returns an error if validation finds problems (nothing is changed), the
/// conflict list cannot be written, the install pass fails part way, or the
/// install record cannot be written.
pub fn run(config: &RunConfig, ctx: &Context) -> Result<()> {
    let tree = config.installation();
    let root = Cursor::root(&tree);

    ctx.log.stage(&format!(
        "Checking {} against {}",
        tree.package,
        tree.dest_root.display()
    ));
    let validated = traverse(ctx, &tree, &Validate, &root);

    if let Some(path) = &config.conflict_list {
        ctx.conflicts
            .write_to(path)
            .with_context(|| format!("cannot write conflict list {}", path.display()))?;
    }
    let problems = validated.context("validation aborted")?;
    if problems > 0 {
        return Err(RunError::ValidationFailed { problems }.into());
    }
    if config.options.dry_run {
        ctx.log.info("dry run: no changes made");
        return Ok(());
    }

    if config.options.upgrade {
        match upgrade::remove_previous(ctx, &tree) {
            Ok(0) => {}
            Ok(errors) => ctx.log.warn(&format!(
                "{errors} link(s) of the previous version could not be removed"
            )),
            Err(e) => ctx
                .log
                .warn(&format!("could not remove the previous version: {e}")),
        }
    }

    ctx.log.stage(&format!(
        "Installing {} into {}",
        tree.package,
        tree.dest_root.display()
    ));
    let errors = traverse(ctx, &tree, &Install, &root).context("install aborted")?;
    if errors > 0 {
        return Err(RunError::PartiallyInstalled { errors }.into());
    }

    record::write(ctx, &tree).context("package installed but not recorded")?;
    Ok(())
}
