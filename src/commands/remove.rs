//! Remove command: soft-delete the package from the destination.
use anyhow::{Context as _, Result};

use crate::config::RunConfig;
use crate::error::RunError;
use crate::farm::actions::SoftDelete;
use crate::farm::traverse::{Cursor, traverse};
use crate::farm::{Context, record};

/// Remove the package's links, then its install record if the record names
/// this source.
///
/// # Errors
///
/// Returns an error if the source tree cannot be walked or any owned link
/// could not be removed.
pub fn run(config: &RunConfig, ctx: &Context) -> Result<()> {
    let tree = config.installation();

    ctx.log.stage(&format!(
        "Removing {} from {}",
        tree.package,
        tree.dest_root.display()
    ));
    let errors =
        traverse(ctx, &tree, &SoftDelete, &Cursor::root(&tree)).context("removal aborted")?;
    if errors > 0 {
        return Err(RunError::RemovalFailed { errors }.into());
    }
    if config.options.dry_run {
        return Ok(());
    }

    let name = &tree.package.name;
    match record::read(ctx, &tree.dest_root, name) {
        Ok(Some(recorded)) if recorded == tree.recorded_target() => {
            record::remove(ctx, &tree.dest_root, name)?;
        }
        Ok(Some(recorded)) => ctx.log.debug(&format!(
            "install record points at {}; left in place",
            recorded.display()
        )),
        Ok(None) => {}
        Err(e) => ctx.log.warn(&e.to_string()),
    }
    Ok(())
}
