//! Removal of the previously recorded version before an upgrade.
use super::actions::SoftDelete;
use super::context::Context;
use super::record;
use super::traverse::{Cursor, traverse};
use super::Installation;
use crate::error::FarmError;

/// Soft-delete whatever version of `current`'s package the install record
/// names, then drop the record.
///
/// Returns the number of entries that could not be removed. A missing or
/// unreadable record is reported and treated as nothing to remove.
///
/// # Errors
///
/// Returns an error if the recorded source tree cannot be walked; the record
/// is kept in that case.
pub fn remove_previous(ctx: &Context, current: &Installation) -> Result<usize, FarmError> {
    let recorded = match record::read(ctx, &current.dest_root, &current.package.name) {
        Ok(Some(recorded)) => recorded,
        Ok(None) => {
            ctx.log.warn(&format!(
                "no install record for {}; nothing to upgrade from",
                current.package.name.to_string_lossy()
            ));
            return Ok(0);
        }
        Err(e) => {
            ctx.log.warn(&format!("{e}; nothing to upgrade from"));
            return Ok(0);
        }
    };

    let previous = record::previous_installation(&current.dest_root, &current.package, &recorded);
    ctx.log.stage(&format!("Removing previous version {}", previous.package));
    let errors = traverse(ctx, &previous, &SoftDelete, &Cursor::root(&previous))?;

    if let Err(e) = record::remove(ctx, &current.dest_root, &current.package.name) {
        ctx.log.warn(&e.to_string());
    }
    Ok(errors)
}
