//! `inputs.disk`: `mountpoints` renamed to `mount_points`

use confmig_core::prelude::*;

/// Plugin name under `inputs`
pub const NAME: &str = "disk";

/// Migrate one `inputs.disk` instance
///
/// # Errors
/// `RuleError::Conflict` if both settings are present and differ
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    rename_field(table, "mountpoints", "mount_points")
}
