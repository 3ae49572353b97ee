//! `inputs.docker`: `container_names` renamed to `container_name_include`

use confmig_core::prelude::*;

/// Plugin name under `inputs`
pub const NAME: &str = "docker";

/// Migrate one `inputs.docker` instance
///
/// # Errors
/// `RuleError::Conflict` if both settings are present and differ
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    rename_field(table, "container_names", "container_name_include")
}
