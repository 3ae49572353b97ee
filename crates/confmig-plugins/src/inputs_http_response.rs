//! `inputs.http_response`: `address` replaced by the `urls` list

use confmig_core::prelude::*;

/// Plugin name under `inputs`
pub const NAME: &str = "http_response";

/// Migrate one `inputs.http_response` instance
///
/// # Errors
/// `RuleError::Conflict` if `urls` is set to anything but `[address]`
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    wrap_into_list(table, "address", "urls")
}
