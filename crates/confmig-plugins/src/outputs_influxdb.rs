//! `outputs.influxdb`: single `url` replaced by the `urls` list

use confmig_core::prelude::*;

/// Plugin name under `outputs`
pub const NAME: &str = "influxdb";

/// Migrate one `outputs.influxdb` instance
///
/// # Errors
/// `RuleError::Conflict` if `urls` is set to anything but `[url]`
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    wrap_into_list(table, "url", "urls")
}
