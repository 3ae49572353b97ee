//! `outputs.amqp`: `url` replaced by the `brokers` list

use confmig_core::prelude::*;

/// Plugin name under `outputs`
pub const NAME: &str = "amqp";

/// Migrate one `outputs.amqp` instance
///
/// # Errors
/// `RuleError::Conflict` if `brokers` is set to anything but `[url]`
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    wrap_into_list(table, "url", "brokers")
}
