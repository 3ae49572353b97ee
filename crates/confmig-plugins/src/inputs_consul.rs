//! `inputs.consul`: misspelled `datacentre` renamed to `datacenter`

use confmig_core::prelude::*;

/// Plugin name under `inputs`
pub const NAME: &str = "consul";

/// Migrate one `inputs.consul` instance
///
/// # Errors
/// `RuleError::Conflict` if both spellings are present and differ
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    rename_field(table, "datacentre", "datacenter")
}

#[cfg(test)]
mod tests {
    use super::*;
    use confmig_test_utils::instance_table;

    #[test]
    fn fixes_spelling() {
        let mut table = instance_table("address = \"localhost:8500\"\ndatacentre = \"dc1\"\n");
        assert_eq!(migrate(&mut table), Ok(1));
        assert_eq!(table.get("datacenter").and_then(Item::as_str), Some("dc1"));
    }

    #[test]
    fn both_spellings_agreeing() {
        let mut table = instance_table("datacentre = \"dc1\"\ndatacenter = \"dc1\"\n");
        assert_eq!(migrate(&mut table), Ok(1));
        assert!(!table.contains_key("datacentre"));
    }
}
