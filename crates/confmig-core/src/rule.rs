//! Migration rule contract and shared field rewrites
//!
//! A rule receives the table of exactly one plugin instance and returns the
//! number of settings it rewrote. For every legacy field it knows about it:
//!
//! 1. skips the field if absent,
//! 2. looks up the new-style replacement,
//! 3. runs [`detect`](crate::conflict::detect) and stops on the first conflict,
//! 4. writes the replacement and removes the legacy field (one change), or
//! 5. only removes the legacy field when both already agree (one change).
//!
//! A rule returning `Ok(0)` found nothing to migrate.

use toml_edit::{value, Array, Item, Table, Value};

use crate::conflict::{detect, values_equal, Conflict, Resolution};
use crate::error::RuleError;

/// Rewrite of one plugin instance table
///
/// Implemented for every `Fn(&mut Table) -> Result<u64, RuleError>`, so plain
/// functions and closures can be registered directly.
pub trait MigrationRule: Send + Sync {
    /// Migrate the instance table in place
    ///
    /// # Returns
    /// Number of settings rewritten
    ///
    /// # Errors
    /// `RuleError::Conflict` when legacy and new settings contradict. The table
    /// must not be modified in that case.
    fn migrate(&self, table: &mut Table) -> Result<u64, RuleError>;
}

impl<F> MigrationRule for F
where
    F: Fn(&mut Table) -> Result<u64, RuleError> + Send + Sync,
{
    #[inline]
    fn migrate(&self, table: &mut Table) -> Result<u64, RuleError> {
        self(table)
    }
}

/// Get a field that must hold a plain value
///
/// # Errors
/// `RuleError::InvalidType` if the field is a table or array of tables
pub fn field_value<'t>(table: &'t Table, field: &str) -> Result<Option<&'t Value>, RuleError> {
    match table.get(field) {
        None | Some(Item::None) => Ok(None),
        Some(Item::Value(value)) => Ok(Some(value)),
        Some(other) => Err(RuleError::invalid_type(field, "value", other.type_name())),
    }
}

/// Rename a scalar or list setting
///
/// Equivalent when both fields hold the same value.
///
/// # Errors
/// `RuleError::Conflict` naming `legacy` and `new` when the values differ
pub fn rename_field(table: &mut Table, legacy: &str, new: &str) -> Result<u64, RuleError> {
    let Some(legacy_value) = field_value(table, legacy)?.cloned() else {
        return Ok(0);
    };
    let current = field_value(table, new)?;

    match detect(Some(&legacy_value), current, values_equal) {
        Resolution::Contradictory => {
            Err(Conflict::between(legacy, new, Some(&legacy_value), current).into())
        }
        Resolution::LegacyOnly => {
            let indent = indent_of(table, legacy);
            table.remove(legacy);
            table.insert(new, Item::Value(undecorated(legacy_value)));
            set_indent(table, new, indent.as_deref());
            Ok(1)
        }
        Resolution::Equivalent => {
            table.remove(legacy);
            Ok(1)
        }
        Resolution::NewOnly | Resolution::BothAbsent => Ok(0),
    }
}

/// Move a single string setting into a list setting
///
/// Equivalent when the list holds exactly that one string.
///
/// # Errors
/// - `RuleError::InvalidType` if `legacy` is not a string or `new` is not an array
/// - `RuleError::Conflict` naming `legacy` and `new` when the list differs
pub fn wrap_into_list(table: &mut Table, legacy: &str, new: &str) -> Result<u64, RuleError> {
    let Some(legacy_value) = field_value(table, legacy)?.cloned() else {
        return Ok(0);
    };
    if legacy_value.as_str().is_none() {
        return Err(RuleError::invalid_type(legacy, "string", legacy_value.type_name()));
    }

    let current = field_value(table, new)?;
    if let Some(list) = current {
        if list.as_array().is_none() {
            return Err(RuleError::invalid_type(new, "array", list.type_name()));
        }
    }

    let single_entry = |legacy: &Value, list: &Value| {
        list.as_array()
            .is_some_and(|list| list.len() == 1 && list.get(0).is_some_and(|v| values_equal(legacy, v)))
    };

    match detect(Some(&legacy_value), current, single_entry) {
        Resolution::Contradictory => {
            Err(Conflict::between(legacy, new, Some(&legacy_value), current).into())
        }
        Resolution::LegacyOnly => {
            let list: Array = std::iter::once(undecorated(legacy_value)).collect();
            let indent = indent_of(table, legacy);
            table.remove(legacy);
            table.insert(new, value(list));
            set_indent(table, new, indent.as_deref());
            Ok(1)
        }
        Resolution::Equivalent => {
            table.remove(legacy);
            Ok(1)
        }
        Resolution::NewOnly | Resolution::BothAbsent => Ok(0),
    }
}

/// Leading whitespace on `field`'s line
///
/// Comments and blank lines above the key are not part of the indentation.
#[must_use]
pub fn indent_of(table: &Table, field: &str) -> Option<String> {
    let prefix = table.key(field)?.leaf_decor().prefix()?.as_str()?;
    let indent = prefix.rsplit('\n').next().unwrap_or(prefix);
    indent
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then(|| indent.to_string())
}

/// Indent `field`'s line by `indent`; `None` keeps the default layout
pub fn set_indent(table: &mut Table, field: &str, indent: Option<&str>) {
    if let (Some(indent), Some(mut key)) = (indent, table.key_mut(field)) {
        key.leaf_decor_mut().set_prefix(indent);
    }
}

/// Strip whitespace and trailing comments carried over from the legacy line
pub(crate) fn undecorated(mut value: Value) -> Value {
    value.decor_mut().clear();
    value
}
