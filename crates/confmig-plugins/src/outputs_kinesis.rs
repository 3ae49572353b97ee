//! `outputs.kinesis`: partition settings moved into the `partition` sub-table
//!
//! ```toml
//! # before                             # after
//! [[outputs.kinesis]]                  [[outputs.kinesis]]
//!   partitionkey = "host"              [outputs.kinesis.partition]
//!                                        method = "static"
//!                                        key = "host"
//! ```
//!
//! `use_random_partitionkey = true` becomes `method = "random"` and wins over
//! `partitionkey`, matching how the plugin read the legacy settings.

use confmig_core::prelude::*;
use toml_edit::TableLike;

/// Plugin name under `outputs`
pub const NAME: &str = "kinesis";

const PARTITION_KEY: &str = "partitionkey";
const RANDOM_PARTITION_KEY: &str = "use_random_partitionkey";
const PARTITION: &str = "partition";
const PARTITION_KEY_FIELD: &str = "partition.key";
const PARTITION_METHOD_FIELD: &str = "partition.method";

/// Migrate one `outputs.kinesis` instance
///
/// # Errors
/// - `RuleError::Conflict` naming `'use_random_partitionkey'` and `'partition.method'`
///   when the implied method differs from `partition.method`
/// - `RuleError::Conflict` naming `'partitionkey'` and `'partition.key'` when the keys differ
/// - `RuleError::InvalidType` for legacy fields, `partition`, `partition.method` or
///   `partition.key` of the wrong type
pub fn migrate(table: &mut Table) -> Result<u64, RuleError> {
    let random = legacy_bool(table, RANDOM_PARTITION_KEY)?;
    let key = legacy_string(table, PARTITION_KEY)?;
    if random.is_none() && key.is_none() {
        return Ok(0);
    }

    let method = match (random, key.as_deref()) {
        (Some(true), _) => Some("random"),
        (_, Some(_)) => Some("static"),
        // only `use_random_partitionkey = false`, which is the default
        _ => None,
    };

    let partition = partition_table(table)?;
    let current_method = partition_value(partition, "method")?;
    let current_key = partition_value(partition, "key")?;

    if let Some(method) = method {
        let implied = Value::from(method);
        detect(Some(&implied), current_method, values_equal).into_result(|| {
            let flag = Value::from(random.unwrap_or(false));
            Conflict::between(RANDOM_PARTITION_KEY, PARTITION_METHOD_FIELD, Some(&flag), current_method)
        })?;
    }
    if let (Some("static"), Some(key)) = (method, key.as_deref()) {
        let implied = Value::from(key);
        detect(Some(&implied), current_key, values_equal).into_result(|| {
            Conflict::between(PARTITION_KEY, PARTITION_KEY_FIELD, Some(&implied), current_key)
        })?;
    }

    if let (Some(true), Some(key)) = (random, key.as_deref()) {
        tracing::warn!(
            partitionkey = key,
            "'partitionkey' has no effect with random partitioning, dropping it"
        );
    }

    if let Some(method) = method {
        let static_key = if method == "static" { key.as_deref() } else { None };
        let indent = indent_of(table, PARTITION_KEY).or_else(|| indent_of(table, RANDOM_PARTITION_KEY));
        let settings = [("method", Some(method)), ("key", static_key)];

        match table.entry(PARTITION).or_insert_with(|| Item::Table(Table::new())) {
            Item::Table(partition) => {
                let sibling = partition.iter().next().map(|(field, _)| field.to_string());
                let indent = sibling
                    .and_then(|field| indent_of(partition, &field))
                    .or(indent);
                for (field, setting) in settings {
                    if let (Some(setting), false) = (setting, partition.contains_key(field)) {
                        partition.insert(field, value(setting));
                        set_indent(partition, field, indent.as_deref());
                    }
                }
            }
            other => {
                if let Some(partition) = other.as_table_like_mut() {
                    for (field, setting) in settings {
                        if let (Some(setting), false) = (setting, partition.contains_key(field)) {
                            partition.insert(field, value(setting));
                        }
                    }
                }
            }
        }
    }

    let mut changed = 0;
    if random.is_some() {
        table.remove(RANDOM_PARTITION_KEY);
        changed += 1;
    }
    if key.is_some() {
        table.remove(PARTITION_KEY);
        changed += 1;
    }
    Ok(changed)
}

fn legacy_bool(table: &Table, field: &str) -> Result<Option<bool>, RuleError> {
    field_value(table, field)?
        .map(|v| v.as_bool().ok_or_else(|| RuleError::invalid_type(field, "boolean", v.type_name())))
        .transpose()
}

fn legacy_string(table: &Table, field: &str) -> Result<Option<String>, RuleError> {
    field_value(table, field)?
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| RuleError::invalid_type(field, "string", v.type_name()))
        })
        .transpose()
}

fn partition_value<'t>(
    partition: Option<&'t dyn TableLike>,
    field: &str,
) -> Result<Option<&'t Value>, RuleError> {
    match partition.and_then(|p| p.get(field)) {
        None | Some(Item::None) => Ok(None),
        Some(Item::Value(value)) => Ok(Some(value)),
        Some(other) => Err(RuleError::invalid_type(
            format!("{PARTITION}.{field}"),
            "value",
            other.type_name(),
        )),
    }
}

fn partition_table(table: &Table) -> Result<Option<&dyn TableLike>, RuleError> {
    match table.get(PARTITION) {
        None => Ok(None),
        Some(item) => item
            .as_table_like()
            .map(Some)
            .ok_or_else(|| RuleError::invalid_type(PARTITION, "table", item.type_name())),
    }
}
