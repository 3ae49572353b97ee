//! confmig Plugins
//!
//! Built-in migrations for plugins whose settings were renamed or restructured.
//!
//! | Plugin                 | Legacy setting                               | Current setting                     |
//! |------------------------|----------------------------------------------|-------------------------------------|
//! | `outputs.kinesis`      | `partitionkey`, `use_random_partitionkey`    | `partition.key`, `partition.method` |
//! | `outputs.influxdb`     | `url`                                        | `urls`                              |
//! | `outputs.amqp`         | `url`                                        | `brokers`                           |
//! | `inputs.http_response` | `address`                                    | `urls`                              |
//! | `inputs.disk`          | `mountpoints`                                | `mount_points`                      |
//! | `inputs.docker`        | `container_names`                            | `container_name_include`            |
//! | `inputs.consul`        | `datacentre`                                 | `datacenter`                        |
//!
//! # Example
//!
//! ```rust
//! let registry = confmig_plugins::default_registry().unwrap();
//! let raw = b"[[outputs.kinesis]]\n  partitionkey = \"host\"\n";
//!
//! let migration = confmig_core::apply_migrations(&registry, raw).unwrap();
//! assert_eq!(migration.applied, 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod inputs_consul;
pub mod inputs_disk;
pub mod inputs_docker;
pub mod inputs_http_response;
pub mod outputs_amqp;
pub mod outputs_influxdb;
pub mod outputs_kinesis;

use confmig_core::{MigrationRegistry, PluginCategory, RegistrationError, RegistryBuilder};

/// Register every built-in migration
///
/// # Errors
/// `RegistrationError::Duplicate` if the builder already holds a rule for one of the plugins
pub fn register_all(builder: &mut RegistryBuilder) -> Result<(), RegistrationError> {
    builder
        .register(PluginCategory::Inputs, inputs_consul::NAME, inputs_consul::migrate)?
        .register(PluginCategory::Inputs, inputs_disk::NAME, inputs_disk::migrate)?
        .register(PluginCategory::Inputs, inputs_docker::NAME, inputs_docker::migrate)?
        .register(
            PluginCategory::Inputs,
            inputs_http_response::NAME,
            inputs_http_response::migrate,
        )?
        .register(PluginCategory::Outputs, outputs_amqp::NAME, outputs_amqp::migrate)?
        .register(PluginCategory::Outputs, outputs_influxdb::NAME, outputs_influxdb::migrate)?
        .register(PluginCategory::Outputs, outputs_kinesis::NAME, outputs_kinesis::migrate)?;
    Ok(())
}

/// Registry holding every built-in migration
///
/// # Errors
/// Only fails if two built-in rules claim the same plugin
pub fn default_registry() -> Result<MigrationRegistry, RegistrationError> {
    let mut builder = RegistryBuilder::new();
    register_all(&mut builder)?;
    Ok(builder.build())
}
