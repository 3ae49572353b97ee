//! confmig Core
//!
//! Format-preserving migration of agent plugin configuration documents.
//!
//! # Core Concepts
//!
//! - [`ConfigDocument`]: Parsed TOML document that round-trips untouched content
//! - [`MigrationRule`]: Per-plugin rewrite of one plugin instance table
//! - [`MigrationRegistry`]: Immutable `(category, name)` → rule lookup, built with [`RegistryBuilder`]
//! - [`Migrator`]: Driver that walks every plugin instance and applies its rule
//! - [`detect`]: Conflict detection between a legacy setting and its replacement
//!
//! # Architecture
//!
//! ```text
//! bytes → ConfigDocument → [instance → registry lookup → rule → conflict check] → bytes
//! ```
//!
//! # Example
//!
//! ```rust
//! use confmig_core::{apply_migrations, PluginCategory, RegistryBuilder};
//! use confmig_core::rule::rename_field;
//!
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .register(PluginCategory::Inputs, "disk", |table: &mut toml_edit::Table| {
//!         rename_field(table, "mountpoints", "mount_points")
//!     })
//!     .unwrap();
//! let registry = builder.build();
//!
//! let migration = apply_migrations(&registry, b"[[inputs.disk]]\nmountpoints = [\"/\"]\n").unwrap();
//! assert_eq!(migration.applied, 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod conflict;
pub mod document;
pub mod driver;
pub mod error;
pub mod plugin;
pub mod registry;
pub mod rule;

// Re-exports for convenience
pub use config::{ConfigError, MigrationConfig};
pub use conflict::{detect, values_equal, Conflict, Resolution};
pub use document::{ConfigDocument, PluginInstance};
pub use driver::{apply_migrations, Migration, Migrator};
pub use error::{MigrationError, ParseError, RegistrationError, RuleError};
pub use plugin::{PluginCategory, PluginId, UnknownCategory};
pub use registry::{MigrationRegistry, RegistryBuilder};
pub use rule::MigrationRule;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for writing migration rules
pub mod prelude {
    //! Common imports for plugin migration rules
    pub use crate::conflict::{detect, values_equal, Conflict, Resolution};
    pub use crate::error::RuleError;
    pub use crate::plugin::{PluginCategory, PluginId};
    pub use crate::registry::RegistryBuilder;
    pub use crate::rule::{
        field_value, indent_of, rename_field, set_indent, wrap_into_list, MigrationRule,
    };
    pub use toml_edit::{value, Item, Table, Value};
}
