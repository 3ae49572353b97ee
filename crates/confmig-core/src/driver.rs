//! Migration driver
//!
//! One call is one pass: parse, run every applicable rule, serialize.
//!
//! # Atomicity
//! Rules mutate the freshly parsed working document only. The first failing
//! rule aborts the pass before anything is serialized, so callers never see
//! partially migrated output.

use crate::config::MigrationConfig;
use crate::document::ConfigDocument;
use crate::error::MigrationError;
use crate::plugin::PluginCategory;
use crate::registry::MigrationRegistry;

/// Result of a successful pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Migrated document
    pub output: Vec<u8>,
    /// Number of settings rewritten across all plugin instances
    pub applied: u64,
}

impl Migration {
    /// Check if the input was already current
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied == 0
    }
}

/// Drives migration passes against a registry
#[derive(Debug, Clone)]
pub struct Migrator<'r> {
    registry: &'r MigrationRegistry,
    config: MigrationConfig,
}

impl<'r> Migrator<'r> {
    /// Create driver with default configuration
    #[inline]
    #[must_use]
    pub fn new(registry: &'r MigrationRegistry) -> Self {
        Self::with_config(registry, MigrationConfig::default())
    }

    /// Create driver with specific configuration
    #[inline]
    #[must_use]
    pub fn with_config(registry: &'r MigrationRegistry, config: MigrationConfig) -> Self {
        Self { registry, config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Run one migration pass over a raw document
    ///
    /// # Returns
    /// The migrated bytes and the number of rewritten settings. When nothing was
    /// rewritten the input is returned verbatim (unless disabled in the config).
    ///
    /// # Errors
    /// - `MigrationError::Parse` if the input is malformed
    /// - `MigrationError::Rule` for the first rule failure; no output is produced
    pub fn apply(&self, raw: &[u8]) -> Result<Migration, MigrationError> {
        let mut document = ConfigDocument::parse(raw)?;

        let mut applied = 0u64;
        let mut walked: Vec<PluginCategory> = Vec::with_capacity(self.config.categories.len());
        for &category in &self.config.categories {
            if walked.contains(&category) {
                continue;
            }
            walked.push(category);
            applied += self.migrate_category(&mut document, category)?;
        }

        if applied == 0 {
            tracing::debug!("configuration already current");
            let output = if self.config.keep_unchanged_input {
                raw.to_vec()
            } else {
                document.to_bytes()
            };
            return Ok(Migration { output, applied });
        }

        tracing::info!(applied, "migration pass complete");
        Ok(Migration {
            output: document.to_bytes(),
            applied,
        })
    }

    fn migrate_category(
        &self,
        document: &mut ConfigDocument,
        category: PluginCategory,
    ) -> Result<u64, MigrationError> {
        let mut applied = 0u64;
        for mut instance in document.instances_mut(category) {
            let Some(rule) = self.registry.lookup(category, instance.id().name()) else {
                continue;
            };

            let changed = rule.migrate(instance.table_mut()).map_err(|source| {
                tracing::warn!(
                    plugin = %instance.id(),
                    index = instance.index(),
                    error = %source,
                    "migration aborted"
                );
                MigrationError::Rule {
                    plugin: instance.id().clone(),
                    index: instance.index(),
                    source,
                }
            })?;

            if changed > 0 {
                tracing::debug!(
                    plugin = %instance.id(),
                    index = instance.index(),
                    changed,
                    "applied migration"
                );
            }
            applied += changed;
        }
        Ok(applied)
    }
}

/// Run one migration pass with the default configuration
///
/// # Errors
/// See [`Migrator::apply`]
#[inline]
pub fn apply_migrations(registry: &MigrationRegistry, raw: &[u8]) -> Result<Migration, MigrationError> {
    Migrator::new(registry).apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{detect, values_equal, Conflict};
    use crate::error::RuleError;
    use crate::registry::RegistryBuilder;
    use crate::rule::{field_value, rename_field};
    use pretty_assertions::assert_eq;
    use toml_edit::Table;

    /// `legacy = x` → `current = x`, conflicting when `current` differs
    fn rename(table: &mut Table) -> Result<u64, RuleError> {
        rename_field(table, "legacy", "current")
    }

    /// Two settings in one rule; `old_b` conflicts with a different `locked`
    fn two_step(table: &mut Table) -> Result<u64, RuleError> {
        let old_b = field_value(table, "old_b")?.cloned();
        let locked = field_value(table, "locked")?.cloned();
        let resolution = detect(old_b.as_ref(), locked.as_ref(), values_equal);
        if resolution.is_conflict() {
            return Err(Conflict::between("old_b", "locked", old_b.as_ref(), locked.as_ref()).into());
        }

        let mut changed = rename_field(table, "old_a", "new_a")?;
        if resolution.removes_legacy() {
            table.remove("old_b");
            changed += 1;
        }
        Ok(changed)
    }

    fn registry() -> MigrationRegistry {
        let mut builder = RegistryBuilder::new();
        builder
            .register(PluginCategory::Outputs, "sink", rename)
            .unwrap()
            .register(PluginCategory::Inputs, "source", two_step)
            .unwrap();
        builder.build()
    }

    #[test]
    fn noop_pass_returns_input_verbatim() {
        let registry = registry();
        let raw = b"# untouched\n[[outputs.other]]\n  legacy = 1\n\n[[outputs.sink]]\n  current = 2\n";

        let migration = apply_migrations(&registry, raw).unwrap();
        assert!(migration.is_noop());
        assert_eq!(migration.output, raw.to_vec());
    }

    #[test]
    fn migrates_every_instance() {
        let registry = registry();
        let raw = "[[outputs.sink]]\n  legacy = \"a\"\n\n[[outputs.sink]]\n  legacy = \"b\"\n";

        let migration = apply_migrations(&registry, raw.as_bytes()).unwrap();
        assert_eq!(migration.applied, 2);

        let output = String::from_utf8(migration.output).unwrap();
        assert!(!output.contains("legacy"));
        assert!(output.contains("current = \"a\""));
        assert!(output.contains("current = \"b\""));
    }

    #[test]
    fn counts_each_setting_once() {
        let registry = registry();
        let raw = "[[inputs.source]]\n  old_a = 1\n  old_b = true\n";

        let migration = apply_migrations(&registry, raw.as_bytes()).unwrap();
        assert_eq!(migration.applied, 2);
    }

    #[test]
    fn preserves_untouched_content() {
        let registry = registry();
        let raw = "# header comment\n[agent]\n  interval = \"10s\" # keep\n\n[[outputs.sink]]\n  legacy = \"a\"\n\n# between instances\n[[outputs.file]]\n  files = [\"stdout\"]\n";

        let output = String::from_utf8(apply_migrations(&registry, raw.as_bytes()).unwrap().output).unwrap();
        assert!(output.starts_with("# header comment\n[agent]\n  interval = \"10s\" # keep\n"));
        assert!(output.contains("# between instances\n[[outputs.file]]\n  files = [\"stdout\"]\n"));
    }

    #[test]
    fn conflict_aborts_whole_pass() {
        let registry = registry();
        // The first instance would migrate cleanly, the second one conflicts
        let raw = "[[outputs.sink]]\n  legacy = \"a\"\n\n[[outputs.sink]]\n  legacy = \"a\"\n  current = \"b\"\n";

        let err = apply_migrations(&registry, raw.as_bytes()).unwrap_err();
        match &err {
            MigrationError::Rule { plugin, index, .. } => {
                assert_eq!(plugin.to_string(), "outputs.sink");
                assert_eq!(*index, 1);
            }
            MigrationError::Parse(_) => panic!("unexpected parse error"),
        }
        assert!(err
            .to_string()
            .contains("contradicting setting for 'legacy' and 'current'"));
    }

    #[test]
    fn conflict_after_clean_category_aborts_pass() {
        let registry = registry();
        // inputs are walked first and migrate cleanly
        let raw = "[[inputs.source]]\n  old_a = 1\n\n[[outputs.sink]]\n  legacy = \"a\"\n  current = \"b\"\n";

        let err = apply_migrations(&registry, raw.as_bytes()).unwrap_err();
        let conflict = err.conflict().unwrap();
        assert_eq!(conflict.legacy_field(), "legacy");
        assert_eq!(conflict.new_field(), "current");
    }

    #[test]
    fn rule_conflict_reports_setting_pair() {
        let registry = registry();
        let raw = "[[inputs.source]]\n  old_a = 1\n  old_b = true\n  locked = false\n";

        let err = apply_migrations(&registry, raw.as_bytes()).unwrap_err();
        let conflict = err.conflict().unwrap();
        assert_eq!(conflict.legacy_field(), "old_b");
        assert_eq!(conflict.new_field(), "locked");
        assert_eq!(conflict.legacy_value(), "true");
        assert_eq!(conflict.new_value(), "false");
    }

    #[test]
    fn parse_errors_are_propagated() {
        let registry = registry();
        let err = apply_migrations(&registry, b"[[outputs.sink]\n").unwrap_err();
        assert!(matches!(err, MigrationError::Parse(_)));
    }

    #[test]
    fn second_pass_is_noop() {
        let registry = registry();
        let raw = "[[outputs.sink]]\n  legacy = \"a\"\n";

        let first = apply_migrations(&registry, raw.as_bytes()).unwrap();
        let second = apply_migrations(&registry, &first.output).unwrap();
        assert_eq!(second.applied, 0);
        assert_eq!(second.output, first.output);
    }

    #[test]
    fn config_limits_walked_categories() {
        let registry = registry();
        let config = MigrationConfig::new().with_categories([PluginCategory::Inputs]);
        let migrator = Migrator::with_config(&registry, config);

        let migration = migrator.apply(b"[[outputs.sink]]\n  legacy = \"a\"\n").unwrap();
        assert_eq!(migration.applied, 0);
    }

    #[test]
    fn repeated_categories_are_walked_once() {
        let registry = registry();
        let config = MigrationConfig::new()
            .with_categories([PluginCategory::Inputs, PluginCategory::Inputs]);
        let migrator = Migrator::with_config(&registry, config);

        let migration = migrator.apply(b"[[inputs.source]]\n  old_a = 1\n").unwrap();
        assert_eq!(migration.applied, 1);
    }

    #[test]
    fn noop_can_reserialize() {
        let registry = registry();
        let config = MigrationConfig::new().with_keep_unchanged_input(false);
        let raw = b"[[outputs.sink]]\n  current = 1\n";

        let migration = Migrator::with_config(&registry, config).apply(raw).unwrap();
        assert_eq!(migration.output, raw.to_vec());
    }

    #[test]
    fn concurrent_passes_share_registry() {
        let registry = registry();
        let raw = "[[outputs.sink]]\n  legacy = \"a\"\n";

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| apply_migrations(&registry, raw.as_bytes()).unwrap().applied))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), 1);
            }
        });
    }
}
