//! Migration registry
//!
//! Provides [`RegistryBuilder`] for collecting rules at startup and the immutable
//! [`MigrationRegistry`] the driver looks rules up in.

use std::collections::HashMap;
use std::fmt;

use crate::error::RegistrationError;
use crate::plugin::{PluginCategory, PluginId};
use crate::rule::MigrationRule;

type RuleTable = HashMap<PluginCategory, HashMap<String, Box<dyn MigrationRule>>>;

/// Collects migration rules before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    rules: RuleTable,
}

impl RegistryBuilder {
    /// Create new empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register the rule for a plugin
    ///
    /// # Errors
    /// `RegistrationError::Duplicate` if the plugin already has a rule
    pub fn register<R>(
        &mut self,
        category: PluginCategory,
        name: impl Into<String>,
        rule: R,
    ) -> Result<&mut Self, RegistrationError>
    where
        R: MigrationRule + 'static,
    {
        let name = name.into();
        let plugins = self.rules.entry(category).or_default();
        if plugins.contains_key(&name) {
            return Err(RegistrationError::Duplicate(PluginId::new(category, name)));
        }

        tracing::trace!(%category, plugin = %name, "registered migration");
        plugins.insert(name, Box::new(rule));
        Ok(self)
    }

    /// Freeze into an immutable registry
    #[inline]
    #[must_use]
    pub fn build(self) -> MigrationRegistry {
        MigrationRegistry { rules: self.rules }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("plugins", &plugin_ids(&self.rules))
            .finish()
    }
}

/// Immutable lookup of `(category, name)` → migration rule
///
/// Read-only once built, so one registry can serve concurrent passes.
#[derive(Default)]
pub struct MigrationRegistry {
    rules: RuleTable,
}

impl MigrationRegistry {
    /// Look up the rule for a plugin
    ///
    /// `None` means no migration applies, which is the common case.
    #[inline]
    #[must_use]
    pub fn lookup(&self, category: PluginCategory, name: &str) -> Option<&dyn MigrationRule> {
        self.rules.get(&category)?.get(name).map(|rule| rule.as_ref())
    }

    /// Check if a plugin has a rule
    #[inline]
    #[must_use]
    pub fn contains(&self, category: PluginCategory, name: &str) -> bool {
        self.lookup(category, name).is_some()
    }

    /// All plugins with a rule, sorted
    #[must_use]
    pub fn plugins(&self) -> Vec<PluginId> {
        plugin_ids(&self.rules)
    }

    /// Get number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationRegistry")
            .field("rule_count", &self.len())
            .field("plugins", &self.plugins())
            .finish()
    }
}

fn plugin_ids(rules: &RuleTable) -> Vec<PluginId> {
    let mut ids: Vec<PluginId> = rules
        .iter()
        .flat_map(|(category, plugins)| plugins.keys().map(|name| PluginId::new(*category, name.as_str())))
        .collect();
    ids.sort();
    ids
}
