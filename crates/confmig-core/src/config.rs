//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::plugin::PluginCategory;

/// Migration engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationConfig {
    /// Category blocks to walk, in order
    pub categories: Vec<PluginCategory>,
    /// Return the input bytes verbatim when a pass changes nothing
    pub keep_unchanged_input: bool,
}

impl MigrationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With categories to walk
    #[inline]
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = PluginCategory>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// With no-op output behavior
    #[inline]
    #[must_use]
    pub fn with_keep_unchanged_input(mut self, keep: bool) -> Self {
        self.keep_unchanged_input = keep;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns error on malformed TOML or unknown keys
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            categories: PluginCategory::ALL.to_vec(),
            keep_unchanged_input: true,
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Engine configuration could not be read
    #[error("invalid engine configuration: {0}")]
    Invalid(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_walks_all_categories() {
        let config = MigrationConfig::new();
        assert_eq!(config.categories, PluginCategory::ALL.to_vec());
        assert!(config.keep_unchanged_input);
    }

    #[test]
    fn builder_methods() {
        let config = MigrationConfig::new()
            .with_categories([PluginCategory::Outputs])
            .with_keep_unchanged_input(false);
        assert_eq!(config.categories, vec![PluginCategory::Outputs]);
        assert!(!config.keep_unchanged_input);
    }

    #[test]
    fn from_toml_partial() {
        let config = MigrationConfig::from_toml_str("categories = [\"outputs\", \"inputs\"]").unwrap();
        assert_eq!(
            config.categories,
            vec![PluginCategory::Outputs, PluginCategory::Inputs]
        );
        assert!(config.keep_unchanged_input);
    }

    #[test]
    fn from_toml_rejects_unknown_keys() {
        let err = MigrationConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(err.to_string().starts_with("invalid engine configuration"));
    }

    #[test]
    fn from_toml_rejects_unknown_category() {
        assert!(MigrationConfig::from_toml_str("categories = [\"agent\"]").is_err());
    }
}
