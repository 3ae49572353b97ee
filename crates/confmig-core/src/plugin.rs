//! Plugin identifiers
//!
//! A plugin instance is addressed by its category block (`inputs`, `outputs`, ...)
//! and the plugin name below it, e.g. `[[outputs.kinesis]]` → `outputs.kinesis`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Category block a plugin instance lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginCategory {
    /// `[[inputs.*]]`
    Inputs,

    /// `[[outputs.*]]`
    Outputs,

    /// `[[processors.*]]`
    Processors,

    /// `[[aggregators.*]]`
    Aggregators,

    /// `[[secretstores.*]]`
    SecretStores,
}

impl PluginCategory {
    /// All recognized categories in walk order
    pub const ALL: [Self; 5] = [
        Self::Inputs,
        Self::Outputs,
        Self::Processors,
        Self::Aggregators,
        Self::SecretStores,
    ];

    /// Table key of the category block
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
            Self::Outputs => "outputs",
            Self::Processors => "processors",
            Self::Aggregators => "aggregators",
            Self::SecretStores => "secretstores",
        }
    }
}

impl Display for PluginCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plugin category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for PluginCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Identifier of a plugin type within a category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginId {
    category: PluginCategory,
    name: String,
}

impl PluginId {
    /// Create new identifier
    #[inline]
    #[must_use]
    pub fn new(category: PluginCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    /// Category block
    #[inline]
    #[must_use]
    pub fn category(&self) -> PluginCategory {
        self.category
    }

    /// Plugin name within the category
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for PluginId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

impl FromStr for PluginId {
    type Err = UnknownCategory;

    /// Parse `category.name`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, name) = s.split_once('.').unwrap_or((s, ""));
        Ok(Self::new(category.parse()?, name))
    }
}
