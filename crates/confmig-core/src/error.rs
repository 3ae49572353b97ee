//! Error types for the migration engine
//!
//! Provides error handling for:
//! - Parse operations (bytes → document)
//! - Rule application (conflicts, unexpected value types)
//! - Registry construction (duplicate registrations)

use crate::conflict::Conflict;
use crate::plugin::PluginId;

/// Errors while turning raw bytes into a document
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Input is not UTF-8 text
    #[error("configuration is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Input is not a well-formed document
    #[error("syntax error: {0}")]
    Syntax(#[from] toml_edit::TomlError),
}

/// Errors raised by a single migration rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// Legacy and new-style settings contradict each other
    #[error(transparent)]
    Conflict(#[from] Conflict),

    /// Field holds a value of the wrong type
    #[error("invalid type for '{field}': expected {expected}, found {found}")]
    InvalidType {
        /// Field identifier as written in the plugin table
        field: String,
        /// Expected TOML type
        expected: &'static str,
        /// Actual TOML type
        found: &'static str,
    },
}

impl RuleError {
    /// Create invalid type error for field
    #[inline]
    pub fn invalid_type(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
            found,
        }
    }

    /// Get conflict details, if this is a conflict
    #[inline]
    #[must_use]
    pub fn as_conflict(&self) -> Option<&Conflict> {
        match self {
            Self::Conflict(conflict) => Some(conflict),
            Self::InvalidType { .. } => None,
        }
    }
}

/// Errors of a whole migration pass
///
/// A pass that fails produces no output at all.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Input could not be parsed
    #[error("parsing configuration failed: {0}")]
    Parse(#[from] ParseError),

    /// A rule failed on one plugin instance
    #[error("migrating plugin '{plugin}' (instance {index}) failed: {source}")]
    Rule {
        /// Plugin the rule was registered for
        plugin: PluginId,
        /// Position among instances of the same plugin
        index: usize,
        /// Underlying rule failure
        #[source]
        source: RuleError,
    },
}

impl MigrationError {
    /// Check if the pass failed because of contradicting settings
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.conflict().is_some()
    }

    /// Get conflict details, if any
    #[inline]
    #[must_use]
    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            Self::Rule { source, .. } => source.as_conflict(),
            Self::Parse(_) => None,
        }
    }
}

/// Errors while building the registry
///
/// These are programming errors; callers abort startup on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The same plugin key was registered twice
    #[error("migration for plugin '{0}' is already registered")]
    Duplicate(PluginId),
}
