//! Conflict detection between legacy and new-style settings
//!
//! Provides [`detect`] to classify a legacy/new pair for one semantic setting and
//! [`Conflict`] to report contradicting pairs.
//!
//! Equivalence is decided per setting by the caller. A boolean legacy flag may be
//! equivalent to one specific enum value of its replacement, so generic equality
//! is only a building block ([`values_equal`]), never the default.

use toml_edit::Value;

/// Outcome of comparing a legacy setting with its replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Only the legacy setting is present (migrate it)
    LegacyOnly,

    /// Only the new setting is present (nothing to do)
    NewOnly,

    /// Neither is present (nothing to do)
    BothAbsent,

    /// Both present and saying the same thing (drop the legacy setting)
    Equivalent,

    /// Both present and contradicting each other (fail)
    Contradictory,
}

impl Resolution {
    /// Check if the pair contradicts
    #[inline]
    #[must_use]
    pub fn is_conflict(self) -> bool {
        matches!(self, Self::Contradictory)
    }

    /// Check if the legacy setting has to be removed
    #[inline]
    #[must_use]
    pub fn removes_legacy(self) -> bool {
        matches!(self, Self::LegacyOnly | Self::Equivalent)
    }

    /// Turn a contradiction into an error, passing every other outcome through
    ///
    /// # Errors
    /// The conflict built by `conflict` if the pair is `Contradictory`
    #[inline]
    pub fn into_result<F>(self, conflict: F) -> Result<Self, Conflict>
    where
        F: FnOnce() -> Conflict,
    {
        match self {
            Self::Contradictory => Err(conflict()),
            resolution => Ok(resolution),
        }
    }
}

/// Classify a legacy/new pair
///
/// `equivalent` is only consulted when both settings are present.
pub fn detect<F>(legacy: Option<&Value>, new: Option<&Value>, equivalent: F) -> Resolution
where
    F: FnOnce(&Value, &Value) -> bool,
{
    match (legacy, new) {
        (None, None) => Resolution::BothAbsent,
        (None, Some(_)) => Resolution::NewOnly,
        (Some(_), None) => Resolution::LegacyOnly,
        (Some(legacy), Some(new)) => {
            if equivalent(legacy, new) {
                Resolution::Equivalent
            } else {
                Resolution::Contradictory
            }
        }
    }
}

/// Compare two values ignoring formatting, comments and quoting style
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.value() == b.value(),
        (Value::Integer(a), Value::Integer(b)) => a.value() == b.value(),
        (Value::Float(a), Value::Float(b)) => a.value().total_cmp(b.value()).is_eq(),
        (Value::Boolean(a), Value::Boolean(b)) => a.value() == b.value(),
        (Value::Datetime(a), Value::Datetime(b)) => a.value() == b.value(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| values_equal(a, b))
        }
        (Value::InlineTable(a), Value::InlineTable(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => false,
    }
}

/// A contradicting pair of settings
///
/// The display text names both identifiers verbatim; callers match on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("contradicting setting for '{legacy_field}' and '{new_field}'")]
pub struct Conflict {
    legacy_field: String,
    new_field: String,
    legacy_value: String,
    new_value: String,
}

impl Conflict {
    /// Create conflict from field identifiers and rendered values
    #[inline]
    pub fn new(
        legacy_field: impl Into<String>,
        new_field: impl Into<String>,
        legacy_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            legacy_field: legacy_field.into(),
            new_field: new_field.into(),
            legacy_value: legacy_value.into(),
            new_value: new_value.into(),
        }
    }

    /// Create conflict from the contending values as found in the document
    pub fn between(
        legacy_field: impl Into<String>,
        new_field: impl Into<String>,
        legacy: Option<&Value>,
        new: Option<&Value>,
    ) -> Self {
        Self::new(legacy_field, new_field, render(legacy), render(new))
    }

    /// Legacy field identifier
    #[inline]
    #[must_use]
    pub fn legacy_field(&self) -> &str {
        &self.legacy_field
    }

    /// New-style field identifier
    #[inline]
    #[must_use]
    pub fn new_field(&self) -> &str {
        &self.new_field
    }

    /// Legacy value as written
    #[inline]
    #[must_use]
    pub fn legacy_value(&self) -> &str {
        &self.legacy_value
    }

    /// New-style value as written
    #[inline]
    #[must_use]
    pub fn new_value(&self) -> &str {
        &self.new_value
    }
}

fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unset>".to_string(), |v| v.to_string().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Value {
        raw.parse().unwrap()
    }

    #[test]
    fn detect_both_absent() {
        assert_eq!(detect(None, None, values_equal), Resolution::BothAbsent);
    }

    #[test]
    fn detect_legacy_only() {
        let legacy = parse("\"a\"");
        let resolution = detect(Some(&legacy), None, values_equal);
        assert_eq!(resolution, Resolution::LegacyOnly);
        assert!(resolution.removes_legacy());
    }

    #[test]
    fn detect_new_only() {
        let new = parse("\"a\"");
        let resolution = detect(None, Some(&new), values_equal);
        assert_eq!(resolution, Resolution::NewOnly);
        assert!(!resolution.removes_legacy());
    }

    #[test]
    fn detect_equivalent_and_contradictory() {
        let a = parse("\"a\"");
        let b = parse("\"b\"");
        assert_eq!(detect(Some(&a), Some(&a), values_equal), Resolution::Equivalent);
        assert!(detect(Some(&a), Some(&b), values_equal).is_conflict());
    }

    #[test]
    fn into_result_only_fails_on_contradiction() {
        let a = parse("\"a\"");
        let b = parse("\"b\"");
        let conflict = || Conflict::new("old", "new", "\"a\"", "\"b\"");

        assert_eq!(
            detect(Some(&a), None, values_equal).into_result(conflict),
            Ok(Resolution::LegacyOnly)
        );
        let err = detect(Some(&a), Some(&b), values_equal)
            .into_result(conflict)
            .unwrap_err();
        assert_eq!(err.legacy_field(), "old");
    }

    #[test]
    fn detect_uses_setting_specific_mapping() {
        // boolean flag `true` corresponds to method "random"
        let flag = parse("true");
        let method = parse("\"random\"");
        let resolution = detect(Some(&flag), Some(&method), |flag, method| {
            flag.as_bool() == Some(method.as_str() == Some("random"))
        });
        assert_eq!(resolution, Resolution::Equivalent);
    }

    #[test]
    fn equivalence_not_consulted_without_both() {
        let legacy = parse("1");
        let resolution = detect(Some(&legacy), None, |_, _| panic!("not called"));
        assert_eq!(resolution, Resolution::LegacyOnly);
    }

    #[test]
    fn values_equal_ignores_formatting() {
        assert!(values_equal(&parse("\"a\""), &parse("'a'")));
        assert!(values_equal(&parse("[1,2]"), &parse("[ 1, 2, ]")));
        assert!(values_equal(&parse("{ a = 1, b = \"x\" }"), &parse("{b='x',a=1}")));
    }

    proptest::proptest! {
        #[test]
        fn values_equal_ignores_array_layout(n in proptest::prelude::any::<i64>(), s in "[a-zA-Z0-9 _.-]{0,12}") {
            let compact = parse(&format!("[{n},\"{s}\"]"));
            let spaced = parse(&format!("[ {n} , '{s}', ]"));
            proptest::prop_assert!(values_equal(&compact, &spaced));
            proptest::prop_assert!(detect(Some(&compact), Some(&spaced), values_equal).removes_legacy());
        }
    }

    #[test]
    fn values_equal_distinguishes_types() {
        assert!(!values_equal(&parse("1"), &parse("1.0")));
        assert!(!values_equal(&parse("\"1\""), &parse("1")));
        assert!(!values_equal(&parse("[\"a\"]"), &parse("\"a\"")));
        assert!(!values_equal(&parse("[1, 2]"), &parse("[2, 1]")));
    }

    #[test]
    fn conflict_message_names_both_fields() {
        let conflict = Conflict::between(
            "partitionkey",
            "partition.key",
            Some(&parse("\"test_key\"")),
            Some(&parse("\"test_key2\"")),
        );
        assert_eq!(
            conflict.to_string(),
            "contradicting setting for 'partitionkey' and 'partition.key'"
        );
        assert_eq!(conflict.legacy_value(), "\"test_key\"");
        assert_eq!(conflict.new_value(), "\"test_key2\"");
    }

    #[test]
    fn conflict_renders_missing_value() {
        let conflict = Conflict::between("a", "b", None, Some(&parse("1")));
        assert_eq!(conflict.legacy_value(), "<unset>");
        assert_eq!(conflict.new_field(), "b");
    }
}
