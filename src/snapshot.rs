//! Sibling values for cross-field rules.
//!
//! A [`FormSnapshot`] is a read-only copy of (some of) the form record,
//! handed to rules that need to look at other fields, such as "required
//! when the `company` checkbox is ticked". Rules never see the form-state
//! manager itself.

use crate::error::FormError;
use crate::field::FieldName;
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only field values passed to rules.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{FieldValue, FormSnapshot};
///
/// let mut form = FormSnapshot::new();
/// form.set("has_company", true);
/// form.set("company", "");
///
/// assert_eq!(form.get("has_company"), Some(&FieldValue::Boolean(true)));
/// assert!(form.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    values: HashMap<FieldName, FieldValue>,
}

impl FormSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a JSON object of scalar values.
    ///
    /// `null` members are skipped (they read as absent). Arrays and nested
    /// objects are rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fieldkit::FormSnapshot;
    ///
    /// let form = FormSnapshot::from_json(&serde_json::json!({
    ///     "email": "a@b.co",
    ///     "age": 30,
    ///     "newsletter": false,
    ///     "nickname": null,
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(form.len(), 3);
    /// assert!(!form.contains_key("nickname"));
    /// ```
    pub fn from_json(data: &serde_json::Value) -> Result<Self, FormError> {
        let object = data.as_object().ok_or_else(|| {
            FormError::InvalidSnapshot(format!("expected a JSON object, got {data}"))
        })?;

        let mut snapshot = Self::new();
        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            let field_value = FieldValue::from_json(value).ok_or_else(|| {
                FormError::InvalidSnapshot(format!("field {key} is not a scalar: {value}"))
            })?;
            snapshot.values.insert(FieldName::from(key.as_str()), field_value);
        }
        Ok(snapshot)
    }

    /// Set a value.
    pub fn set(&mut self, name: impl Into<FieldName>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a value.
    pub fn get(&self, name: impl Into<FieldName>) -> Option<&FieldValue> {
        self.values.get(&name.into())
    }

    /// Check if a field has a value in this snapshot.
    pub fn contains_key(&self, name: impl Into<FieldName>) -> bool {
        self.values.contains_key(&name.into())
    }

    /// Number of fields with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(FieldName, FieldValue)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (FieldName, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_set_get() {
        let mut form = FormSnapshot::new();
        form.set("age", 30.0);
        assert_eq!(form.get("age"), Some(&FieldValue::Number(Some(30.0))));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = FormSnapshot::from_json(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, FormError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = FormSnapshot::from_json(&serde_json::json!({ "tags": ["a"] })).unwrap_err();
        assert!(err.to_string().contains("tags"));
    }
}
