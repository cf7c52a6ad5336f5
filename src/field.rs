//! Field identifiers and schema.
//!
//! Provides [`FieldName`], an interned string identifier for one slot in a
//! form-data record, [`FieldKind`], the type of value a slot holds, and
//! [`FormSchema`], which maps names to kinds so handlers can be checked
//! against the record they write into.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Interned string identifier for form fields.
///
/// Uses `Arc<str>` so handlers, schedulers and callbacks can share one
/// allocation per field name.
///
/// # Examples
///
/// ```rust
/// use fieldkit::FieldName;
///
/// let email = FieldName::from_str("email");
/// let email2: FieldName = "email".into();
/// let email3: FieldName = String::from("email").into();
///
/// assert_eq!(email, email2);
/// assert_eq!(email, email3);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldName(Arc<str>);

impl Serialize for FieldName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(FieldName::from(s))
    }
}

impl FieldName {
    /// Create a new `FieldName` from a string slice.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `FieldName`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for FieldName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&FieldName> for FieldName {
    fn from(name: &FieldName) -> Self {
        name.clone()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of value a field stores.
///
/// Each [`FieldValue`](crate::FieldValue) variant belongs to exactly one
/// kind, and each handler category writes exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text, e-mail addresses, formatted phone numbers.
    Text,
    /// A number, or the empty input.
    Number,
    /// A checked flag.
    Boolean,
    /// A value picked from a fixed set (select, radio).
    Choice,
    /// A picked file list, or none.
    Files,
}

impl FieldKind {
    /// Lower-case name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Choice => "choice",
            FieldKind::Files => "files",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares the fields of a form-data record and the kind of each.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{FieldKind, FormSchema};
///
/// let schema = FormSchema::new()
///     .with_field("email", FieldKind::Text)
///     .with_field("age", FieldKind::Number);
///
/// assert_eq!(schema.kind_of(&"age".into()), Some(FieldKind::Number));
/// assert_eq!(schema.kind_of(&"missing".into()), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    fields: HashMap<FieldName, FieldKind>,
}

impl FormSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_field(mut self, name: impl Into<FieldName>, kind: FieldKind) -> Self {
        self.insert(name, kind);
        self
    }

    /// Declare a field. Redeclaring a name replaces its kind.
    pub fn insert(&mut self, name: impl Into<FieldName>, kind: FieldKind) {
        self.fields.insert(name.into(), kind);
    }

    /// Kind of a declared field.
    pub fn kind_of(&self, name: &FieldName) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Check that `name` is declared with `kind`.
    pub fn expect_kind(&self, name: &FieldName, kind: FieldKind) -> Result<(), crate::FormError> {
        match self.kind_of(name) {
            None => Err(crate::FormError::UnknownField(name.clone())),
            Some(expected) if expected != kind => Err(crate::FormError::KindMismatch {
                field: name.clone(),
                expected,
                found: kind,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Iterate over declared fields in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name, *kind))
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormError;

    #[test]
    fn test_field_name_creation() {
        let a = FieldName::from_str("phone");
        let b = FieldName::from_str("phone");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "phone");
    }

    #[test]
    fn test_field_name_serde_is_plain_string() {
        let name = FieldName::from_str("salary");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"salary\"");
        let back: FieldName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn test_expect_kind() {
        let schema = FormSchema::new().with_field("age", FieldKind::Number);

        assert!(schema.expect_kind(&"age".into(), FieldKind::Number).is_ok());
        assert!(matches!(
            schema.expect_kind(&"age".into(), FieldKind::Text),
            Err(FormError::KindMismatch {
                expected: FieldKind::Number,
                found: FieldKind::Text,
                ..
            })
        ));
        assert!(matches!(
            schema.expect_kind(&"name".into(), FieldKind::Text),
            Err(FormError::UnknownField(_))
        ));
    }
}
