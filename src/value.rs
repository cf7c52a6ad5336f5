//! Field values.
//!
//! [`FieldValue`] is the normalized payload a handler writes into the form
//! record. It is a tagged union keyed by [`FieldKind`], so a number field
//! can never silently receive a boolean.

use crate::field::FieldKind;
use crate::numeric::coerce_number;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A file picked in a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File name as reported by the picker, without any path.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, empty when unknown.
    pub mime: String,
}

impl FileRef {
    /// Describe one picked file.
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }
}

/// Shared reference to the files selected in one file input.
///
/// Cloning is cheap and keeps pointing at the same list; handlers store
/// the reference they receive rather than copying files.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{FileList, FileRef};
///
/// let files = FileList::new(vec![FileRef::new("avatar.png", 2048, "image/png")]);
/// let stored = files.clone();
///
/// assert!(stored.ptr_eq(&files));
/// assert_eq!(stored.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileList(Arc<[FileRef]>);

impl FileList {
    /// Wrap the picked files.
    pub fn new(files: Vec<FileRef>) -> Self {
        Self(Arc::from(files))
    }

    /// Whether both lists are the same reference.
    pub fn ptr_eq(&self, other: &FileList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no file was picked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the files.
    pub fn iter(&self) -> impl Iterator<Item = &FileRef> {
        self.0.iter()
    }
}

impl Serialize for FileList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FileList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(FileList::new(Vec::deserialize(deserializer)?))
    }
}

/// Value picked in a select or radio group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for ChoiceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceValue::Text(s) => f.write_str(s),
            ChoiceValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ChoiceValue {
    fn from(s: &str) -> Self {
        ChoiceValue::Text(s.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(s: String) -> Self {
        ChoiceValue::Text(s)
    }
}

impl From<f64> for ChoiceValue {
    fn from(n: f64) -> Self {
        ChoiceValue::Number(n)
    }
}

impl From<i64> for ChoiceValue {
    fn from(n: i64) -> Self {
        ChoiceValue::Number(n as f64)
    }
}

/// A normalized value stored in one field of the form record.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{FieldKind, FieldValue};
///
/// let age = FieldValue::from(42.0);
/// assert_eq!(age.kind(), FieldKind::Number);
/// assert_eq!(age.to_number(), Some(42.0));
///
/// let empty = FieldValue::Number(None);
/// assert!(empty.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    /// `None` is the cleared input.
    Number(Option<f64>),
    Boolean(bool),
    Choice(ChoiceValue),
    /// `None` is "no file list" (nothing was ever picked).
    Files(Option<FileList>),
}

impl FieldValue {
    /// The kind of field this value belongs in.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Choice(_) => FieldKind::Choice,
            FieldValue::Files(_) => FieldKind::Files,
        }
    }

    /// Whether this is an "empty" value: empty text, cleared number, empty
    /// choice text, no file list, or an empty file list.
    ///
    /// `false` and `0` are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Boolean(_) => false,
            FieldValue::Choice(ChoiceValue::Text(s)) => s.is_empty(),
            FieldValue::Choice(ChoiceValue::Number(_)) => false,
            FieldValue::Files(files) => files.as_ref().map_or(true, FileList::is_empty),
        }
    }

    /// Text view of the value, for text-oriented rules.
    ///
    /// Only text and choice values have one.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Choice(choice) => Some(choice.to_string()),
            _ => None,
        }
    }

    /// Length used by length rules: characters for text and choices, file
    /// count for file lists.
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldValue::Files(Some(files)) => Some(files.len()),
            other => other.as_text().map(|s| s.chars().count()),
        }
    }

    /// Coerce the value to a finite-or-infinite number. NaN and
    /// non-numeric values give `None`.
    ///
    /// Text coerces like a host `Number(text)` call, a cleared number
    /// input counts as `0`, and booleans count as `1`/`0`.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Text(s) => coerce_number(s)?,
            FieldValue::Number(n) => n.unwrap_or(0.0),
            FieldValue::Boolean(b) => f64::from(u8::from(*b)),
            FieldValue::Choice(ChoiceValue::Text(s)) => coerce_number(s)?,
            FieldValue::Choice(ChoiceValue::Number(n)) => *n,
            FieldValue::Files(None) => 0.0,
            FieldValue::Files(Some(_)) => return None,
        };
        (!n.is_nan()).then_some(n)
    }

    /// Build a value from a JSON scalar. Arrays, objects and `null` have no
    /// field value.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(|n| FieldValue::Number(Some(n))),
            serde_json::Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(Some(n))
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(n: Option<f64>) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<ChoiceValue> for FieldValue {
    fn from(choice: ChoiceValue) -> Self {
        FieldValue::Choice(choice)
    }
}

impl From<Option<FileList>> for FieldValue {
    fn from(files: Option<FileList>) -> Self {
        FieldValue::Files(files)
    }
}

impl From<FileList> for FieldValue {
    fn from(files: FileList) -> Self {
        FieldValue::Files(Some(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::Number(None).is_empty());
        assert!(FieldValue::Files(None).is_empty());
        assert!(FieldValue::from(FileList::new(Vec::new())).is_empty());
        assert!(!FieldValue::from(false).is_empty());
        assert!(!FieldValue::from(0.0).is_empty());
        assert!(!FieldValue::Choice(ChoiceValue::Number(0.0)).is_empty());
    }

    #[test]
    fn test_to_number_coercion() {
        assert_eq!(FieldValue::from("12").to_number(), Some(12.0));
        assert_eq!(FieldValue::from("").to_number(), Some(0.0));
        assert_eq!(FieldValue::from("12a").to_number(), None);
        assert_eq!(FieldValue::from(true).to_number(), Some(1.0));
        assert_eq!(FieldValue::from(f64::NAN).to_number(), None);
        assert_eq!(FieldValue::from(FileList::new(Vec::new())).to_number(), None);
    }

    #[test]
    fn test_length() {
        assert_eq!(FieldValue::from("héllo").length(), Some(5));
        assert_eq!(
            FieldValue::from(FileList::new(vec![FileRef::new("a.txt", 1, "text/plain")])).length(),
            Some(1)
        );
        assert_eq!(FieldValue::from(3.0).length(), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(FieldValue::from(1.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "number", "value": 1.5 }));

        let back: FieldValue =
            serde_json::from_value(serde_json::json!({ "kind": "choice", "value": "vn" })).unwrap();
        assert_eq!(back, FieldValue::Choice(ChoiceValue::from("vn")));
    }
}
