//! Raw change events coming from input elements.

use crate::value::FileList;

/// The payload of an input's change event.
///
/// Mirrors what an input element exposes at the time of the change: its
/// text value, its checked flag, and the files picked (file inputs only).
/// Handlers read the part that matters for their category.
///
/// # Examples
///
/// ```rust
/// use fieldkit::ChangeEvent;
///
/// let typed = ChangeEvent::input("hello");
/// assert_eq!(typed.value, "hello");
///
/// let ticked = ChangeEvent::checkbox(true);
/// assert!(ticked.checked);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeEvent {
    pub value: String,
    pub checked: bool,
    pub files: Option<FileList>,
}

impl ChangeEvent {
    /// A text-like input changed to `value`.
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// A checkbox was (un)ticked.
    pub fn checkbox(checked: bool) -> Self {
        Self {
            checked,
            ..Self::default()
        }
    }

    /// A radio button carrying `value` was picked.
    pub fn radio(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: true,
            files: None,
        }
    }

    /// A file input's selection changed.
    pub fn files(files: Option<FileList>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }
}
