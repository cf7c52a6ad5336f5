//! Error types for field binding and change handling.
//!
//! Rejected input and failed validation are not errors: the first is a
//! silent no-op and the second is a message produced by a [`Rule`].
//! `FormError` covers the remaining cases, which are wiring mistakes caught
//! when a handler is bound and failures raised by caller callbacks.
//!
//! [`Rule`]: crate::validate::Rule

use crate::field::{FieldKind, FieldName};
use thiserror::Error;

/// Boxed error returned by caller-supplied change callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while binding or running field handlers.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{FieldKind, FieldName, FormError};
///
/// let err = FormError::KindMismatch {
///     field: FieldName::from_str("age"),
///     expected: FieldKind::Number,
///     found: FieldKind::Text,
/// };
/// assert_eq!(err.to_string(), "Field age holds number values, not text");
/// ```
#[derive(Debug, Error)]
pub enum FormError {
    /// The field is not part of the form's schema.
    #[error("Unknown field: {0}")]
    UnknownField(FieldName),

    /// A handler or value was paired with a field of a different kind.
    ///
    /// `expected` is the kind declared by the schema, `found` is the kind
    /// the handler (or value) produces.
    #[error("Field {field} holds {expected} values, not {found}")]
    KindMismatch {
        field: FieldName,
        expected: FieldKind,
        found: FieldKind,
    },

    /// A change callback failed after the value was written.
    #[error("Change callback for field {field} failed: {source}")]
    Callback {
        field: FieldName,
        #[source]
        source: CallbackError,
    },

    /// Form data could not be turned into a snapshot.
    #[error("Invalid form snapshot: {0}")]
    InvalidSnapshot(String),
}
