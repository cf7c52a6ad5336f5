//! Change-handler factories.
//!
//! A handler turns one UI change into one write into the form record:
//!
//! ```text
//! input ─▶ normalize ─▶ set_value (dirty) ─▶ trigger? ─▶ callback?
//!              │
//!              └─ rejected: nothing happens, the stored value is kept
//! ```
//!
//! What "normalize" means depends on the field category (text, number,
//! phone, ...), which is a type implementing [`FieldCategory`]. A
//! [`HandlerFactory`] holds the write/trigger capabilities and an optional
//! callback and produces one [`FieldHandler`] per field name.

use crate::error::{CallbackError, FormError};
use crate::event::ChangeEvent;
use crate::field::{FieldKind, FieldName, FormSchema};
use crate::form::{SetValue, SetValueOptions, Trigger};
use crate::format::format_phone_number;
use crate::numeric::{coerce_number, is_numeric_input, parse_float_prefix};
use crate::value::{ChoiceValue, FieldValue, FileList};
use std::fmt;
use std::sync::Arc;

/// What a change callback returns. An `Err` is handed back to whoever
/// dispatched the event.
pub type CallbackResult = Result<(), CallbackError>;

type Callback<C> = Arc<
    dyn Fn(&FieldName, &<C as FieldCategory>::Value, &<C as FieldCategory>::Input) -> CallbackResult
        + Send
        + Sync,
>;

/// A kind of input field and how its raw input is normalized.
pub trait FieldCategory: Send + Sync + 'static {
    /// What the UI hands over on change.
    type Input;

    /// The normalized value, as passed to callbacks.
    type Value: Clone + Send + Sync;

    /// Kind of the field this category writes into.
    const KIND: FieldKind;

    /// Category name used in logs.
    const NAME: &'static str;

    /// Normalize raw input. `None` rejects the input: nothing is written.
    fn normalize(input: &Self::Input) -> Option<Self::Value>;

    /// Wrap a normalized value for storage.
    fn into_field_value(value: Self::Value) -> FieldValue;
}

/// Free text, written as typed.
#[derive(Debug, Clone, Copy)]
pub struct Text;

impl FieldCategory for Text {
    type Input = ChangeEvent;
    type Value = String;
    const KIND: FieldKind = FieldKind::Text;
    const NAME: &'static str = "text";

    fn normalize(input: &ChangeEvent) -> Option<String> {
        Some(input.value.clone())
    }

    fn into_field_value(value: String) -> FieldValue {
        FieldValue::Text(value)
    }
}

/// Numbers. Empty input clears the field; anything that is not a number
/// is rejected and the stored value is kept.
#[derive(Debug, Clone, Copy)]
pub struct Number;

impl FieldCategory for Number {
    type Input = ChangeEvent;
    type Value = Option<f64>;
    const KIND: FieldKind = FieldKind::Number;
    const NAME: &'static str = "number";

    fn normalize(input: &ChangeEvent) -> Option<Option<f64>> {
        let text = input.value.as_str();
        if text.is_empty() {
            return Some(None);
        }
        if !is_numeric_input(text) {
            return None;
        }
        coerce_number(text).map(Some)
    }

    fn into_field_value(value: Option<f64>) -> FieldValue {
        FieldValue::Number(value)
    }
}

/// Phone numbers, regrouped as `XXX XXX XXX XXX` on every keystroke.
#[derive(Debug, Clone, Copy)]
pub struct Phone;

impl FieldCategory for Phone {
    type Input = ChangeEvent;
    type Value = String;
    const KIND: FieldKind = FieldKind::Text;
    const NAME: &'static str = "phone";

    fn normalize(input: &ChangeEvent) -> Option<String> {
        Some(format_phone_number(&input.value))
    }

    fn into_field_value(value: String) -> FieldValue {
        FieldValue::Text(value)
    }
}

/// E-mail addresses, lower-cased and trimmed.
#[derive(Debug, Clone, Copy)]
pub struct Email;

impl FieldCategory for Email {
    type Input = ChangeEvent;
    type Value = String;
    const KIND: FieldKind = FieldKind::Text;
    const NAME: &'static str = "email";

    fn normalize(input: &ChangeEvent) -> Option<String> {
        Some(input.value.to_lowercase().trim().to_string())
    }

    fn into_field_value(value: String) -> FieldValue {
        FieldValue::Text(value)
    }
}

/// Money amounts typed as text. Everything but digits and `.` is dropped
/// before parsing; the stored value is a plain number.
#[derive(Debug, Clone, Copy)]
pub struct Currency;

impl FieldCategory for Currency {
    type Input = ChangeEvent;
    type Value = Option<f64>;
    const KIND: FieldKind = FieldKind::Number;
    const NAME: &'static str = "currency";

    fn normalize(input: &ChangeEvent) -> Option<Option<f64>> {
        let cleaned: String = input
            .value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if cleaned.is_empty() {
            return Some(None);
        }
        parse_float_prefix(&cleaned).map(Some)
    }

    fn into_field_value(value: Option<f64>) -> FieldValue {
        FieldValue::Number(value)
    }
}

/// Checkboxes; the checked flag is stored.
#[derive(Debug, Clone, Copy)]
pub struct Checkbox;

impl FieldCategory for Checkbox {
    type Input = ChangeEvent;
    type Value = bool;
    const KIND: FieldKind = FieldKind::Boolean;
    const NAME: &'static str = "checkbox";

    fn normalize(input: &ChangeEvent) -> Option<bool> {
        Some(input.checked)
    }

    fn into_field_value(value: bool) -> FieldValue {
        FieldValue::Boolean(value)
    }
}

/// Selects. The widget hands over the picked value directly.
#[derive(Debug, Clone, Copy)]
pub struct Select;

impl FieldCategory for Select {
    type Input = ChoiceValue;
    type Value = ChoiceValue;
    const KIND: FieldKind = FieldKind::Choice;
    const NAME: &'static str = "select";

    fn normalize(input: &ChoiceValue) -> Option<ChoiceValue> {
        Some(input.clone())
    }

    fn into_field_value(value: ChoiceValue) -> FieldValue {
        FieldValue::Choice(value)
    }
}

/// Radio groups; the value of the picked button is stored.
#[derive(Debug, Clone, Copy)]
pub struct Radio;

impl FieldCategory for Radio {
    type Input = ChangeEvent;
    type Value = String;
    const KIND: FieldKind = FieldKind::Choice;
    const NAME: &'static str = "radio";

    fn normalize(input: &ChangeEvent) -> Option<String> {
        Some(input.value.clone())
    }

    fn into_field_value(value: String) -> FieldValue {
        FieldValue::Choice(ChoiceValue::Text(value))
    }
}

/// File inputs; the picked file list is stored by reference.
#[derive(Debug, Clone, Copy)]
pub struct File;

impl FieldCategory for File {
    type Input = ChangeEvent;
    type Value = Option<FileList>;
    const KIND: FieldKind = FieldKind::Files;
    const NAME: &'static str = "file";

    fn normalize(input: &ChangeEvent) -> Option<Option<FileList>> {
        Some(input.files.clone())
    }

    fn into_field_value(value: Option<FileList>) -> FieldValue {
        FieldValue::Files(value)
    }
}

/// Produces change handlers of one category.
///
/// # Examples
///
/// ```rust
/// use fieldkit::handler::{Email, HandlerFactory};
/// use fieldkit::{ChangeEvent, FieldName, FieldValue, SetValue, SetValueOptions};
/// use std::sync::{Arc, Mutex};
///
/// let stored = Arc::new(Mutex::new(None));
/// let sink = stored.clone();
/// let set_value = SetValue::new(move |_: &FieldName, value: FieldValue, _: SetValueOptions| {
///     *sink.lock().unwrap() = Some(value);
/// });
///
/// let emails = HandlerFactory::<Email>::new(set_value, None);
/// let on_change = emails.field("email");
/// on_change.handle(&ChangeEvent::input("  USER@Example.COM ")).unwrap();
///
/// assert_eq!(*stored.lock().unwrap(), Some(FieldValue::from("user@example.com")));
/// ```
pub struct HandlerFactory<C: FieldCategory> {
    set_value: SetValue,
    trigger: Option<Trigger>,
    callback: Option<Callback<C>>,
}

impl<C: FieldCategory> HandlerFactory<C> {
    /// Create a factory writing through `set_value` and, when given,
    /// requesting validation through `trigger` after every write.
    pub fn new(set_value: SetValue, trigger: Option<Trigger>) -> Self {
        Self {
            set_value,
            trigger,
            callback: None,
        }
    }

    /// Run `callback` after every accepted change.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FieldName, &C::Value, &C::Input) -> CallbackResult + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Handler for `name`, without checking it against a schema.
    pub fn field(&self, name: impl Into<FieldName>) -> FieldHandler<C> {
        FieldHandler {
            name: name.into(),
            set_value: self.set_value.clone(),
            trigger: self.trigger.clone(),
            callback: self.callback.clone(),
        }
    }

    /// Handler for `name`, which must be declared in `schema` with this
    /// category's kind.
    pub fn bind(
        &self,
        name: impl Into<FieldName>,
        schema: &FormSchema,
    ) -> Result<FieldHandler<C>, FormError> {
        let name = name.into();
        schema.expect_kind(&name, C::KIND)?;
        Ok(self.field(name))
    }
}

impl<C: FieldCategory> Clone for HandlerFactory<C> {
    fn clone(&self) -> Self {
        Self {
            set_value: self.set_value.clone(),
            trigger: self.trigger.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<C: FieldCategory> fmt::Debug for HandlerFactory<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFactory")
            .field("category", &C::NAME)
            .field("trigger", &self.trigger.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Change handler for one field.
pub struct FieldHandler<C: FieldCategory> {
    name: FieldName,
    set_value: SetValue,
    trigger: Option<Trigger>,
    callback: Option<Callback<C>>,
}

impl<C: FieldCategory> FieldHandler<C> {
    /// Build a handler for one field directly, without a factory.
    pub fn new(set_value: SetValue, trigger: Option<Trigger>, name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            set_value,
            trigger,
            callback: None,
        }
    }

    /// Run `callback` after every accepted change.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FieldName, &C::Value, &C::Input) -> CallbackResult + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// The field this handler writes.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Handle one change.
    ///
    /// Rejected input is a silent no-op. Otherwise the normalized value is
    /// written (marked dirty), validation is requested, and the callback
    /// runs last, so a value the callback writes itself is the one that
    /// sticks. The callback runs once per call; its own writes never
    /// re-enter this handler.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Callback`] when the callback fails. The write
    /// and the validation request have happened by then.
    pub fn handle(&self, input: &C::Input) -> Result<(), FormError> {
        let Some(value) = C::normalize(input) else {
            tracing::trace!(field = %self.name, category = C::NAME, "input rejected");
            return Ok(());
        };

        self.set_value.call(
            &self.name,
            C::into_field_value(value.clone()),
            SetValueOptions::dirty(),
        );

        if let Some(trigger) = &self.trigger {
            trigger.fire(&self.name);
        }

        if let Some(callback) = &self.callback {
            callback(&self.name, &value, input).map_err(|source| {
                tracing::warn!(
                    field = %self.name,
                    category = C::NAME,
                    error = %source,
                    "change callback failed"
                );
                FormError::Callback {
                    field: self.name.clone(),
                    source,
                }
            })?;
        }

        Ok(())
    }
}

impl<C: FieldCategory> Clone for FieldHandler<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            set_value: self.set_value.clone(),
            trigger: self.trigger.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<C: FieldCategory> fmt::Debug for FieldHandler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandler")
            .field("name", &self.name)
            .field("category", &C::NAME)
            .field("trigger", &self.trigger.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
