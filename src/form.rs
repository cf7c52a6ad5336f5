//! The form-state manager contract.
//!
//! This crate never stores form data. It talks to an external manager
//! through [`FormState`], or, when no manager object is at hand, through
//! the two capabilities handlers actually need: [`SetValue`] (write a
//! normalized value) and [`Trigger`] (ask for a field to be re-validated).

use crate::field::{FieldName, FormSchema};
use crate::value::FieldValue;
use futures_util::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;

/// Pending validation of one field. Resolves to `true` when the field is
/// valid.
pub type ValidationFuture = BoxFuture<'static, bool>;

/// Options for a write into the form record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetValueOptions {
    /// Mark the field as modified by the user.
    pub should_dirty: bool,
}

impl SetValueOptions {
    /// Options for a write caused by user input.
    pub fn dirty() -> Self {
        Self { should_dirty: true }
    }
}

/// An external form-state manager.
///
/// Implementations own the record, dirty tracking and the error map.
/// `trigger` must read the field's value when the returned future runs,
/// not when it is created, so a delayed validation always checks current
/// data.
pub trait FormState: Send + Sync {
    /// Write a value into the record.
    fn set_value(&self, name: &FieldName, value: FieldValue, options: SetValueOptions);

    /// Re-run the field's validation rules and update its error.
    fn trigger(&self, name: &FieldName) -> ValidationFuture;

    /// Current value of a field.
    fn value(&self, name: &FieldName) -> Option<FieldValue>;

    /// Current validation message of a field.
    fn error(&self, name: &FieldName) -> Option<String>;

    /// Fields of the governed record.
    fn schema(&self) -> &FormSchema;
}

type SetValueFn = dyn Fn(&FieldName, FieldValue, SetValueOptions) + Send + Sync;
type TriggerFn = dyn Fn(&FieldName) -> ValidationFuture + Send + Sync;

/// Write capability handed to handler factories.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{FieldName, FieldValue, SetValue, SetValueOptions};
/// use std::sync::{Arc, Mutex};
///
/// let written = Arc::new(Mutex::new(Vec::new()));
/// let sink = written.clone();
/// let set_value = SetValue::new(move |name: &FieldName, value: FieldValue, _opts: SetValueOptions| {
///     sink.lock().unwrap().push((name.clone(), value));
/// });
///
/// set_value.call(&"email".into(), "a@b.vn".into(), SetValueOptions::dirty());
/// assert_eq!(written.lock().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct SetValue(Arc<SetValueFn>);

impl SetValue {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FieldName, FieldValue, SetValueOptions) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Write through a form-state manager.
    pub fn from_form(form: &Arc<dyn FormState>) -> Self {
        let form = Arc::clone(form);
        Self::new(move |name, value, options| form.set_value(name, value, options))
    }

    /// Write `value` into `name`.
    pub fn call(&self, name: &FieldName, value: FieldValue, options: SetValueOptions) {
        (self.0)(name, value, options)
    }
}

impl fmt::Debug for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SetValue(<fn>)")
    }
}

/// Validation-request capability handed to handler factories.
#[derive(Clone)]
pub struct Trigger(Arc<TriggerFn>);

impl Trigger {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FieldName) -> ValidationFuture + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Trigger through a form-state manager.
    pub fn from_form(form: &Arc<dyn FormState>) -> Self {
        let form = Arc::clone(form);
        Self::new(move |name| form.trigger(name))
    }

    /// Start validating `name` and hand back the pending result.
    pub fn request(&self, name: &FieldName) -> ValidationFuture {
        (self.0)(name)
    }

    /// Start validating `name` without waiting for the result.
    ///
    /// Inside a tokio runtime the validation is spawned as a detached task.
    /// Outside one it is polled once; a validation that cannot finish
    /// synchronously is dropped with a warning.
    pub fn fire(&self, name: &FieldName) {
        let validation = self.request(name);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let field = name.clone();
                runtime.spawn(async move {
                    let valid = validation.await;
                    tracing::trace!(field = %field, valid, "validation finished");
                });
            }
            Err(_) => match validation.now_or_never() {
                Some(valid) => tracing::trace!(field = %name, valid, "validation finished"),
                None => tracing::warn!(
                    field = %name,
                    "validation needs an async runtime to complete; request dropped"
                ),
            },
        }
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Trigger(<fn>)")
    }
}
