//! # fieldkit - Form-Field Orchestration
//!
//! The glue between input widgets and a form-state manager:
//! - **Normalizing** change handlers per field category (text, number,
//!   phone, email, currency, checkbox, select, radio, file)
//! - **Formatting** helpers for display (phone grouping, currency, numbers,
//!   dates)
//! - **Validation rules** with overridable messages
//! - **Debounced** validation triggers
//!
//! The form record itself lives in an external manager reached through the
//! [`FormState`] trait. This crate stores nothing but a debounce timer.
//!
//! ## Core Concepts
//!
//! ### Change Pipeline
//!
//! Every UI change flows through the same steps:
//!
//! ```text
//! [ChangeEvent] → normalize → set_value (dirty) → trigger → callback
//! ```
//!
//! 1. **Normalize** the raw input for the field's category; input that
//!    cannot be normalized (e.g. `"12a"` in a number field) is dropped
//! 2. **Write** the normalized value into the manager, marked dirty
//! 3. **Trigger** validation of the field, without waiting for it
//! 4. **Callback**, if one was supplied, sees the normalized value
//!
//! ### Values
//!
//! Stored values are a [`FieldValue`], tagged by [`FieldKind`]. A
//! [`FormSchema`] declares the kind of every field; binding a handler to a
//! field of another kind fails up front.
//!
//! ## Example
//!
//! ```rust
//! use fieldkit::*;
//! use fieldkit::handler::{HandlerFactory, Number};
//! use std::sync::{Arc, Mutex};
//!
//! let stored = Arc::new(Mutex::new(None));
//! let sink = stored.clone();
//! let set_value = SetValue::new(move |_: &FieldName, value: FieldValue, _: SetValueOptions| {
//!     *sink.lock().unwrap() = Some(value);
//! });
//!
//! let numbers = HandlerFactory::<Number>::new(set_value, None);
//! let on_age = numbers.field("age");
//!
//! on_age.handle(&ChangeEvent::input("42")).unwrap();
//! on_age.handle(&ChangeEvent::input("42x")).unwrap(); // rejected, value kept
//! assert_eq!(*stored.lock().unwrap(), Some(FieldValue::from(42.0)));
//!
//! assert_eq!(format::format_phone_number("0912345678"), "091 234 567 8");
//! assert_eq!(validate::required().check(Some(&FieldValue::from(""))),
//!            Err("Trường này là bắt buộc".to_string()));
//! ```
//!
//! ## Modules
//!
//! - [`field`] - Field names, kinds and schemas
//! - [`value`] - Stored field values
//! - [`snapshot`] - Form values handed to cross-field rules
//! - [`numeric`] - Number coercion of input text
//! - [`format`] - Display formatters
//! - [`validate`] - Validation rules
//! - [`form`] - The form-state manager contract
//! - [`event`] - Raw change events
//! - [`handler`] - Change-handler factories
//! - [`debounce`] - Debounced validation triggers
//! - [`focus`] - Blur/focus hooks
//! - [`binding`] - Handlers bound to one manager
//! - [`error`] - Error types

pub mod binding;
pub mod debounce;
pub mod error;
pub mod event;
pub mod field;
pub mod focus;
pub mod form;
pub mod format;
pub mod handler;
pub mod numeric;
pub mod snapshot;
pub mod validate;
pub mod value;

// Re-export main types for convenience
pub use error::{CallbackError, FormError};
pub use event::ChangeEvent;
pub use field::{FieldKind, FieldName, FormSchema};
pub use snapshot::FormSnapshot;
pub use value::{ChoiceValue, FieldValue, FileList, FileRef};

// Re-export the manager contract
pub use form::{FormState, SetValue, SetValueOptions, Trigger, ValidationFuture};

// Re-export handlers and bindings
pub use binding::{BindingCache, FieldBinding, FieldOptions, FormHandlers};
pub use debounce::{DebouncedTrigger, DEFAULT_DEBOUNCE};
pub use focus::FocusHandlers;
pub use handler::{CallbackResult, FieldCategory, FieldHandler, HandlerFactory};

// Re-export rules and formatting config
pub use format::{NumberLocale, SymbolPosition};
pub use validate::{Rule, ValidationResult};
