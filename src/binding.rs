//! Everything a form needs, bound to one form-state manager.
//!
//! [`FormHandlers`] hands out a handler factory for any category together
//! with the debounce and focus helpers, all writing into the same manager.
//! [`BindingCache`] keeps one bundle per manager so re-rendering code can
//! ask for it repeatedly and get the same handlers back. [`FieldBinding`]
//! binds a single field with per-field options.

use crate::debounce::{DebouncedTrigger, DEFAULT_DEBOUNCE};
use crate::error::FormError;
use crate::field::{FieldKind, FieldName};
use crate::focus::FocusHandlers;
use crate::form::{FormState, SetValue, SetValueOptions, Trigger};
use crate::handler::{
    Checkbox, Currency, Email, FieldCategory, FieldHandler, File, HandlerFactory, Number, Phone,
    Radio, Select, Text,
};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Per-field validation timing.
///
/// # Examples
///
/// ```rust
/// use fieldkit::FieldOptions;
///
/// let options: FieldOptions = serde_json::from_str(r#"{ "debounce_ms": 500 }"#).unwrap();
/// assert_eq!(options.debounce_ms, 500);
/// assert!(options.validate_on_change);
/// assert!(options.validate_on_blur);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Validate (debounced) after every change.
    pub validate_on_change: bool,

    /// Validate when the field loses focus.
    pub validate_on_blur: bool,

    /// Quiet period before a change is validated, in milliseconds.
    pub debounce_ms: u64,
}

impl FieldOptions {
    /// The debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            validate_on_change: true,
            validate_on_blur: true,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

/// Handler factories and helpers bound to one form-state manager.
///
/// Every handler produced here writes through the manager and requests
/// validation after each accepted change. Named shortcuts check the field
/// against the manager's schema.
///
/// # Examples
///
/// ```rust
/// use fieldkit::*;
/// use futures_util::future::{self, FutureExt};
/// use std::sync::{Arc, Mutex};
///
/// # struct Form {
/// #     schema: FormSchema,
/// #     email: Mutex<Option<FieldValue>>,
/// # }
/// # impl FormState for Form {
/// #     fn set_value(&self, _: &FieldName, value: FieldValue, _: SetValueOptions) {
/// #         *self.email.lock().unwrap() = Some(value);
/// #     }
/// #     fn trigger(&self, _: &FieldName) -> ValidationFuture {
/// #         future::ready(true).boxed()
/// #     }
/// #     fn value(&self, _: &FieldName) -> Option<FieldValue> {
/// #         self.email.lock().unwrap().clone()
/// #     }
/// #     fn error(&self, _: &FieldName) -> Option<String> {
/// #         None
/// #     }
/// #     fn schema(&self) -> &FormSchema {
/// #         &self.schema
/// #     }
/// # }
/// # fn main() -> Result<(), FormError> {
/// let form: Arc<dyn FormState> = Arc::new(Form {
///     schema: FormSchema::new().with_field("email", FieldKind::Text),
///     email: Mutex::new(None),
/// });
/// let handlers = FormHandlers::new(form.clone());
///
/// let on_email = handlers.email("email")?;
/// on_email.handle(&ChangeEvent::input(" Ada@Example.com "))?;
/// assert_eq!(form.value(&"email".into()), Some(FieldValue::from("ada@example.com")));
///
/// let focus = handlers.focus_handlers("email");
/// focus.on_blur();
///
/// assert!(handlers.number("email").is_err());
/// # Ok(())
/// # }
/// ```
pub struct FormHandlers {
    form: Arc<dyn FormState>,
    set_value: SetValue,
    trigger: Trigger,
}

impl FormHandlers {
    /// Bind handlers to `form`.
    pub fn new(form: Arc<dyn FormState>) -> Self {
        Self {
            set_value: SetValue::from_form(&form),
            trigger: Trigger::from_form(&form),
            form,
        }
    }

    /// The manager these handlers write into.
    pub fn form(&self) -> &Arc<dyn FormState> {
        &self.form
    }

    /// Write capability of the manager.
    pub fn set_value(&self) -> &SetValue {
        &self.set_value
    }

    /// Validation-request capability of the manager.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Factory for one category, writing into the manager.
    pub fn factory<C: FieldCategory>(&self) -> HandlerFactory<C> {
        HandlerFactory::new(self.set_value.clone(), Some(self.trigger.clone()))
    }

    /// Handler of any category for `name`, checked against the schema.
    pub fn handler<C: FieldCategory>(
        &self,
        name: impl Into<FieldName>,
    ) -> Result<FieldHandler<C>, FormError> {
        self.factory::<C>().bind(name, self.form.schema())
    }

    /// Text handler for `name`.
    pub fn text(&self, name: impl Into<FieldName>) -> Result<FieldHandler<Text>, FormError> {
        self.handler(name)
    }

    /// Number handler for `name`.
    pub fn number(&self, name: impl Into<FieldName>) -> Result<FieldHandler<Number>, FormError> {
        self.handler(name)
    }

    /// Phone handler for `name`.
    pub fn phone(&self, name: impl Into<FieldName>) -> Result<FieldHandler<Phone>, FormError> {
        self.handler(name)
    }

    /// E-mail handler for `name`.
    pub fn email(&self, name: impl Into<FieldName>) -> Result<FieldHandler<Email>, FormError> {
        self.handler(name)
    }

    /// Currency handler for `name`.
    pub fn currency(
        &self,
        name: impl Into<FieldName>,
    ) -> Result<FieldHandler<Currency>, FormError> {
        self.handler(name)
    }

    /// Checkbox handler for `name`.
    pub fn checkbox(
        &self,
        name: impl Into<FieldName>,
    ) -> Result<FieldHandler<Checkbox>, FormError> {
        self.handler(name)
    }

    /// Select handler for `name`.
    pub fn select(&self, name: impl Into<FieldName>) -> Result<FieldHandler<Select>, FormError> {
        self.handler(name)
    }

    /// Radio-group handler for `name`.
    pub fn radio(&self, name: impl Into<FieldName>) -> Result<FieldHandler<Radio>, FormError> {
        self.handler(name)
    }

    /// File-input handler for `name`.
    pub fn file(&self, name: impl Into<FieldName>) -> Result<FieldHandler<File>, FormError> {
        self.handler(name)
    }

    /// A debounced trigger for this manager; `None` uses
    /// [`DEFAULT_DEBOUNCE`].
    pub fn debounced_trigger(&self, delay: Option<Duration>) -> DebouncedTrigger {
        DebouncedTrigger::new(self.trigger.clone(), delay.unwrap_or(DEFAULT_DEBOUNCE))
    }

    /// Blur/focus hooks validating `name` on blur.
    pub fn focus_handlers(&self, name: impl Into<FieldName>) -> FocusHandlers {
        FocusHandlers::new(name, Some(self.trigger.clone()))
    }

    /// Bind one declared field with its own debounce timer.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownField`] if the schema does not declare `name`.
    pub fn field(
        &self,
        name: impl Into<FieldName>,
        options: FieldOptions,
    ) -> Result<FieldBinding, FormError> {
        FieldBinding::new(Arc::clone(&self.form), name, options)
    }
}

impl fmt::Debug for FormHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHandlers")
            .field("fields", &self.form.schema().len())
            .finish_non_exhaustive()
    }
}

fn same_form(a: &Arc<dyn FormState>, b: &Arc<dyn FormState>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Keeps the [`FormHandlers`] of the most recently bound manager.
///
/// Binding the same manager again returns the same handlers; binding a
/// different one rebuilds them.
///
/// # Examples
///
/// ```rust
/// use fieldkit::*;
/// use futures_util::future::{self, FutureExt};
/// use std::sync::Arc;
///
/// # struct Form(FormSchema);
/// # impl FormState for Form {
/// #     fn set_value(&self, _: &FieldName, _: FieldValue, _: SetValueOptions) {}
/// #     fn trigger(&self, _: &FieldName) -> ValidationFuture {
/// #         future::ready(true).boxed()
/// #     }
/// #     fn value(&self, _: &FieldName) -> Option<FieldValue> {
/// #         None
/// #     }
/// #     fn error(&self, _: &FieldName) -> Option<String> {
/// #         None
/// #     }
/// #     fn schema(&self) -> &FormSchema {
/// #         &self.0
/// #     }
/// # }
/// let form: Arc<dyn FormState> = Arc::new(Form(FormSchema::new()));
/// let other: Arc<dyn FormState> = Arc::new(Form(FormSchema::new()));
///
/// let cache = BindingCache::new();
/// let first = cache.bind(&form);
/// let again = cache.bind(&form);
/// assert!(Arc::ptr_eq(&first, &again));
///
/// let rebuilt = cache.bind(&other);
/// assert!(!Arc::ptr_eq(&first, &rebuilt));
/// ```
#[derive(Default)]
pub struct BindingCache {
    current: Mutex<Option<Arc<FormHandlers>>>,
}

impl BindingCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers for `form`, reused while the same manager is bound.
    pub fn bind(&self, form: &Arc<dyn FormState>) -> Arc<FormHandlers> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handlers) = current.as_ref() {
            if same_form(handlers.form(), form) {
                return Arc::clone(handlers);
            }
        }

        tracing::debug!(
            fields = form.schema().len(),
            "form manager changed; rebuilding handlers"
        );
        let handlers = Arc::new(FormHandlers::new(Arc::clone(form)));
        *current = Some(Arc::clone(&handlers));
        handlers
    }

    /// Forget the cached handlers.
    pub fn clear(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl fmt::Debug for BindingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        f.debug_struct("BindingCache").field("bound", &bound).finish()
    }
}

/// One field bound to a manager, with its own debounced validation.
///
/// Changes are written as-is (no category normalization) after a kind
/// check. Dropping the binding cancels a pending debounced validation.
pub struct FieldBinding {
    form: Arc<dyn FormState>,
    name: FieldName,
    kind: FieldKind,
    options: FieldOptions,
    trigger: Trigger,
    debounced: DebouncedTrigger,
}

impl FieldBinding {
    /// Bind `name` of `form` with `options`.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownField`] if the manager's schema does not declare
    /// `name`.
    pub fn new(
        form: Arc<dyn FormState>,
        name: impl Into<FieldName>,
        options: FieldOptions,
    ) -> Result<Self, FormError> {
        let name = name.into();
        let kind = form
            .schema()
            .kind_of(&name)
            .ok_or_else(|| FormError::UnknownField(name.clone()))?;
        let trigger = Trigger::from_form(&form);
        let debounced = DebouncedTrigger::new(trigger.clone(), options.debounce());

        Ok(Self {
            form,
            name,
            kind,
            options,
            trigger,
            debounced,
        })
    }

    /// The bound field.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Kind declared for the field by the schema.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Validation timing of this binding.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Current value, read from the manager.
    pub fn value(&self) -> Option<FieldValue> {
        self.form.value(&self.name)
    }

    /// Current validation message, read from the manager.
    pub fn error(&self) -> Option<String> {
        self.form.error(&self.name)
    }

    /// Write a new value and, if enabled, schedule validation.
    ///
    /// # Errors
    ///
    /// [`FormError::KindMismatch`] if `value` does not fit the field; nothing
    /// is written then.
    pub fn on_change(&self, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let value = value.into();
        if value.kind() != self.kind {
            return Err(FormError::KindMismatch {
                field: self.name.clone(),
                expected: self.kind,
                found: value.kind(),
            });
        }

        self.form
            .set_value(&self.name, value, SetValueOptions::dirty());
        if self.options.validate_on_change {
            self.debounced.schedule(&self.name);
        }
        Ok(())
    }

    /// Validate right away, if enabled.
    pub fn on_blur(&self) {
        if self.options.validate_on_blur {
            self.trigger.fire(&self.name);
        }
    }

    /// No-op hook for symmetry with [`on_blur`](Self::on_blur).
    pub fn on_focus(&self) {
        tracing::trace!(field = %self.name, "focus");
    }

    /// Whether a debounced validation is waiting.
    pub fn is_validation_pending(&self) -> bool {
        self.debounced.is_pending()
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("debounced", &self.debounced)
            .finish()
    }
}
