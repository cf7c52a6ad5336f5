//! Sign-up form example: handlers, formatters, rules and debounced validation
//!
//! This example demonstrates:
//! - Binding category handlers to a form-state manager
//! - Rejected input leaving the stored value alone
//! - Cross-field rules
//! - Debounced validation while typing
//!
//! Run with `RUST_LOG=fieldkit=trace` to see the handler logs.

use fieldkit::format::{format_currency, format_number};
use fieldkit::validate::{self, Conditional, Rule, Rules};
use fieldkit::*;
use futures_util::future::{self, FutureExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A tiny form-state manager: values, errors and per-field rules.
struct SignupForm {
    schema: FormSchema,
    values: Mutex<HashMap<FieldName, FieldValue>>,
    errors: Mutex<HashMap<FieldName, String>>,
    rules: HashMap<FieldName, Box<dyn Rule>>,
}

impl SignupForm {
    fn new() -> Self {
        let schema = FormSchema::new()
            .with_field("email", FieldKind::Text)
            .with_field("phone", FieldKind::Text)
            .with_field("age", FieldKind::Number)
            .with_field("salary", FieldKind::Number)
            .with_field("employed", FieldKind::Boolean)
            .with_field("company", FieldKind::Text);

        let mut rules: HashMap<FieldName, Box<dyn Rule>> = HashMap::new();
        rules.insert(
            "email".into(),
            Box::new(Rules::new().with(validate::required()).with(validate::email())),
        );
        rules.insert("phone".into(), Box::new(validate::phone()));
        rules.insert(
            "age".into(),
            Box::new(
                Rules::new()
                    .with(validate::numeric())
                    .with(validate::min_value(18.0))
                    .with(validate::max_value(120.0)),
            ),
        );
        rules.insert(
            "company".into(),
            Box::new(Conditional::new(
                |form| form.get("employed") == Some(&FieldValue::Boolean(true)),
                validate::required().with_message("Vui lòng nhập tên công ty"),
                "company required when employed",
            )),
        );

        Self {
            schema,
            values: Mutex::new(HashMap::new()),
            errors: Mutex::new(HashMap::new()),
            rules,
        }
    }
}

impl FormState for SignupForm {
    fn set_value(&self, name: &FieldName, value: FieldValue, _options: SetValueOptions) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(name.clone(), value);
        }
    }

    fn trigger(&self, name: &FieldName) -> ValidationFuture {
        let snapshot: FormSnapshot = match self.values.lock() {
            Ok(values) => values.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Err(_) => FormSnapshot::new(),
        };
        let outcome = match self.rules.get(name) {
            Some(rule) => rule.check_in(snapshot.get(name), &snapshot),
            None => Ok(()),
        };
        if let Ok(mut errors) = self.errors.lock() {
            match &outcome {
                Ok(()) => errors.remove(name),
                Err(message) => errors.insert(name.clone(), message.clone()),
            };
        }
        future::ready(outcome.is_ok()).boxed()
    }

    fn value(&self, name: &FieldName) -> Option<FieldValue> {
        self.values.lock().ok()?.get(name).cloned()
    }

    fn error(&self, name: &FieldName) -> Option<String> {
        self.errors.lock().ok()?.get(name).cloned()
    }

    fn schema(&self) -> &FormSchema {
        &self.schema
    }
}

fn show(form: &dyn FormState, name: &str) {
    let name = FieldName::from(name);
    let value = form
        .value(&name)
        .map(|v| format!("{v:?}"))
        .unwrap_or_else(|| "<unset>".to_string());
    match form.error(&name) {
        Some(error) => println!("  {name}: {value}  ✗ {error}"),
        None => println!("  {name}: {value}  ✓"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), FormError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fieldkit=info")),
        )
        .init();

    println!("=== Sign-up Form Demo ===\n");

    let form: Arc<dyn FormState> = Arc::new(SignupForm::new());
    let cache = BindingCache::new();
    let handlers = cache.bind(&form);

    // ===== Normalizing handlers =====
    println!("1. Normalizing handlers\n");

    handlers
        .email("email")?
        .handle(&ChangeEvent::input("  Ada@Example.COM "))?;
    handlers
        .phone("phone")?
        .handle(&ChangeEvent::input("0912-345-678"))?;
    handlers
        .currency("salary")?
        .handle(&ChangeEvent::input("2500000 ₫"))?;

    show(form.as_ref(), "email");
    show(form.as_ref(), "phone");
    show(form.as_ref(), "salary");
    if let Some(salary) = form.value(&"salary".into()).and_then(|v| v.to_number()) {
        println!("  salary shown as {}", format_currency(salary));
    }
    println!();

    // ===== Rejected input =====
    println!("2. Rejected input keeps the stored value\n");

    let on_age = handlers.number("age")?;
    on_age.handle(&ChangeEvent::input("17"))?;
    show(form.as_ref(), "age");
    on_age.handle(&ChangeEvent::input("17x"))?;
    show(form.as_ref(), "age");
    on_age.handle(&ChangeEvent::input("42"))?;
    show(form.as_ref(), "age");
    println!("  formatted: {}\n", format_number(1234.5));

    // ===== Cross-field rules =====
    println!("3. Company is required once employed is ticked\n");

    handlers
        .checkbox("employed")?
        .handle(&ChangeEvent::checkbox(true))?;
    let company = handlers.focus_handlers("company");
    company.on_focus();
    company.on_blur();
    show(form.as_ref(), "company");
    println!();

    // ===== Debounced validation =====
    println!("4. Debounced validation while typing\n");

    let email = handlers.field(
        "email",
        FieldOptions {
            debounce_ms: 200,
            ..FieldOptions::default()
        },
    )?;
    for typed in ["g", "gr", "grace@", "grace@example.org"] {
        email.on_change(typed)?;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    println!("  pending after typing: {}", email.is_validation_pending());
    tokio::time::sleep(Duration::from_millis(250)).await;
    show(form.as_ref(), "email");

    let again = cache.bind(&form);
    println!("\n  ✓ Re-binding the same form reuses handlers: {}", Arc::ptr_eq(&handlers, &again));

    Ok(())
}
