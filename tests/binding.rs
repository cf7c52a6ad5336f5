mod common;

use common::{signup_schema, MemoryForm};
use fieldkit::validate;
use fieldkit::{
    BindingCache, ChangeEvent, FieldKind, FieldOptions, FieldValue, FormError, FormState,
};
use std::sync::Arc;
use std::time::Duration;

fn shared(form: &Arc<MemoryForm>) -> Arc<dyn FormState> {
    form.clone()
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[test]
fn test_cache_returns_same_handlers_per_manager() {
    let first_form = MemoryForm::new(signup_schema()).into_shared();
    let second_form = MemoryForm::new(signup_schema()).into_shared();
    let cache = BindingCache::new();

    let a = cache.bind(&shared(&first_form));
    let b = cache.bind(&shared(&first_form));
    assert!(Arc::ptr_eq(&a, &b));

    let c = cache.bind(&shared(&second_form));
    assert!(!Arc::ptr_eq(&a, &c));

    c.text("name")
        .unwrap()
        .handle(&ChangeEvent::input("Grace"))
        .unwrap();
    assert_eq!(second_form.get("name"), Some(FieldValue::from("Grace")));
    assert_eq!(first_form.get("name"), None);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_burst_validates_latest_value_once() {
    let form = MemoryForm::new(signup_schema())
        .with_rule("name", validate::min_length(3))
        .into_shared();
    let handlers = BindingCache::new().bind(&shared(&form));
    let debounced = handlers.debounced_trigger(None);
    let name = fieldkit::FieldName::from("name");

    for (typed, pause) in [("a", 20), ("ab", 20), ("abc", 0)] {
        form.set_value(&name, FieldValue::from(typed), fieldkit::SetValueOptions::dirty());
        debounced.schedule(&name);
        advance(pause).await;
    }

    advance(299).await;
    assert_eq!(form.trigger_count(), 0);

    advance(2).await;
    assert_eq!(form.trigger_count(), 1);
    assert_eq!(
        form.validated(),
        vec![(name.clone(), Some(FieldValue::from("abc")))]
    );
    assert_eq!(form.error(&name), None);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_debounced_trigger_prevents_validation() {
    let form = MemoryForm::new(signup_schema()).into_shared();
    let handlers = BindingCache::new().bind(&shared(&form));

    let debounced = handlers.debounced_trigger(Some(Duration::from_millis(100)));
    debounced.schedule(&"email".into());
    drop(debounced);

    advance(500).await;
    assert_eq!(form.trigger_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_field_binding_lifecycle() {
    let form = MemoryForm::new(signup_schema())
        .with_rule("email", validate::email())
        .into_shared();
    let handlers = BindingCache::new().bind(&shared(&form));
    let email = handlers.field("email", FieldOptions::default()).unwrap();

    assert_eq!(email.kind(), FieldKind::Text);
    email.on_focus();
    email.on_change("ada@").unwrap();
    email.on_change("ada@example").unwrap();
    assert_eq!(email.value(), Some(FieldValue::from("ada@example")));
    assert!(form.is_dirty("email"));
    assert_eq!(email.error(), None);

    advance(301).await;
    assert_eq!(form.trigger_count(), 1);
    assert_eq!(email.error(), Some("Email không hợp lệ".to_string()));

    email.on_change("ada@example.com").unwrap();
    email.on_blur();
    assert_eq!(form.trigger_count(), 2);
    assert_eq!(email.error(), None);

    assert!(matches!(
        email.on_change(true),
        Err(FormError::KindMismatch { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_field_binding_cancels_pending_validation() {
    let form = MemoryForm::new(signup_schema()).into_shared();
    let handlers = BindingCache::new().bind(&shared(&form));

    let options = FieldOptions {
        debounce_ms: 50,
        ..FieldOptions::default()
    };
    let age = handlers.field("age", options).unwrap();
    age.on_change(27.0).unwrap();
    assert!(age.is_validation_pending());
    drop(age);

    advance(200).await;
    assert_eq!(form.trigger_count(), 0);
    assert_eq!(form.get("age"), Some(FieldValue::from(27.0)));
}

#[test]
fn test_field_options_from_json() {
    let options: FieldOptions =
        serde_json::from_value(serde_json::json!({ "validate_on_blur": false })).unwrap();

    assert!(options.validate_on_change);
    assert!(!options.validate_on_blur);
    assert_eq!(options.debounce_ms, 300);
}
