mod common;

use common::{signup_schema, MemoryForm};
use fieldkit::format::{format_phone_number, PHONE_MAX_DIGITS};
use fieldkit::{ChangeEvent, FieldValue, FormHandlers, FormState};
use proptest::prelude::*;
use std::sync::Arc;

fn number_form() -> (Arc<MemoryForm>, FormHandlers) {
    let form = MemoryForm::new(signup_schema())
        .with_defaults(serde_json::json!({ "age": 7 }))
        .into_shared();
    let shared: Arc<dyn FormState> = form.clone();
    (form, FormHandlers::new(shared))
}

proptest! {
    #[test]
    fn phone_formatting_is_idempotent(input in ".*") {
        let once = format_phone_number(&input);
        prop_assert_eq!(format_phone_number(&once), once);
    }

    #[test]
    fn phone_formatting_keeps_leading_digits(input in "[0-9 ()+.-]{0,30}") {
        let formatted = format_phone_number(&input);
        let digits: String = input
            .chars()
            .filter(char::is_ascii_digit)
            .take(PHONE_MAX_DIGITS)
            .collect();

        prop_assert_eq!(formatted.replace(' ', ""), digits);
        let groups: Vec<&str> = formatted.split(' ').filter(|g| !g.is_empty()).collect();
        if let Some((last, full)) = groups.split_last() {
            prop_assert!(full.iter().all(|g| g.len() == 3));
            prop_assert!(!last.is_empty() && last.len() <= 3);
        }
    }

    #[test]
    fn number_handler_round_trips_finite_values(value in -1.0e12f64..1.0e12) {
        let (form, handlers) = number_form();
        handlers
            .number("age")
            .unwrap()
            .handle(&ChangeEvent::input(value.to_string()))
            .unwrap();

        prop_assert_eq!(form.get("age"), Some(FieldValue::from(value)));
    }

    #[test]
    fn number_handler_is_idempotent(input in "[0-9.eE+-]{0,8}") {
        let (form, handlers) = number_form();
        let on_age = handlers.number("age").unwrap();

        on_age.handle(&ChangeEvent::input(input.clone())).unwrap();
        let after_once = form.get("age");
        on_age.handle(&ChangeEvent::input(input)).unwrap();

        prop_assert_eq!(form.get("age"), after_once);
    }

    #[test]
    fn number_handler_ignores_non_numeric_input(
        head in "[0-9]{0,4}",
        letter in "[ghjklmpqrsuvwz]",
        tail in "[0-9]{0,4}",
    ) {
        let (form, handlers) = number_form();
        handlers
            .number("age")
            .unwrap()
            .handle(&ChangeEvent::input(format!("{head}{letter}{tail}")))
            .unwrap();

        prop_assert_eq!(form.get("age"), Some(FieldValue::from(7.0)));
        prop_assert!(!form.is_dirty("age"));
        prop_assert_eq!(form.trigger_count(), 0);
    }
}
