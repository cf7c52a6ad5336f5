//! In-memory form-state manager shared by the integration tests.

#![allow(dead_code)]

use fieldkit::validate::Rule;
use fieldkit::{
    FieldName, FieldValue, FormSchema, FormSnapshot, FormState, SetValueOptions, ValidationFuture,
};
use futures_util::future::{self, FutureExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stores values and errors in memory and validates with registered rules.
///
/// Validation reads the value current at trigger time and records which
/// value it saw, so tests can check that debounced validation is never
/// stale.
pub struct MemoryForm {
    schema: FormSchema,
    values: Mutex<HashMap<FieldName, FieldValue>>,
    dirty: Mutex<HashSet<FieldName>>,
    errors: Mutex<HashMap<FieldName, String>>,
    rules: HashMap<FieldName, Box<dyn Rule>>,
    triggers: AtomicUsize,
    validated: Mutex<Vec<(FieldName, Option<FieldValue>)>>,
}

impl MemoryForm {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            values: Mutex::new(HashMap::new()),
            dirty: Mutex::new(HashSet::new()),
            errors: Mutex::new(HashMap::new()),
            rules: HashMap::new(),
            triggers: AtomicUsize::new(0),
            validated: Mutex::new(Vec::new()),
        }
    }

    /// Seed values from a JSON object; seeded fields are not dirty.
    pub fn with_defaults(self, defaults: serde_json::Value) -> Self {
        let snapshot = FormSnapshot::from_json(&defaults).expect("defaults must be a JSON object");
        {
            let mut values = self.values.lock().unwrap();
            for (name, _) in self.schema.iter() {
                if let Some(value) = snapshot.get(name) {
                    values.insert(name.clone(), value.clone());
                }
            }
        }
        self
    }

    pub fn with_rule(mut self, name: &str, rule: impl Rule + 'static) -> Self {
        self.rules.insert(name.into(), Box::new(rule));
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.values.lock().unwrap().get(&FieldName::from(name)).cloned()
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.lock().unwrap().contains(&FieldName::from(name))
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.load(Ordering::SeqCst)
    }

    /// Values each validation saw, in order.
    pub fn validated(&self) -> Vec<(FieldName, Option<FieldValue>)> {
        self.validated.lock().unwrap().clone()
    }

    fn snapshot(&self) -> FormSnapshot {
        self.values
            .lock()
            .unwrap()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn validate(&self, name: &FieldName) -> bool {
        let snapshot = self.snapshot();
        let value = snapshot.get(name).cloned();
        self.validated
            .lock()
            .unwrap()
            .push((name.clone(), value.clone()));

        let outcome = match self.rules.get(name) {
            Some(rule) => rule.check_in(value.as_ref(), &snapshot),
            None => Ok(()),
        };

        let mut errors = self.errors.lock().unwrap();
        match outcome {
            Ok(()) => {
                errors.remove(name);
                true
            }
            Err(message) => {
                errors.insert(name.clone(), message);
                false
            }
        }
    }
}

impl FormState for MemoryForm {
    fn set_value(&self, name: &FieldName, value: FieldValue, options: SetValueOptions) {
        self.values.lock().unwrap().insert(name.clone(), value);
        if options.should_dirty {
            self.dirty.lock().unwrap().insert(name.clone());
        }
    }

    fn trigger(&self, name: &FieldName) -> ValidationFuture {
        self.triggers.fetch_add(1, Ordering::SeqCst);
        // Validate eagerly: the value is read now, at trigger time.
        future::ready(self.validate(name)).boxed()
    }

    fn value(&self, name: &FieldName) -> Option<FieldValue> {
        self.values.lock().unwrap().get(name).cloned()
    }

    fn error(&self, name: &FieldName) -> Option<String> {
        self.errors.lock().unwrap().get(name).cloned()
    }

    fn schema(&self) -> &FormSchema {
        &self.schema
    }
}

/// Schema of the sign-up form used across the tests.
pub fn signup_schema() -> FormSchema {
    use fieldkit::FieldKind::*;

    FormSchema::new()
        .with_field("name", Text)
        .with_field("email", Text)
        .with_field("phone", Text)
        .with_field("age", Number)
        .with_field("salary", Number)
        .with_field("terms", Boolean)
        .with_field("country", Choice)
        .with_field("gender", Choice)
        .with_field("avatar", Files)
}
