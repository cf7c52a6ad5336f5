//! Focus and blur hooks for one field.

use crate::field::FieldName;
use crate::form::Trigger;

/// Blur/focus handlers for one field.
///
/// Leaving the field validates it when a trigger is configured. Focusing
/// does nothing; the hook exists so callers can wire both events the same
/// way.
#[derive(Debug, Clone)]
pub struct FocusHandlers {
    name: FieldName,
    trigger: Option<Trigger>,
}

impl FocusHandlers {
    /// Hooks for `name`; blur validates through `trigger` when given.
    pub fn new(name: impl Into<FieldName>, trigger: Option<Trigger>) -> Self {
        Self {
            name: name.into(),
            trigger,
        }
    }

    /// The field these hooks belong to.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// The field lost focus: request validation.
    pub fn on_blur(&self) {
        if let Some(trigger) = &self.trigger {
            trigger.fire(&self.name);
        }
    }

    /// The field gained focus. Does nothing.
    pub fn on_focus(&self) {
        tracing::trace!(field = %self.name, "focus");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::{self, FutureExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_trigger() -> (Trigger, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let trigger = Trigger::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            future::ready(true).boxed()
        });
        (trigger, count)
    }

    #[test]
    fn test_blur_triggers() {
        let (trigger, count) = counting_trigger();
        let handlers = FocusHandlers::new("email", Some(trigger));

        handlers.on_blur();
        handlers.on_blur();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_focus_is_noop() {
        let (trigger, count) = counting_trigger();
        let handlers = FocusHandlers::new("email", Some(trigger));

        handlers.on_focus();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(handlers.name().as_str(), "email");
    }

    #[test]
    fn test_blur_without_trigger() {
        FocusHandlers::new("email", None).on_blur();
    }
}
