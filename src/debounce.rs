//! Trailing-edge debouncing of validation requests.

use crate::field::FieldName;
use crate::form::Trigger;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A trigger that fires only after calls have been quiet for `delay`.
///
/// Every [`schedule`](Self::schedule) replaces the pending timer, so a burst
/// of calls results in one validation, `delay` after the last call. The
/// timer belongs to the instance: scheduling another field also replaces
/// it. Give each field its own instance to debounce fields independently.
///
/// Dropping the scheduler cancels the pending timer. A validation that has
/// already started is never cancelled.
///
/// Timers run on the ambient tokio runtime. Outside a runtime nothing is
/// scheduled.
///
/// # Examples
///
/// ```rust
/// use fieldkit::{DebouncedTrigger, Trigger};
/// use futures_util::future::{self, FutureExt};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let trigger = Trigger::new(|_| future::ready(true).boxed());
/// let debounced = DebouncedTrigger::new(trigger, Duration::from_millis(50));
///
/// debounced.schedule(&"email".into());
/// assert!(debounced.is_pending());
/// assert!(debounced.cancel());
/// assert!(!debounced.is_pending());
/// # }
/// ```
pub struct DebouncedTrigger {
    trigger: Trigger,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedTrigger {
    /// Scheduler firing `trigger` after `delay` of quiet.
    pub fn new(trigger: Trigger, delay: Duration) -> Self {
        Self {
            trigger,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Scheduler with [`DEFAULT_DEBOUNCE`].
    pub fn with_default_delay(trigger: Trigger) -> Self {
        Self::new(trigger, DEFAULT_DEBOUNCE)
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fire the trigger for `name` once `delay` passes without another
    /// call. Replaces any pending timer.
    pub fn schedule(&self, name: &FieldName) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!(field = %name, "no async runtime; debounced validation skipped");
                return;
            }
        };

        let mut pending = self.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
            tracing::debug!(field = %name, "debounce timer restarted");
        }

        let trigger = self.trigger.clone();
        let field = name.clone();
        let delay = self.delay;
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(field = %field, "debounce elapsed");
            trigger.fire(&field);
        }));
    }

    /// Drop the pending timer. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                if waiting {
                    tracing::debug!("debounce timer cancelled");
                }
                waiting
            }
            None => false,
        }
    }

    /// Whether a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for DebouncedTrigger {
    fn drop(&mut self) {
        let handle = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl fmt::Debug for DebouncedTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedTrigger")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
