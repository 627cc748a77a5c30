//! Trailing-edge debouncing on the tokio timer
//!
//! Each call cancels the pending one and reschedules with its own
//! arguments, so a burst collapses into one invocation carrying the last
//! call's arguments. At most one call is pending at any time.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

/// A debounced wrapper around `f`
pub struct Debounced<A> {
    f: Callback<A>,
    delay: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debounced<A> {
    /// Wrap `f` so it runs `delay` after the last of a burst of calls.
    /// Deferred calls are spawned onto `runtime`.
    pub fn new(f: impl Fn(A) + Send + Sync + 'static, delay: Duration, runtime: Handle) -> Self {
        Self {
            f: Arc::new(f),
            delay,
            runtime,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `f(args)`, replacing any call still waiting
    pub fn call(&self, args: A) {
        // Deadline is fixed now, not when the task is first polled
        let deadline = Instant::now() + self.delay;
        let f = Arc::clone(&self.f);

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                trace!("replacing pending debounced call");
            }
            previous.abort();
        }

        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            f(args);
        }));
    }

    /// Drop the pending call, if any
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    /// Whether a call is scheduled and has not run yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<A> Drop for Debounced<A> {
    fn drop(&mut self) {
        if let Some(previous) = self.pending.get_mut().take() {
            previous.abort();
        }
    }
}
