//! Cancel-and-reschedule debouncing
//!
//! Each call cancels whatever is pending and schedules itself anew; only the
//! last call in a burst runs, once the quiet period has elapsed. Scheduling
//! goes through [`TimerScheduler`] so the debouncer does not care which
//! event loop drives it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A scheduled timer that can be called off
pub trait TimerHandle: Send {
    fn cancel(&self);
}

/// Anything that can run a task after a delay
pub trait TimerScheduler: Send + Sync {
    type Handle: TimerHandle + 'static;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) -> Self::Handle;
}

impl TimerHandle for CancellationToken {
    fn cancel(&self) {
        Self::cancel(self);
    }
}

/// Timers as tokio tasks racing a sleep against a cancellation token
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

impl TokioScheduler {
    #[must_use]
    pub const fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }

    /// Uses the runtime the caller is running on
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl TimerScheduler for TokioScheduler {
    type Handle = CancellationToken;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) -> CancellationToken {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {},
                () = tokio::time::sleep(delay) => task(),
            }
        });
        token
    }
}

struct Pending<H> {
    generation: u64,
    handle: Option<H>,
}

/// Coalesces bursts of calls into one trailing invocation
pub struct Debouncer<S: TimerScheduler> {
    scheduler: S,
    delay: Duration,
    pending: Arc<Mutex<Pending<S::Handle>>>,
}

impl<S: TimerScheduler> std::fmt::Debug for Debouncer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl<S: TimerScheduler> Debouncer<S> {
    pub fn new(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: Arc::new(Mutex::new(Pending {
                generation: 0,
                handle: None,
            })),
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `f`, replacing any call still waiting
    ///
    /// A replaced call never runs, even if its timer already fired and is
    /// waiting on the lock. A call that has started holds the lock until
    /// `f` returns, so a newer call is only scheduled after it has applied.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.handle.take() {
            handle.cancel();
        }
        pending.generation += 1;
        let generation = pending.generation;

        let shared = Arc::clone(&self.pending);
        let handle = self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                let mut pending = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if pending.generation != generation {
                    return;
                }
                pending.handle = None;
                f();
                drop(pending);
            }),
        );
        pending.handle = Some(handle);
    }

    /// Drops the waiting call, if any; returns whether one was pending
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.generation += 1;
        pending.handle.take().is_some_and(|handle| {
            handle.cancel();
            true
        })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handle
            .is_some()
    }
}
