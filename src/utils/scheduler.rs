use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

/// Something that can stop a scheduled timer.
pub trait Cancel: Send {
    fn cancel(self: Box<Self>);
    fn is_finished(&self) -> bool;
}

impl Cancel for JoinHandle<()> {
    fn cancel(self: Box<Self>) {
        self.abort();
    }

    fn is_finished(&self) -> bool {
        JoinHandle::is_finished(self)
    }
}

/// Single-owner handle to a pending timeout or a running interval.
///
/// Dropping the handle cancels the timer, so a component that replaces its
/// handle can never leave the old timer running.
pub struct TimerHandle {
    inner: Option<Box<dyn Cancel>>,
}

impl TimerHandle {
    pub fn new(cancel: impl Cancel + 'static) -> Self {
        Self {
            inner: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.cancel();
        }
    }

    /// True while the timer has neither been cancelled nor run to completion.
    pub fn is_active(&self) -> bool {
        self.inner
            .as_ref()
            .map(|inner| !inner.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Timer source injected into every component that needs one.
///
/// Callbacks are never invoked synchronously from `every` or `after`.
pub trait Scheduler: Send + Sync + 'static {
    /// Runs `tick` every `period`, first after one full period.
    fn every(&self, period: Duration, tick: Box<dyn FnMut() + Send>) -> TimerHandle;
    /// Runs `fire` once after `delay`.
    fn after(&self, delay: Duration, fire: Box<dyn FnOnce() + Send>) -> TimerHandle;
}

/// Scheduler backed by tokio tasks. Under a paused test clock the timers
/// follow `tokio::time::advance`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Scheduler on the runtime of the calling task, if there is one.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn every(&self, period: Duration, mut tick: Box<dyn FnMut() + Send>) -> TimerHandle {
        let period = period.max(Duration::from_millis(1));
        let task = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
            }
        });
        TimerHandle::new(task)
    }

    fn after(&self, delay: Duration, fire: Box<dyn FnOnce() + Send>) -> TimerHandle {
        let task = self.runtime.spawn(async move {
            sleep(delay).await;
            fire();
        });
        TimerHandle::new(task)
    }
}

/// Locks a component mutex. A panic inside one handler must not take every
/// later event down with it, so poisoning is ignored.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
