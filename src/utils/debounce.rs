use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::utils::scheduler::{lock, Scheduler, TimerHandle};

pub type ResizeAction = Arc<dyn Fn(u32) + Send + Sync>;

struct DebounceState {
    last_width: u32,
    pending_width: u32,
    pending: Option<TimerHandle>,
    generation: u64,
}

/// Debounced, width-gated resize handling.
///
/// Every resize event restarts the quiet period. When it elapses the action
/// runs only if the width differs from the width last acted on; mobile
/// browsers fire resize on scroll when the toolbar collapses, which only
/// changes the height.
pub struct ResizeDebouncer {
    state: Arc<Mutex<DebounceState>>,
    scheduler: Arc<dyn Scheduler>,
    quiet: Duration,
    action: ResizeAction,
}

impl ResizeDebouncer {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        quiet: Duration,
        initial_width: u32,
        action: ResizeAction,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(DebounceState {
                last_width: initial_width,
                pending_width: initial_width,
                pending: None,
                generation: 0,
            })),
            scheduler,
            quiet,
            action,
        }
    }

    pub fn on_resize(&self, width: u32) {
        let mut state = lock(&self.state);
        if let Some(mut previous) = state.pending.take() {
            previous.cancel();
        }
        state.generation += 1;
        state.pending_width = width;

        let generation = state.generation;
        let weak = Arc::downgrade(&self.state);
        let action = self.action.clone();
        let handle = self.scheduler.after(
            self.quiet,
            Box::new(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let width = {
                    let mut state = lock(&state);
                    if state.generation != generation {
                        return;
                    }
                    if state.pending_width == state.last_width {
                        tracing::debug!(width = state.last_width, "resize without width change ignored");
                        return;
                    }
                    state.last_width = state.pending_width;
                    state.last_width
                };
                action(width);
            }),
        );
        state.pending = Some(handle);
    }

    /// Width the action last ran with (or the initial width).
    pub fn last_width(&self) -> u32 {
        lock(&self.state).last_width
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.state)
            .pending
            .as_ref()
            .map(TimerHandle::is_active)
            .unwrap_or(false)
    }
}
