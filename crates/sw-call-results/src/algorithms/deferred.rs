//! # Deferred Callback Queue
//!
//! Two collections: `live` is iterated by the driver, `staged` receives new
//! registrations. Staged work is merged only at a tick boundary, so anything
//! registered during tick N is first invoked on tick N + 1.

use tracing::{debug, error};

use super::containment::run_contained;
use crate::domain::DeferredCallback;

/// Outcome of one pass over the live callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeferredTick {
    /// Callbacks invoked this tick
    pub ran: usize,
    /// Callbacks that reported completion and were dropped
    pub finished: usize,
    /// Callbacks that panicked and were dropped
    pub panicked: usize,
}

/// Live and staged deferred callbacks.
#[derive(Default)]
pub struct DeferredQueue {
    live: Vec<DeferredCallback>,
    staged: Vec<DeferredCallback>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `callback` for the next tick.
    pub fn register(&mut self, callback: DeferredCallback) {
        self.staged.push(callback);
    }

    /// Move staged callbacks behind the live ones, preserving order.
    ///
    /// Returns how many were merged.
    pub fn merge_staged(&mut self) -> usize {
        let merged = self.staged.len();
        self.live.append(&mut self.staged);
        if merged > 0 {
            debug!(merged, live = self.live.len(), "Merged deferred callbacks");
        }
        merged
    }

    /// Invoke every live callback once, dropping those that finish or panic.
    pub fn run_live(&mut self) -> DeferredTick {
        let mut tick = DeferredTick::default();

        self.live.retain_mut(|callback| {
            tick.ran += 1;
            match run_contained(|| callback()) {
                Ok(false) => true,
                Ok(true) => {
                    tick.finished += 1;
                    false
                }
                Err(message) => {
                    error!(panic = %message, "Deferred callback panicked; dropping it");
                    tick.panicked += 1;
                    false
                }
            }
        });

        tick
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// No live and no staged callbacks.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.staged.is_empty()
    }
}

impl std::fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("live", &self.live.len())
            .field("staged", &self.staged.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicUsize>, finish_after: usize) -> DeferredCallback {
        let counter = counter.clone();
        Box::new(move || counter.fetch_add(1, Ordering::SeqCst) + 1 >= finish_after)
    }

    #[test]
    fn test_staged_callbacks_wait_for_merge() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut queue = DeferredQueue::new();

        queue.register(counting(&calls, 1));
        assert_eq!(queue.run_live(), DeferredTick::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(queue.merge_staged(), 1);
        let tick = queue.run_live();
        assert_eq!(tick.ran, 1);
        assert_eq!(tick.finished, 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unfinished_callbacks_stay_live() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut queue = DeferredQueue::new();
        queue.register(counting(&calls, 3));
        queue.merge_staged();

        queue.run_live();
        queue.run_live();
        assert_eq!(queue.live_len(), 1);
        queue.run_live();
        assert_eq!(queue.live_len(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_registration_between_merges_is_not_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut queue = DeferredQueue::new();
        queue.register(counting(&calls, 10));
        queue.merge_staged();

        queue.run_live();
        queue.register(counting(&calls, 10));
        queue.run_live();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(queue.staged_len(), 1);
    }

    #[test]
    fn test_panicking_callback_is_dropped_and_others_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut queue = DeferredQueue::new();
        queue.register(Box::new(|| panic!("deferred failure")));
        queue.register(counting(&calls, 1));
        queue.merge_staged();

        let tick = queue.run_live();
        assert_eq!(tick.ran, 2);
        assert_eq!(tick.panicked, 1);
        assert_eq!(tick.finished, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(queue.is_empty());
    }
}
