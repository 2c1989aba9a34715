//! Countdown completion barrier

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Notify;

/// Releases waiters once a fixed number of completions have been signaled
///
/// Each work unit calls [`count_down`](Self::count_down) exactly once when it
/// finishes, whether it succeeded or not. The counter never goes below zero,
/// and exactly one call observes the transition to zero.
#[derive(Debug)]
pub struct CompletionBarrier {
    remaining: AtomicU64,
    released: Notify,
}

impl CompletionBarrier {
    pub fn new(count: u64) -> Self {
        Self {
            remaining: AtomicU64::new(count),
            released: Notify::new(),
        }
    }

    /// Number of completions still outstanding
    pub fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Signal one completion.
    ///
    /// Returns `true` for the call that brought the count to zero. Calls made
    /// after the barrier is already open are ignored and return `false`.
    pub fn count_down(&self) -> bool {
        let previous = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match previous {
            Ok(1) => {
                self.released.notify_waiters();
                true
            }
            _ => false,
        }
    }

    /// Wait until the count reaches zero
    pub async fn wait(&self) {
        loop {
            let notified = self.released.notified();
            tokio::pin!(notified);
            // Register before checking so a release between the check and
            // the await is not lost.
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}
