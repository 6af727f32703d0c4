//! Cancellation tokens for timer entries
//!
//! Each scheduled entry is paired with a token held by whoever owns the
//! entry's lifetime (the marker a pulse belongs to, the preview a debounce
//! belongs to). Cancelling the token retires the entry before its next
//! fire, which is what keeps a deleted marker from being touched by a
//! still-queued timer callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between an owner and the scheduler.
///
/// Clones share the same underlying state. `cancel()` is idempotent.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new token in the non-cancelled state
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancel this token. All clones observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether `cancel()` has been called on this token or any clone
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
