//! Per-session message rate limiting.

use crate::session::handle::SessionHandle;

/// Fixed-spacing rate gate.
///
/// A message is accepted when at least `window / max_messages` has
/// elapsed since the session's last accepted message (defaults: 1000 ms
/// window, 10 messages, so 100 ms minimum spacing). Rejected messages
/// are dropped with an error event to the sender; there is no queuing
/// and no backoff.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    /// Minimum spacing between accepted messages, in milliseconds.
    min_interval_ms: i64,
}

impl RateLimiter {
    /// Creates a limiter from a window and a per-window message budget.
    pub fn new(window_ms: i64, max_messages: i64) -> Self {
        Self {
            min_interval_ms: window_ms / max_messages.max(1),
        }
    }

    /// Checks whether a message at `now_ms` is within the session's
    /// budget, recording the acceptance on success.
    ///
    /// Events from one connection are processed serially, so the
    /// compare-exchange only fails if that assumption is violated; the
    /// racing message is then rejected rather than double-counted.
    pub fn check(&self, session: &SessionHandle, now_ms: i64) -> bool {
        let last = session.last_accepted_ms();
        if now_ms - last < self.min_interval_ms {
            return false;
        }
        session.try_record_accepted(last, now_ms)
    }

    /// The enforced minimum spacing in milliseconds.
    pub fn min_interval_ms(&self) -> i64 {
        self.min_interval_ms
    }
}
