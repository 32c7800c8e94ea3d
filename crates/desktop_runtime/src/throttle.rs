//! Keep-latest coalescing queue released at most once per frame interval.

/// Default frame interval (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameThrottle<T> {
    interval_ms: u64,
    last_release_ms: Option<u64>,
    pending: Option<T>,
}

impl<T> FrameThrottle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            last_release_ms: None,
            pending: None,
        }
    }

    /// Queues `value`, replacing any value not yet released.
    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the pending value if a full interval has passed since the previous release.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let due = self
            .last_release_ms
            .map(|last| now_ms.saturating_sub(last) >= self.interval_ms)
            .unwrap_or(true);
        if !due {
            return None;
        }
        let value = self.pending.take()?;
        self.last_release_ms = Some(now_ms);
        Some(value)
    }

    /// Releases the pending value immediately, ignoring the interval.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drops the pending value and resets the interval window.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_release_ms = None;
    }
}

impl<T> Default for FrameThrottle<T> {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL_MS)
    }
}
