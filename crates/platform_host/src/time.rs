//! Time helpers and tick sources shared across host contracts and adapters.

use std::{cell::Cell, rc::Rc};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Millisecond tick source consulted by timers and frame throttles.
pub trait Clock {
    /// Returns the current time in milliseconds.
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
/// Wall-clock tick source backed by [`unix_time_ms_now`].
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        unix_time_ms_now()
    }
}

#[derive(Debug, Clone, Default)]
/// Manually advanced tick source for deterministic tests and replays.
///
/// Clones share the same underlying counter, so a test can keep one handle and advance time
/// while the runtime holds another.
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Creates a clock starting at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// Sets the clock to an absolute value. Time never moves backwards.
    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms.max(self.now.get()));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(10);
        let handle = clock.clone();
        handle.advance(90);
        assert_eq!(clock.now_ms(), 100);
    }

    #[test]
    fn manual_clock_never_moves_backwards() {
        let clock = ManualClock::new(50);
        clock.set(20);
        assert_eq!(clock.now_ms(), 50);
        clock.set(75);
        assert_eq!(clock.now_ms(), 75);
    }

    #[test]
    fn system_clock_reports_non_zero_time() {
        assert!(SystemClock.now_ms() > 0);
    }
}
