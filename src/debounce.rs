//! Cancellable timers driven by host-supplied timestamps.
//!
//! The editor never reads a clock itself. Hosts pass the time since an
//! arbitrary epoch of their choosing (a browser's `performance.now()`, a
//! replay's virtual clock) and call `poll` from their event loop, so timer
//! behavior is deterministic under test.

use std::time::Duration;

/// Collapses bursts of work into the last scheduled value.
///
/// Scheduling replaces (cancels) whatever was pending and restarts the delay.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Duration)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire `delay` after `now`, replacing any pending value.
    pub fn schedule(&mut self, value: T, now: Duration) {
        self.pending = Some((value, now + self.delay));
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if due {
            self.cancel()
        } else {
            None
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Press-and-hold timer: fires once after the button has been held for `hold`.
#[derive(Debug, Clone)]
pub struct HoldTimer {
    hold: Duration,
    pressed_at: Option<Duration>,
}

impl HoldTimer {
    pub fn new(hold: Duration) -> Self {
        Self { hold, pressed_at: None }
    }

    pub fn press(&mut self, now: Duration) {
        self.pressed_at = Some(now);
    }

    /// Release before the hold completes cancels it.
    pub fn release(&mut self) {
        self.pressed_at = None;
    }

    pub fn is_held(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// True exactly once, when the hold duration has elapsed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.pressed_at {
            Some(start) if now.saturating_sub(start) >= self.hold => {
                self.pressed_at = None;
                true
            }
            _ => false,
        }
    }

    /// Fraction of the hold completed, for a progress bar.
    pub fn progress(&self, now: Duration) -> f32 {
        match self.pressed_at {
            Some(_) if self.hold.is_zero() => 1.0,
            Some(start) => {
                (now.saturating_sub(start).as_secs_f32() / self.hold.as_secs_f32()).min(1.0)
            }
            None => 0.0,
        }
    }
}
