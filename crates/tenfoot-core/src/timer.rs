#![forbid(unsafe_code)]

//! Cancellable deadlines and trailing debouncers.
//!
//! The engine never spawns timers. Owners arm a [`Timer`] or schedule into a
//! [`Debouncer`] with an explicit `now`, and the host event loop calls
//! `tick_at(now)` (or asks for the time until the next deadline to size its
//! poll timeout). This keeps everything deterministic under test.

use std::time::{Duration, Instant};

/// A single cancellable deadline.
///
/// Arming replaces any previous deadline; there is never more than one
/// outstanding per timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to fire `delay` after `now`, cancelling any prior deadline.
    pub fn arm_at(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Cancel the deadline. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has passed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return true if the deadline has passed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Time left until the deadline, or `None` if unarmed.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Trailing-edge debouncer.
///
/// Every `schedule_at` replaces the pending value and restarts the quiet
/// window; `tick_at` yields the latest value once the window has elapsed with
/// no further scheduling. N schedules inside one window therefore produce
/// exactly one value: the last one.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    timer: Timer,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            timer: Timer::new(),
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Replace the pending value and restart the quiet window.
    ///
    /// Returns true if this schedule coalesced with a still-pending value.
    pub fn schedule_at(&mut self, value: T, now: Instant) -> bool {
        let coalesced = self.pending.replace(value).is_some();
        self.timer.arm_at(now, self.window);
        coalesced
    }

    /// Emit the pending value if its quiet window has elapsed.
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.timer.fire_if_due(now) {
            return self.pending.take();
        }
        None
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.timer.cancel();
        self.pending.take()
    }

    /// Drop the pending value only if it matches `predicate`.
    pub fn cancel_if(&mut self, predicate: impl FnOnce(&T) -> bool) -> bool {
        if self.pending.as_ref().is_some_and(predicate) {
            self.cancel();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Time until the pending value is emitted.
    #[must_use]
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref()?;
        self.timer.remaining(now)
    }
}
