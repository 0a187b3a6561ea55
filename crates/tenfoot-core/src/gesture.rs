#![forbid(unsafe_code)]

//! Gesture classification for touch surfaces and pointer remotes.
//!
//! [`GestureClassifier`] turns one press-release cycle of [`PointerEvent`]s
//! into at most one [`GestureEvent`].
//!
//! ```text
//! Idle ──Down──▶ Pressed ──timer──▶ LongPress ──Up──▶ Idle (already emitted)
//!                  │  └──move > jitter──▶ Pan ──fast enough──▶ Swipe
//!                  └──Up──▶ Tap                  Up ▶ Pan     Up ▶ Swipe
//! ```
//!
//! # Invariants
//! 1. At most one gesture is emitted per press-release cycle.
//! 2. `Cancel` (or a new `Down` before `Up`) ends the cycle silently.
//! 3. The long-press timer is armed on `Down` and cancelled by release,
//!    movement beyond the jitter radius, or cancellation.
//!
//! # Failure Modes
//! - A press held without movement and then interrupted before the long-press
//!   threshold emits nothing; the classifier never guesses.
//! - If the host never calls [`GestureClassifier::tick_at`], a press held past
//!   the threshold is still reported as a long press on release.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::event::{Direction, GestureEvent, GestureKind, PointerEvent, PointerPhase};
use crate::geometry::Point;
use crate::timer::Timer;

/// Thresholds for gesture classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Hold time before a stationary press becomes a long press.
    pub long_press: Duration,
    /// Movement tolerated before a press stops being a tap/long-press.
    pub jitter_radius: f32,
    /// Displacement that qualifies as a swipe.
    pub swipe_distance: f32,
    /// Time window in which the swipe distance must be covered.
    pub swipe_window: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press: Duration::from_millis(500),
            jitter_radius: 5.0,
            swipe_distance: 50.0,
            swipe_window: Duration::from_millis(300),
        }
    }
}

/// Classifier state for the active press sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed,
    /// Long press already emitted; waiting for release.
    LongPress,
    Swipe,
    Pan,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Point,
    started: Instant,
    latest: Point,
}

/// Per-sequence gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    state: GestureState,
    press: Option<Press>,
    long_press_timer: Timer,
}

impl GestureClassifier {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    /// Deadline of the armed long-press timer, for sizing poll timeouts.
    #[must_use]
    pub fn long_press_deadline(&self) -> Option<Instant> {
        self.long_press_timer.deadline()
    }

    /// Feed one pointer sample.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<GestureEvent> {
        match event.phase {
            PointerPhase::Down => {
                self.begin(event.position, event.timestamp);
                None
            }
            PointerPhase::Move => {
                let press = self.press.as_mut()?;
                press.latest = event.position;
                self.advance(event.timestamp)
            }
            PointerPhase::Up => {
                let press = self.press.as_mut()?;
                press.latest = event.position;
                let early = self.advance(event.timestamp);
                let released = self.release(event.timestamp);
                // `advance` only emits a long press, after which release is silent.
                early.or(released)
            }
            PointerPhase::Cancel => {
                if self.press.is_some() {
                    trace!(state = ?self.state, "gesture cancelled");
                }
                self.reset();
                None
            }
        }
    }

    /// Fire the long-press timer if it is due.
    pub fn tick_at(&mut self, now: Instant) -> Option<GestureEvent> {
        if self.state != GestureState::Pressed || !self.long_press_timer.fire_if_due(now) {
            return None;
        }
        self.emit_long_press(now)
    }

    /// Abandon any in-progress sequence and cancel the timer.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.press = None;
        self.long_press_timer.cancel();
    }

    fn begin(&mut self, origin: Point, now: Instant) {
        if self.press.is_some() {
            trace!(state = ?self.state, "new press before release; dropping sequence");
        }
        self.press = Some(Press {
            origin,
            started: now,
            latest: origin,
        });
        self.state = GestureState::Pressed;
        self.long_press_timer.arm_at(now, self.config.long_press);
    }

    /// Apply movement and elapsed time to the state machine.
    fn advance(&mut self, now: Instant) -> Option<GestureEvent> {
        let press = self.press?;
        if self.state == GestureState::Pressed && self.long_press_timer.fire_if_due(now) {
            return self.emit_long_press(now);
        }

        let distance = press.latest.distance(press.origin);
        let elapsed = now.saturating_duration_since(press.started);
        let fast_enough =
            distance >= self.config.swipe_distance && elapsed <= self.config.swipe_window;

        match self.state {
            GestureState::Pressed if distance > self.config.jitter_radius => {
                self.long_press_timer.cancel();
                self.state = if fast_enough {
                    GestureState::Swipe
                } else {
                    GestureState::Pan
                };
            }
            GestureState::Pan if fast_enough => self.state = GestureState::Swipe,
            _ => {}
        }
        None
    }

    fn release(&mut self, now: Instant) -> Option<GestureEvent> {
        let press = self.press?;
        let state = self.state;
        self.reset();

        let duration = now.saturating_duration_since(press.started);
        let (dx, dy) = press.latest.delta_from(press.origin);
        let gesture = match state {
            GestureState::Pressed if duration >= self.config.long_press => {
                GestureEvent::new(GestureKind::LongPress, press.origin, duration)
            }
            GestureState::Pressed => GestureEvent::new(GestureKind::Tap, press.origin, duration),
            GestureState::Swipe | GestureState::Pan => {
                let kind = if state == GestureState::Swipe {
                    GestureKind::Swipe
                } else {
                    GestureKind::Pan
                };
                let direction = Direction::from_delta(dx, dy)?;
                GestureEvent::new(kind, press.origin, duration).with_direction(direction)
            }
            GestureState::LongPress | GestureState::Idle => return None,
        };
        trace!(kind = ?gesture.kind, ?duration, "gesture classified");
        Some(gesture)
    }

    fn emit_long_press(&mut self, now: Instant) -> Option<GestureEvent> {
        let press = self.press?;
        self.state = GestureState::LongPress;
        let duration = now.saturating_duration_since(press.started);
        trace!(?duration, "long press");
        Some(GestureEvent::new(
            GestureKind::LongPress,
            press.origin,
            duration,
        ))
    }
}
