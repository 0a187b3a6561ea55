#![forbid(unsafe_code)]

//! The immutable remote command record.

use std::time::Instant;

use crate::event::{Direction, GestureEvent, GestureKind, RemoteButton};
use crate::navigation::NavigationContext;

/// A remote command: what was pressed, in which context, and when.
///
/// The dispatcher builds a command when it dequeues a key press or a
/// classified gesture, so the context is the one active at that point, not
/// when the raw event arrived. Commands are never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteCommand {
    button: RemoteButton,
    context: NavigationContext,
    timestamp: Instant,
    gesture: Option<GestureEvent>,
}

impl RemoteCommand {
    #[must_use]
    pub const fn new(button: RemoteButton, context: NavigationContext, timestamp: Instant) -> Self {
        Self {
            button,
            context,
            timestamp,
            gesture: None,
        }
    }

    /// Build a command from a classified gesture.
    ///
    /// Tap and long-press map to `Select`; swipes and pans map to the d-pad
    /// button of their direction. Pinch and direction-less pans have no
    /// remote equivalent and yield `None`.
    #[must_use]
    pub fn from_gesture(
        gesture: GestureEvent,
        context: NavigationContext,
        timestamp: Instant,
    ) -> Option<Self> {
        let button = match gesture.kind {
            GestureKind::Tap | GestureKind::LongPress => RemoteButton::Select,
            GestureKind::Swipe | GestureKind::Pan => {
                RemoteButton::from_direction(gesture.direction?)
            }
            GestureKind::Pinch => return None,
        };
        Some(Self {
            button,
            context,
            timestamp,
            gesture: Some(gesture),
        })
    }

    #[inline]
    #[must_use]
    pub const fn button(&self) -> RemoteButton {
        self.button
    }

    #[inline]
    #[must_use]
    pub const fn context(&self) -> NavigationContext {
        self.context
    }

    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Gesture metadata, when the command came from a gesture.
    #[must_use]
    pub const fn gesture(&self) -> Option<&GestureEvent> {
        self.gesture.as_ref()
    }

    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.button.direction()
    }

    /// Whether this is a select produced by a long press.
    #[must_use]
    pub fn is_long_select(&self) -> bool {
        self.button == RemoteButton::Select
            && self
                .gesture
                .is_some_and(|g| g.kind == GestureKind::LongPress)
    }
}
