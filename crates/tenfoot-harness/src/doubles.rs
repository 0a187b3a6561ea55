#![forbid(unsafe_code)]

//! Recording test doubles.
//!
//! Both doubles share their log through an `Arc`, so a test keeps one clone
//! and hands the other to the engine or dispatcher.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tenfoot_focus::{FocusHost, FocusId};
use tenfoot_runtime::{PlaybackCommand, PlaybackController, PlaybackError};

/// One host hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Visual {
        prev: Option<String>,
        next: Option<String>,
    },
    Scroll(String),
    Announce(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`FocusHost`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.calls).clone()
    }

    /// Targets of `scroll_into_view`, in order.
    #[must_use]
    pub fn scrolls(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                HostCall::Scroll(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Accessibility announcements, in order.
    #[must_use]
    pub fn announcements(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                HostCall::Announce(label) => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }
}

impl FocusHost for RecordingHost {
    fn apply_focus_visual(&mut self, prev: Option<&FocusId>, next: Option<&FocusId>) {
        lock(&self.calls).push(HostCall::Visual {
            prev: prev.map(FocusId::to_string),
            next: next.map(FocusId::to_string),
        });
    }

    fn scroll_into_view(&mut self, id: &FocusId) {
        lock(&self.calls).push(HostCall::Scroll(id.to_string()));
    }

    fn announce(&mut self, label: &str) {
        lock(&self.calls).push(HostCall::Announce(label.to_string()));
    }
}

/// [`PlaybackController`] that records commands and optionally rejects them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayback {
    commands: Arc<Mutex<Vec<PlaybackCommand>>>,
    reject: Option<PlaybackError>,
}

impl RecordingPlayback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record commands but fail each one with `error`.
    #[must_use]
    pub fn rejecting(error: PlaybackError) -> Self {
        Self {
            commands: Arc::default(),
            reject: Some(error),
        }
    }

    /// Commands received so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<PlaybackCommand> {
        lock(&self.commands).clone()
    }
}

impl PlaybackController for RecordingPlayback {
    fn execute(&mut self, command: PlaybackCommand) -> Result<(), PlaybackError> {
        lock(&self.commands).push(command);
        match &self.reject {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
