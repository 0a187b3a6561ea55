#![forbid(unsafe_code)]

//! JSONL input scripts.
//!
//! One step per line: `{"at_ms": <u64>, "event": {...}}`. `at_ms` is relative
//! to the replay epoch and must not decrease. Blank lines and lines starting
//! with `#` are skipped.
//!
//! ```text
//! {"at_ms":0,"event":{"type":"key","button":"right"}}
//! {"at_ms":40,"event":{"type":"pointer","phase":"down","x":10.0,"y":10.0}}
//! {"at_ms":600,"event":{"type":"tick"}}
//! {"at_ms":900,"event":{"type":"playback","notification":"finished"}}
//! ```
//!
//! Replay is deterministic: every timestamp derives from the epoch, and due
//! timers are fired (via `tick_at`) before each step is handled.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tenfoot_core::event::{
    GestureEvent, GestureKind, KeyEvent, KeyKind, PlaybackNotification, PointerPhase,
};
use tenfoot_core::geometry::Point;
use tenfoot_core::{Direction, RawEvent, RemoteButton};
use tenfoot_runtime::{CommandRecord, RemoteInputDispatcher};

/// Scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Key {
        button: RemoteButton,
        #[serde(default)]
        kind: KeyKind,
    },
    Pointer {
        phase: PointerPhase,
        x: f32,
        y: f32,
    },
    Gesture {
        kind: GestureKind,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<Direction>,
        #[serde(default)]
        duration_ms: u64,
    },
    Playback {
        notification: PlaybackNotification,
    },
    /// Advance time only.
    Tick,
}

impl ScriptEvent {
    /// Convert to a dispatcher event stamped `at`. `Tick` has none.
    #[must_use]
    pub fn to_raw(&self, at: Instant) -> Option<RawEvent> {
        match *self {
            Self::Key { button, kind } => Some(RawEvent::Key(KeyEvent::press(button, at).with_kind(kind))),
            Self::Pointer { phase, x, y } => Some(RawEvent::pointer(phase, Point::new(x, y), at)),
            Self::Gesture {
                kind,
                x,
                y,
                direction,
                duration_ms,
            } => {
                let mut gesture =
                    GestureEvent::new(kind, Point::new(x, y), Duration::from_millis(duration_ms));
                if let Some(direction) = direction {
                    gesture = gesture.with_direction(direction);
                }
                Some(RawEvent::Gesture {
                    gesture,
                    timestamp: at,
                })
            }
            Self::Playback { notification } => Some(RawEvent::Playback(notification)),
            Self::Tick => None,
        }
    }
}

/// One timed script line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub event: ScriptEvent,
}

/// Failure loading a script.
#[derive(Debug)]
pub enum ReplayError {
    Io(io::Error),
    /// Line is not a valid step (1-based line number).
    Parse { line: usize, message: String },
    /// `at_ms` went backwards.
    OutOfOrder { line: usize, at_ms: u64, previous_ms: u64 },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "script I/O error: {err}"),
            Self::Parse { line, message } => write!(f, "invalid script step at line {line}: {message}"),
            Self::OutOfOrder {
                line,
                at_ms,
                previous_ms,
            } => write!(
                f,
                "script step at line {line} goes back in time ({at_ms}ms after {previous_ms}ms)"
            ),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Ordered list of timed input steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a step. Steps must be appended in time order.
    #[must_use]
    pub fn step(mut self, at_ms: u64, event: ScriptEvent) -> Self {
        self.steps.push(ScriptStep { at_ms, event });
        self
    }

    /// Builder: append a key press.
    #[must_use]
    pub fn key(self, at_ms: u64, button: RemoteButton) -> Self {
        self.step(
            at_ms,
            ScriptEvent::Key {
                button,
                kind: KeyKind::Press,
            },
        )
    }

    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Parse JSONL text.
    pub fn parse(text: &str) -> Result<Self, ReplayError> {
        let mut steps: Vec<ScriptStep> = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let step: ScriptStep = serde_json::from_str(trimmed).map_err(|err| ReplayError::Parse {
                line: idx + 1,
                message: err.to_string(),
            })?;
            if let Some(previous) = steps.last()
                && step.at_ms < previous.at_ms
            {
                return Err(ReplayError::OutOfOrder {
                    line: idx + 1,
                    at_ms: step.at_ms,
                    previous_ms: previous.at_ms,
                });
            }
            steps.push(step);
        }
        Ok(Self { steps })
    }

    /// Load a JSONL script file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serialize back to JSONL.
    pub fn to_jsonl(&self) -> Result<String, ReplayError> {
        let mut out = String::new();
        for (idx, step) in self.steps.iter().enumerate() {
            let line = serde_json::to_string(step).map_err(|err| ReplayError::Parse {
                line: idx + 1,
                message: err.to_string(),
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// Replay against `dispatcher` with step times measured from `epoch`.
    ///
    /// Returns every record produced, in order.
    pub fn replay(&self, dispatcher: &mut RemoteInputDispatcher, epoch: Instant) -> Vec<CommandRecord> {
        let mut records = Vec::new();
        for step in &self.steps {
            let at = epoch + Duration::from_millis(step.at_ms);
            records.extend(dispatcher.tick_at(at));
            if let Some(event) = step.event.to_raw(at) {
                records.extend(dispatcher.handle(event));
            }
        }
        records
    }
}
