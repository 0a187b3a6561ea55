#![forbid(unsafe_code)]

//! Normalized input events delivered by platform adapters.
//!
//! Every platform source (Leanback key events, tvOS presses and touch-surface
//! samples, DOM keyboard events on Smart TV browsers) is mapped onto
//! [`RawEvent`] before it reaches the dispatcher. Nothing downstream inspects
//! platform key codes.
//!
//! # Invariants
//! 1. A [`PointerEvent`] sequence is `Down` → zero or more `Move` → `Up` or `Cancel`.
//! 2. `KeyKind::Release` never produces a command (press and repeat do).
//! 3. [`GestureEvent::direction`] is set for swipes and pans only.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Cardinal navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns true for horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Dominant-axis direction of a screen-space displacement.
    ///
    /// Screen `y` grows downward. Ties between the axes resolve horizontally.
    /// Returns `None` for a zero displacement.
    #[must_use]
    pub fn from_delta(dx: f32, dy: f32) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if dy > 0.0 { Self::Down } else { Self::Up })
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteButton
// ---------------------------------------------------------------------------

/// A remote-control button after platform normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteButton {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Menu,
    PlayPause,
    Play,
    Pause,
    FastForward,
    Rewind,
}

impl RemoteButton {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Select => "select",
            Self::Back => "back",
            Self::Menu => "menu",
            Self::PlayPause => "play_pause",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::FastForward => "fast_forward",
            Self::Rewind => "rewind",
        }
    }

    /// Direction carried by a d-pad button.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// The d-pad button for a direction.
    #[must_use]
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }

    /// Whether this is a back-style button (tvOS Menu, Android Back, web Escape).
    #[must_use]
    pub const fn is_back(self) -> bool {
        matches!(self, Self::Back | Self::Menu)
    }
}

impl fmt::Display for RemoteButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for key names no platform mapping knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown remote key {:?}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for RemoteButton {
    type Err = UnknownKey;

    /// Parse a platform key name.
    ///
    /// Accepts the canonical names (`up`, `play_pause`, ...), DOM `KeyboardEvent.key`
    /// values (`ArrowUp`, `Enter`, `Escape`, `MediaPlayPause`, ...), Android
    /// `KEYCODE_*` names, and the Tizen/webOS `XF86Back` alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let normalized = key
            .strip_prefix("KEYCODE_")
            .unwrap_or(key)
            .replace(['_', '-'], "")
            .to_ascii_lowercase();
        let button = match normalized.as_str() {
            "up" | "arrowup" | "dpadup" => Self::Up,
            "down" | "arrowdown" | "dpaddown" => Self::Down,
            "left" | "arrowleft" | "dpadleft" => Self::Left,
            "right" | "arrowright" | "dpadright" => Self::Right,
            "select" | "enter" | "ok" | "dpadcenter" => Self::Select,
            "back" | "escape" | "backspace" | "xf86back" | "goback" => Self::Back,
            "menu" | "contextmenu" => Self::Menu,
            "playpause" | "mediaplaypause" => Self::PlayPause,
            "play" | "mediaplay" => Self::Play,
            "pause" | "mediapause" => Self::Pause,
            "fastforward" | "mediafastforward" => Self::FastForward,
            "rewind" | "mediarewind" => Self::Rewind,
            _ => return Err(UnknownKey(key.to_string())),
        };
        Ok(button)
    }
}

// ---------------------------------------------------------------------------
// Key and pointer events
// ---------------------------------------------------------------------------

/// Key transition reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    #[default]
    Press,
    /// Auto-repeat while the button is held.
    Repeat,
    Release,
}

/// A discrete remote/keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub button: RemoteButton,
    pub kind: KeyKind,
    pub timestamp: Instant,
}

impl KeyEvent {
    /// A key press.
    #[must_use]
    pub const fn press(button: RemoteButton, timestamp: Instant) -> Self {
        Self {
            button,
            kind: KeyKind::Press,
            timestamp,
        }
    }

    /// Builder: set the key transition.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Phase of a pointer / touch-surface sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The sequence was interrupted (dragged off-surface, system gesture).
    Cancel,
}

/// A raw pointer or touch-surface sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub timestamp: Instant,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Point, timestamp: Instant) -> Self {
        Self {
            phase,
            position,
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// GestureEvent
// ---------------------------------------------------------------------------

/// Kind of a classified gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    LongPress,
    Swipe,
    Pan,
    /// Only produced by platform recognizers; the classifier never emits it.
    Pinch,
}

/// A classified gesture. Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Where the press started.
    pub origin: Point,
    /// Dominant direction for swipes and pans.
    pub direction: Option<Direction>,
    /// Time from press to classification.
    pub duration: Duration,
}

impl GestureEvent {
    #[must_use]
    pub const fn new(kind: GestureKind, origin: Point, duration: Duration) -> Self {
        Self {
            kind,
            origin,
            direction: None,
            duration,
        }
    }

    /// Builder: set the direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

// ---------------------------------------------------------------------------
// Playback notifications
// ---------------------------------------------------------------------------

/// State changes reported back by the media playback controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackNotification {
    Playing,
    Paused,
    Finished,
    Failed,
}

impl PlaybackNotification {
    /// Whether playback ended and the surface should return to browsing.
    #[must_use]
    pub const fn ends_playback(self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

// ---------------------------------------------------------------------------
// RawEvent
// ---------------------------------------------------------------------------

/// Everything the dispatcher accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    /// Discrete remote/keyboard input.
    Key(KeyEvent),
    /// Raw pointer sample to be classified.
    Pointer(PointerEvent),
    /// Gesture already classified by a platform recognizer.
    Gesture {
        gesture: GestureEvent,
        timestamp: Instant,
    },
    /// Notification from the playback controller.
    Playback(PlaybackNotification),
}

impl RawEvent {
    /// Convenience: a key press.
    #[must_use]
    pub const fn key(button: RemoteButton, timestamp: Instant) -> Self {
        Self::Key(KeyEvent::press(button, timestamp))
    }

    /// Convenience: a pointer sample.
    #[must_use]
    pub const fn pointer(phase: PointerPhase, position: Point, timestamp: Instant) -> Self {
        Self::Pointer(PointerEvent::new(phase, position, timestamp))
    }
}
