#![forbid(unsafe_code)]

//! Playback controller hand-off.
//!
//! In playback context the dispatcher does not move focus. Remote buttons
//! become [`PlaybackCommand`]s for the host's media player instead:
//!
//! | Button | Route |
//! |--------|-------|
//! | Up / Down | `VolumeChange { +step / -step }` |
//! | Left / Rewind | `Seek { -step }` |
//! | Right / FastForward | `Seek { +step }` |
//! | Select / PlayPause | `TogglePlayPause` |
//! | Play / Pause | `Play` / `Pause` |
//! | Back / Menu | leave playback |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tenfoot_core::RemoteButton;

/// Command forwarded verbatim to the media player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackCommand {
    Play,
    Pause,
    TogglePlayPause,
    /// Relative seek; negative rewinds.
    Seek { offset_ms: i64 },
    /// Relative volume change in player units.
    VolumeChange { delta: i32 },
}

impl PlaybackCommand {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::TogglePlayPause => "toggle_play_pause",
            Self::Seek { .. } => "seek",
            Self::VolumeChange { .. } => "volume_change",
        }
    }
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seek { offset_ms } => write!(f, "seek({offset_ms:+}ms)"),
            Self::VolumeChange { delta } => write!(f, "volume_change({delta:+})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Where a playback-context button goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackRoute {
    Command(PlaybackCommand),
    /// Return to browse context and restore chrome.
    LeavePlayback,
}

impl PlaybackRoute {
    /// Route a button pressed in playback context.
    #[must_use]
    pub fn for_button(button: RemoteButton, seek_step: Duration, volume_step: i32) -> Self {
        let seek_ms = i64::try_from(seek_step.as_millis()).unwrap_or(i64::MAX);
        let command = match button {
            RemoteButton::Up => PlaybackCommand::VolumeChange { delta: volume_step },
            RemoteButton::Down => PlaybackCommand::VolumeChange {
                delta: volume_step.saturating_neg(),
            },
            RemoteButton::Left | RemoteButton::Rewind => PlaybackCommand::Seek {
                offset_ms: seek_ms.saturating_neg(),
            },
            RemoteButton::Right | RemoteButton::FastForward => {
                PlaybackCommand::Seek { offset_ms: seek_ms }
            }
            RemoteButton::Select | RemoteButton::PlayPause => PlaybackCommand::TogglePlayPause,
            RemoteButton::Play => PlaybackCommand::Play,
            RemoteButton::Pause => PlaybackCommand::Pause,
            RemoteButton::Back | RemoteButton::Menu => return Self::LeavePlayback,
        };
        Self::Command(command)
    }
}

/// Why the player rejected a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Nothing is loaded.
    NoMedia,
    /// The player cannot perform this command (e.g. seeking a live stream).
    Unsupported(PlaybackCommand),
    /// Player-specific failure.
    Controller(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMedia => f.write_str("no media loaded"),
            Self::Unsupported(cmd) => write!(f, "unsupported playback command: {cmd}"),
            Self::Controller(msg) => write!(f, "playback controller error: {msg}"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Host media player.
///
/// Playback state notifications (finished, failed) flow back through the
/// dispatcher queue as [`tenfoot_core::event::PlaybackNotification`]s; the
/// controller never calls into the engine directly.
pub trait PlaybackController: Send {
    fn execute(&mut self, command: PlaybackCommand) -> Result<(), PlaybackError>;
}

impl<P: PlaybackController + ?Sized> PlaybackController for Box<P> {
    fn execute(&mut self, command: PlaybackCommand) -> Result<(), PlaybackError> {
        (**self).execute(command)
    }
}

/// Controller used until the host attaches a player.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayback;

impl PlaybackController for NullPlayback {
    fn execute(&mut self, _command: PlaybackCommand) -> Result<(), PlaybackError> {
        Err(PlaybackError::NoMedia)
    }
}
