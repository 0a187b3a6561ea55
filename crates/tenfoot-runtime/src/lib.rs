#![forbid(unsafe_code)]

//! Runtime layer for the 10-foot surface.
//!
//! - [`NavigationManager`]: current section/context, push/pop/modal/dismiss.
//! - [`RemoteInputDispatcher`]: the single entry point for remote input;
//!   serializes commands through a FIFO queue and routes them by context.
//! - [`PlaybackController`]: hand-off target for media commands.
//! - [`TelemetryLog`] / [`TelemetrySink`]: command-completed records.

pub mod dispatcher;
pub mod navigation;
pub mod playback;
pub mod telemetry;

pub use dispatcher::{InputSender, RemoteInputDispatcher};
pub use navigation::{EVENT_CAPACITY, NavigationEvent, NavigationManager, Transition};
pub use playback::{NullPlayback, PlaybackCommand, PlaybackController, PlaybackError, PlaybackRoute};
pub use telemetry::{CommandOutcome, CommandRecord, TelemetryLog, TelemetrySink};
