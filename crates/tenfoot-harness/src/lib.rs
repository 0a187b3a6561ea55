#![forbid(unsafe_code)]

//! Test harness for Tenfoot.
//!
//! - [`fixtures`]: grid node builders.
//! - [`doubles`]: recording [`tenfoot_focus::FocusHost`] and
//!   [`tenfoot_runtime::PlaybackController`] implementations.
//! - [`script`]: JSONL input scripts replayed against a dispatcher.

pub mod doubles;
pub mod fixtures;
pub mod script;

pub use doubles::{HostCall, RecordingHost, RecordingPlayback};
pub use fixtures::GridFixture;
pub use script::{InputScript, ReplayError, ScriptEvent, ScriptStep};
