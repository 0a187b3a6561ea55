#![forbid(unsafe_code)]

//! Core: layout geometry, remote input events, gestures, timers, and config.
//!
//! # Role in Tenfoot
//! `tenfoot-core` is the input layer. It owns the normalized event types the
//! platform adapters deliver (remote keys, pointer/touch-surface samples,
//! pre-classified gestures, playback notifications), the gesture classifier
//! that turns pointer sequences into discrete gestures, and the section and
//! context enums every other crate routes on.
//!
//! # Primary responsibilities
//! - **Geometry**: layout-space rectangles and points reported by renderers.
//! - **Event**: remote buttons, key/pointer events, [`event::RawEvent`].
//! - **Command**: the immutable [`command::RemoteCommand`] record.
//! - **Gesture**: tap / long-press / swipe / pan classification.
//! - **Timer**: cancellable deadlines and trailing debouncers.
//! - **Config**: [`config::EngineConfig`] with `TENFOOT_*` env overrides.
//!
//! # How it fits in the system
//! `tenfoot-focus` builds the focus graph and resolver on top of these types,
//! and `tenfoot-runtime` consumes [`event::RawEvent`] values in its dispatcher.

pub mod command;
pub mod config;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod navigation;
pub mod timer;

pub use command::RemoteCommand;
pub use config::EngineConfig;
pub use event::{Direction, RawEvent, RemoteButton};
pub use navigation::{FocusStrategy, NavigationContext, NavigationSection};
