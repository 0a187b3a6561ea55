#![forbid(unsafe_code)]

//! Focus management for the 10-foot surface.
//!
//! - [`FocusGraph`]: mounted focusable nodes, insertion-ordered, at most one focused.
//! - [`DirectionalResolver`]: (current focus, direction) → next focus.
//! - [`NavigationHistory`]: section back-stack.
//! - [`FocusEngine`]: owns graph and history; move/select/guides/reset policy.
//! - [`FocusHost`]: per-platform capability interface for focus visuals,
//!   scroll-into-view, and accessibility announcements.

pub mod engine;
pub mod graph;
pub mod history;
pub mod host;
pub mod spatial;

pub use engine::{FocusEngine, FocusEvent, SectionConfig};
pub use graph::{ContainerId, FocusGraph, FocusId, FocusableNode, GridPosition, SelectAction};
pub use history::{NavigationHistory, NavigationHistoryEntry};
pub use host::{FocusHost, NullHost};
pub use spatial::{DirectionalResolver, Resolution};
