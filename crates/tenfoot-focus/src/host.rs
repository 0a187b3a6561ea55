#![forbid(unsafe_code)]

//! Platform capability interface.
//!
//! Each platform adapter (Android TV, tvOS, web) implements [`FocusHost`] to
//! render focus visuals and scroll the focused node into view. The engine
//! calls these synchronously from its own thread; none of them may call back
//! into the engine.

use crate::graph::FocusId;

/// Hooks the engine invokes when focus changes.
pub trait FocusHost: Send {
    /// Move the focus visual (scale, halo) from `prev` to `next`.
    fn apply_focus_visual(&mut self, prev: Option<&FocusId>, next: Option<&FocusId>) {
        let _ = (prev, next);
    }

    /// Scroll the containing view so `id` is visible. Debounced by the engine.
    fn scroll_into_view(&mut self, id: &FocusId) {
        let _ = id;
    }

    /// Screen-reader announcement for the newly focused node.
    fn announce(&mut self, label: &str) {
        let _ = label;
    }
}

/// Host that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl FocusHost for NullHost {}

impl<H: FocusHost + ?Sized> FocusHost for Box<H> {
    fn apply_focus_visual(&mut self, prev: Option<&FocusId>, next: Option<&FocusId>) {
        (**self).apply_focus_visual(prev, next);
    }

    fn scroll_into_view(&mut self, id: &FocusId) {
        (**self).scroll_into_view(id);
    }

    fn announce(&mut self, label: &str) {
        (**self).announce(label);
    }
}
