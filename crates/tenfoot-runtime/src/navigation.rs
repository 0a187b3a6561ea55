#![forbid(unsafe_code)]

//! Section navigation and input-routing context.
//!
//! [`NavigationManager`] owns the [`FocusEngine`] for one screen session and
//! drives section transitions through it. The active section lives in the
//! engine (so focus guides and section never disagree); the manager adds the
//! routing context, the modal stack, and a bounded event queue for the host.
//! A host that never drains the queue loses the oldest events first.
//!
//! # Transitions
//!
//! | Call | History | Modal stack | Context |
//! |------|---------|-------------|---------|
//! | `push(s)` | push current | cleared | entry context of `s` |
//! | `pop()` | pop | cleared | entry context of destination |
//! | `modal(s)` | untouched | push current | unchanged |
//! | `dismiss()` | untouched | pop | unchanged |
//!
//! Initial state is home / browse. There is no terminal state.
//!
//! # Back navigation
//!
//! [`NavigationManager::handle_back_navigation_at`] dismisses the top modal if
//! one is open, otherwise closes the menu overlay (menu -> browse), otherwise
//! pops history. With none of those available it reports false.

use std::collections::VecDeque;
use std::time::Instant;

use tenfoot_core::config::EngineConfig;
use tenfoot_core::{NavigationContext, NavigationSection};
use tenfoot_focus::{FocusEngine, NavigationHistoryEntry};
use tracing::debug;

/// Pending host notifications kept before the oldest is dropped.
pub const EVENT_CAPACITY: usize = 64;

/// How a section change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Push,
    Pop,
    Modal,
    Dismiss,
}

/// Notification for the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    SectionChanged {
        from: NavigationSection,
        to: NavigationSection,
        transition: Transition,
    },
    ContextChanged {
        from: NavigationContext,
        to: NavigationContext,
    },
    /// Navigation chrome (tab bar, headers) should be shown or hidden.
    ChromeVisibility { visible: bool },
}

/// Section/context state machine for one screen session.
#[derive(Debug)]
pub struct NavigationManager {
    engine: FocusEngine,
    context: NavigationContext,
    /// Sections covered by open modals, bottom first.
    modals: Vec<NavigationSection>,
    events: VecDeque<NavigationEvent>,
    dropped_events: u64,
}

impl Default for NavigationManager {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl NavigationManager {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_engine(FocusEngine::new(config))
    }

    /// Wrap an existing engine (typically one with a platform host attached).
    #[must_use]
    pub fn with_engine(engine: FocusEngine) -> Self {
        Self {
            engine,
            context: NavigationContext::Browse,
            modals: Vec::new(),
            events: VecDeque::with_capacity(EVENT_CAPACITY),
            dropped_events: 0,
        }
    }

    // --- State ---

    #[must_use]
    pub fn section(&self) -> NavigationSection {
        self.engine.active_section()
    }

    #[must_use]
    pub fn context(&self) -> NavigationContext {
        self.context
    }

    #[must_use]
    pub fn engine(&self) -> &FocusEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FocusEngine {
        &mut self.engine
    }

    /// Number of open modals.
    #[must_use]
    pub fn modal_depth(&self) -> usize {
        self.modals.len()
    }

    /// Chrome is hidden only during playback.
    #[must_use]
    pub fn is_chrome_visible(&self) -> bool {
        self.context != NavigationContext::Playback
    }

    /// Pending host notifications, oldest first.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &NavigationEvent> + '_ {
        self.events.iter()
    }

    /// Drain pending host notifications.
    pub fn take_events(&mut self) -> Vec<NavigationEvent> {
        self.events.drain(..).collect()
    }

    /// Events evicted because the host did not drain the queue in time.
    #[must_use]
    pub const fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    // --- Forward / back ---

    pub fn push(&mut self, section: NavigationSection) -> bool {
        self.push_at(section, Instant::now())
    }

    /// Navigate forward to `section`.
    ///
    /// Returns false if `section` is already current or has been retired.
    pub fn push_at(&mut self, section: NavigationSection, now: Instant) -> bool {
        let current = self.section();
        if section == current || self.engine.history().is_retired(section) {
            debug!(from = %current, to = %section, "push rejected");
            return false;
        }
        // Forward navigation closes open modals; history records the section
        // underneath them.
        let base = self.modals.first().copied().unwrap_or(current);
        self.modals.clear();
        self.engine
            .history_mut()
            .push(NavigationHistoryEntry::new(base, now));
        self.transition_at(section, Transition::Push, now);
        self.apply_context_at(section.entry_context(), now);
        true
    }

    pub fn pop(&mut self) -> bool {
        self.pop_at(Instant::now())
    }

    /// Return to the previous section. False when history is empty.
    pub fn pop_at(&mut self, now: Instant) -> bool {
        let Some(entry) = self.engine.history_mut().pop() else {
            debug!("pop on empty history");
            return false;
        };
        self.modals.clear();
        self.transition_at(entry.section, Transition::Pop, now);
        self.apply_context_at(entry.section.entry_context(), now);
        true
    }

    pub fn modal(&mut self, section: NavigationSection) -> bool {
        self.modal_at(section, Instant::now())
    }

    /// Open `section` as a modal over the current one. Context is unchanged.
    pub fn modal_at(&mut self, section: NavigationSection, now: Instant) -> bool {
        let current = self.section();
        if section == current || self.engine.history().is_retired(section) {
            debug!(from = %current, to = %section, "modal rejected");
            return false;
        }
        self.modals.push(current);
        self.transition_at(section, Transition::Modal, now);
        true
    }

    pub fn dismiss(&mut self) -> bool {
        self.dismiss_at(Instant::now())
    }

    /// Close the top modal. False when no modal is open.
    pub fn dismiss_at(&mut self, now: Instant) -> bool {
        let Some(covered) = self.modals.pop() else {
            return false;
        };
        self.transition_at(covered, Transition::Dismiss, now);
        true
    }

    pub fn handle_back_navigation(&mut self) -> bool {
        self.handle_back_navigation_at(Instant::now())
    }

    /// Back/menu key in browse or menu context.
    pub fn handle_back_navigation_at(&mut self, now: Instant) -> bool {
        if !self.modals.is_empty() {
            return self.dismiss_at(now);
        }
        if self.context == NavigationContext::Menu {
            return self.update_navigation_context_at(NavigationContext::Browse, now);
        }
        self.pop_at(now)
    }

    // --- Context ---

    pub fn update_navigation_context(&mut self, context: NavigationContext) -> bool {
        self.update_navigation_context_at(context, Instant::now())
    }

    /// Switch the routing context. Returns false if it is already active.
    ///
    /// Entering playback hides chrome; leaving it shows chrome and restores
    /// the focus guide of the active section.
    pub fn update_navigation_context_at(&mut self, context: NavigationContext, now: Instant) -> bool {
        if context == self.context {
            return false;
        }
        self.apply_context_at(context, now);
        true
    }

    // --- Section availability ---

    /// Mark a section permanently unmountable. Purges it from history and
    /// from under open modals; returns the number of purged history entries.
    pub fn retire_section(&mut self, section: NavigationSection) -> usize {
        self.modals.retain(|s| *s != section);
        let purged = self.engine.history_mut().retire(section);
        debug!(section = %section, purged, "section retired");
        purged
    }

    /// Re-enable a retired section.
    pub fn restore_section(&mut self, section: NavigationSection) -> bool {
        self.engine.history_mut().restore(section)
    }

    /// Tear down the session: focus graph, history, modals and queued events.
    /// Returns to home / browse.
    pub fn reset(&mut self) {
        self.engine.reset_navigation();
        self.modals.clear();
        self.events.clear();
        self.context = NavigationContext::Browse;
    }

    // --- Internals ---

    fn emit(&mut self, event: NavigationEvent) {
        if self.events.len() == EVENT_CAPACITY {
            self.events.pop_front();
            self.dropped_events += 1;
        }
        self.events.push_back(event);
    }

    fn transition_at(&mut self, to: NavigationSection, transition: Transition, now: Instant) {
        let from = self.section();
        self.engine.update_focus_guides_at(to, now);
        debug!(from = %from, to = %to, ?transition, "section transition");
        self.emit(NavigationEvent::SectionChanged {
            from,
            to,
            transition,
        });
    }

    fn apply_context_at(&mut self, context: NavigationContext, now: Instant) {
        let from = self.context;
        if from == context {
            return;
        }
        self.context = context;
        debug!(from = %from, to = %context, "navigation context");
        self.emit(NavigationEvent::ContextChanged { from, to: context });

        let was_visible = from != NavigationContext::Playback;
        let visible = self.is_chrome_visible();
        if was_visible != visible {
            self.emit(NavigationEvent::ChromeVisibility { visible });
        }
        if from == NavigationContext::Playback {
            let section = self.section();
            self.engine.update_focus_guides_at(section, now);
        }
    }
}
