#![forbid(unsafe_code)]

//! Focus engine: owns the graph and history and applies focus policy.
//!
//! The engine is the only writer of focus state. Renderers register and
//! unregister nodes; everything else (directional moves, selection, section
//! focus guides, scroll-into-view) goes through here.
//!
//! # Focus recovery
//!
//! Focus is "undefined" when nothing is focused, the focused node was
//! unmounted, or the focused node does not belong to the active section.
//! [`FocusEngine::move_focus_at`] recovers before resolving, using the same
//! preference order as section transitions:
//!
//! 1. The section's configured default focus.
//! 2. The section's remembered focus (last node focused there).
//! 3. The first enabled node of the section.
//!
//! # Scroll into view
//!
//! Every focus change schedules a scroll for the new node. Schedules within
//! the debounce window coalesce; the host sees one
//! [`FocusHost::scroll_into_view`] for the latest focus once
//! [`FocusEngine::tick_at`] observes the window has elapsed.

use std::fmt;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use tenfoot_core::config::EngineConfig;
use tenfoot_core::timer::Debouncer;
use tenfoot_core::{Direction, FocusStrategy, NavigationSection};
use tracing::{debug, debug_span};

use crate::graph::{ContainerId, FocusGraph, FocusId, FocusableNode};
use crate::history::NavigationHistory;
use crate::host::{FocusHost, NullHost};
use crate::spatial::{DirectionalResolver, Resolution};

/// Focus change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    FocusGained { id: FocusId },
    FocusLost { id: FocusId },
    FocusMoved { from: FocusId, to: FocusId },
}

/// Per-section focus descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionConfig {
    /// Node focused whenever the section is entered without focus inside it.
    pub default_focus: Option<FocusId>,
    /// Resolution strategy for directional moves.
    pub strategy: FocusStrategy,
}

impl SectionConfig {
    /// Descriptor with the section's default strategy and no default focus.
    #[must_use]
    pub const fn for_section(section: NavigationSection) -> Self {
        Self {
            default_focus: None,
            strategy: section.default_strategy(),
        }
    }

    #[must_use]
    pub fn with_default_focus(mut self, id: impl Into<FocusId>) -> Self {
        self.default_focus = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: FocusStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Single-threaded focus engine for one screen session.
pub struct FocusEngine {
    graph: FocusGraph,
    history: NavigationHistory,
    resolver: DirectionalResolver,
    sections: FxHashMap<NavigationSection, SectionConfig>,
    active_section: NavigationSection,
    traps: FxHashSet<ContainerId>,
    remembered: FxHashMap<NavigationSection, FocusId>,
    scroll: Debouncer<FocusId>,
    host: Box<dyn FocusHost>,
    last_event: Option<FocusEvent>,
}

impl fmt::Debug for FocusEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusEngine")
            .field("graph", &self.graph)
            .field("history", &self.history)
            .field("active_section", &self.active_section)
            .field("traps", &self.traps)
            .field("pending_scroll", &self.scroll.pending())
            .finish_non_exhaustive()
    }
}

impl Default for FocusEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl FocusEngine {
    /// Create an engine on the home section with a no-op host.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            graph: FocusGraph::new(),
            history: NavigationHistory::new(config.history_depth),
            resolver: DirectionalResolver::new(config.weights),
            sections: FxHashMap::default(),
            active_section: NavigationSection::Home,
            traps: FxHashSet::default(),
            remembered: FxHashMap::default(),
            scroll: Debouncer::new(config.scroll_debounce),
            host: Box::new(NullHost),
            last_event: None,
        }
    }

    /// Builder: install the platform host.
    #[must_use]
    pub fn with_host(mut self, host: impl FocusHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Replace the platform host.
    pub fn set_host(&mut self, host: Box<dyn FocusHost>) {
        self.host = host;
    }

    // --- Mount / unmount ---

    /// Register a mounted node. See [`FocusGraph::register`].
    pub fn register(&mut self, node: FocusableNode) -> bool {
        self.graph.register(node)
    }

    /// Unregister an unmounted node. Focus becomes undefined if it was focused.
    pub fn unregister(&mut self, id: &str) -> Option<FocusableNode> {
        let was_focused = self.graph.focused().is_some_and(|f| f.as_str() == id);
        let removed = self.graph.unregister(id)?;
        if was_focused {
            debug!(id, "focused node unmounted; focus undefined");
            self.last_event = Some(FocusEvent::FocusLost {
                id: removed.id.clone(),
            });
        }
        self.scroll.cancel_if(|pending| pending.as_str() == id);
        Some(removed)
    }

    // --- Accessors ---

    #[must_use]
    pub fn graph(&self) -> &FocusGraph {
        &self.graph
    }

    #[must_use]
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut NavigationHistory {
        &mut self.history
    }

    #[must_use]
    pub fn resolver(&self) -> &DirectionalResolver {
        &self.resolver
    }

    /// Currently focused ID.
    #[must_use]
    pub fn current(&self) -> Option<&FocusId> {
        self.graph.focused()
    }

    #[must_use]
    pub fn active_section(&self) -> NavigationSection {
        self.active_section
    }

    /// Install a section descriptor.
    pub fn configure_section(&mut self, section: NavigationSection, config: SectionConfig) {
        self.sections.insert(section, config);
    }

    /// Descriptor for a section (the built-in one if never configured).
    #[must_use]
    pub fn section_config(&self, section: NavigationSection) -> SectionConfig {
        self.sections
            .get(&section)
            .cloned()
            .unwrap_or_else(|| SectionConfig::for_section(section))
    }

    /// Enable or disable the focus trap of a container.
    pub fn set_trap(&mut self, container: impl Into<ContainerId>, enabled: bool) {
        let container = container.into();
        debug!(container = %container, enabled, "focus trap");
        if enabled {
            self.traps.insert(container);
        } else {
            self.traps.remove(&container);
        }
    }

    #[must_use]
    pub fn is_trapped(&self, container: &str) -> bool {
        self.traps.contains(container)
    }

    /// Number of focused nodes; always 0 or 1.
    #[must_use]
    pub fn focused_count(&self) -> usize {
        self.graph.focused_count()
    }

    /// Get the last focus event.
    #[must_use]
    pub fn focus_event(&self) -> Option<&FocusEvent> {
        self.last_event.as_ref()
    }

    /// Take and clear the last focus event.
    pub fn take_focus_event(&mut self) -> Option<FocusEvent> {
        self.last_event.take()
    }

    // --- Focus ---

    /// Programmatically focus a node.
    pub fn focus(&mut self, id: &str) -> bool {
        self.focus_at(id, Instant::now())
    }

    /// Programmatically focus a node. Returns false for unknown or disabled
    /// nodes; focusing the current node is a successful no-op.
    pub fn focus_at(&mut self, id: &str, now: Instant) -> bool {
        let Some(node) = self.graph.get(id).filter(|n| n.is_focusable()) else {
            debug!(id, "focus request for unknown or disabled node");
            return false;
        };
        if self.graph.focused() == Some(&node.id) {
            return true;
        }
        let id = node.id.clone();
        self.set_focus_at(id, now)
    }

    /// Move focus in `direction`.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        self.move_focus_at(direction, Instant::now())
    }

    /// Move focus in `direction` within the active section.
    ///
    /// Returns true if focus changed, including recovery of undefined focus.
    /// A false return leaves the graph untouched.
    pub fn move_focus_at(&mut self, direction: Direction, now: Instant) -> bool {
        let _span = debug_span!(
            "focus_move",
            ?direction,
            section = %self.active_section
        )
        .entered();

        let Some(origin) = self.valid_current() else {
            let Some(target) = self.preferred_focus(self.active_section) else {
                debug!("focus undefined and section has no focusable node");
                return false;
            };
            debug!(target = %target, "recovering undefined focus");
            return self.set_focus_at(target, now);
        };

        let strategy = self.section_config(self.active_section).strategy;
        let trapped = self.traps.contains(&origin.container);
        let resolution =
            self.resolver
                .resolve(&self.graph, origin.id.as_str(), direction, strategy, trapped);
        match resolution {
            Resolution::Moved(target) => self.set_focus_at(target, now),
            Resolution::Wrapped(target) => {
                debug!(target = %target, "trap wrapped");
                self.set_focus_at(target, now)
            }
            Resolution::NoChange => {
                debug!("no candidate");
                false
            }
        }
    }

    /// Invoke the focused node's select action.
    ///
    /// Returns false (no-op) if nothing is focused, the node is disabled, or
    /// it has no action.
    pub fn select(&mut self) -> bool {
        let Some(node) = self.focused_enabled() else {
            return false;
        };
        let Some(action) = node.action.clone() else {
            debug!(id = %node.id, "focused node has no select action");
            return false;
        };
        let id = node.id.clone();
        debug!(id = %id, "select");
        action.invoke(&id);
        true
    }

    /// Invoke the focused node's long-press action, falling back to select.
    pub fn long_select(&mut self) -> bool {
        let Some(node) = self.focused_enabled() else {
            return false;
        };
        let Some(action) = node.long_action.clone().or_else(|| node.action.clone()) else {
            return false;
        };
        let id = node.id.clone();
        debug!(id = %id, "long select");
        action.invoke(&id);
        true
    }

    // --- Sections ---

    /// Switch the active section and place focus for it.
    pub fn update_focus_guides(&mut self, section: NavigationSection) -> bool {
        self.update_focus_guides_at(section, Instant::now())
    }

    /// Switch the active section and place focus for it.
    ///
    /// Focus that already belongs to `section` is kept. Otherwise focus moves
    /// to the section's default, remembered, or first node; with none, focus
    /// is cleared. Returns true if focus ends up inside `section`.
    pub fn update_focus_guides_at(&mut self, section: NavigationSection, now: Instant) -> bool {
        self.remember_focus();
        let previous = self.active_section;
        self.active_section = section;
        debug!(from = %previous, to = %section, "focus guides");

        if self.valid_current().is_some() {
            return true;
        }
        match self.preferred_focus(section) {
            Some(target) => self.set_focus_at(target, now) || self.valid_current().is_some(),
            None => {
                self.clear_focus();
                false
            }
        }
    }

    /// Remember the current focus for the section it belongs to.
    pub fn remember_focus(&mut self) {
        if let Some(node) = self.graph.focused_node() {
            self.remembered.insert(node.section, node.id.clone());
        }
    }

    /// Where focus would land when entering `section`.
    #[must_use]
    pub fn preferred_focus(&self, section: NavigationSection) -> Option<FocusId> {
        let eligible = |id: &FocusId| {
            self.graph
                .get(id.as_str())
                .is_some_and(|n| n.section == section && n.is_focusable())
        };
        if let Some(id) = self
            .sections
            .get(&section)
            .and_then(|c| c.default_focus.as_ref())
            .filter(|&id| eligible(id))
        {
            return Some(id.clone());
        }
        if let Some(id) = self.remembered.get(&section).filter(|&id| eligible(id)) {
            return Some(id.clone());
        }
        self.graph
            .first_focusable_in(section)
            .map(|n| n.id.clone())
    }

    /// Tear down the session: graph, history, memory, traps and pending
    /// scroll are all dropped. Section descriptors survive.
    pub fn reset_navigation(&mut self) {
        debug!(nodes = self.graph.len(), history = self.history.len(), "reset navigation");
        self.graph.clear();
        self.history.clear();
        self.remembered.clear();
        self.traps.clear();
        self.scroll.cancel();
        self.active_section = NavigationSection::Home;
        self.last_event = None;
    }

    // --- Deferred work ---

    /// Flush a due scroll-into-view.
    pub fn tick(&mut self) -> Option<FocusId> {
        self.tick_at(Instant::now())
    }

    /// Flush a due scroll-into-view. Returns the scrolled node.
    pub fn tick_at(&mut self, now: Instant) -> Option<FocusId> {
        let id = self.scroll.tick_at(now)?;
        if !self.graph.contains(id.as_str()) {
            return None;
        }
        debug!(id = %id, "scroll into view");
        self.host.scroll_into_view(&id);
        Some(id)
    }

    /// Node waiting for scroll-into-view.
    #[must_use]
    pub fn pending_scroll(&self) -> Option<&FocusId> {
        self.scroll.pending()
    }

    /// Time until the pending scroll fires.
    #[must_use]
    pub fn time_until_scroll(&self, now: Instant) -> Option<Duration> {
        self.scroll.time_until_fire(now)
    }

    // --- Internals ---

    /// Focused node if it is enabled and in the active section.
    fn valid_current(&self) -> Option<&FocusableNode> {
        self.graph
            .focused_node()
            .filter(|n| n.section == self.active_section && n.is_focusable())
    }

    fn focused_enabled(&self) -> Option<&FocusableNode> {
        self.graph.focused_node().filter(|n| n.is_focusable())
    }

    fn set_focus_at(&mut self, id: FocusId, now: Instant) -> bool {
        let prev = self.graph.focused().cloned();
        if prev.as_ref() == Some(&id) {
            return false;
        }
        if !self.graph.set_focused(id.as_str()) {
            return false;
        }

        self.host.apply_focus_visual(prev.as_ref(), Some(&id));
        if let Some(node) = self.graph.get(id.as_str()) {
            if let Some(label) = node.label.as_deref() {
                self.host.announce(label);
            }
            self.remembered.insert(node.section, id.clone());
        }

        let coalesced = self.scroll.schedule_at(id.clone(), now);
        debug!(from = ?prev.as_ref().map(FocusId::as_str), to = %id, coalesced, "focus changed");
        self.last_event = Some(match prev {
            Some(from) => FocusEvent::FocusMoved { from, to: id },
            None => FocusEvent::FocusGained { id },
        });
        true
    }

    fn clear_focus(&mut self) {
        if let Some(prev) = self.graph.clear_focus() {
            self.host.apply_focus_visual(Some(&prev), None);
            self.scroll.cancel_if(|pending| *pending == prev);
            self.last_event = Some(FocusEvent::FocusLost { id: prev });
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
