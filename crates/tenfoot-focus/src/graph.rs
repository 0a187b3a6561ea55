#![forbid(unsafe_code)]

//! Model of the currently mounted focusable nodes.
//!
//! Renderers register a [`FocusableNode`] when content mounts and unregister
//! it when it unmounts. The graph never garbage-collects: a node lives until
//! it is explicitly unregistered or the graph is cleared.
//!
//! # Invariants
//!
//! 1. Node IDs are unique within the graph.
//! 2. Iteration follows insertion order; re-registering an existing ID
//!    replaces the node in place and keeps its position.
//! 3. At most one node is focused, and the focused ID is always registered
//!    (unregistering the focused node leaves focus undefined).
//! 4. Every node belongs to exactly one [`NavigationSection`].
//!
//! # Complexity
//!
//! | Operation | Time |
//! |-----------|------|
//! | register | O(log n) |
//! | unregister | O(log n) |
//! | get | O(log n) |
//! | nodes_in_section | O(n), lazy |

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tenfoot_core::NavigationSection;
use tenfoot_core::geometry::{Point, Rect};
use tracing::warn;

/// Stable identifier of a focusable node, chosen by the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FocusId(String);

impl FocusId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-blank and free of control characters.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.0.trim().is_empty() && !self.0.chars().any(char::is_control)
    }
}

impl From<&str> for FocusId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FocusId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for FocusId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FocusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the container (row, carousel, control bar) a node sits in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    /// Container used when the renderer does not name one.
    pub const ROOT: &'static str = "root";

    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new(Self::ROOT)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContainerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ContainerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical position inside a grid container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
}

impl GridPosition {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Callback run when a node is selected.
#[derive(Clone)]
pub struct SelectAction(Arc<dyn Fn(&FocusId) + Send + Sync>);

impl SelectAction {
    #[must_use]
    pub fn new(action: impl Fn(&FocusId) + Send + Sync + 'static) -> Self {
        Self(Arc::new(action))
    }

    pub fn invoke(&self, id: &FocusId) {
        (self.0)(id);
    }
}

impl fmt::Debug for SelectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SelectAction(..)")
    }
}

/// A focusable element reported by the content renderer.
#[derive(Clone, Debug)]
pub struct FocusableNode {
    /// Stable identifier.
    pub id: FocusId,
    /// Section whose subtree owns the node.
    pub section: NavigationSection,
    /// Row, carousel, or control bar the node belongs to.
    pub container: ContainerId,
    /// Bounding rectangle in layout space. Virtualized items that are off
    /// screen may have none.
    pub bounds: Option<Rect>,
    /// Logical row/column inside a grid container.
    pub grid: Option<GridPosition>,
    /// Disabled nodes are never focus candidates and ignore select.
    pub disabled: bool,
    /// Accessibility label announced when the node gains focus.
    pub label: Option<String>,
    /// Primary select action.
    pub action: Option<SelectAction>,
    /// Long-press action; falls back to `action` when absent.
    pub long_action: Option<SelectAction>,
}

impl FocusableNode {
    /// Create an enabled node in the root container with no geometry.
    #[must_use]
    pub fn new(id: impl Into<FocusId>, section: NavigationSection) -> Self {
        Self {
            id: id.into(),
            section,
            container: ContainerId::default(),
            bounds: None,
            grid: None,
            disabled: false,
            label: None,
            action: None,
            long_action: None,
        }
    }

    /// Builder: set the bounding rectangle.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Builder: set the grid position.
    #[must_use]
    pub fn with_grid(mut self, row: u32, col: u32) -> Self {
        self.grid = Some(GridPosition::new(row, col));
        self
    }

    /// Builder: set the container.
    #[must_use]
    pub fn with_container(mut self, container: impl Into<ContainerId>) -> Self {
        self.container = container.into();
        self
    }

    /// Builder: set the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Builder: set the accessibility label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set the select action.
    #[must_use]
    pub fn with_action(mut self, action: impl Fn(&FocusId) + Send + Sync + 'static) -> Self {
        self.action = Some(SelectAction::new(action));
        self
    }

    /// Builder: set the long-press action.
    #[must_use]
    pub fn with_long_action(mut self, action: impl Fn(&FocusId) + Send + Sync + 'static) -> Self {
        self.long_action = Some(SelectAction::new(action));
        self
    }

    /// Whether the node can take focus.
    #[inline]
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        !self.disabled
    }

    /// Center of valid bounds, if any.
    #[must_use]
    pub fn center(&self) -> Option<Point> {
        self.bounds.filter(Rect::is_valid).map(|b| b.center())
    }
}

/// Insertion-ordered collection of focusable nodes with a single focus slot.
#[derive(Debug, Default)]
pub struct FocusGraph {
    /// Nodes keyed by insertion sequence.
    nodes: BTreeMap<u64, FocusableNode>,
    index: FxHashMap<FocusId, u64>,
    next_seq: u64,
    focused: Option<FocusId>,
}

impl FocusGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node. Returns false (and logs) for malformed IDs.
    ///
    /// Never fails otherwise: mount/unmount races are expected, so a
    /// replacement simply wins.
    pub fn register(&mut self, node: FocusableNode) -> bool {
        if !node.id.is_well_formed() {
            warn!(id = ?node.id.as_str(), "ignoring focusable node with malformed id");
            return false;
        }
        match self.index.get(&node.id) {
            Some(&seq) => {
                self.nodes.insert(seq, node);
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.index.insert(node.id.clone(), seq);
                self.nodes.insert(seq, node);
            }
        }
        true
    }

    /// Remove a node. If it was focused, focus becomes undefined.
    #[must_use = "use the removed node (if any)"]
    pub fn unregister(&mut self, id: &str) -> Option<FocusableNode> {
        let seq = self.index.remove(id)?;
        if self.focused.as_ref().is_some_and(|f| f.as_str() == id) {
            self.focused = None;
        }
        self.nodes.remove(&seq)
    }

    /// Look up a node by ID.
    #[must_use = "use the returned node (if any)"]
    pub fn get(&self, id: &str) -> Option<&FocusableNode> {
        let seq = self.index.get(id)?;
        self.nodes.get(seq)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty (no nodes).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &FocusableNode> + Clone + '_ {
        self.nodes.values()
    }

    /// Nodes of one section in insertion order.
    ///
    /// Lazy and restartable: call again (or clone the iterator) to restart.
    pub fn nodes_in_section(
        &self,
        section: NavigationSection,
    ) -> impl Iterator<Item = &FocusableNode> + Clone + '_ {
        self.nodes.values().filter(move |n| n.section == section)
    }

    /// First enabled node of a section.
    #[must_use]
    pub fn first_focusable_in(&self, section: NavigationSection) -> Option<&FocusableNode> {
        self.nodes_in_section(section).find(|n| n.is_focusable())
    }

    /// Insertion rank of a node; lower ranks were registered earlier.
    #[must_use]
    pub fn insertion_rank(&self, id: &str) -> Option<u64> {
        self.index.get(id).copied()
    }

    /// Currently focused ID.
    #[inline]
    #[must_use]
    pub fn focused(&self) -> Option<&FocusId> {
        self.focused.as_ref()
    }

    /// Currently focused node.
    #[must_use]
    pub fn focused_node(&self) -> Option<&FocusableNode> {
        self.get(self.focused.as_ref()?.as_str())
    }

    /// Number of focused nodes; always 0 or 1.
    #[must_use]
    pub fn focused_count(&self) -> usize {
        self.focused
            .iter()
            .filter(|id| self.contains(id.as_str()))
            .count()
    }

    /// Mark a registered node as focused. Only the engine moves focus.
    pub(crate) fn set_focused(&mut self, id: &str) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        self.focused = Some(node.id.clone());
        true
    }

    pub(crate) fn clear_focus(&mut self) -> Option<FocusId> {
        self.focused.take()
    }

    /// Remove every node and the focus.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.focused = None;
        self.next_seq = 0;
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: NavigationSection = NavigationSection::Home;
    const LIBRARY: NavigationSection = NavigationSection::Library;

    fn node(id: &str) -> FocusableNode {
        FocusableNode::new(id, HOME).with_bounds(Rect::new(0.0, 0.0, 100.0, 50.0))
    }

    #[test]
    fn empty_graph() {
        let g = FocusGraph::new();
        assert!(g.is_empty());
        assert_eq!(g.len(), 0);
        assert_eq!(g.focused(), None);
        assert_eq!(g.focused_count(), 0);
    }

    #[test]
    fn register_node() {
        let mut g = FocusGraph::new();
        assert!(g.register(node("a")));
        assert_eq!(g.len(), 1);
        assert!(g.contains("a"));
        assert_eq!(g.get("a").unwrap().section, HOME);
    }

    #[test]
    fn register_replaces_in_place() {
        let mut g = FocusGraph::new();
        g.register(node("a"));
        g.register(node("b"));
        g.register(node("a").with_bounds(Rect::new(5.0, 5.0, 20.0, 20.0)));
        assert_eq!(g.len(), 2);
        assert_eq!(g.get("a").unwrap().bounds, Some(Rect::new(5.0, 5.0, 20.0, 20.0)));
        let order: Vec<_> = g.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert!(g.insertion_rank("a") < g.insertion_rank("b"));
    }

    #[test]
    fn malformed_ids_are_ignored() {
        let mut g = FocusGraph::new();
        assert!(!g.register(node("")));
        assert!(!g.register(node("   ")));
        assert!(!g.register(node("tile\n3")));
        assert!(g.is_empty());
    }

    #[test]
    fn unregister_node() {
        let mut g = FocusGraph::new();
        g.register(node("a"));
        let removed = g.unregister("a");
        assert_eq!(removed.map(|n| n.id), Some(FocusId::from("a")));
        assert!(g.is_empty());
        assert!(g.unregister("a").is_none());
    }

    #[test]
    fn unregister_focused_leaves_focus_undefined() {
        let mut g = FocusGraph::new();
        g.register(node("a"));
        g.register(node("b"));
        assert!(g.set_focused("a"));
        assert_eq!(g.focused_count(), 1);
        let _ = g.unregister("a");
        assert_eq!(g.focused(), None);
        assert_eq!(g.focused_count(), 0);
    }

    #[test]
    fn set_focused_requires_registration() {
        let mut g = FocusGraph::new();
        assert!(!g.set_focused("ghost"));
        g.register(node("a"));
        g.register(node("b"));
        assert!(g.set_focused("a"));
        assert!(g.set_focused("b"));
        assert_eq!(g.focused().map(FocusId::as_str), Some("b"));
        assert_eq!(g.focused_count(), 1);
        assert_eq!(g.clear_focus(), Some(FocusId::from("b")));
    }

    #[test]
    fn nodes_in_section_preserves_order_and_restarts() {
        let mut g = FocusGraph::new();
        g.register(node("h1"));
        g.register(FocusableNode::new("l1", LIBRARY));
        g.register(node("h2"));
        g.register(FocusableNode::new("l2", LIBRARY));

        let iter = g.nodes_in_section(LIBRARY);
        let first: Vec<_> = iter.clone().map(|n| n.id.as_str()).collect();
        let second: Vec<_> = iter.map(|n| n.id.as_str()).collect();
        assert_eq!(first, vec!["l1", "l2"]);
        assert_eq!(first, second);

        let home: Vec<_> = g.nodes_in_section(HOME).map(|n| n.id.as_str()).collect();
        assert_eq!(home, vec!["h1", "h2"]);
    }

    #[test]
    fn first_focusable_skips_disabled() {
        let mut g = FocusGraph::new();
        g.register(node("a").with_disabled(true));
        g.register(node("b"));
        assert_eq!(g.first_focusable_in(HOME).map(|n| n.id.as_str()), Some("b"));
        assert!(g.first_focusable_in(LIBRARY).is_none());
    }

    #[test]
    fn clear_empties_graph() {
        let mut g = FocusGraph::new();
        g.register(node("a"));
        g.set_focused("a");
        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.focused(), None);
    }

    #[test]
    fn node_builder_defaults() {
        let n = FocusableNode::new("x", HOME);
        assert!(n.is_focusable());
        assert_eq!(n.container.as_str(), ContainerId::ROOT);
        assert!(n.bounds.is_none());
        assert!(n.grid.is_none());
        assert!(n.center().is_none());
    }

    #[test]
    fn node_builder_chain() {
        let n = FocusableNode::new("x", LIBRARY)
            .with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
            .with_grid(2, 3)
            .with_container("row-2")
            .with_disabled(true)
            .with_label("Movie");
        assert_eq!(n.grid, Some(GridPosition::new(2, 3)));
        assert_eq!(n.container, ContainerId::from("row-2"));
        assert!(!n.is_focusable());
        assert_eq!(n.label.as_deref(), Some("Movie"));
        assert_eq!(n.center(), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn invalid_bounds_have_no_center() {
        let n = FocusableNode::new("x", HOME).with_bounds(Rect::new(f32::NAN, 0.0, 1.0, 1.0));
        assert!(n.center().is_none());
    }

    #[test]
    fn select_action_invokes_callback() {
        use std::sync::Mutex;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let n = FocusableNode::new("play", HOME)
            .with_action(move |id| sink.lock().unwrap().push(id.to_string()));
        n.action.as_ref().unwrap().invoke(&n.id);
        assert_eq!(*seen.lock().unwrap(), vec!["play".to_string()]);
        assert_eq!(format!("{:?}", n.action.unwrap()), "SelectAction(..)");
    }

    // --- Stress ---

    #[test]
    fn stress_register_unregister() {
        let mut g = FocusGraph::new();
        for i in 0..1000 {
            g.register(node(&format!("n{i}")));
        }
        for i in (0..1000).step_by(2) {
            let _ = g.unregister(&format!("n{i}"));
        }
        assert_eq!(g.len(), 500);
        let first = g.nodes().next().map(|n| n.id.as_str().to_string());
        assert_eq!(first.as_deref(), Some("n1"));
    }
}
