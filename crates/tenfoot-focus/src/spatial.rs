#![forbid(unsafe_code)]

//! Directional focus resolution.
//!
//! Given the focused node and a direction, pick the best candidate among the
//! node's focusable siblings. The resolver is pure: it reads the graph and
//! never mutates it.
//!
//! # Algorithm
//!
//! 1. Candidates are the enabled nodes of the origin's section. When the
//!    origin's container is trapped, or the section uses
//!    [`FocusStrategy::PlayerControls`], candidates are limited to the origin's
//!    container.
//! 2. Grid sections compare logical `(col, row)` positions when the origin has
//!    one; otherwise bounding-box centers are compared. Nodes without
//!    coordinates in the chosen space are skipped.
//! 3. Keep candidates whose coordinate lies strictly on the `direction` side
//!    of the origin.
//! 4. Score = `primary_weight * |primary delta| + secondary_weight *
//!    |secondary delta|`. Lowest score wins; ties go to the earliest
//!    registered node.
//! 5. With no candidate, a trapped container wraps to the far node of the
//!    same row (horizontal) or column (vertical) on the opposite edge.

use tenfoot_core::config::ResolverWeights;
use tenfoot_core::geometry::Point;
use tenfoot_core::{Direction, FocusStrategy};

use crate::graph::{FocusGraph, FocusId, FocusableNode};

/// Outcome of a directional resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A candidate lies in the requested direction.
    Moved(FocusId),
    /// No candidate; the trapped container wrapped to its opposite edge.
    Wrapped(FocusId),
    /// Focus stays where it is.
    NoChange,
}

impl Resolution {
    /// The new focus target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&FocusId> {
        match self {
            Self::Moved(id) | Self::Wrapped(id) => Some(id),
            Self::NoChange => None,
        }
    }

    #[must_use]
    pub fn into_target(self) -> Option<FocusId> {
        match self {
            Self::Moved(id) | Self::Wrapped(id) => Some(id),
            Self::NoChange => None,
        }
    }

    #[must_use]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Coordinate space shared by origin and candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Grid,
    Geometry,
}

/// Weighted-distance directional resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalResolver {
    weights: ResolverWeights,
}

impl DirectionalResolver {
    #[must_use]
    pub const fn new(weights: ResolverWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> ResolverWeights {
        self.weights
    }

    /// Resolve the next focus from `current` in `direction`.
    ///
    /// Unknown or malformed `current` ids resolve to [`Resolution::NoChange`].
    #[must_use]
    pub fn resolve(
        &self,
        graph: &FocusGraph,
        current: &str,
        direction: Direction,
        strategy: FocusStrategy,
        trapped: bool,
    ) -> Resolution {
        let Some(origin) = graph.get(current) else {
            return Resolution::NoChange;
        };
        let space = if strategy == FocusStrategy::Grid && origin.grid.is_some() {
            Space::Grid
        } else {
            Space::Geometry
        };
        let Some(from) = coordinate(origin, space) else {
            return Resolution::NoChange;
        };
        let confined = trapped || strategy == FocusStrategy::PlayerControls;

        let candidates = graph.nodes_in_section(origin.section).filter(|n| {
            n.is_focusable() && n.id != origin.id && (!confined || n.container == origin.container)
        });

        let mut best: Option<(&FocusableNode, f32)> = None;
        for node in candidates.clone() {
            let Some(to) = coordinate(node, space) else {
                continue;
            };
            let Some((primary, secondary)) = offsets(from, to, direction) else {
                continue;
            };
            let score = self.weights.primary * primary + self.weights.secondary * secondary;
            if best.is_none_or(|(_, s)| score < s) {
                best = Some((node, score));
            }
        }
        if let Some((node, _)) = best {
            return Resolution::Moved(node.id.clone());
        }

        if !trapped {
            return Resolution::NoChange;
        }

        // Wrap: farthest node of the same line on the opposite side.
        let back = direction.opposite();
        let mut far: Option<(&FocusableNode, f32)> = None;
        for node in candidates {
            let Some(to) = coordinate(node, space) else {
                continue;
            };
            if !same_line(origin, from, to, space, direction) {
                continue;
            }
            let Some((distance, _)) = offsets(from, to, back) else {
                continue;
            };
            if far.is_none_or(|(_, d)| distance > d) {
                far = Some((node, distance));
            }
        }
        match far {
            Some((node, _)) => Resolution::Wrapped(node.id.clone()),
            None => Resolution::NoChange,
        }
    }
}

fn coordinate(node: &FocusableNode, space: Space) -> Option<Point> {
    match space {
        Space::Grid => node.grid.map(|g| Point::new(g.col as f32, g.row as f32)),
        Space::Geometry => node.center(),
    }
}

/// `(primary, secondary)` distances if `to` lies strictly on the `direction`
/// side of `from`. Screen y grows downward.
fn offsets(from: Point, to: Point, direction: Direction) -> Option<(f32, f32)> {
    let (dx, dy) = to.delta_from(from);
    let (primary, secondary) = match direction {
        Direction::Right => (dx, dy),
        Direction::Left => (-dx, dy),
        Direction::Down => (dy, dx),
        Direction::Up => (-dy, dx),
    };
    (primary > 0.0).then(|| (primary, secondary.abs()))
}

fn same_line(
    origin: &FocusableNode,
    from: Point,
    to: Point,
    space: Space,
    direction: Direction,
) -> bool {
    match space {
        Space::Grid => {
            if direction.is_horizontal() {
                to.y == from.y
            } else {
                to.x == from.x
            }
        }
        Space::Geometry => {
            let Some(bounds) = origin.bounds else {
                return false;
            };
            if direction.is_horizontal() {
                bounds.spans_y(to.y)
            } else {
                bounds.spans_x(to.x)
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tenfoot_core::NavigationSection;
    use tenfoot_core::geometry::Rect;

    const LIB: NavigationSection = NavigationSection::Library;
    const HOME: NavigationSection = NavigationSection::Home;

    fn resolver() -> DirectionalResolver {
        DirectionalResolver::default()
    }

    fn tile(id: &str, x: f32, y: f32) -> FocusableNode {
        FocusableNode::new(id, HOME).with_bounds(Rect::new(x, y, 100.0, 50.0))
    }

    /// 2x3 grid in container "grid", ids r{row}c{col}.
    fn grid_2x3() -> FocusGraph {
        let mut g = FocusGraph::new();
        for row in 0..2 {
            for col in 0..3 {
                g.register(
                    FocusableNode::new(format!("r{row}c{col}"), LIB)
                        .with_grid(row, col)
                        .with_container("grid"),
                );
            }
        }
        g
    }

    fn resolve(g: &FocusGraph, from: &str, dir: Direction, trapped: bool) -> Resolution {
        resolver().resolve(g, from, dir, FocusStrategy::Grid, trapped)
    }

    #[test]
    fn grid_right_moves_along_row() {
        let g = grid_2x3();
        assert_eq!(
            resolve(&g, "r0c0", Direction::Right, false),
            Resolution::Moved("r0c1".into())
        );
        assert_eq!(
            resolve(&g, "r0c1", Direction::Right, false),
            Resolution::Moved("r0c2".into())
        );
    }

    #[test]
    fn grid_edge_without_trap_is_no_change() {
        let g = grid_2x3();
        assert_eq!(resolve(&g, "r0c2", Direction::Right, false), Resolution::NoChange);
        assert_eq!(resolve(&g, "r0c0", Direction::Up, false), Resolution::NoChange);
    }

    #[test]
    fn grid_edge_with_trap_wraps() {
        let g = grid_2x3();
        assert_eq!(
            resolve(&g, "r0c2", Direction::Right, true),
            Resolution::Wrapped("r0c0".into())
        );
        assert_eq!(
            resolve(&g, "r0c0", Direction::Left, true),
            Resolution::Wrapped("r0c2".into())
        );
        assert_eq!(
            resolve(&g, "r1c1", Direction::Down, true),
            Resolution::Wrapped("r0c1".into())
        );
    }

    #[test]
    fn grid_down_prefers_same_column() {
        let g = grid_2x3();
        assert_eq!(
            resolve(&g, "r0c1", Direction::Down, false),
            Resolution::Moved("r1c1".into())
        );
    }

    #[test]
    fn geometry_scores_secondary_axis_heavier() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 0.0, 0.0));
        // Far but aligned: primary 300, secondary 0 -> 300.
        g.register(tile("aligned", 300.0, 0.0));
        // Near but offset: primary 110, secondary 100 -> 310.
        g.register(tile("offset", 110.0, 100.0));
        let r = resolver().resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::Moved("aligned".into()));
    }

    #[test]
    fn custom_weights_change_winner() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 0.0, 0.0));
        g.register(tile("aligned", 300.0, 0.0));
        g.register(tile("offset", 110.0, 100.0));
        let flat = DirectionalResolver::new(ResolverWeights {
            primary: 1.0,
            secondary: 1.0,
        });
        let r = flat.resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::Moved("offset".into()));
    }

    #[test]
    fn ties_go_to_earliest_registration() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 100.0, 100.0));
        g.register(tile("below", 100.0, 200.0));
        g.register(tile("above", 100.0, 0.0));
        g.register(tile("right-up", 200.0, 50.0));
        g.register(tile("right-down", 200.0, 150.0));
        let r = resolver().resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::Moved("right-up".into()));
    }

    #[test]
    fn candidates_must_be_strictly_on_side() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 0.0, 0.0));
        g.register(tile("below", 0.0, 100.0));
        let r = resolver().resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::NoChange);
    }

    #[test]
    fn disabled_nodes_are_skipped() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 0.0, 0.0));
        g.register(tile("near", 150.0, 0.0).with_disabled(true));
        g.register(tile("far", 400.0, 0.0));
        let r = resolver().resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::Moved("far".into()));
    }

    #[test]
    fn other_sections_are_not_candidates() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 0.0, 0.0));
        g.register(
            FocusableNode::new("settings", NavigationSection::Settings)
                .with_bounds(Rect::new(200.0, 0.0, 100.0, 50.0)),
        );
        let r = resolver().resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::NoChange);
    }

    #[test]
    fn nodes_without_geometry_are_skipped() {
        let mut g = FocusGraph::new();
        g.register(tile("origin", 0.0, 0.0));
        g.register(FocusableNode::new("virtual", HOME));
        g.register(tile("real", 300.0, 0.0));
        let r = resolver().resolve(&g, "origin", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::Moved("real".into()));
    }

    #[test]
    fn unknown_origin_is_no_change() {
        let g = grid_2x3();
        assert_eq!(resolve(&g, "ghost", Direction::Right, false), Resolution::NoChange);
        assert_eq!(resolve(&g, "", Direction::Right, false), Resolution::NoChange);
    }

    #[test]
    fn grid_without_position_falls_back_to_geometry() {
        let mut g = FocusGraph::new();
        g.register(FocusableNode::new("a", LIB).with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        g.register(FocusableNode::new("b", LIB).with_bounds(Rect::new(20.0, 0.0, 10.0, 10.0)));
        let r = resolver().resolve(&g, "a", Direction::Right, FocusStrategy::Grid, false);
        assert_eq!(r, Resolution::Moved("b".into()));
    }

    #[test]
    fn player_controls_stay_in_container() {
        let section = NavigationSection::Player;
        let mut g = FocusGraph::new();
        let bar = |id: &str, x: f32| {
            FocusableNode::new(id, section)
                .with_bounds(Rect::new(x, 600.0, 40.0, 40.0))
                .with_container("transport")
        };
        g.register(bar("rew", 0.0));
        g.register(bar("play", 60.0));
        g.register(
            FocusableNode::new("subtitles", section)
                .with_bounds(Rect::new(200.0, 600.0, 40.0, 40.0))
                .with_container("options"),
        );
        let r = resolver().resolve(&g, "play", Direction::Right, FocusStrategy::PlayerControls, false);
        assert_eq!(r, Resolution::NoChange);
        let r = resolver().resolve(&g, "play", Direction::Right, FocusStrategy::Linear, false);
        assert_eq!(r, Resolution::Moved("subtitles".into()));
    }

    #[test]
    fn geometry_wrap_uses_row_span() {
        let mut g = FocusGraph::new();
        for (i, x) in [0.0, 120.0, 240.0].into_iter().enumerate() {
            g.register(tile(&format!("t{i}"), x, 0.0).with_container("row"));
        }
        g.register(tile("below", 0.0, 200.0).with_container("row"));
        let r = resolver().resolve(&g, "t2", Direction::Right, FocusStrategy::Linear, true);
        assert_eq!(r, Resolution::Wrapped("t0".into()));
    }

    #[test]
    fn single_node_trap_does_not_wrap_to_itself() {
        let mut g = FocusGraph::new();
        g.register(tile("only", 0.0, 0.0));
        let r = resolver().resolve(&g, "only", Direction::Left, FocusStrategy::Linear, true);
        assert_eq!(r, Resolution::NoChange);
    }

    #[test]
    fn resolution_accessors() {
        assert_eq!(Resolution::Moved("a".into()).target().map(FocusId::as_str), Some("a"));
        assert!(Resolution::Wrapped("a".into()).is_change());
        assert!(!Resolution::NoChange.is_change());
        assert_eq!(Resolution::NoChange.into_target(), None);
    }
}
