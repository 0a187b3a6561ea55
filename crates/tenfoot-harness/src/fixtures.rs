#![forbid(unsafe_code)]

//! Node fixtures.
//!
//! [`GridFixture`] lays out `rows x cols` tiles with IDs `r{row}c{col}`
//! (optionally prefixed), a logical grid position, and optional bounds on a
//! regular pitch.

use tenfoot_core::NavigationSection;
use tenfoot_core::geometry::Rect;
use tenfoot_focus::{FocusEngine, FocusableNode};

/// Regular grid of focusable tiles in one container.
#[derive(Debug, Clone)]
pub struct GridFixture {
    pub rows: u32,
    pub cols: u32,
    pub section: NavigationSection,
    pub container: String,
    /// Prepended to every tile ID.
    pub prefix: String,
    /// Tile size; `None` registers grid positions only.
    pub tile: Option<(f32, f32)>,
    /// Gap between tiles.
    pub gap: f32,
    pub labels: bool,
}

impl GridFixture {
    /// Library grid in container `"grid"` with 200x300 tiles.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            section: NavigationSection::Library,
            container: "grid".to_string(),
            prefix: String::new(),
            tile: Some((200.0, 300.0)),
            gap: 20.0,
            labels: false,
        }
    }

    #[must_use]
    pub fn in_section(mut self, section: NavigationSection) -> Self {
        self.section = section;
        self
    }

    #[must_use]
    pub fn in_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Prefix tile IDs, for several grids in one graph.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Drop bounds; nodes carry only logical positions.
    #[must_use]
    pub fn without_geometry(mut self) -> Self {
        self.tile = None;
        self
    }

    /// Label each tile "Row R, column C" (1-based).
    #[must_use]
    pub fn with_labels(mut self) -> Self {
        self.labels = true;
        self
    }

    /// Unprefixed ID of the tile at `(row, col)`.
    #[must_use]
    pub fn id(row: u32, col: u32) -> String {
        format!("r{row}c{col}")
    }

    /// ID of this fixture's tile at `(row, col)`.
    #[must_use]
    pub fn tile_id(&self, row: u32, col: u32) -> String {
        format!("{}r{row}c{col}", self.prefix)
    }

    /// All tiles, row-major.
    #[must_use]
    pub fn nodes(&self) -> Vec<FocusableNode> {
        let mut nodes = Vec::with_capacity((self.rows * self.cols) as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let mut node = FocusableNode::new(self.tile_id(row, col), self.section)
                    .with_grid(row, col)
                    .with_container(self.container.as_str());
                if let Some((w, h)) = self.tile {
                    node = node.with_bounds(Rect::new(
                        col as f32 * (w + self.gap),
                        row as f32 * (h + self.gap),
                        w,
                        h,
                    ));
                }
                if self.labels {
                    node = node.with_label(format!("Row {}, column {}", row + 1, col + 1));
                }
                nodes.push(node);
            }
        }
        nodes
    }

    /// Register every tile with `engine`. Returns the number registered.
    pub fn register(&self, engine: &mut FocusEngine) -> usize {
        self.nodes()
            .into_iter()
            .filter(|node| engine.register(node.clone()))
            .count()
    }
}
