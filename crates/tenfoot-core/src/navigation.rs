#![forbid(unsafe_code)]

//! Screen sections, input-routing contexts, and focus strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A top-level screen of the 10-foot surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationSection {
    Home,
    Library,
    Search,
    Player,
    Settings,
}

impl NavigationSection {
    /// All sections, in menu order.
    pub const ALL: [NavigationSection; 5] = [
        Self::Home,
        Self::Library,
        Self::Search,
        Self::Player,
        Self::Settings,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Library => "library",
            Self::Search => "search",
            Self::Player => "player",
            Self::Settings => "settings",
        }
    }

    /// Strategy used when a section has not been configured explicitly.
    #[must_use]
    pub const fn default_strategy(self) -> FocusStrategy {
        match self {
            Self::Library => FocusStrategy::Grid,
            Self::Player => FocusStrategy::PlayerControls,
            Self::Home | Self::Search | Self::Settings => FocusStrategy::Linear,
        }
    }

    /// Context entered when the section is reached by push or pop.
    #[must_use]
    pub const fn entry_context(self) -> NavigationContext {
        match self {
            Self::Player => NavigationContext::Playback,
            _ => NavigationContext::Browse,
        }
    }
}

impl fmt::Display for NavigationSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown section name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown navigation section {:?} (expected home|library|search|player|settings)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for NavigationSection {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "library" => Ok(Self::Library),
            "search" => Ok(Self::Search),
            "player" => Ok(Self::Player),
            "settings" => Ok(Self::Settings),
            _ => Err(UnknownSection(s.to_string())),
        }
    }
}

/// How remote input is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationContext {
    /// Directional input moves focus.
    #[default]
    Browse,
    /// Full-screen playback; directional input drives the playback controller.
    Playback,
    /// A menu overlay is open; input still moves focus.
    Menu,
}

impl NavigationContext {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Playback => "playback",
            Self::Menu => "menu",
        }
    }

    /// Whether directional input reaches the focus engine.
    #[must_use]
    pub const fn routes_to_focus(self) -> bool {
        matches!(self, Self::Browse | Self::Menu)
    }
}

impl fmt::Display for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Focus-resolution strategy for a section's focusable group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusStrategy {
    /// Logical row/column indices decide adjacency.
    Grid,
    /// Bounding-rect geometry decides adjacency.
    Linear,
    /// Geometry, confined to the focused node's container.
    PlayerControls,
}
