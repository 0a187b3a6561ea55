#![forbid(unsafe_code)]

//! Section back-stack.
//!
//! Forward transitions push the section being left; back navigation pops it.
//! Depth is capped, dropping the oldest entries first. Sections the host has
//! retired (permanently unmountable) are purged and refused until restored.

use std::collections::VecDeque;
use std::time::Instant;

use rustc_hash::FxHashSet;
use tenfoot_core::NavigationSection;
use tracing::debug;

/// One visited section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationHistoryEntry {
    pub section: NavigationSection,
    pub timestamp: Instant,
}

impl NavigationHistoryEntry {
    #[must_use]
    pub const fn new(section: NavigationSection, timestamp: Instant) -> Self {
        Self { section, timestamp }
    }
}

/// Bounded stack of previously visited sections.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<NavigationHistoryEntry>,
    max_depth: usize,
    retired: FxHashSet<NavigationSection>,
}

impl NavigationHistory {
    /// Default maximum depth.
    pub const DEFAULT_DEPTH: usize = 64;

    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_depth: max_depth.max(1),
            retired: FxHashSet::default(),
        }
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Push an entry. Returns false if the section is retired.
    pub fn push(&mut self, entry: NavigationHistoryEntry) -> bool {
        if self.retired.contains(&entry.section) {
            debug!(section = %entry.section, "history refused retired section");
            return false;
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.max_depth {
            self.entries.pop_front();
        }
        true
    }

    /// Pop the most recent entry.
    pub fn pop(&mut self) -> Option<NavigationHistoryEntry> {
        self.entries.pop_back()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&NavigationHistoryEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationHistoryEntry> + '_ {
        self.entries.iter()
    }

    /// Drop every entry and forget retired sections.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.retired.clear();
    }

    /// Mark a section permanently unmountable and purge it from the stack.
    ///
    /// Returns the number of purged entries.
    pub fn retire(&mut self, section: NavigationSection) -> usize {
        self.retired.insert(section);
        let before = self.entries.len();
        self.entries.retain(|e| e.section != section);
        before - self.entries.len()
    }

    /// Allow a retired section again. Returns false if it was not retired.
    pub fn restore(&mut self, section: NavigationSection) -> bool {
        self.retired.remove(&section)
    }

    #[must_use]
    pub fn is_retired(&self, section: NavigationSection) -> bool {
        self.retired.contains(&section)
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DEPTH)
    }
}
