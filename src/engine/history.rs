//! Linear undo/redo history of layout snapshots.
//!
//! Entries live in a flat arena with a cursor pointing at the entry that
//! matches the canvas. Pushing truncates everything after the cursor, and
//! the arena is capped at [`MAX_HISTORY`] entries with the oldest evicted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::{Node, NodeId, Position};
use crate::layout::LayoutConfig;

pub const MAX_HISTORY: usize = 50;

/// Immutable snapshot of every node position plus the config in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutHistoryEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
    pub description: String,
    pub positions: HashMap<NodeId, Position>,
    pub config: LayoutConfig,
}

impl LayoutHistoryEntry {
    pub fn capture(nodes: &[Node], config: &LayoutConfig, description: impl Into<String>, timestamp: f64) -> Self {
        Self {
            timestamp,
            description: description.into(),
            positions: nodes.iter().map(|n| (n.id.clone(), n.position)).collect(),
            config: config.clone(),
        }
    }

    /// Replay the snapshot onto `nodes`. Nodes missing from the snapshot
    /// keep their current position.
    pub fn restore(&self, nodes: &[Node]) -> Vec<Node> {
        nodes
            .iter()
            .map(|n| match self.positions.get(&n.id) {
                Some(&position) => n.moved_to(position),
                None => n.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutHistory {
    entries: Vec<LayoutHistoryEntry>,
    /// Index of the entry matching the canvas.
    cursor: Option<usize>,
}

impl LayoutHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entry after the cursor, dropping any redo entries.
    pub fn push(&mut self, entry: LayoutHistoryEntry) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        if self.entries.len() > MAX_HISTORY {
            let overflow = self.entries.len() - MAX_HISTORY;
            self.entries.drain(..overflow);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry and return it.
    pub fn undo(&mut self) -> Option<&LayoutHistoryEntry> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// Step forward one entry and return it.
    pub fn redo(&mut self) -> Option<&LayoutHistoryEntry> {
        let next = self.cursor?.checked_add(1).filter(|&n| n < self.entries.len())?;
        self.cursor = Some(next);
        self.entries.get(next)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&LayoutHistoryEntry> {
        self.entries.get(self.cursor?)
    }

    pub fn entries(&self) -> &[LayoutHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
