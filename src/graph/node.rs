//! Node type and related structures.
//!
//! Nodes are the stages of a funnel flow. Each node has:
//! - A stable identifier owned by the caller's store
//! - A type tag, of which only `start` and `end` affect ordering
//! - A position (top-left corner) in canvas units
//! - An opaque label/data payload that the engine never inspects

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default rendered width of a node, in canvas units.
pub const NODE_WIDTH: f64 = 200.0;

/// Default rendered height of a node, in canvas units.
pub const NODE_HEIGHT: f64 = 80.0;

/// Stable node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Node type tag.
///
/// The wire form is the raw type string; anything that is not `start` or
/// `end` is carried through untouched as [`NodeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Entry point of the funnel; used as a BFS root.
    Start,
    /// Terminal stage; sorted last by the grid generator.
    End,
    /// Any other stage type.
    Other(String),
}

impl NodeKind {
    #[inline]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Sort rank used by the grid generator: start first, end last.
    #[inline]
    pub fn order_rank(&self) -> u8 {
        match self {
            Self::Start => 0,
            Self::Other(_) => 1,
            Self::End => 2,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "start" => Self::Start,
            "end" => Self::End,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => "start".to_owned(),
            NodeKind::End => "end".to_owned(),
            NodeKind::Other(tag) => tag,
        }
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Other("default".to_owned())
    }
}

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Center of a default-sized node whose top-left corner is `self`.
    #[inline]
    pub fn node_center(self) -> Position {
        Position::new(self.x + NODE_WIDTH / 2.0, self.y + NODE_HEIGHT / 2.0)
    }
}

/// A funnel stage as seen by the layout engine.
///
/// The engine never mutates a caller's node; it returns new values that
/// differ only in `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl Node {
    /// Create a node with an empty payload.
    pub fn new(id: impl Into<NodeId>, kind: impl Into<NodeKind>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: Position::new(x, y),
            label: String::new(),
            data: serde_json::Value::Null,
        }
    }

    /// Builder-style label setter.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Copy of this node moved to `position`.
    pub fn moved_to(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}
