//! Edge type and related structures.
//!
//! Edges are directed connections between funnel stages. Each edge has:
//! - A stable identifier
//! - Source and target node IDs

use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Stable edge identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Create a new EdgeId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A directed, unweighted edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether the two edges touch a common node.
    #[inline]
    pub fn shares_endpoint(&self, other: &Edge) -> bool {
        self.source == other.source
            || self.source == other.target
            || self.target == other.source
            || self.target == other.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id() {
        let id = EdgeId::new("e1");
        assert_eq!(format!("{}", id), "e1");
    }

    #[test]
    fn test_shares_endpoint() {
        let ab = Edge::new("e1", "a", "b");
        let bc = Edge::new("e2", "b", "c");
        let cd = Edge::new("e3", "c", "d");
        assert!(ab.shares_endpoint(&bc));
        assert!(!ab.shares_endpoint(&cd));
    }
}
