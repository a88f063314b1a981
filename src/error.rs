//! Error type shared by graph indexing and the layout generators.
//!
//! Errors never cross the orchestrator boundary: [`crate::engine::LayoutEngine`]
//! logs them and hands the caller back its original node set.

use crate::graph::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("{algorithm} layout produced non-finite positions")]
    NonFiniteLayout { algorithm: &'static str },

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
