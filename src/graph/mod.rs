//! Graph data structures and analysis primitives.
//!
//! Nodes and edges are plain values owned by the caller. [`GraphIndex`]
//! validates a snapshot and exposes its topology by slot; the `analysis`
//! functions build on it to answer structural questions (cycles, components,
//! overlaps, spacing).

pub mod analysis;
mod edge;
mod index;
mod node;

pub use analysis::{
    Bounds, MIN_NODE_SPACING, NodeCluster, Overlap, Severity, SpacingStats, adjacency,
    bounding_box, connected_components, detect_cycles, detect_overlaps, spacing_stats,
};
pub use edge::{Edge, EdgeId};
pub use index::GraphIndex;
pub use node::{NODE_HEIGHT, NODE_WIDTH, Node, NodeId, NodeKind, Position};
