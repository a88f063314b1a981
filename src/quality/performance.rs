//! Rendering-cost heuristic for large canvases.

use serde::{Deserialize, Serialize};

/// Above this many nodes, off-screen nodes should be culled.
pub const VIEWPORT_CULLING_NODES: usize = 50;

/// Above this many nodes, distant nodes should render at reduced detail.
pub const LEVEL_OF_DETAIL_NODES: usize = 100;

/// Above this many edges, edge paths should be simplified.
pub const EDGE_SIMPLIFICATION_EDGES: usize = 200;

const MS_PER_NODE: f64 = 0.5;
const MS_PER_EDGE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceImpact {
    pub viewport_culling: bool,
    pub level_of_detail: bool,
    pub edge_simplification: bool,
    /// Rough linear estimate of one full render, in milliseconds.
    pub estimated_render_ms: f64,
}

pub fn performance_impact(node_count: usize, edge_count: usize) -> PerformanceImpact {
    PerformanceImpact {
        viewport_culling: node_count > VIEWPORT_CULLING_NODES,
        level_of_detail: node_count > LEVEL_OF_DETAIL_NODES,
        edge_simplification: edge_count > EDGE_SIMPLIFICATION_EDGES,
        estimated_render_ms: node_count as f64 * MS_PER_NODE + edge_count as f64 * MS_PER_EDGE,
    }
}
