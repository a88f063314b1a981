//! Organic layout: a hierarchical seed relaxed into natural clusters.
//!
//! Starting from the hierarchical layout, each of [`PASSES`] passes pulls
//! every node [`PULL`] of the way toward the centroid of its direct
//! neighbors, then runs one spacing relaxation pass. Rows soften into
//! clusters while the level order of the seed is kept.

use super::config::LayoutConfig;
use super::{hierarchical, spacing};
use crate::error::Result;
use crate::graph::{Edge, GraphIndex, Node, Position};

pub const PASSES: usize = 5;

/// Fraction of the distance to the neighbor centroid covered per pass.
pub const PULL: f64 = 0.1;

/// Organic layout of a snapshot, normalized to the configured padding.
pub fn layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let index = GraphIndex::build(nodes, edges)?;
    super::finish(nodes, positions(nodes, &index, config), config.padding, "organic")
}

pub(crate) fn positions(nodes: &[Node], index: &GraphIndex, config: &LayoutConfig) -> Vec<Position> {
    let mut positions = hierarchical::positions(nodes, index, config);
    let neighbors: Vec<Vec<usize>> = (0..nodes.len()).map(|s| index.undirected_neighbors(s)).collect();
    let min_spacing = spacing::min_spacing(config);

    for _ in 0..PASSES {
        let snapshot = positions.clone();
        for (slot, adjacent) in neighbors.iter().enumerate() {
            if adjacent.is_empty() {
                continue;
            }
            let count = adjacent.len() as f64;
            let cx = adjacent.iter().map(|&n| snapshot[n].x).sum::<f64>() / count;
            let cy = adjacent.iter().map(|&n| snapshot[n].y).sum::<f64>() / count;
            positions[slot].x += (cx - snapshot[slot].x) * PULL;
            positions[slot].y += (cy - snapshot[slot].y) * PULL;
        }
        spacing::relax_pass(&mut positions, index, min_spacing);
    }

    positions
}
