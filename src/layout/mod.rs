//! Layout generators.
//!
//! Each generator maps a graph snapshot to a full set of node positions.
//! All of them share the `(nodes, edges, config) -> nodes` shape and are
//! dispatched on [`LayoutAlgorithm`] by [`compute_layout`]. Output nodes are
//! fresh values that differ from the input only in `position`, translated so
//! that the minimum x and y equal the configured padding (plus the cell
//! inset for a grid with centered cells, see [`layout_origin`]).
//!
//! # Generators
//!
//! - `hierarchical`: BFS levels from start/root nodes, one row per level
//! - `force`: fixed-budget spring/charge/center/collision simulation
//! - `grid`: row-major grid, start nodes first and end nodes last
//! - `circular`: even angular spacing around a circle
//! - `organic`: hierarchical seed relaxed toward neighbor centroids
//! - `spacing`: repulsion relaxation usable after any other generator

pub mod circular;
pub mod config;
pub mod force;
pub mod grid;
pub mod hierarchical;
pub mod organic;
pub mod spacing;

pub use config::{
    Alignment, FlowDirection, ForceParams, HorizontalAlignment, LayoutAlgorithm, LayoutConfig,
    LayoutConfigPatch, Spacing, VerticalAlignment,
};

use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::graph::{Edge, GraphIndex, Node, Position, bounding_box};

/// Run the generator selected by `config.algorithm` and normalize the result.
///
/// An empty node set is returned unchanged. Dangling edges and non-finite
/// simulation output are reported as errors.
pub fn compute_layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let index = GraphIndex::build(nodes, edges)?;
    debug!(
        algorithm = config.algorithm.name(),
        nodes = nodes.len(),
        edges = edges.len(),
        "computing layout"
    );

    let positions = match config.algorithm {
        LayoutAlgorithm::Hierarchical => hierarchical::positions(nodes, &index, config),
        LayoutAlgorithm::Force => force::positions(nodes, &index, config),
        LayoutAlgorithm::Grid => grid::positions(nodes, config),
        LayoutAlgorithm::Circular => circular::positions(nodes, config),
        LayoutAlgorithm::Organic => organic::positions(nodes, &index, config),
        LayoutAlgorithm::Manual => nodes.iter().map(|n| n.position).collect(),
    };

    finish_at(nodes, positions, layout_origin(config), config.algorithm.name())
}

/// Top-left corner a finished layout is translated to: the padding, plus
/// the cell inset when grid nodes are centered in their cells.
pub fn layout_origin(config: &LayoutConfig) -> Position {
    match config.algorithm {
        LayoutAlgorithm::Grid => grid::origin(config),
        _ => Position::new(config.padding, config.padding),
    }
}

/// Attach generated positions to the nodes and normalize.
pub(crate) fn finish(
    nodes: &[Node],
    positions: Vec<Position>,
    padding: f64,
    algorithm: &'static str,
) -> Result<Vec<Node>> {
    finish_at(nodes, positions, Position::new(padding, padding), algorithm)
}

pub(crate) fn finish_at(
    nodes: &[Node],
    positions: Vec<Position>,
    origin: Position,
    algorithm: &'static str,
) -> Result<Vec<Node>> {
    if positions.iter().any(|p| !p.is_finite()) {
        return Err(LayoutError::NonFiniteLayout { algorithm });
    }

    let placed: Vec<Node> = nodes
        .iter()
        .zip(positions)
        .map(|(node, position)| node.moved_to(position))
        .collect();

    Ok(normalize_to(&placed, origin))
}

/// Translate all nodes so the minimum x and y are exactly `padding`.
///
/// A set that is already normalized is returned unchanged.
pub fn normalize(nodes: &[Node], padding: f64) -> Vec<Node> {
    normalize_to(nodes, Position::new(padding, padding))
}

/// Translate all nodes so the minimum x and y land on `origin`.
pub fn normalize_to(nodes: &[Node], origin: Position) -> Vec<Node> {
    let Some(bounds) = bounding_box(nodes) else {
        return Vec::new();
    };

    if bounds.min_x == origin.x && bounds.min_y == origin.y {
        return nodes.to_vec();
    }

    // Offsets from the minimum, so the extreme node lands on `origin` exactly.
    nodes
        .iter()
        .map(|n| {
            n.moved_to(Position::new(
                origin.x + (n.position.x - bounds.min_x),
                origin.y + (n.position.y - bounds.min_y),
            ))
        })
        .collect()
}

/// Snap every node to the grid anchored at the padding origin.
///
/// Applied to normalized output, this keeps all coordinates >= `padding`.
pub fn snap_to_grid(nodes: &[Node], grid_size: f64, padding: f64) -> Vec<Node> {
    if grid_size <= 0.0 {
        return nodes.to_vec();
    }

    let snap = |v: f64| padding + ((v - padding) / grid_size).round() * grid_size;
    nodes
        .iter()
        .map(|n| n.moved_to(Position::new(snap(n.position.x), snap(n.position.y))))
        .collect()
}

/// Post-processing applied by the orchestrator after any generator.
pub fn post_process(nodes: &[Node], config: &LayoutConfig) -> Vec<Node> {
    let normalized = normalize_to(nodes, layout_origin(config));
    if config.snap_to_grid {
        snap_to_grid(&normalized, config.grid_size, config.padding)
    } else {
        normalized
    }
}
