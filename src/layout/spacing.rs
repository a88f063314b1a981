//! Spacing optimization: repulsion relaxation between crowded node pairs.
//!
//! For up to [`MAX_PASSES`] passes, every pair closer than
//! `min_spacing + NODE_WIDTH / 2` is pushed apart along the vector joining
//! them, in proportion to the shortfall. Connected pairs get a weaker push
//! than unconnected ones so logical neighbors stay close. A pass that moves
//! nothing ends the relaxation early.

use tracing::trace;

use super::config::LayoutConfig;
use crate::error::Result;
use crate::graph::{Edge, GraphIndex, NODE_WIDTH, Node, Position};

/// Upper bound on relaxation passes.
pub const MAX_PASSES: usize = 10;

/// Push factor applied to each node of an unconnected pair.
const UNCONNECTED_PUSH: f64 = 0.5;

/// Push factor applied to each node of a connected pair.
const CONNECTED_PUSH: f64 = 0.3;

/// Golden angle, used to spread coincident pairs in distinct directions.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Minimum spacing used by the relaxation for a given config.
pub fn min_spacing(config: &LayoutConfig) -> f64 {
    config.spacing.horizontal.min(config.spacing.vertical)
}

/// Relax a snapshot and normalize it to the configured padding.
pub fn optimize_spacing(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let index = GraphIndex::build(nodes, edges)?;
    let mut positions: Vec<Position> = nodes.iter().map(|n| n.position).collect();
    relax(&mut positions, &index, min_spacing(config));
    super::finish(nodes, positions, config.padding, "spacing")
}

/// Run up to [`MAX_PASSES`] passes. Returns the number of passes that moved nodes.
pub(crate) fn relax(positions: &mut [Position], index: &GraphIndex, min_spacing: f64) -> usize {
    for pass in 0..MAX_PASSES {
        if !relax_pass(positions, index, min_spacing) {
            trace!(pass, "spacing relaxation settled");
            return pass;
        }
    }
    MAX_PASSES
}

/// One relaxation pass over all pairs. Returns whether anything moved.
pub(crate) fn relax_pass(positions: &mut [Position], index: &GraphIndex, min_spacing: f64) -> bool {
    let threshold = min_spacing + NODE_WIDTH / 2.0;
    let mut moved = false;

    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let dx = positions[j].x - positions[i].x;
            let dy = positions[j].y - positions[i].y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= threshold {
                continue;
            }

            let (ux, uy) = if distance > f64::EPSILON {
                (dx / distance, dy / distance)
            } else {
                let angle = (i * positions.len() + j) as f64 * GOLDEN_ANGLE;
                (angle.cos(), angle.sin())
            };
            let factor = if index.are_connected(i, j) {
                CONNECTED_PUSH
            } else {
                UNCONNECTED_PUSH
            };
            let push = (threshold - distance) * factor;

            positions[i].x -= ux * push;
            positions[i].y -= uy * push;
            positions[j].x += ux * push;
            positions[j].y += uy * push;
            moved = true;
        }
    }

    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coincident_nodes_are_separated() {
        let nodes = vec![Node::new("a", "step", 100.0, 100.0), Node::new("b", "step", 100.0, 100.0)];
        let config = LayoutConfig::default();

        let out = optimize_spacing(&nodes, &[], &config).unwrap();
        let distance = out[0].position.distance(out[1].position);
        assert!(distance >= min_spacing(&config), "distance {distance}");
    }

    #[test]
    fn test_coincident_connected_nodes_are_separated() {
        let nodes = vec![Node::new("a", "start", 0.0, 0.0), Node::new("b", "step", 0.0, 0.0)];
        let edges = vec![Edge::new("e1", "a", "b")];
        let config = LayoutConfig::default();

        let out = optimize_spacing(&nodes, &edges, &config).unwrap();
        assert!(out[0].position.distance(out[1].position) >= min_spacing(&config));
    }

    #[test]
    fn test_connected_pairs_move_less() {
        let nodes = vec![
            Node::new("a", "step", 0.0, 0.0),
            Node::new("b", "step", 50.0, 0.0),
            Node::new("c", "step", 0.0, 1000.0),
            Node::new("d", "step", 50.0, 1000.0),
        ];
        let edges = vec![Edge::new("e1", "a", "b")];
        let index = GraphIndex::build(&nodes, &edges).unwrap();
        let mut positions: Vec<Position> = nodes.iter().map(|n| n.position).collect();

        assert!(relax_pass(&mut positions, &index, 80.0));
        let connected_gap = positions[1].x - positions[0].x;
        let free_gap = positions[3].x - positions[2].x;
        assert!(connected_gap < free_gap);
    }

    #[test]
    fn test_well_spaced_layout_is_untouched() {
        let nodes = vec![Node::new("a", "step", 0.0, 0.0), Node::new("b", "step", 1000.0, 0.0)];
        let index = GraphIndex::build(&nodes, &[]).unwrap();
        let mut positions: Vec<Position> = nodes.iter().map(|n| n.position).collect();

        assert_eq!(relax(&mut positions, &index, 80.0), 0);
        assert_eq!(positions[1], Position::new(1000.0, 0.0));
    }
}
