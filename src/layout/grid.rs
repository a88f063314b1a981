//! Grid layout.
//!
//! Nodes are stably sorted so `start` nodes come first and `end` nodes
//! last, then placed row-major into cells of node size plus spacing. With
//! `center_in_cell` the first cell starts at the padding and each node sits
//! in the middle of its cell, so the whole grid is shifted by the inset.

use super::config::LayoutConfig;
use crate::error::Result;
use crate::graph::{NODE_HEIGHT, NODE_WIDTH, Node, Position};

/// Grid layout of a snapshot, normalized to the configured padding.
///
/// The grid ignores topology, so edges are not needed.
pub fn layout(nodes: &[Node], config: &LayoutConfig) -> Result<Vec<Node>> {
    super::finish_at(nodes, positions(nodes, config), origin(config), "grid")
}

/// Offset of a node from the top-left of its cell.
pub fn cell_inset(config: &LayoutConfig) -> (f64, f64) {
    if config.center_in_cell {
        (
            (config.spacing.horizontal / 2.0).max(0.0),
            (config.spacing.vertical / 2.0).max(0.0),
        )
    } else {
        (0.0, 0.0)
    }
}

/// Where the first node lands once the grid is normalized.
pub(crate) fn origin(config: &LayoutConfig) -> Position {
    let (inset_x, inset_y) = cell_inset(config);
    Position::new(config.padding + inset_x, config.padding + inset_y)
}

/// Column count used for `n` nodes.
pub fn column_count(n: usize, config: &LayoutConfig) -> usize {
    config
        .grid_columns
        .unwrap_or_else(|| (n as f64).sqrt().ceil() as usize)
        .max(1)
}

pub(crate) fn positions(nodes: &[Node], config: &LayoutConfig) -> Vec<Position> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&slot| nodes[slot].kind.order_rank());

    let columns = column_count(nodes.len(), config);
    let cell_w = NODE_WIDTH + config.spacing.horizontal;
    let cell_h = NODE_HEIGHT + config.spacing.vertical;

    let mut positions = vec![Position::default(); nodes.len()];
    for (cell, &slot) in order.iter().enumerate() {
        let row = cell / columns;
        let col = cell % columns;
        positions[slot] = Position::new(col as f64 * cell_w, row as f64 * cell_h);
    }
    positions
}
