//! Hierarchical (level-based) layout.
//!
//! # Algorithm
//!
//! 1. **Roots**: all `start` nodes, or if there are none, every node with no
//!    incoming edge. With no roots at all the layout is undefined and the
//!    grid generator is used instead.
//! 2. **Levels**: breadth-first traversal from the roots assigns each node
//!    its BFS depth. Nodes never reached sit one level past the deepest one.
//! 3. **Rows**: nodes sharing a level form a row in source order (or sorted
//!    by label), spaced uniformly and aligned left/center/right against the
//!    widest row. Rows advance by node height plus vertical spacing.
//! 4. **Direction**: the row/level axes are swapped or mirrored for
//!    bottom-top, left-right and right-left flows.

use std::collections::VecDeque;

use tracing::debug;

use super::config::{FlowDirection, LayoutConfig};
use super::grid;
use crate::error::Result;
use crate::graph::{Edge, GraphIndex, NODE_HEIGHT, NODE_WIDTH, Node, Position};

/// Hierarchical layout of a snapshot, normalized to the configured padding.
pub fn layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let index = GraphIndex::build(nodes, edges)?;
    super::finish(nodes, positions(nodes, &index, config), config.padding, "hierarchical")
}

/// BFS level per slot, or `None` when the graph has no root node.
pub fn assign_levels(nodes: &[Node], index: &GraphIndex) -> Option<Vec<usize>> {
    let mut roots: Vec<usize> = (0..nodes.len()).filter(|&s| nodes[s].kind.is_start()).collect();
    if roots.is_empty() {
        roots = (0..nodes.len()).filter(|&s| index.in_degree(s) == 0).collect();
    }
    if roots.is_empty() {
        return None;
    }

    let mut levels: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut queue = VecDeque::with_capacity(nodes.len());
    for &root in &roots {
        levels[root] = Some(0);
        queue.push_back(root);
    }

    while let Some(slot) = queue.pop_front() {
        let next_level = levels[slot].map_or(0, |l| l + 1);
        for &child in index.successors(slot) {
            if levels[child].is_none() {
                levels[child] = Some(next_level);
                queue.push_back(child);
            }
        }
    }

    let deepest = levels.iter().flatten().copied().max().unwrap_or(0);
    let unreached = levels.iter().filter(|l| l.is_none()).count();
    if unreached > 0 {
        debug!(unreached, level = deepest + 1, "placing unreached nodes past deepest level");
    }

    Some(levels.into_iter().map(|l| l.unwrap_or(deepest + 1)).collect())
}

pub(crate) fn positions(nodes: &[Node], index: &GraphIndex, config: &LayoutConfig) -> Vec<Position> {
    let Some(levels) = assign_levels(nodes, index) else {
        debug!("no root nodes, falling back to grid layout");
        return grid::positions(nodes, config);
    };

    let level_count = levels.iter().copied().max().map_or(0, |l| l + 1);
    let mut rows: Vec<Vec<usize>> = vec![Vec::new(); level_count];
    for (slot, &level) in levels.iter().enumerate() {
        rows[level].push(slot);
    }
    if config.sort_by_label {
        for row in &mut rows {
            row.sort_by(|&a, &b| nodes[a].label.cmp(&nodes[b].label));
        }
    }

    let horizontal = config.direction.is_horizontal();
    // Cross axis runs along a row, main axis from level to level.
    let (cross_size, cross_gap, main_size, main_gap) = if horizontal {
        (NODE_HEIGHT, config.spacing.vertical, NODE_WIDTH, config.spacing.horizontal)
    } else {
        (NODE_WIDTH, config.spacing.horizontal, NODE_HEIGHT, config.spacing.vertical)
    };
    let cross_step = cross_size + cross_gap;
    let main_step = main_size + main_gap;
    let align = if horizontal {
        config.alignment.vertical.offset_factor()
    } else {
        config.alignment.horizontal.offset_factor()
    };

    let row_extent = |len: usize| len as f64 * cross_size + len.saturating_sub(1) as f64 * cross_gap;
    let widest = rows.iter().map(|r| row_extent(r.len())).fold(0.0, f64::max);
    let last_level = level_count.saturating_sub(1);

    let mut positions = vec![Position::default(); nodes.len()];
    for (level, row) in rows.iter().enumerate() {
        let offset = (widest - row_extent(row.len())) * align;
        let main_level = match config.direction {
            FlowDirection::TopBottom | FlowDirection::LeftRight => level,
            FlowDirection::BottomTop | FlowDirection::RightLeft => last_level - level,
        };
        let main = main_level as f64 * main_step;

        for (i, &slot) in row.iter().enumerate() {
            let cross = offset + i as f64 * cross_step;
            positions[slot] = if horizontal {
                Position::new(main, cross)
            } else {
                Position::new(cross, main)
            };
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::{HorizontalAlignment, LayoutAlgorithm};

    fn config() -> LayoutConfig {
        LayoutConfig::default().with_algorithm(LayoutAlgorithm::Hierarchical)
    }

    #[test]
    fn test_linear_chain_gets_four_levels_in_order() {
        let nodes = vec![
            Node::new("start", "start", 0.0, 0.0),
            Node::new("a", "step", 0.0, 0.0),
            Node::new("b", "step", 0.0, 0.0),
            Node::new("end", "end", 0.0, 0.0),
        ];
        let edges = vec![
            Edge::new("e1", "start", "a"),
            Edge::new("e2", "a", "b"),
            Edge::new("e3", "b", "end"),
        ];

        let out = layout(&nodes, &edges, &config()).unwrap();
        let ys: Vec<f64> = out.iter().map(|n| n.position.y).collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]), "levels out of order: {ys:?}");
        // Single-node rows line up on the same column
        assert!(out.iter().all(|n| n.position.x == out[0].position.x));
    }

    #[test]
    fn test_two_disjoint_chains_side_by_side() {
        let nodes = vec![
            Node::new("a1", "step", 0.0, 0.0),
            Node::new("a2", "step", 0.0, 0.0),
            Node::new("b1", "step", 0.0, 0.0),
            Node::new("b2", "step", 0.0, 0.0),
        ];
        let edges = vec![Edge::new("e1", "a1", "a2"), Edge::new("e2", "b1", "b2")];

        let index = GraphIndex::build(&nodes, &edges).unwrap();
        assert_eq!(assign_levels(&nodes, &index), Some(vec![0, 1, 0, 1]));

        let out = layout(&nodes, &edges, &config()).unwrap();
        assert_eq!(out[0].position.y, out[2].position.y);
        assert_eq!(out[1].position.y, out[3].position.y);
        assert!(out[0].position.x < out[2].position.x);
        assert!(out[1].position.y > out[0].position.y);
    }

    #[test]
    fn test_unreached_nodes_go_past_deepest_level() {
        let nodes = vec![
            Node::new("s", "start", 0.0, 0.0),
            Node::new("a", "step", 0.0, 0.0),
            Node::new("orphan", "step", 0.0, 0.0),
        ];
        let edges = vec![Edge::new("e1", "s", "a")];
        let index = GraphIndex::build(&nodes, &edges).unwrap();
        assert_eq!(assign_levels(&nodes, &index), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_pure_cycle_falls_back_to_grid() {
        let nodes = vec![
            Node::new("a", "step", 0.0, 0.0),
            Node::new("b", "step", 0.0, 0.0),
            Node::new("c", "step", 0.0, 0.0),
        ];
        let edges = vec![
            Edge::new("e1", "a", "b"),
            Edge::new("e2", "b", "c"),
            Edge::new("e3", "c", "a"),
        ];
        let index = GraphIndex::build(&nodes, &edges).unwrap();
        assert!(assign_levels(&nodes, &index).is_none());

        let hierarchical = layout(&nodes, &edges, &config()).unwrap();
        let grid = grid::layout(&nodes, &config()).unwrap();
        assert_eq!(hierarchical, grid);
    }

    #[test]
    fn test_left_alignment_and_label_sort() {
        let nodes = vec![
            Node::new("s", "start", 0.0, 0.0),
            Node::new("x", "step", 0.0, 0.0).with_label("Zeta"),
            Node::new("y", "step", 0.0, 0.0).with_label("Alpha"),
        ];
        let edges = vec![Edge::new("e1", "s", "x"), Edge::new("e2", "s", "y")];
        let mut config = config();
        config.sort_by_label = true;
        config.alignment.horizontal = HorizontalAlignment::Left;

        let out = layout(&nodes, &edges, &config).unwrap();
        // Alpha sorts before Zeta on the second row
        assert!(out[2].position.x < out[1].position.x);
        // Left-aligned: the single root shares the first column
        assert_eq!(out[0].position.x, out[2].position.x);
    }

    #[test]
    fn test_left_right_flow_swaps_axes() {
        let nodes = vec![Node::new("s", "start", 0.0, 0.0), Node::new("a", "step", 0.0, 0.0)];
        let edges = vec![Edge::new("e1", "s", "a")];
        let mut config = config();
        config.direction = FlowDirection::LeftRight;

        let out = layout(&nodes, &edges, &config).unwrap();
        assert_eq!(out[0].position.y, out[1].position.y);
        assert!(out[0].position.x < out[1].position.x);
    }

    #[test]
    fn test_bottom_top_flow_mirrors_levels() {
        let nodes = vec![Node::new("s", "start", 0.0, 0.0), Node::new("a", "step", 0.0, 0.0)];
        let edges = vec![Edge::new("e1", "s", "a")];
        let mut config = config();
        config.direction = FlowDirection::BottomTop;

        let out = layout(&nodes, &edges, &config).unwrap();
        assert!(out[0].position.y > out[1].position.y);
    }
}
