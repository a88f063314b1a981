//! Placement of nodes inserted outside of a layout run.
//!
//! Candidates are generated in order of preference and filtered through a
//! spatial occupancy check, so the first returned position never lands on
//! top of an existing node.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::graph::{
    Bounds, Edge, MIN_NODE_SPACING, NODE_HEIGHT, NODE_WIDTH, Node, NodeId, NodeKind, Position, bounding_box,
};
use crate::layout::{FlowDirection, LayoutConfig, spacing};
use crate::spatial::SpatialIndex;

/// Steps taken along the flow looking for free space before giving up.
const MAX_PROBES: usize = 64;

/// Share of removed nodes above which survivors are re-spaced.
pub const REMOVAL_RESPACE_RATIO: f64 = 0.2;

/// Where to put a new node relative to its neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementDirection {
    Above,
    Below,
    Left,
    Right,
}

impl PlacementDirection {
    /// Direction that follows the flow.
    pub fn downstream(flow: FlowDirection) -> Self {
        match flow {
            FlowDirection::TopBottom => Self::Below,
            FlowDirection::BottomTop => Self::Above,
            FlowDirection::LeftRight => Self::Right,
            FlowDirection::RightLeft => Self::Left,
        }
    }

    fn opposite(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Directions perpendicular to `self`.
    fn sideways(self) -> [Self; 2] {
        match self {
            Self::Above | Self::Below => [Self::Right, Self::Left],
            Self::Left | Self::Right => [Self::Below, Self::Above],
        }
    }

    fn step(self, config: &LayoutConfig) -> (f64, f64) {
        let dx = NODE_WIDTH + config.spacing.horizontal;
        let dy = NODE_HEIGHT + config.spacing.vertical;
        match self {
            Self::Above => (0.0, -dy),
            Self::Below => (0.0, dy),
            Self::Left => (-dx, 0.0),
            Self::Right => (dx, 0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementContext {
    /// Existing node the new one should sit next to.
    pub near: Option<NodeId>,
    /// Preferred side of `near`; defaults to downstream of the flow.
    pub direction: Option<PlacementDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub position: Position,
    /// Further free candidates, in order of preference.
    pub alternatives: Vec<Position>,
}

/// Propose positions for a new node of `kind`.
///
/// Fails only when `context.near` names a node that does not exist.
pub fn position_new_node(
    nodes: &[Node],
    edges: &[Edge],
    kind: &NodeKind,
    context: &PlacementContext,
    config: &LayoutConfig,
) -> Result<PlacementResult> {
    let Some(bounds) = bounding_box(nodes) else {
        return Ok(PlacementResult {
            position: Position::new(config.padding, config.padding),
            alternatives: Vec::new(),
        });
    };

    let downstream = PlacementDirection::downstream(config.direction);
    let candidates = match &context.near {
        Some(near_id) => {
            let near = nodes
                .iter()
                .find(|n| &n.id == near_id)
                .ok_or_else(|| LayoutError::UnknownNode(near_id.clone()))?;
            neighbor_candidates(near, nodes, edges, context.direction.unwrap_or(downstream), config)
        }
        None => free_candidates(nodes, &bounds, kind, downstream, config),
    };

    let spatial = SpatialIndex::from_positions(nodes.iter().map(|n| n.position));
    let is_free = |p: Position| spatial.nearest_within(p.x, p.y, MIN_NODE_SPACING).is_none();

    let mut free: Vec<Position> = Vec::new();
    for candidate in candidates.into_iter().map(non_negative) {
        if is_free(candidate) && !free.iter().any(|p| p.distance(candidate) < MIN_NODE_SPACING) {
            free.push(candidate);
        }
    }

    if free.is_empty() {
        // Walk downstream from the bounds until something is free
        let mut probe = past_bounds(&bounds, downstream, bounds.center(), config);
        for _ in 0..MAX_PROBES {
            probe = non_negative(probe);
            if is_free(probe) {
                break;
            }
            probe = offset(probe, downstream, config);
        }
        debug!(x = probe.x, y = probe.y, "placement fell back to probing");
        free.push(probe);
    }

    let position = free.remove(0);
    Ok(PlacementResult {
        position,
        alternatives: free,
    })
}

/// Next to `near`: the preferred side first, then beside its last child so
/// siblings form a row, then the remaining sides.
fn neighbor_candidates(
    near: &Node,
    nodes: &[Node],
    edges: &[Edge],
    preferred: PlacementDirection,
    config: &LayoutConfig,
) -> Vec<Position> {
    let mut candidates = vec![offset(near.position, preferred, config)];

    let last_child = edges
        .iter()
        .filter(|e| e.source == near.id)
        .filter_map(|e| nodes.iter().find(|n| n.id == e.target))
        .last();
    if let Some(child) = last_child {
        candidates.extend(preferred.sideways().map(|side| offset(child.position, side, config)));
    }

    candidates.extend(preferred.sideways().map(|side| offset(near.position, side, config)));
    candidates.push(offset(near.position, preferred.opposite(), config));
    candidates
}

/// Without a neighbor: past the downstream edge of the graph (upstream for
/// start nodes), at the centroid for ordinary nodes, then beside the graph.
fn free_candidates(
    nodes: &[Node],
    bounds: &Bounds,
    kind: &NodeKind,
    downstream: PlacementDirection,
    config: &LayoutConfig,
) -> Vec<Position> {
    let count = nodes.len() as f64;
    let centroid = Position::new(
        nodes.iter().map(|n| n.position.x).sum::<f64>() / count,
        nodes.iter().map(|n| n.position.y).sum::<f64>() / count,
    );
    let after = past_bounds(bounds, downstream, bounds.center(), config);
    let before = past_bounds(bounds, downstream.opposite(), bounds.center(), config);

    let mut candidates = if kind.is_start() {
        vec![before, after]
    } else if kind.is_end() {
        vec![after]
    } else {
        vec![after, centroid]
    };
    candidates.extend(
        downstream
            .sideways()
            .map(|side| past_bounds(bounds, side, centroid, config)),
    );
    candidates
}

/// One step beyond the `side` edge of `bounds`, taking the cross-axis
/// coordinate from `cross`.
fn past_bounds(bounds: &Bounds, side: PlacementDirection, cross: Position, config: &LayoutConfig) -> Position {
    let (dx, dy) = side.step(config);
    match side {
        PlacementDirection::Below => Position::new(cross.x, bounds.max_y + dy),
        PlacementDirection::Above => Position::new(cross.x, bounds.min_y + dy),
        PlacementDirection::Right => Position::new(bounds.max_x + dx, cross.y),
        PlacementDirection::Left => Position::new(bounds.min_x + dx, cross.y),
    }
}

#[inline]
fn offset(p: Position, direction: PlacementDirection, config: &LayoutConfig) -> Position {
    let (dx, dy) = direction.step(config);
    Position::new(p.x + dx, p.y + dy)
}

#[inline]
fn non_negative(p: Position) -> Position {
    Position::new(p.x.max(0.0), p.y.max(0.0))
}

/// Position nodes that appeared since `previous` and re-space the graph when
/// many nodes disappeared.
///
/// Surviving nodes keep their positions unless more than
/// [`REMOVAL_RESPACE_RATIO`] of the previous nodes were removed. Edges that
/// touch removed nodes are ignored.
pub fn maintain_integrity(
    previous: &[Node],
    current: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> Result<Vec<Node>> {
    let before: HashSet<&NodeId> = previous.iter().map(|n| &n.id).collect();
    let after: HashSet<&NodeId> = current.iter().map(|n| &n.id).collect();
    let removed = before.difference(&after).count();
    let live: Vec<Edge> = edges
        .iter()
        .filter(|e| after.contains(&e.source) && after.contains(&e.target))
        .cloned()
        .collect();

    let mut placed: Vec<Node> = current.iter().filter(|n| before.contains(&n.id)).cloned().collect();
    let survivors = placed.len();
    let mut result = Vec::with_capacity(current.len());
    for node in current {
        if before.contains(&node.id) {
            result.push(node.clone());
            continue;
        }
        // Attach to an upstream neighbor that already has a position
        let near = live
            .iter()
            .filter(|e| e.target == node.id)
            .find(|e| placed.iter().any(|p| p.id == e.source))
            .map(|e| e.source.clone());
        let context = PlacementContext { near, direction: None };
        let placement = position_new_node(&placed, &live, &node.kind, &context, config)?;
        let moved = node.moved_to(placement.position);
        placed.push(moved.clone());
        result.push(moved);
    }

    debug!(removed, added = placed.len() - survivors, "maintaining layout integrity");

    if removed as f64 > previous.len() as f64 * REMOVAL_RESPACE_RATIO {
        return spacing::optimize_spacing(&result, &live, config);
    }
    Ok(result)
}
