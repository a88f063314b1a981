//! Live drag adjustment.
//!
//! Each pointer move is clamped to the canvas, optionally rounded to the
//! grid, then magnetically pulled onto an edge or center line of another
//! node when one is within the threshold. Magnetic alignment wins over the
//! grid because it is what the user sees as a guide.

use serde::{Deserialize, Serialize};

use crate::graph::{Bounds, NODE_HEIGHT, NODE_WIDTH, Node, NodeId, Position};
use crate::layout::LayoutConfig;

/// Coordinates closer than this are considered the same guide line.
const GUIDE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragOptions {
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub magnetic_alignment: bool,
    pub magnetic_threshold: f64,
    /// Canvas area the node's box must stay inside.
    pub bounds: Option<Bounds>,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl DragOptions {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            snap_to_grid: config.snap_to_grid,
            grid_size: config.grid_size,
            magnetic_alignment: config.magnetic_alignment,
            magnetic_threshold: config.magnetic_threshold,
            bounds: None,
        }
    }
}

/// Axis a guide line runs along. A `Vertical` guide marks a shared x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapGuide {
    pub axis: GuideAxis,
    pub coordinate: f64,
    pub node_ids: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub position: Position,
    pub guides: Vec<SnapGuide>,
}

/// Adjust a live drag position of `dragged` against the other `nodes`.
pub fn handle_drag_position(
    position: Position,
    dragged: &NodeId,
    nodes: &[Node],
    options: &DragOptions,
) -> DragResult {
    let mut p = clamp(position, options.bounds);

    if options.snap_to_grid && options.grid_size > 0.0 {
        p.x = (p.x / options.grid_size).round() * options.grid_size;
        p.y = (p.y / options.grid_size).round() * options.grid_size;
        p = clamp(p, options.bounds);
    }

    if !options.magnetic_alignment {
        return DragResult {
            position: p,
            guides: Vec::new(),
        };
    }

    let others: Vec<&Node> = nodes.iter().filter(|n| &n.id != dragged).collect();
    let threshold = options.magnetic_threshold;
    if let Some(dx) = best_pull(p.x, NODE_WIDTH, others.iter().map(|n| n.position.x), threshold) {
        p.x += dx;
    }
    if let Some(dy) = best_pull(p.y, NODE_HEIGHT, others.iter().map(|n| n.position.y), threshold) {
        p.y += dy;
    }
    let p = clamp(p, options.bounds);

    let mut guides = Vec::new();
    for node in &others {
        for coordinate in shared_lines(p.x, node.position.x, NODE_WIDTH) {
            add_guide(&mut guides, GuideAxis::Vertical, coordinate, &node.id);
        }
        for coordinate in shared_lines(p.y, node.position.y, NODE_HEIGHT) {
            add_guide(&mut guides, GuideAxis::Horizontal, coordinate, &node.id);
        }
    }

    DragResult { position: p, guides }
}

/// Keep the node's origin non-negative and its box inside `bounds`.
fn clamp(p: Position, bounds: Option<Bounds>) -> Position {
    let mut p = Position::new(p.x.max(0.0), p.y.max(0.0));
    if let Some(b) = bounds {
        p.x = p.x.clamp(b.min_x, (b.max_x - NODE_WIDTH).max(b.min_x));
        p.y = p.y.clamp(b.min_y, (b.max_y - NODE_HEIGHT).max(b.min_y));
    }
    p
}

/// Start, center and end line of a box of `size` starting at `origin`.
#[inline]
fn lines(origin: f64, size: f64) -> [f64; 3] {
    [origin, origin + size / 2.0, origin + size]
}

/// Smallest offset within `threshold` that puts one of the dragged box's
/// lines onto one of another box's lines.
fn best_pull(origin: f64, size: f64, others: impl Iterator<Item = f64>, threshold: f64) -> Option<f64> {
    let mine = lines(origin, size);
    let mut best: Option<f64> = None;
    for other in others {
        for theirs in lines(other, size) {
            for line in mine {
                let delta = theirs - line;
                if delta.abs() <= threshold && best.is_none_or(|b| delta.abs() < b.abs()) {
                    best = Some(delta);
                }
            }
        }
    }
    best
}

fn shared_lines(origin: f64, other: f64, size: f64) -> Vec<f64> {
    let mine = lines(origin, size);
    lines(other, size)
        .into_iter()
        .filter(|theirs| mine.iter().any(|line| (line - theirs).abs() < GUIDE_EPSILON))
        .collect()
}

fn add_guide(guides: &mut Vec<SnapGuide>, axis: GuideAxis, coordinate: f64, id: &NodeId) {
    match guides
        .iter_mut()
        .find(|g| g.axis == axis && (g.coordinate - coordinate).abs() < GUIDE_EPSILON)
    {
        Some(guide) => {
            if !guide.node_ids.contains(id) {
                guide.node_ids.push(id.clone());
            }
        }
        None => guides.push(SnapGuide {
            axis,
            coordinate,
            node_ids: vec![id.clone()],
        }),
    }
}
