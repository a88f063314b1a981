//! Scalar layout metrics feeding the messiness and overall scores.
//!
//! Every metric is in [0, 1]. Higher is better for `alignment`,
//! `distribution` and `density`; `overlap_ratio` and the normalized
//! spacing variance count against the layout.

use serde::{Deserialize, Serialize};

use crate::graph::{Node, Position, bounding_box};
use crate::spatial::SpatialIndex;

/// Two coordinates within this many units count as aligned.
pub const ALIGNMENT_TOLERANCE: f64 = 20.0;

/// Radius of the neighborhood used by the density score.
pub const DENSITY_RADIUS: f64 = 350.0;

/// Neighbor count considered ideal by the density score.
pub const IDEAL_NEIGHBORS: f64 = 3.0;

/// Grid resolution of the distribution score.
const DISTRIBUTION_CELLS: usize = 3;

/// Raw signals shared by the messiness and layout scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    pub overlap_ratio: f64,
    pub spacing_variance: f64,
    pub alignment: f64,
    pub distribution: f64,
    pub density: f64,
    pub crossing_score: f64,
}

impl LayoutMetrics {
    /// Weighted messiness: overlap 30%, spacing variance 25%, misalignment
    /// 20%, uneven distribution 15%, poor local density 10%.
    pub fn messiness(&self) -> f64 {
        (0.30 * self.overlap_ratio
            + 0.25 * self.spacing_variance
            + 0.20 * (1.0 - self.alignment)
            + 0.15 * (1.0 - self.distribution)
            + 0.10 * (1.0 - self.density))
            .clamp(0.0, 1.0)
    }

    /// Continuous quality meter. Unlike messiness it also penalizes edge
    /// crossings.
    pub fn layout_score(&self) -> f64 {
        (0.25 * (1.0 - self.overlap_ratio)
            + 0.20 * (1.0 - self.spacing_variance)
            + 0.20 * self.alignment
            + 0.15 * self.distribution
            + 0.10 * self.density
            + 0.10 * (1.0 - self.crossing_score))
            .clamp(0.0, 1.0)
    }
}

/// Fraction of node pairs sharing an x or y within [`ALIGNMENT_TOLERANCE`].
///
/// Fewer than two nodes are trivially aligned.
pub fn alignment_score(nodes: &[Node]) -> f64 {
    let n = nodes.len();
    if n < 2 {
        return 1.0;
    }

    let mut aligned = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (nodes[i].position, nodes[j].position);
            if (a.x - b.x).abs() <= ALIGNMENT_TOLERANCE || (a.y - b.y).abs() <= ALIGNMENT_TOLERANCE {
                aligned += 1;
            }
        }
    }
    aligned as f64 / (n * (n - 1) / 2) as f64
}

/// Uniformity of occupancy over a 3×3 grid spanning the bounding box.
///
/// Computed as `1 / (1 + cv)` where `cv` is the coefficient of variation
/// of per-cell counts. A collapsed axis uses a single band on that axis.
pub fn distribution_score(nodes: &[Node]) -> f64 {
    let Some(bounds) = bounding_box(nodes) else {
        return 1.0;
    };
    if nodes.len() < 2 {
        return 1.0;
    }

    let cols = if bounds.width() > f64::EPSILON { DISTRIBUTION_CELLS } else { 1 };
    let rows = if bounds.height() > f64::EPSILON { DISTRIBUTION_CELLS } else { 1 };
    let mut counts = vec![0usize; cols * rows];

    let cell = |v: f64, min: f64, extent: f64, bands: usize| -> usize {
        if bands == 1 {
            return 0;
        }
        (((v - min) / extent * bands as f64) as usize).min(bands - 1)
    };
    for node in nodes {
        let p = node.position;
        let c = cell(p.x, bounds.min_x, bounds.width(), cols);
        let r = cell(p.y, bounds.min_y, bounds.height(), rows);
        counts[r * cols + c] += 1;
    }

    let mean = nodes.len() as f64 / counts.len() as f64;
    let variance = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / counts.len() as f64;
    1.0 / (1.0 + variance.sqrt() / mean)
}

/// How close each node is to having [`IDEAL_NEIGHBORS`] other nodes within
/// [`DENSITY_RADIUS`], averaged over nodes.
pub fn density_score(nodes: &[Node]) -> f64 {
    if nodes.len() < 2 {
        return 1.0;
    }

    let spatial = SpatialIndex::from_positions(nodes.iter().map(|n| n.position));
    let total: f64 = nodes
        .iter()
        .map(|node| {
            let Position { x, y } = node.position;
            // The query includes the node itself
            let neighbors = spatial.in_radius(x, y, DENSITY_RADIUS).len().saturating_sub(1) as f64;
            1.0 - ((neighbors - IDEAL_NEIGHBORS).abs() / IDEAL_NEIGHBORS).min(1.0)
        })
        .sum();
    total / nodes.len() as f64
}
