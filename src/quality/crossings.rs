//! Edge-crossing analysis.
//!
//! Edges are straight segments between node centers. Every pair of edges
//! that do not share an endpoint is tested with the parametric
//! line-intersection formula; parallel segments (zero denominator) never
//! cross.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, EdgeId, GraphIndex, Node, Position};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossingAnalysis {
    pub crossing_count: usize,
    /// Crossings divided by the number of edge pairs, in [0, 1].
    pub crossing_score: f64,
    /// Distinct edges involved in at least one crossing, in edge order.
    pub crossing_edges: Vec<EdgeId>,
}

/// Whether segment `p1→p2` properly intersects `p3→p4`.
pub fn segments_intersect(p1: Position, p2: Position, p3: Position, p4: Position) -> bool {
    let denominator = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denominator.abs() < f64::EPSILON {
        return false;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / denominator;
    let u = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x)) / denominator;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Count crossings in a laid-out graph.
pub(crate) fn analyze(nodes: &[Node], edges: &[Edge], index: &GraphIndex) -> CrossingAnalysis {
    let segments: Vec<Option<(Position, Position)>> = edges
        .iter()
        .map(|e| {
            let s = index.slot(&e.source)?;
            let t = index.slot(&e.target)?;
            Some((nodes[s].position.node_center(), nodes[t].position.node_center()))
        })
        .collect();

    let mut count = 0usize;
    let mut involved = BTreeSet::new();
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if edges[i].shares_endpoint(&edges[j]) {
                continue;
            }
            let (Some((a1, a2)), Some((b1, b2))) = (segments[i], segments[j]) else {
                continue;
            };
            if segments_intersect(a1, a2, b1, b2) {
                count += 1;
                involved.insert(i);
                involved.insert(j);
            }
        }
    }

    let pairs = edges.len() * edges.len().saturating_sub(1) / 2;
    CrossingAnalysis {
        crossing_count: count,
        crossing_score: if pairs == 0 { 0.0 } else { count as f64 / pairs as f64 },
        crossing_edges: involved.into_iter().map(|i| edges[i].id.clone()).collect(),
    }
}
