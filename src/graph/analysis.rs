//! Graph-analysis primitives.
//!
//! Pure functions over a `(nodes, edges)` snapshot: adjacency, cycles,
//! connected components, overlaps, and spacing/bounds statistics. These are
//! the building blocks of both the layout generators and the quality
//! analyzer, and none of them hold state between calls.

use std::collections::{HashMap, HashSet};

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::index::GraphIndex;
use super::node::{NODE_WIDTH, Node, NodeId, Position};
use crate::error::Result;
use crate::spatial::SpatialIndex;

/// Minimum center-to-center distance below which two default-sized nodes
/// are considered overlapping.
pub const MIN_NODE_SPACING: f64 = NODE_WIDTH * 0.75;

/// Severity shared by overlaps and suggestions. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A connected component of the undirected graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCluster {
    pub id: usize,
    pub node_ids: Vec<NodeId>,
    /// Singleton, or contains no `start` node.
    pub is_disconnected: bool,
}

/// Two nodes closer than [`MIN_NODE_SPACING`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub a: NodeId,
    pub b: NodeId,
    pub distance: f64,
    pub severity: Severity,
}

/// Mean and variance of all pairwise node distances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpacingStats {
    pub mean: f64,
    pub variance: f64,
}

impl SpacingStats {
    /// Variance scaled by the squared mean, clamped to [0, 1].
    pub fn normalized_variance(&self) -> f64 {
        if self.mean <= f64::EPSILON {
            return 0.0;
        }
        (self.variance / (self.mean * self.mean)).clamp(0.0, 1.0)
    }
}

/// Axis-aligned bounding box of node positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Position {
        Position::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Map every node id to the ids of its outgoing neighbors, in edge order.
pub fn adjacency(nodes: &[Node], edges: &[Edge]) -> Result<HashMap<NodeId, Vec<NodeId>>> {
    let index = GraphIndex::build(nodes, edges)?;
    let mut map = HashMap::with_capacity(nodes.len());
    for (slot, node) in nodes.iter().enumerate() {
        let targets = index
            .successors(slot)
            .iter()
            .map(|&t| nodes[t].id.clone())
            .collect();
        map.entry(node.id.clone()).or_insert(targets);
    }
    Ok(map)
}

/// Find every distinct cycle reachable by depth-first traversal.
///
/// A neighbor that is still on the recursion stack closes a cycle; the path
/// from that neighbor to the current node is recorded. Nodes whose traversal
/// has finished are never re-entered. Self-loops are 1-node cycles.
pub fn detect_cycles(nodes: &[Node], edges: &[Edge]) -> Result<Vec<Vec<NodeId>>> {
    let index = GraphIndex::build(nodes, edges)?;
    Ok(find_cycles(&index)
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|slot| nodes[slot].id.clone()).collect())
        .collect())
}

/// Slot-level cycle search shared with the analyzer.
///
/// The traversal keeps its own stack of `(slot, next successor)` frames, so
/// path length is bounded by memory rather than the call stack. The frames
/// double as the current path.
pub(crate) fn find_cycles(index: &GraphIndex) -> Vec<Vec<usize>> {
    let n = index.node_count();
    let mut visited = vec![false; n];
    // Depth on the current path, `None` once the node's traversal is done
    let mut depth: Vec<Option<usize>> = vec![None; n];
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut cycles = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        depth[start] = Some(0);
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let slot = frame.0;
            let Some(&next) = index.successors(slot).get(frame.1) else {
                depth[slot] = None;
                frames.pop();
                continue;
            };
            frame.1 += 1;

            if let Some(at) = depth[next] {
                let cycle: Vec<usize> = frames[at..].iter().map(|&(s, _)| s).collect();
                if seen.insert(canonical_rotation(&cycle)) {
                    cycles.push(cycle);
                }
            } else if !visited[next] {
                visited[next] = true;
                depth[next] = Some(frames.len());
                frames.push((next, 0));
            }
        }
    }

    cycles
}

/// Rotate a cycle so its smallest slot comes first.
fn canonical_rotation(cycle: &[usize]) -> Vec<usize> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, s)| *s)
        .map(|(i, _)| i)
        .unwrap_or(0);
    cycle[pivot..].iter().chain(&cycle[..pivot]).copied().collect()
}

/// Partition nodes into undirected connected components.
///
/// Clusters are ordered by their first member's slot, and members keep the
/// input order.
pub fn connected_components(nodes: &[Node], edges: &[Edge]) -> Result<Vec<NodeCluster>> {
    let index = GraphIndex::build(nodes, edges)?;
    Ok(cluster_slots(&index)
        .into_iter()
        .enumerate()
        .map(|(id, members)| {
            let has_start = members.iter().any(|&s| nodes[s].kind.is_start());
            NodeCluster {
                id,
                is_disconnected: members.len() == 1 || !has_start,
                node_ids: members.into_iter().map(|s| nodes[s].id.clone()).collect(),
            }
        })
        .collect())
}

/// Slot-level component partition.
pub(crate) fn cluster_slots(index: &GraphIndex) -> Vec<Vec<usize>> {
    let n = index.node_count();
    let mut sets = UnionFind::<usize>::new(n);
    for (a, b) in index.edge_pairs() {
        sets.union(a, b);
    }

    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for slot in 0..n {
        let root = sets.find(slot);
        let cluster = *by_root.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[cluster].push(slot);
    }
    clusters
}

/// Every node pair closer than [`MIN_NODE_SPACING`].
///
/// Pairs closer than half the minimum are `High` severity, the rest `Medium`.
pub fn detect_overlaps(nodes: &[Node]) -> Vec<Overlap> {
    let spatial = SpatialIndex::from_positions(nodes.iter().map(|n| n.position));
    let mut overlaps = Vec::new();

    for (i, node) in nodes.iter().enumerate() {
        let mut candidates = spatial.in_radius(node.position.x, node.position.y, MIN_NODE_SPACING);
        candidates.sort_unstable();
        for j in candidates.into_iter().filter(|&j| j > i) {
            let distance = node.position.distance(nodes[j].position);
            if distance >= MIN_NODE_SPACING {
                continue;
            }
            let severity = if distance < MIN_NODE_SPACING / 2.0 {
                Severity::High
            } else {
                Severity::Medium
            };
            overlaps.push(Overlap {
                a: node.id.clone(),
                b: nodes[j].id.clone(),
                distance,
                severity,
            });
        }
    }

    overlaps
}

/// Mean and variance of pairwise distances. Zero for fewer than two nodes.
pub fn spacing_stats(nodes: &[Node]) -> SpacingStats {
    let distances = pairwise_distances(nodes);
    if distances.is_empty() {
        return SpacingStats::default();
    }

    let count = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / count;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count;
    SpacingStats { mean, variance }
}

pub(crate) fn pairwise_distances(nodes: &[Node]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            distances.push(nodes[i].position.distance(nodes[j].position));
        }
    }
    distances
}

/// Bounding box of all node positions, or `None` for an empty set.
pub fn bounding_box(nodes: &[Node]) -> Option<Bounds> {
    let first = nodes.first()?.position;
    let mut bounds = Bounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x,
        max_y: first.y,
    };

    for node in &nodes[1..] {
        let p = node.position;
        bounds.min_x = bounds.min_x.min(p.x);
        bounds.min_y = bounds.min_y.min(p.y);
        bounds.max_x = bounds.max_x.max(p.x);
        bounds.max_y = bounds.max_y.max(p.y);
    }

    Some(bounds)
}
