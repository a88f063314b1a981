//! Layout quality analysis.
//!
//! [`analyze_layout_quality`] scores the current geometry of a graph and
//! reports its structural defects (cycles, disconnected clusters,
//! overlapping nodes) together with ranked, actionable suggestions.
//!
//! # Scores
//!
//! - **Messiness** weighs overlap, spacing variance, misalignment, uneven
//!   distribution and poor local density. Above
//!   [`AnalyzerConfig::messy_threshold`] the layout is flagged as messy.
//! - **Score** is a separate continuous meter in [0, 1] that also accounts
//!   for edge crossings.

mod crossings;
mod metrics;
mod performance;
mod suggestions;

pub use crossings::{CrossingAnalysis, segments_intersect};
pub use metrics::{
    ALIGNMENT_TOLERANCE, DENSITY_RADIUS, IDEAL_NEIGHBORS, LayoutMetrics, alignment_score,
    density_score, distribution_score,
};
pub use performance::{PerformanceImpact, performance_impact};
pub use suggestions::{SuggestedAction, Suggestion, SuggestionKind, rank_suggestions};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::graph::analysis::{cluster_slots, find_cycles};
use crate::graph::{
    Edge, GraphIndex, Node, NodeCluster, NodeId, Overlap, SpacingStats, detect_overlaps, spacing_stats,
};

/// Tunables of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    pub messy_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { messy_threshold: 0.4 }
    }
}

/// Result of analyzing one graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAnalysis {
    pub is_messy: bool,
    pub messiness: f64,
    pub cycles: Vec<Vec<NodeId>>,
    /// Clusters that are singletons or contain no start node.
    pub disconnected_clusters: Vec<NodeCluster>,
    pub cluster_count: usize,
    pub overlaps: Vec<Overlap>,
    pub spacing: SpacingStats,
    pub score: f64,
    pub metrics: LayoutMetrics,
    pub crossings: CrossingAnalysis,
    pub performance: PerformanceImpact,
    pub suggestions: Vec<Suggestion>,
}

impl Default for LayoutAnalysis {
    fn default() -> Self {
        Self {
            is_messy: false,
            messiness: 0.0,
            cycles: Vec::new(),
            disconnected_clusters: Vec::new(),
            cluster_count: 0,
            overlaps: Vec::new(),
            spacing: SpacingStats::default(),
            score: 1.0,
            metrics: LayoutMetrics::default(),
            crossings: CrossingAnalysis::default(),
            performance: PerformanceImpact::default(),
            suggestions: Vec::new(),
        }
    }
}

/// Analyze with the default [`AnalyzerConfig`].
pub fn analyze_layout_quality(nodes: &[Node], edges: &[Edge]) -> Result<LayoutAnalysis> {
    analyze_with(nodes, edges, &AnalyzerConfig::default())
}

/// Analyze a graph snapshot.
///
/// An empty graph is a perfect, defect-free layout.
pub fn analyze_with(nodes: &[Node], edges: &[Edge], config: &AnalyzerConfig) -> Result<LayoutAnalysis> {
    if nodes.is_empty() {
        return Ok(LayoutAnalysis::default());
    }

    let index = GraphIndex::build(nodes, edges)?;

    let cycles: Vec<Vec<NodeId>> = find_cycles(&index)
        .into_iter()
        .map(|cycle| cycle.into_iter().map(|s| nodes[s].id.clone()).collect())
        .collect();

    let clusters = cluster_slots(&index);
    let cluster_count = clusters.len();
    let disconnected_clusters: Vec<NodeCluster> = clusters
        .into_iter()
        .enumerate()
        .filter_map(|(id, members)| {
            let has_start = members.iter().any(|&s| nodes[s].kind.is_start());
            (members.len() == 1 || !has_start).then(|| NodeCluster {
                id,
                node_ids: members.iter().map(|&s| nodes[s].id.clone()).collect(),
                is_disconnected: true,
            })
        })
        .collect();

    let overlaps = detect_overlaps(nodes);
    let involved: HashSet<&NodeId> = overlaps.iter().flat_map(|o| [&o.a, &o.b]).collect();
    let spacing = spacing_stats(nodes);
    let crossings = crossings::analyze(nodes, edges, &index);

    let metrics = LayoutMetrics {
        overlap_ratio: involved.len() as f64 / nodes.len() as f64,
        spacing_variance: spacing.normalized_variance(),
        alignment: alignment_score(nodes),
        distribution: distribution_score(nodes),
        density: density_score(nodes),
        crossing_score: crossings.crossing_score,
    };
    let messiness = metrics.messiness();
    let is_messy = messiness > config.messy_threshold;

    let suggestions = suggestions::generate(&suggestions::Findings {
        overlaps: &overlaps,
        cycle_count: cycles.len(),
        disconnected: &disconnected_clusters,
        cluster_count,
        node_count: nodes.len(),
        metrics: &metrics,
        messiness,
        is_messy,
    });

    debug!(
        nodes = nodes.len(),
        messiness,
        score = metrics.layout_score(),
        cycles = cycles.len(),
        overlaps = overlaps.len(),
        suggestions = suggestions.len(),
        "layout analyzed"
    );

    Ok(LayoutAnalysis {
        is_messy,
        messiness,
        cycles,
        disconnected_clusters,
        cluster_count,
        overlaps,
        spacing,
        score: metrics.layout_score(),
        metrics,
        crossings,
        performance: performance_impact(nodes.len(), edges.len()),
        suggestions,
    })
}
