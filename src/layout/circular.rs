//! Circular layout: nodes evenly spaced by angle around a circle.
//!
//! The first node sits at twelve o'clock and the rest follow clockwise in
//! source order. Without an explicit radius, the circumference is sized so
//! neighbors on the circle are one node width plus spacing apart.

use std::f64::consts::{PI, TAU};

use super::config::LayoutConfig;
use crate::error::Result;
use crate::graph::{NODE_WIDTH, Node, Position};

/// Circular layout of a snapshot, normalized to the configured padding.
pub fn layout(nodes: &[Node], config: &LayoutConfig) -> Result<Vec<Node>> {
    super::finish(nodes, positions(nodes, config), config.padding, "circular")
}

/// Radius used for `n` nodes.
pub fn radius_for(n: usize, config: &LayoutConfig) -> f64 {
    config.circular_radius.unwrap_or_else(|| {
        let circumference = n as f64 * (NODE_WIDTH + config.spacing.horizontal);
        (circumference / TAU).max(NODE_WIDTH)
    })
}

/// Positions around `center` at `radius`.
pub fn ring(count: usize, center: Position, radius: f64) -> Vec<Position> {
    (0..count)
        .map(|i| {
            let angle = -PI / 2.0 + TAU * i as f64 / count as f64;
            Position::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

pub(crate) fn positions(nodes: &[Node], config: &LayoutConfig) -> Vec<Position> {
    if nodes.len() == 1 {
        return vec![Position::default()];
    }
    let radius = radius_for(nodes.len(), config);
    ring(nodes.len(), Position::new(radius, radius), radius)
}
