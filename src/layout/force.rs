//! Force-simulated layout.
//!
//! A velocity-Verlet style simulation in the manner of d3-force, run for a
//! fixed number of ticks on the calling thread:
//!
//! - **Link**: springs pull connected nodes toward `link_distance`.
//! - **Charge**: every pair repels with strength `charge_strength / d²`.
//! - **Center**: the centroid is translated back onto the start centroid.
//! - **Collision**: pairs closer than two collision radii are pushed apart.
//!
//! Alpha (the "temperature") decays geometrically so the final ticks make
//! only small corrections. Initial positions get a small seeded jitter so
//! coincident nodes can separate; output is deterministic for a given seed.

use tracing::trace;

use super::config::{ForceParams, LayoutConfig};
use crate::error::Result;
use crate::graph::{Edge, GraphIndex, Node, Position};

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const COLLISION_STRENGTH: f64 = 0.7;
const JITTER: f64 = 1.0;

/// Force layout of a snapshot, normalized to the configured padding.
pub fn layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let index = GraphIndex::build(nodes, edges)?;
    super::finish(nodes, positions(nodes, &index, config), config.padding, "force")
}

pub(crate) fn positions(nodes: &[Node], index: &GraphIndex, config: &LayoutConfig) -> Vec<Position> {
    let mut sim = Simulation::new(nodes, index, config.force);
    for _ in 0..config.force.iterations {
        sim.tick();
    }
    trace!(ticks = config.force.iterations, alpha = sim.alpha, "force simulation finished");
    sim.positions()
}

/// Deterministic xorshift64 generator for the initial jitter.
struct Jitter(u64);

impl Jitter {
    fn new(seed: u64) -> Self {
        // Avoid the all-zero state
        Self(seed.wrapping_add(0x9e37_79b9_7f4a_7c15) | 1)
    }

    /// Uniform value in [-1, 1].
    fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    }
}

struct Simulation {
    x: Vec<f64>,
    y: Vec<f64>,
    vx: Vec<f64>,
    vy: Vec<f64>,
    links: Vec<(usize, usize)>,
    /// Per-link bias toward moving the lower-degree endpoint.
    link_bias: Vec<f64>,
    center: Position,
    params: ForceParams,
    alpha: f64,
    alpha_decay: f64,
}

impl Simulation {
    fn new(nodes: &[Node], index: &GraphIndex, params: ForceParams) -> Self {
        let n = nodes.len();
        let mut jitter = Jitter::new(params.seed);
        let x: Vec<f64> = nodes.iter().map(|node| node.position.x + jitter.next() * JITTER).collect();
        let y: Vec<f64> = nodes.iter().map(|node| node.position.y + jitter.next() * JITTER).collect();
        let center = Position::new(
            x.iter().sum::<f64>() / n as f64,
            y.iter().sum::<f64>() / n as f64,
        );

        let links: Vec<(usize, usize)> = index.edge_pairs().into_iter().filter(|(s, t)| s != t).collect();
        let mut degree = vec![0usize; n];
        for &(s, t) in &links {
            degree[s] += 1;
            degree[t] += 1;
        }
        let link_bias = links
            .iter()
            .map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
            .collect();

        let ticks = params.iterations.max(1) as f64;
        Self {
            x,
            y,
            vx: vec![0.0; n],
            vy: vec![0.0; n],
            links,
            link_bias,
            center,
            params,
            alpha: 1.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / ticks),
        }
    }

    fn tick(&mut self) {
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;
        self.apply_links();
        self.apply_charge();
        self.apply_collision();

        for i in 0..self.x.len() {
            self.vx[i] *= 1.0 - VELOCITY_DECAY;
            self.vy[i] *= 1.0 - VELOCITY_DECAY;
            self.x[i] += self.vx[i];
            self.y[i] += self.vy[i];
        }

        self.apply_center();
    }

    fn apply_links(&mut self) {
        let strength = self.params.link_strength;
        for (k, &(s, t)) in self.links.iter().enumerate() {
            let mut dx = self.x[t] + self.vx[t] - self.x[s] - self.vx[s];
            let mut dy = self.y[t] + self.vy[t] - self.y[s] - self.vy[s];
            if dx == 0.0 && dy == 0.0 {
                dx = f64::EPSILON;
                dy = f64::EPSILON;
            }
            let l = (dx * dx + dy * dy).sqrt();
            let f = (l - self.params.link_distance) / l * self.alpha * strength;
            dx *= f;
            dy *= f;

            let bias = self.link_bias[k];
            self.vx[t] -= dx * bias;
            self.vy[t] -= dy * bias;
            self.vx[s] += dx * (1.0 - bias);
            self.vy[s] += dy * (1.0 - bias);
        }
    }

    fn apply_charge(&mut self) {
        let n = self.x.len();
        let strength = self.params.charge_strength * self.alpha;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = self.x[j] - self.x[i];
                let dy = self.y[j] - self.y[i];
                // Floor the squared distance so near-coincident pairs stay finite
                let l2 = (dx * dx + dy * dy).max(1.0);
                let w = strength / l2;
                self.vx[i] += dx * w;
                self.vy[i] += dy * w;
                self.vx[j] -= dx * w;
                self.vy[j] -= dy * w;
            }
        }
    }

    fn apply_collision(&mut self) {
        let n = self.x.len();
        let min = self.params.collision_radius * 2.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = (self.x[j] + self.vx[j]) - (self.x[i] + self.vx[i]);
                let dy = (self.y[j] + self.vy[j]) - (self.y[i] + self.vy[i]);
                let l = (dx * dx + dy * dy).sqrt();
                if l >= min || l <= f64::EPSILON {
                    continue;
                }
                let push = (min - l) / l * 0.5 * COLLISION_STRENGTH;
                self.vx[i] -= dx * push;
                self.vy[i] -= dy * push;
                self.vx[j] += dx * push;
                self.vy[j] += dy * push;
            }
        }
    }

    fn apply_center(&mut self) {
        let n = self.x.len() as f64;
        let sx = self.x.iter().sum::<f64>() / n - self.center.x;
        let sy = self.y.iter().sum::<f64>() / n - self.center.y;
        for i in 0..self.x.len() {
            self.x[i] -= sx;
            self.y[i] -= sy;
        }
    }

    fn positions(&self) -> Vec<Position> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| Position::new(x, y))
            .collect()
    }
}
