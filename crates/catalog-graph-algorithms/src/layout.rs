//! Force-directed layout
//!
//! Fruchterman-Reingold spring layout: every pair of nodes repels with
//! `k^2 / d`, every edge attracts with `w * d^2 / k`. Displacements are
//! capped by a temperature that cools linearly over the iteration budget.

use super::common::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Minimum distance used when two nodes coincide
const MIN_DISTANCE: f64 = 0.01;

/// Spring layout configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringLayoutConfig {
    /// Optimal distance between nodes
    pub k: f64,
    /// Maximum number of iterations
    pub iterations: usize,
    /// Half-width of the final bounding box
    pub scale: f64,
    /// Stop once the mean displacement per node drops below this
    pub threshold: f64,
}

impl Default for SpringLayoutConfig {
    fn default() -> Self {
        Self {
            k: 2.5,
            iterations: 50,
            scale: 1000.0,
            threshold: 1e-4,
        }
    }
}

/// A 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Compute positions for every node of the view, in dense index order.
///
/// Initial positions are drawn uniformly from the unit square using a
/// `StdRng` seeded with `seed`, so identical inputs and seeds give identical
/// layouts. The result is centred on the origin and scaled so that the
/// largest absolute coordinate equals `config.scale`.
pub fn spring_layout(view: &GraphView, config: &SpringLayoutConfig, seed: u64) -> Vec<(NodeId, Position)> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(view.index_to_node[0], Position::default())];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    // Dense weight matrix; graphs here are capped at a few hundred nodes
    let mut adjacency = vec![0.0f64; n * n];
    for i in 0..n {
        for (&j, &w) in view.neighbors(i).iter().zip(view.neighbor_weights(i)) {
            adjacency[i * n + j] = w;
        }
    }

    let k = if config.k > 0.0 { config.k } else { (1.0 / n as f64).sqrt() };
    let mut temperature = initial_temperature(&pos);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    let mut displacement = vec![[0.0f64; 2]; n];
    for _ in 0..config.iterations {
        for d in displacement.iter_mut() {
            *d = [0.0, 0.0];
        }

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i][0] - pos[j][0];
                let dy = pos[i][1] - pos[j][1];
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (distance * distance) - adjacency[i * n + j] * distance / k;
                displacement[i][0] += dx * force;
                displacement[i][1] += dy * force;
            }
        }

        let mut total_step = 0.0;
        for i in 0..n {
            let [dx, dy] = displacement[i];
            let length = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let step_x = dx * temperature / length;
            let step_y = dy * temperature / length;
            pos[i][0] += step_x;
            pos[i][1] += step_y;
            total_step += (step_x * step_x + step_y * step_y).sqrt();
        }

        temperature -= cooling;
        if total_step / (n as f64) < config.threshold {
            break;
        }
    }

    rescale(&mut pos, config.scale);

    pos.into_iter()
        .enumerate()
        .map(|(idx, [x, y])| (view.index_to_node[idx], Position::new(x, y)))
        .collect()
}

fn initial_temperature(pos: &[[f64; 2]]) -> f64 {
    let mut extent: f64 = 0.0;
    for axis in 0..2 {
        let min = pos.iter().map(|p| p[axis]).fold(f64::INFINITY, f64::min);
        let max = pos.iter().map(|p| p[axis]).fold(f64::NEG_INFINITY, f64::max);
        extent = extent.max(max - min);
    }
    extent * 0.1
}

/// Centre on the origin, then scale so the largest |coordinate| is `scale`.
fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
        limit = limit.max(p[0].abs()).max(p[1].abs());
    }

    if limit > 0.0 {
        for p in pos.iter_mut() {
            p[0] *= scale / limit;
            p[1] *= scale / limit;
        }
    }
}
