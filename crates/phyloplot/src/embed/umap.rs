//! UMAP-style embedding over precomputed distances.
//!
//! The layout is computed in four steps:
//!
//! 1. For every point, its `k` nearest neighbours are weighted with
//!    `exp(-(d - rho) / sigma)`, where `rho` is the distance to the closest
//!    distinct neighbour and `sigma` is found by bisection so that the
//!    weights sum to `log2(k)`.
//! 2. The directed weights are merged with the fuzzy union
//!    `p + q - p * q` into an undirected graph.
//! 3. Points are placed uniformly at random in a square.
//! 4. Stochastic gradient descent pulls graph neighbours together along the
//!    curve `1 / (1 + a * d^(2b))` and pushes randomly sampled pairs apart.
//!
//! All randomness comes from a [`StdRng`] seeded with
//! [`EmbeddingConfig::seed`], so equal inputs give equal layouts.

use std::collections::BTreeMap;

use log::{debug, info, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use phyloplot_core::matrix::DistanceMatrix;

use super::{Embedder, Embedding, EmbeddingError, validate_matrix};
use crate::config::EmbeddingConfig;

/// Bisection steps of the bandwidth search.
const SIGMA_ITERATIONS: usize = 64;

/// Accepted distance between the weight sum and its target.
const SIGMA_TOLERANCE: f64 = 1e-5;

/// Lower bound of sigma as a share of the mean neighbour distance.
const MIN_SIGMA_SCALE: f64 = 1e-3;

/// Graph edges lighter than this are dropped.
const EDGE_EPSILON: f64 = 1e-10;

/// Initial coordinates are drawn from `[-INIT_RANGE, INIT_RANGE)`.
const INIT_RANGE: f64 = 10.0;

/// Per-coordinate gradient clip.
const GRADIENT_CLIP: f64 = 4.0;

/// Keeps the repulsive gradient finite for coincident points.
const REPULSION_EPSILON: f64 = 1e-3;

/// Scale of the embedded clusters.
const SPREAD: f64 = 1.0;

/// One undirected edge of the fuzzy neighbour graph.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    head: usize,
    tail: usize,
    weight: f64,
}

/// The default [`Embedder`], configured by an [`EmbeddingConfig`].
///
/// # Example
///
/// ```
/// use phyloplot::config::EmbeddingConfig;
/// use phyloplot::embed::{Embedder, Umap};
/// use phyloplot::matrix::DistanceMatrix;
///
/// let mut matrix = DistanceMatrix::new(3);
/// matrix.set_symmetric(0, 1, 5.0).unwrap();
/// matrix.set_symmetric(0, 2, 7.0).unwrap();
/// matrix.set_symmetric(1, 2, 3.0).unwrap();
///
/// let embedding = Umap::new(EmbeddingConfig::default()).fit_transform(&matrix).unwrap();
/// assert_eq!(embedding.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Umap {
    config: EmbeddingConfig,
}

impl Umap {
    /// Creates an embedder with the given parameters.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    /// Returns the parameters.
    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    fn validate_config(&self) -> Result<(), EmbeddingError> {
        let config = &self.config;
        if config.n_neighbors == 0 {
            return Err(EmbeddingError::InvalidParameter(
                "n_neighbors must be at least 1".to_string(),
            ));
        }
        if config.n_epochs == 0 {
            return Err(EmbeddingError::InvalidParameter(
                "n_epochs must be at least 1".to_string(),
            ));
        }
        if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
            return Err(EmbeddingError::InvalidParameter(format!(
                "learning_rate must be positive, found {}",
                config.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&config.min_dist) {
            return Err(EmbeddingError::InvalidParameter(format!(
                "min_dist must be within [0, 1], found {}",
                config.min_dist
            )));
        }
        Ok(())
    }
}

impl Embedder for Umap {
    fn fit_transform(&self, matrix: &DistanceMatrix) -> Result<Embedding, EmbeddingError> {
        self.validate_config()?;
        validate_matrix(matrix)?;

        let size = matrix.size();
        let k = self.config.n_neighbors.min(size - 1);
        info!(
            points = size,
            neighbors = k,
            epochs = self.config.n_epochs,
            seed = self.config.seed;
            "Fitting UMAP embedding"
        );

        let edges = fuzzy_graph(matrix, k);
        let (a, b) = fit_curve(SPREAD, self.config.min_dist);
        debug!(edges = edges.len(), a, b; "Neighbour graph built");

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut points: Vec<[f64; 2]> = (0..size)
            .map(|_| {
                [
                    rng.random_range(-INIT_RANGE..INIT_RANGE),
                    rng.random_range(-INIT_RANGE..INIT_RANGE),
                ]
            })
            .collect();

        for epoch in 0..self.config.n_epochs {
            let alpha =
                self.config.learning_rate * (1.0 - epoch as f64 / self.config.n_epochs as f64);
            run_epoch(
                &mut points,
                &edges,
                (a, b),
                alpha,
                self.config.negative_sample_rate,
                &mut rng,
            );
        }

        if points.iter().flatten().any(|value| !value.is_finite()) {
            return Err(EmbeddingError::Diverged);
        }

        let embedding = Embedding::new(points.into_iter().map(|[x, y]| (x, y)).collect());
        trace!(embedding:?; "Embedding computed");
        Ok(embedding)
    }
}

/// Builds the symmetric fuzzy graph over the `k` nearest neighbours of every
/// point. Edges are ordered by `(head, tail)` with `head < tail`.
fn fuzzy_graph(matrix: &DistanceMatrix, k: usize) -> Vec<Edge> {
    let target = (k as f64).log2();
    let mut directed: BTreeMap<(usize, usize), (f64, f64)> = BTreeMap::new();

    for (i, row) in matrix.rows().enumerate() {
        let mut neighbors: Vec<(usize, f64)> = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, &distance)| (j, distance))
            .collect();
        neighbors.sort_by(|left, right| left.1.total_cmp(&right.1));
        neighbors.truncate(k);

        let distances: Vec<f64> = neighbors.iter().map(|&(_, distance)| distance).collect();
        let rho = distances
            .iter()
            .copied()
            .find(|&distance| distance > 0.0)
            .unwrap_or(0.0);
        let sigma = smooth_knn_sigma(&distances, rho, target);

        for (j, distance) in neighbors {
            let weight = membership(distance, rho, sigma);
            let entry = directed.entry((i.min(j), i.max(j))).or_default();
            if i < j {
                entry.0 = weight;
            } else {
                entry.1 = weight;
            }
        }
    }

    directed
        .into_iter()
        .map(|((head, tail), (p, q))| Edge {
            head,
            tail,
            weight: p + q - p * q,
        })
        .filter(|edge| edge.weight > EDGE_EPSILON)
        .collect()
}

fn membership(distance: f64, rho: f64, sigma: f64) -> f64 {
    if distance <= rho {
        1.0
    } else {
        (-(distance - rho) / sigma).exp()
    }
}

/// Bisects the bandwidth at which the neighbour weights sum to `target`.
///
/// The upper bound starts unbounded and doubles until it overshoots. The
/// result is floored at [`MIN_SIGMA_SCALE`] times the mean distance.
fn smooth_knn_sigma(distances: &[f64], rho: f64, target: f64) -> f64 {
    let mut lo = 0.0;
    let mut hi = f64::INFINITY;
    let mut mid = 1.0;

    for _ in 0..SIGMA_ITERATIONS {
        let sum: f64 = distances
            .iter()
            .map(|&distance| membership(distance, rho, mid))
            .sum();
        if (sum - target).abs() < SIGMA_TOLERANCE {
            break;
        }
        if sum > target {
            hi = mid;
            mid = (lo + hi) / 2.0;
        } else {
            lo = mid;
            mid = if hi == f64::INFINITY {
                mid * 2.0
            } else {
                (lo + hi) / 2.0
            };
        }
    }

    let mean = if distances.is_empty() {
        0.0
    } else {
        distances.iter().sum::<f64>() / distances.len() as f64
    };
    mid.max(MIN_SIGMA_SCALE * mean)
}

/// Fits `1 / (1 + a * x^(2b))` to the target curve that is 1 below
/// `min_dist` and decays as `exp(-(x - min_dist) / spread)` above it.
///
/// Least squares over 300 samples in `[0, 3 * spread]`, by a coarse grid
/// search followed by two refinements around the best cell.
fn fit_curve(spread: f64, min_dist: f64) -> (f64, f64) {
    const SAMPLES: usize = 300;

    let samples: Vec<(f64, f64)> = (0..SAMPLES)
        .map(|index| {
            let x = 3.0 * spread * index as f64 / (SAMPLES - 1) as f64;
            let y = if x < min_dist {
                1.0
            } else {
                (-(x - min_dist) / spread).exp()
            };
            (x, y)
        })
        .collect();

    let error = |a: f64, b: f64| -> f64 {
        samples
            .iter()
            .map(|&(x, y)| {
                let residual = 1.0 / (1.0 + a * x.powf(2.0 * b)) - y;
                residual * residual
            })
            .sum()
    };

    let mut best = (1.0, 1.0);
    let mut best_error = f64::INFINITY;
    let mut search = |a_range: (f64, f64), b_range: (f64, f64), steps: usize| {
        for a_step in 0..=steps {
            let a = a_range.0 + (a_range.1 - a_range.0) * a_step as f64 / steps as f64;
            for b_step in 0..=steps {
                let b = b_range.0 + (b_range.1 - b_range.0) * b_step as f64 / steps as f64;
                if a <= 0.0 || b <= 0.0 {
                    continue;
                }
                let current = error(a, b);
                if current < best_error {
                    best_error = current;
                    best = (a, b);
                }
            }
        }
        best
    };

    let (mut a_width, mut b_width) = (0.1, 0.02);
    let (mut a, mut b) = search((0.1, 5.0), (0.3, 2.0), 60);
    for _ in 0..2 {
        (a, b) = search((a - a_width, a + a_width), (b - b_width, b + b_width), 20);
        a_width /= 10.0;
        b_width /= 10.0;
    }
    (a, b)
}

/// One SGD pass over every edge, with `negative_rate` repulsive samples per
/// edge.
fn run_epoch(
    points: &mut [[f64; 2]],
    edges: &[Edge],
    (a, b): (f64, f64),
    alpha: f64,
    negative_rate: usize,
    rng: &mut StdRng,
) {
    let size = points.len();

    for edge in edges {
        let (head, tail) = (points[edge.head], points[edge.tail]);
        let dist_sq = squared_distance(head, tail);
        let coeff = if dist_sq > 0.0 {
            -2.0 * a * b * dist_sq.powf(b - 1.0) / (1.0 + a * dist_sq.powf(b))
        } else {
            0.0
        };

        for dim in 0..2 {
            let grad = clip(coeff * edge.weight * (head[dim] - tail[dim]));
            points[edge.head][dim] += grad * alpha;
            points[edge.tail][dim] -= grad * alpha;
        }

        for _ in 0..negative_rate {
            let other = rng.random_range(0..size);
            if other == edge.head {
                continue;
            }
            let (current, far) = (points[edge.head], points[other]);
            let dist_sq = squared_distance(current, far);
            let coeff = 2.0 * b / ((REPULSION_EPSILON + dist_sq) * (1.0 + a * dist_sq.powf(b)));

            for dim in 0..2 {
                let grad = if coeff > 0.0 {
                    clip(coeff * (current[dim] - far[dim]))
                } else {
                    GRADIENT_CLIP
                };
                points[edge.head][dim] += grad * alpha;
            }
        }
    }
}

fn squared_distance(left: [f64; 2], right: [f64; 2]) -> f64 {
    let (dx, dy) = (left[0] - right[0], left[1] - right[1]);
    dx * dx + dy * dy
}

fn clip(value: f64) -> f64 {
    value.clamp(-GRADIENT_CLIP, GRADIENT_CLIP)
}
