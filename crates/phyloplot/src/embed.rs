//! Two-dimensional embeddings of precomputed distance matrices.
//!
//! The [`Embedder`] trait turns a [`DistanceMatrix`] into one point per row.
//! [`Umap`] is the built-in implementation; other embedders can be passed to
//! [`PlotBuilder::embed_with`](crate::PlotBuilder::embed_with).
//!
//! Every embedder is expected to call [`validate_matrix`] first, so a matrix
//! that cannot describe a metric space is rejected with an
//! [`EmbeddingError`] before any work is done.

mod umap;

pub use umap::Umap;

use thiserror::Error;

use phyloplot_core::matrix::DistanceMatrix;

/// Absolute difference tolerated between `M[i][j]` and `M[j][i]`, relative
/// to the larger of the two values (or 1).
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Reasons an embedder rejects its input or fails to produce output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    #[error("at least 2 points are required, found {count}")]
    TooFewPoints { count: usize },

    #[error("distance between {row} and {col} is not finite")]
    NonFinite { row: usize, col: usize },

    #[error("distance between {row} and {col} is negative ({distance})")]
    Negative {
        row: usize,
        col: usize,
        distance: f64,
    },

    #[error("matrix is not symmetric: M[{row}][{col}] = {forward} but M[{col}][{row}] = {backward}")]
    Asymmetric {
        row: usize,
        col: usize,
        forward: f64,
        backward: f64,
    },

    #[error("distance from {index} to itself must be 0, found {distance}")]
    NonZeroDiagonal { index: usize, distance: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("optimisation diverged to non-finite coordinates")]
    Diverged,
}

/// Coordinates produced by an [`Embedder`], one point per matrix row.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    points: Vec<(f64, f64)>,
}

impl Embedding {
    /// Wraps the given points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Returns the points in row order.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `((min_x, max_x), (min_y, max_y))`, or `None` when empty.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let (&(x, y), rest) = self.points.split_first()?;
        Some(rest.iter().fold(
            ((x, x), (y, y)),
            |((min_x, max_x), (min_y, max_y)), &(x, y)| {
                ((min_x.min(x), max_x.max(x)), (min_y.min(y), max_y.max(y)))
            },
        ))
    }
}

/// Maps a precomputed distance matrix to two-dimensional coordinates.
pub trait Embedder {
    /// Embeds every row of `matrix` as one point.
    ///
    /// # Errors
    ///
    /// Returns an [`EmbeddingError`] if the matrix is not a valid distance
    /// matrix, the embedder is misconfigured, or the result is not finite.
    fn fit_transform(&self, matrix: &DistanceMatrix) -> Result<Embedding, EmbeddingError>;
}

/// Checks that `matrix` has at least two rows, only finite non-negative
/// entries, a zero diagonal and is symmetric within [`SYMMETRY_TOLERANCE`].
///
/// # Errors
///
/// Returns the first violation found, scanning rows in order.
pub fn validate_matrix(matrix: &DistanceMatrix) -> Result<(), EmbeddingError> {
    let size = matrix.size();
    if size < 2 {
        return Err(EmbeddingError::TooFewPoints { count: size });
    }

    for (row, values) in matrix.rows().enumerate() {
        for (col, &distance) in values.iter().enumerate() {
            if !distance.is_finite() {
                return Err(EmbeddingError::NonFinite { row, col });
            }
            if distance < 0.0 {
                return Err(EmbeddingError::Negative { row, col, distance });
            }
        }

        if values[row] != 0.0 {
            return Err(EmbeddingError::NonZeroDiagonal {
                index: row,
                distance: values[row],
            });
        }
    }

    for row in 0..size {
        for col in (row + 1)..size {
            let forward = matrix.get(row, col).unwrap_or_default();
            let backward = matrix.get(col, row).unwrap_or_default();
            let scale = forward.abs().max(backward.abs()).max(1.0);
            if (forward - backward).abs() > SYMMETRY_TOLERANCE * scale {
                return Err(EmbeddingError::Asymmetric {
                    row,
                    col,
                    forward,
                    backward,
                });
            }
        }
    }

    Ok(())
}
