//! Dense symmetric distance matrix.
//!
//! [`DistanceMatrix`] is allocated once with its final size and rejects any
//! write outside of it. Every write goes through
//! [`DistanceMatrix::set_symmetric`], so `M[i][j] == M[j][i]` holds at all
//! times. Cells start at zero; a parallel seen mask records which pairs were
//! written so that a pair that was never supplied can be told apart from an
//! observed zero distance.
//!
//! # Example
//!
//! ```
//! use phyloplot_core::matrix::DistanceMatrix;
//!
//! let mut matrix = DistanceMatrix::new(3);
//! matrix.set_symmetric(0, 1, 5.0).unwrap();
//! matrix.set_symmetric(0, 2, 7.0).unwrap();
//! matrix.set_symmetric(1, 2, 3.0).unwrap();
//!
//! assert_eq!(matrix.get(2, 0), Some(7.0));
//! assert!(matrix.is_complete());
//! assert!(matrix.set_symmetric(0, 3, 1.0).is_err());
//! ```

use log::trace;
use thiserror::Error;

/// Errors raised when writing into a [`DistanceMatrix`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// An index is not smaller than the matrix size.
    #[error("index {index} is out of bounds for a {size}x{size} matrix")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A distance between an element and itself that is not zero.
    #[error("distance from {index} to itself must be 0, found {distance}")]
    NonZeroDiagonal { index: usize, distance: f64 },
}

/// A square, symmetric matrix of pairwise distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
    seen: Vec<bool>,
}

impl DistanceMatrix {
    /// Creates a zero-filled `size` x `size` matrix.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
            seen: vec![false; size * size],
        }
    }

    /// Builds a matrix from full rows.
    ///
    /// The rows are taken as they are, so the result may be asymmetric. Every
    /// cell counts as seen. Returns `None` if the rows do not form a square.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            values: rows.iter().flatten().copied().collect(),
            seen: vec![true; size * size],
        })
    }

    /// Returns the number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` for a 0x0 matrix.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the distance between `i` and `j`, or `None` if either index is
    /// out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.offset(i, j).map(|offset| self.values[offset])
    }

    /// Returns row `i` as a slice.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.size).then(|| &self.values[i * self.size..(i + 1) * self.size])
    }

    /// Iterates over the rows of the matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `max(1)` keeps `chunks` valid for the empty matrix.
        self.values.chunks(self.size.max(1))
    }

    /// Writes `distance` into both `M[i][j]` and `M[j][i]` and marks the pair
    /// as seen.
    ///
    /// Returns the value previously stored for the pair if it had been seen.
    ///
    /// # Errors
    ///
    /// - [`MatrixError::IndexOutOfBounds`] if `i` or `j` is not below the size.
    /// - [`MatrixError::NonZeroDiagonal`] if `i == j` and `distance != 0`.
    pub fn set_symmetric(
        &mut self,
        i: usize,
        j: usize,
        distance: f64,
    ) -> Result<Option<f64>, MatrixError> {
        for index in [i, j] {
            if index >= self.size {
                return Err(MatrixError::IndexOutOfBounds {
                    index,
                    size: self.size,
                });
            }
        }
        if i == j && distance != 0.0 {
            return Err(MatrixError::NonZeroDiagonal { index: i, distance });
        }

        let forward = i * self.size + j;
        let backward = j * self.size + i;
        let previous = self.seen[forward].then(|| self.values[forward]);
        if let Some(previous) = previous {
            trace!(i, j, previous, distance; "Overwriting distance");
        }

        self.values[forward] = distance;
        self.values[backward] = distance;
        self.seen[forward] = true;
        self.seen[backward] = true;

        Ok(previous)
    }

    /// Returns `true` if the pair was written explicitly.
    ///
    /// The diagonal always counts as seen.
    pub fn is_seen(&self, i: usize, j: usize) -> bool {
        i == j && i < self.size || self.offset(i, j).is_some_and(|offset| self.seen[offset])
    }

    /// Iterates over the unordered pairs `(i, j)` with `i < j` that were never
    /// written.
    pub fn missing_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size)
            .flat_map(move |i| ((i + 1)..self.size).map(move |j| (i, j)))
            .filter(|&(i, j)| !self.is_seen(i, j))
    }

    /// Returns `true` if every off-diagonal pair was written.
    pub fn is_complete(&self) -> bool {
        self.missing_pairs().next().is_none()
    }

    /// Returns `true` if `|M[i][j] - M[j][i]| <= tolerance` for every pair.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.size).all(|i| {
            ((i + 1)..self.size).all(|j| {
                (self.values[i * self.size + j] - self.values[j * self.size + i]).abs()
                    <= tolerance
            })
        })
    }

    /// Returns the row-major values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn offset(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.size && j < self.size).then(|| i * self.size + j)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_three_by_three_fill() {
        let mut matrix = DistanceMatrix::new(3);
        matrix.set_symmetric(0, 1, 5.0).unwrap();
        matrix.set_symmetric(0, 2, 7.0).unwrap();
        matrix.set_symmetric(1, 2, 3.0).unwrap();

        let rows: Vec<Vec<f64>> = matrix.rows().map(<[f64]>::to_vec).collect();
        assert_eq!(
            rows,
            vec![
                vec![0.0, 5.0, 7.0],
                vec![5.0, 0.0, 3.0],
                vec![7.0, 3.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_out_of_bounds_write_is_rejected() {
        let mut matrix = DistanceMatrix::new(10);
        let err = matrix.set_symmetric(3, 10, 1.0).unwrap_err();

        assert_eq!(
            err,
            MatrixError::IndexOutOfBounds {
                index: 10,
                size: 10
            }
        );
        assert!(matrix.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_zero_diagonal_is_rejected() {
        let mut matrix = DistanceMatrix::new(2);
        assert!(matrix.set_symmetric(1, 1, 0.0).is_ok());
        assert_eq!(
            matrix.set_symmetric(1, 1, 2.0).unwrap_err(),
            MatrixError::NonZeroDiagonal {
                index: 1,
                distance: 2.0
            }
        );
    }

    #[test]
    fn test_rewrite_returns_previous_value() {
        let mut matrix = DistanceMatrix::new(2);
        assert_eq!(matrix.set_symmetric(0, 1, 4.0).unwrap(), None);
        assert_eq!(matrix.set_symmetric(1, 0, 6.0).unwrap(), Some(4.0));
        assert_approx_eq!(f64, matrix.get(0, 1).unwrap(), 6.0);
    }

    #[test]
    fn test_missing_pairs() {
        let mut matrix = DistanceMatrix::new(3);
        matrix.set_symmetric(0, 1, 0.0).unwrap();

        let missing: Vec<_> = matrix.missing_pairs().collect();
        assert_eq!(missing, vec![(0, 2), (1, 2)]);
        assert!(matrix.is_seen(1, 0));
        assert!(matrix.is_seen(2, 2));
        assert!(!matrix.is_complete());
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = DistanceMatrix::new(0);
        assert!(matrix.is_empty());
        assert!(matrix.is_complete());
        assert_eq!(matrix.get(0, 0), None);
        assert_eq!(matrix.row(0), None);
    }

    #[test]
    fn test_from_rows() {
        let matrix = DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        assert!(!matrix.is_symmetric(0.5));
        assert!(matrix.is_symmetric(1.0));
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0]]).is_none());
    }

    proptest! {
        #[test]
        fn prop_writes_are_symmetric_with_zero_diagonal(
            size in 1usize..12,
            writes in prop::collection::vec((0usize..12, 0usize..12, 0.0f64..1000.0), 0..40),
        ) {
            let mut matrix = DistanceMatrix::new(size);
            for (i, j, d) in writes {
                if i == j {
                    continue;
                }
                match matrix.set_symmetric(i, j, d) {
                    Ok(_) => {
                        prop_assert_eq!(matrix.get(i, j), Some(d));
                        prop_assert_eq!(matrix.get(j, i), Some(d));
                    }
                    Err(MatrixError::IndexOutOfBounds { index, .. }) => {
                        prop_assert!(index >= size);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {other:?}"),
                }
            }
            prop_assert!(matrix.is_symmetric(0.0));
            for k in 0..size {
                prop_assert_eq!(matrix.get(k, k), Some(0.0));
            }
        }
    }
}
