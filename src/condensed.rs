//! Condensed (upper-triangular) storage of symmetric pairwise distance matrices.
//!
//! For `N` bodies only the `N·(N−1)/2` pairs `(i, j)` with `i < j` are stored,
//! row-major: `i` is the outer index, `j` the inner one. For four bodies:
//!
//! ```text
//! index:  0      1      2      3      4      5
//! pair:  (0,1)  (0,2)  (0,3)  (1,2)  (1,3)  (2,3)
//! ```
//!
//! [`CondensedDistances::to_square`] and [`CondensedDistances::from_square`] convert
//! between this layout and the full symmetric matrix with a zero diagonal.

use nalgebra::DMatrix;

use crate::{constants::Kilometer, syzygy_errors::SyzygyError};

/// Number of stored pairs for `n` bodies.
pub const fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Position of the pair `(i, j)` in a condensed vector over `n` bodies.
///
/// The pair is unordered, `(j, i)` gives the same index.
///
/// # Panics
/// If `i == j` or either index is `>= n`.
pub fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    assert!(i != j, "the diagonal is not stored in a condensed vector");
    assert!(i < n && j < n, "pair ({i}, {j}) out of range for {n} bodies");
    let (i, j) = if i < j { (i, j) } else { (j, i) };
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

/// Upper-triangular pairwise distances for one instant, in kilometers.
#[derive(Debug, Clone, PartialEq)]
pub struct CondensedDistances {
    n_bodies: usize,
    values: Vec<Kilometer>,
}

impl CondensedDistances {
    /// Wrap a condensed vector, checking that its length matches `n_bodies`.
    pub fn new(n_bodies: usize, values: Vec<Kilometer>) -> Result<Self, SyzygyError> {
        let expected = condensed_len(n_bodies);
        if values.len() != expected {
            return Err(SyzygyError::InvalidParameters(format!(
                "condensed vector for {n_bodies} bodies must hold {expected} values, got {}",
                values.len()
            )));
        }
        Ok(CondensedDistances { n_bodies, values })
    }

    pub(crate) fn from_parts(n_bodies: usize, values: Vec<Kilometer>) -> Self {
        debug_assert_eq!(values.len(), condensed_len(n_bodies));
        CondensedDistances { n_bodies, values }
    }

    pub fn n_bodies(&self) -> usize {
        self.n_bodies
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Kilometer] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Kilometer> {
        self.values
    }

    /// Distance between bodies `i` and `j`, symmetric, zero on the diagonal.
    pub fn distance(&self, i: usize, j: usize) -> Kilometer {
        if i == j {
            assert!(i < self.n_bodies, "body {i} out of range");
            0.0
        } else {
            self.values[condensed_index(self.n_bodies, i, j)]
        }
    }

    /// Distances from body `i` to every other body, in body order, skipping `i` itself.
    pub fn distances_from(&self, i: usize) -> Vec<Kilometer> {
        (0..self.n_bodies)
            .filter(|&j| j != i)
            .map(|j| self.distance(i, j))
            .collect()
    }

    /// Rebuild the full symmetric `N × N` matrix (zero diagonal).
    pub fn to_square(&self) -> DMatrix<Kilometer> {
        DMatrix::from_fn(self.n_bodies, self.n_bodies, |i, j| self.distance(i, j))
    }

    /// Condense a full distance matrix.
    ///
    /// The matrix must be square, exactly symmetric, and have a zero diagonal.
    pub fn from_square(matrix: &DMatrix<Kilometer>) -> Result<Self, SyzygyError> {
        if !matrix.is_square() {
            return Err(SyzygyError::InvalidParameters(format!(
                "distance matrix must be square, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }

        let n = matrix.nrows();
        let mut values = Vec::with_capacity(condensed_len(n));
        for i in 0..n {
            if matrix[(i, i)] != 0.0 {
                return Err(SyzygyError::InvalidParameters(format!(
                    "distance matrix has a non-zero diagonal at {i}"
                )));
            }
            for j in (i + 1)..n {
                if matrix[(i, j)] != matrix[(j, i)] {
                    return Err(SyzygyError::InvalidParameters(format!(
                        "distance matrix is not symmetric at ({i}, {j})"
                    )));
                }
                values.push(matrix[(i, j)]);
            }
        }

        Ok(CondensedDistances::from_parts(n, values))
    }
}
