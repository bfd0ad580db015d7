//! Dense symmetric distance matrix.

use std::ops::Range;

use rand::Rng;

use crate::error::{AcoError, Result};

/// A dense n×n edge-weight table stored in row-major order.
///
/// Invariants enforced by every constructor:
/// - at least two nodes,
/// - `get(i, i) == 0`,
/// - `get(i, j) == get(j, i)`,
/// - every weight is finite and non-negative.
///
/// The triangle inequality is not assumed. Off-diagonal zero weights are
/// accepted; tour construction treats them as a certain move.
///
/// # Examples
///
/// ```
/// use u_colony::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0],
///     vec![10.0, 0.0, 35.0],
///     vec![15.0, 35.0, 0.0],
/// ])
/// .expect("valid matrix");
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(2, 1), 35.0);
/// assert_eq!(dm.tour_length(&[0, 1, 2]), 60.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix from an explicit row-major n×n grid.
    ///
    /// Fails with [`AcoError::InvalidConfiguration`] if the data length does
    /// not match `size * size` or any invariant is violated.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(AcoError::config(format!(
                "expected {} weights for {size} nodes, got {}",
                size * size,
                data.len()
            )));
        }
        let dm = Self { data, size };
        dm.validate()?;
        Ok(dm)
    }

    /// Creates a matrix from a square table of rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(AcoError::config(format!(
                "row {i} has {} columns, expected {size}",
                row.len()
            )));
        }
        Self::from_data(size, rows.concat())
    }

    /// Generates a random symmetric instance.
    ///
    /// Each pair `i < j` receives an integer weight drawn uniformly from the
    /// half-open `range`, mirrored to `(j, i)`. The diagonal is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use u_colony::distance::DistanceMatrix;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let dm = DistanceMatrix::random_symmetric(10, 10..100, &mut rng).expect("valid");
    /// assert!(dm.is_symmetric(0.0));
    /// assert!((10.0..100.0).contains(&dm.get(3, 4)));
    /// ```
    pub fn random_symmetric<R: Rng + ?Sized>(
        size: usize,
        range: Range<u32>,
        rng: &mut R,
    ) -> Result<Self> {
        if size < 2 {
            return Err(AcoError::config(format!(
                "a tour needs at least 2 nodes, got {size}"
            )));
        }
        if range.is_empty() || range.start == 0 {
            return Err(AcoError::config(format!(
                "weight range {range:?} must be non-empty and strictly positive"
            )));
        }

        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let w = f64::from(rng.random_range(range.clone()));
                data[i * size + j] = w;
                data[j * size + i] = w;
            }
        }
        Ok(Self { data, size })
    }

    /// Returns the weight of the edge between `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the matrix rows, for presentation by callers.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.size)
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Cyclic length of `route`: consecutive edges plus the closing edge.
    ///
    /// # Panics
    ///
    /// Panics if the route contains an out-of-bounds index.
    pub fn tour_length(&self, route: &[usize]) -> f64 {
        if route.len() < 2 {
            return 0.0;
        }
        let open: f64 = route.windows(2).map(|w| self.get(w[0], w[1])).sum();
        open + self.get(route[route.len() - 1], route[0])
    }

    fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(AcoError::config(format!(
                "a tour needs at least 2 nodes, got {}",
                self.size
            )));
        }
        for i in 0..self.size {
            if self.get(i, i) != 0.0 {
                return Err(AcoError::config(format!(
                    "diagonal weight at node {i} must be 0, got {}",
                    self.get(i, i)
                )));
            }
            for j in (i + 1)..self.size {
                let w = self.get(i, j);
                if !w.is_finite() || w < 0.0 {
                    return Err(AcoError::config(format!(
                        "weight ({i}, {j}) must be finite and non-negative, got {w}"
                    )));
                }
                if w != self.get(j, i) {
                    return Err(AcoError::config(format!(
                        "weights ({i}, {j}) and ({j}, {i}) differ"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_from_rows() {
        let dm = sample();
        assert_eq!(dm.size(), 4);
        assert_eq!(dm.get(0, 3), 20.0);
        assert_eq!(dm.get(3, 0), 20.0);
        assert_eq!(dm.get(2, 2), 0.0);
        assert!(dm.is_symmetric(0.0));
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn test_rejects_single_node() {
        let err = DistanceMatrix::from_data(1, vec![0.0]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_asymmetric() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 10.0, 15.0, 0.0]).is_err());
    }

    #[test]
    fn test_rejects_nonzero_diagonal() {
        assert!(DistanceMatrix::from_data(2, vec![1.0, 5.0, 5.0, 0.0]).is_err());
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, -1.0, -1.0, 0.0]).is_err());
        assert!(DistanceMatrix::from_data(2, vec![0.0, f64::NAN, f64::NAN, 0.0]).is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        assert!(DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_accepts_zero_off_diagonal() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 0.0, 0.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 0.0);
    }

    #[test]
    fn test_tour_length_includes_closing_edge() {
        let dm = sample();
        // 0→1→3→2→0 = 10 + 25 + 30 + 15
        assert_eq!(dm.tour_length(&[0, 1, 3, 2]), 80.0);
        assert_eq!(dm.tour_length(&[0, 1, 2, 3]), 95.0);
    }

    #[test]
    fn test_random_symmetric() {
        let mut rng = u_numflow::random::create_rng(42);
        let dm = DistanceMatrix::random_symmetric(10, 10..100, &mut rng).expect("valid");
        assert_eq!(dm.size(), 10);
        assert!(dm.is_symmetric(0.0));
        for i in 0..10 {
            assert_eq!(dm.get(i, i), 0.0);
            for j in 0..10 {
                if i != j {
                    let w = dm.get(i, j);
                    assert!((10.0..100.0).contains(&w));
                    assert_eq!(w.fract(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_random_symmetric_rejects_bad_input() {
        let mut rng = u_numflow::random::create_rng(42);
        assert!(DistanceMatrix::random_symmetric(1, 10..100, &mut rng).is_err());
        assert!(DistanceMatrix::random_symmetric(5, 10..10, &mut rng).is_err());
        assert!(DistanceMatrix::random_symmetric(5, 0..10, &mut rng).is_err());
    }

    #[test]
    fn test_rows() {
        let dm = sample();
        let rows: Vec<&[f64]> = dm.rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], &[10.0, 0.0, 35.0, 25.0]);
    }
}
