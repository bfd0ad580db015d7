//! Pheromone matrix.

use crate::error::{AcoError, Result};

use super::config::{validate_evaporation_rate, validate_initial_pheromone};

/// Symmetric n×n table of pheromone levels, stored row-major.
///
/// Off-diagonal cells start at a positive constant and stay strictly
/// positive: evaporation is multiplicative and floored at
/// [`f64::MIN_POSITIVE`], deposits only add. The diagonal is held at zero
/// and never read by tour construction.
///
/// # Examples
///
/// ```
/// use u_colony::aco::PheromoneMatrix;
///
/// let mut pher = PheromoneMatrix::new(3, 1.0).expect("valid");
/// pher.evaporate(0.5).expect("valid rate");
/// pher.deposit(0, 2, 0.25).expect("valid deposit");
/// assert_eq!(pher.get(0, 2), 0.75);
/// assert_eq!(pher.get(2, 0), 0.75);
/// assert_eq!(pher.get(0, 1), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
}

impl PheromoneMatrix {
    /// Fills every off-diagonal cell with `initial`.
    pub fn new(size: usize, initial: f64) -> Result<Self> {
        if size < 2 {
            return Err(AcoError::config(format!(
                "a tour needs at least 2 nodes, got {size}"
            )));
        }
        validate_initial_pheromone(initial)?;

        let mut data = vec![initial; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Ok(Self { data, size })
    }

    /// Pheromone level on the edge between `from` and `to`.
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

    /// Multiplies every off-diagonal cell by `1 - rate`.
    ///
    /// Fails with [`AcoError::InvalidConfiguration`] unless `rate` is in
    /// `[0, 1)`; a rate of 1 would erase all learned information.
    ///
    /// A positive rate strictly lowers every cell above the
    /// [`f64::MIN_POSITIVE`] floor. Cells already at the floor stay there.
    pub fn evaporate(&mut self, rate: f64) -> Result<()> {
        validate_evaporation_rate(rate)?;
        if rate == 0.0 {
            return Ok(());
        }

        let keep = 1.0 - rate;
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j {
                    let cell = &mut self.data[i * self.size + j];
                    *cell = (*cell * keep).max(f64::MIN_POSITIVE);
                }
            }
        }
        Ok(())
    }

    /// Adds `amount` to the edge `(i, j)` in both directions.
    ///
    /// Both cells receive the same computed value, so symmetry holds exactly.
    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Err(AcoError::config(format!(
                "cannot deposit on the diagonal cell ({i}, {i})"
            )));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(AcoError::config(format!(
                "deposit amount must be finite and non-negative, got {amount}"
            )));
        }

        let updated = self.get(i, j) + amount;
        if !updated.is_finite() {
            return Err(AcoError::config(format!(
                "deposit on ({i}, {j}) overflows pheromone level"
            )));
        }
        self.data[i * self.size + j] = updated;
        self.data[j * self.size + i] = updated;
        Ok(())
    }

    /// Returns `true` if `get(i, j) == get(j, i)` exactly for every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..self.size)
            .all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Smallest off-diagonal level.
    pub fn min_level(&self) -> f64 {
        let mut min = f64::INFINITY;
        for i in 0..self.size {
            for j in 0..self.size {
                if i != j {
                    min = min.min(self.get(i, j));
                }
            }
        }
        min
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.size {
            return Err(AcoError::IndexOutOfBounds {
                index,
                size: self.size,
            });
        }
        Ok(())
    }
}
