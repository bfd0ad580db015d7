//! End-of-iteration pheromone update.

use tracing::warn;

use crate::error::{AcoError, Diagnostic, Result};
use crate::models::{check_permutation, TourRecord};

use super::config::validate_evaporation_rate;
use super::pheromone::PheromoneMatrix;

/// What a pheromone update did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Tours that deposited pheromone.
    pub deposited: usize,
    /// Tours skipped because their length was zero or non-finite.
    pub skipped: Vec<Diagnostic>,
}

/// Evaporation followed by quality-proportional deposition.
///
/// Every tour deposits `1 / length` on each of its edges, closing edge
/// included, in both directions.
///
/// # Examples
///
/// ```
/// use u_colony::aco::{PheromoneMatrix, PheromoneUpdate};
/// use u_colony::distance::DistanceMatrix;
/// use u_colony::models::TourRecord;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 1.0],
///     vec![1.0, 0.0, 2.0],
///     vec![1.0, 2.0, 0.0],
/// ])
/// .expect("valid");
/// let tour = TourRecord::from_route(vec![0, 1, 2], &dm).expect("valid");
///
/// let mut pher = PheromoneMatrix::new(3, 1.0).expect("valid");
/// let update = PheromoneUpdate::new(0.5).expect("valid rate");
/// let report = update.apply(&mut pher, &[tour]).expect("matching sizes");
///
/// assert_eq!(report.deposited, 1);
/// assert_eq!(pher.get(1, 2), 0.5 + 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PheromoneUpdate {
    evaporation_rate: f64,
}

impl PheromoneUpdate {
    /// Creates an update step; `rate` must be in `[0, 1)`.
    pub fn new(evaporation_rate: f64) -> Result<Self> {
        validate_evaporation_rate(evaporation_rate)?;
        Ok(Self { evaporation_rate })
    }

    /// The configured evaporation rate.
    pub fn evaporation_rate(&self) -> f64 {
        self.evaporation_rate
    }

    /// Amount a tour deposits on each of its edges.
    ///
    /// Fails with [`AcoError::DegenerateTour`] for zero, negative, or
    /// non-finite lengths, and for lengths so small the reciprocal overflows.
    pub fn deposit_amount(tour: &TourRecord) -> Result<f64> {
        let length = tour.length();
        if !length.is_finite() || length <= 0.0 {
            return Err(AcoError::DegenerateTour { length });
        }
        let amount = 1.0 / length;
        if !amount.is_finite() {
            return Err(AcoError::DegenerateTour { length });
        }
        Ok(amount)
    }

    /// Evaporates `pheromones`, then deposits for every tour in order.
    ///
    /// Every tour must be a permutation of the matrix nodes, and no edge may
    /// overflow once deposits are summed. Both are checked before anything
    /// is mutated, so a rejected update leaves the matrix untouched.
    /// Degenerate tours are skipped and reported rather than failing the
    /// update.
    pub fn apply(
        &self,
        pheromones: &mut PheromoneMatrix,
        tours: &[TourRecord],
    ) -> Result<UpdateReport> {
        let n = pheromones.size();
        for tour in tours {
            check_permutation(tour.route(), n)?;
        }
        let amounts: Vec<Result<f64>> = tours.iter().map(Self::deposit_amount).collect();
        Self::check_totals(pheromones, tours, &amounts)?;

        pheromones.evaporate(self.evaporation_rate)?;

        let mut report = UpdateReport::default();
        for (ant, (tour, amount)) in tours.iter().zip(amounts).enumerate() {
            let Ok(amount) = amount else {
                warn!(
                    ant,
                    length = tour.length(),
                    "skipping deposit for degenerate tour"
                );
                report.skipped.push(Diagnostic::SkippedDeposit {
                    ant,
                    length: tour.length(),
                });
                continue;
            };
            for (i, j) in tour.edges() {
                pheromones.deposit(i, j, amount)?;
            }
            report.deposited += 1;
        }
        Ok(report)
    }

    /// Rejects updates whose summed deposits would overflow an edge.
    ///
    /// Evaporation only lowers levels, so checking against the current
    /// levels bounds the post-evaporation result.
    fn check_totals(
        pheromones: &PheromoneMatrix,
        tours: &[TourRecord],
        amounts: &[Result<f64>],
    ) -> Result<()> {
        let n = pheromones.size();
        let mut totals = vec![0.0; n * n];
        for (tour, amount) in tours.iter().zip(amounts) {
            let Ok(amount) = amount else { continue };
            for (i, j) in tour.edges() {
                let (lo, hi) = if i < j { (i, j) } else { (j, i) };
                totals[lo * n + hi] += amount;
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let total = totals[i * n + j];
                if total > 0.0 && !(pheromones.get(i, j) + total).is_finite() {
                    return Err(AcoError::config(format!(
                        "deposit on ({i}, {j}) overflows pheromone level"
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
    use crate::distance::DistanceMatrix;

    fn four_cities() -> DistanceMatrix {
        DistanceMatrix::from_rows(&[
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_evaporate_then_deposit() {
        let dm = four_cities();
        let tour = TourRecord::from_route(vec![0, 1, 3, 2], &dm).expect("valid");
        let mut pher = PheromoneMatrix::new(4, 1.0).expect("valid");
        let update = PheromoneUpdate::new(0.5).expect("valid");

        let report = update.apply(&mut pher, &[tour]).expect("valid");
        assert_eq!(report.deposited, 1);
        assert!(report.skipped.is_empty());

        let used = 0.5 + 1.0 / 80.0;
        for (i, j) in [(0, 1), (1, 3), (3, 2), (2, 0)] {
            assert_eq!(pher.get(i, j), used);
            assert_eq!(pher.get(j, i), used);
        }
        // Unused edges only evaporate
        assert_eq!(pher.get(0, 3), 0.5);
        assert_eq!(pher.get(1, 2), 0.5);
    }

    #[test]
    fn test_shorter_tours_deposit_more() {
        let dm = four_cities();
        let short = TourRecord::from_route(vec![0, 1, 3, 2], &dm).expect("valid");
        let long = TourRecord::from_route(vec![0, 1, 2, 3], &dm).expect("valid");
        let a = PheromoneUpdate::deposit_amount(&short).expect("positive");
        let b = PheromoneUpdate::deposit_amount(&long).expect("positive");
        assert!(a > b);
    }

    #[test]
    fn test_multiple_ants_accumulate() {
        let dm = four_cities();
        let tour = TourRecord::from_route(vec![0, 1, 3, 2], &dm).expect("valid");
        let mut pher = PheromoneMatrix::new(4, 1.0).expect("valid");
        let update = PheromoneUpdate::new(0.0).expect("valid");
        update
            .apply(&mut pher, &[tour.clone(), tour])
            .expect("valid");
        assert_eq!(pher.get(0, 1), 1.0 + 1.0 / 80.0 + 1.0 / 80.0);
    }

    #[test]
    fn test_zero_length_tour_is_skipped() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 0.0, 0.0, 0.0]).expect("valid");
        let tour = TourRecord::from_route(vec![0, 1], &dm).expect("valid");
        assert_eq!(
            PheromoneUpdate::deposit_amount(&tour),
            Err(AcoError::DegenerateTour { length: 0.0 })
        );

        let mut pher = PheromoneMatrix::new(2, 1.0).expect("valid");
        let update = PheromoneUpdate::new(0.5).expect("valid");
        let report = update.apply(&mut pher, &[tour]).expect("valid");
        assert_eq!(report.deposited, 0);
        assert_eq!(
            report.skipped,
            vec![Diagnostic::SkippedDeposit { ant: 0, length: 0.0 }]
        );
        assert_eq!(pher.get(0, 1), 0.5);
        assert!(pher.get(0, 1).is_finite());
    }

    #[test]
    fn test_size_mismatch_leaves_matrix_untouched() {
        let dm = four_cities();
        let tour = TourRecord::from_route(vec![0, 1, 3, 2], &dm).expect("valid");
        let mut pher = PheromoneMatrix::new(3, 1.0).expect("valid");
        let update = PheromoneUpdate::new(0.5).expect("valid");
        assert!(update.apply(&mut pher, &[tour]).is_err());
        assert_eq!(pher.get(0, 1), 1.0);
    }

    #[test]
    fn test_duplicate_node_tour_leaves_matrix_untouched() {
        let mut pher = PheromoneMatrix::new(4, 1.0).expect("valid");
        pher.deposit(0, 1, 0.25).expect("deposit");
        let before = pher.clone();

        let bad = TourRecord::unchecked(vec![0, 1, 1, 2], 5.0);
        let update = PheromoneUpdate::new(0.5).expect("valid");
        let err = update.apply(&mut pher, &[bad]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidTour { .. }));
        assert_eq!(pher, before);
    }

    #[test]
    fn test_later_bad_tour_blocks_earlier_good_one() {
        let dm = four_cities();
        let good = TourRecord::from_route(vec![0, 1, 3, 2], &dm).expect("valid");
        let bad = TourRecord::unchecked(vec![0, 1, 2, 7], 5.0);
        let mut pher = PheromoneMatrix::new(4, 1.0).expect("valid");
        let before = pher.clone();

        let update = PheromoneUpdate::new(0.5).expect("valid");
        assert_eq!(
            update.apply(&mut pher, &[good, bad]),
            Err(AcoError::IndexOutOfBounds { index: 7, size: 4 })
        );
        assert_eq!(pher, before);
    }

    #[test]
    fn test_overflowing_deposit_leaves_matrix_untouched() {
        let tour = TourRecord::unchecked(vec![0, 1], 1e-310);
        assert!(PheromoneUpdate::deposit_amount(&tour).is_err());

        // Deposits about f64::MAX / 2 on each edge
        let huge = TourRecord::unchecked(vec![0, 1, 2], 2.0 / f64::MAX);
        let mut pher = PheromoneMatrix::new(3, 1.0).expect("valid");
        let update = PheromoneUpdate::new(0.0).expect("valid");
        update.apply(&mut pher, &[huge.clone()]).expect("fits once");
        let before = pher.clone();
        assert!(update.apply(&mut pher, &[huge.clone(), huge]).is_err());
        assert_eq!(pher, before);
    }

    #[test]
    fn test_rate_one_rejected() {
        assert!(PheromoneUpdate::new(1.0).is_err());
        assert!(PheromoneUpdate::new(0.0).is_ok());
    }
}
