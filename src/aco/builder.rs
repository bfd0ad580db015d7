//! Probabilistic tour construction.
//!
//! One ant walks the complete graph: it starts on a uniformly random node and
//! repeatedly moves to an unvisited node chosen by roulette wheel over
//!
//! ```text
//! tau(j) = pher[c][j]^alpha * (1 / dist[c][j])^beta
//! ```
//!
//! Candidates are scanned in ascending index order, so the same draw over
//! the same state always yields the same node.

use rand::Rng;
use tracing::warn;

use crate::distance::DistanceMatrix;
use crate::error::{AcoError, Diagnostic, Result};
use crate::models::TourRecord;

use super::config::check_exponent;
use super::pheromone::PheromoneMatrix;

/// Outcome of one transition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Chosen by roulette wheel.
    Weighted(usize),
    /// Chosen with certainty: zero distance or unbounded desirability.
    Certain(usize),
    /// Every candidate had zero desirability; lowest unvisited index taken.
    Fallback(usize),
}

impl Selection {
    /// The selected node.
    pub fn node(self) -> usize {
        match self {
            Selection::Weighted(j) | Selection::Certain(j) | Selection::Fallback(j) => j,
        }
    }
}

/// A constructed tour and any degeneracies met while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    /// The closed tour and its length.
    pub tour: TourRecord,
    /// Recovered degenerate selections, in the order they happened.
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds tours against a fixed distance/pheromone snapshot.
///
/// Holds shared references only: no ant can mutate pheromone while building.
///
/// # Examples
///
/// ```
/// use u_colony::aco::{PheromoneMatrix, RouteBuilder};
/// use u_colony::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .expect("valid");
/// let pher = PheromoneMatrix::new(4, 1.0).expect("valid");
/// let builder = RouteBuilder::new(&dm, &pher, 1.0, 5.0).expect("same size");
///
/// let mut draws = [0.5, 0.5, 0.5].into_iter();
/// let built = builder
///     .build_from(0, || draws.next().unwrap_or(0.0))
///     .expect("valid start");
/// assert_eq!(built.tour.route(), &[0, 1, 3, 2]);
/// assert_eq!(built.tour.length(), 80.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'a> {
    distances: &'a DistanceMatrix,
    pheromones: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
}

impl<'a> RouteBuilder<'a> {
    /// Creates a builder over matching distance and pheromone matrices.
    ///
    /// Fails with [`AcoError::InvalidConfiguration`] on mismatched sizes or
    /// negative or non-finite exponents.
    pub fn new(
        distances: &'a DistanceMatrix,
        pheromones: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
    ) -> Result<Self> {
        if distances.size() != pheromones.size() {
            return Err(AcoError::config(format!(
                "distance matrix has {} nodes but pheromone matrix has {}",
                distances.size(),
                pheromones.size()
            )));
        }
        check_exponent("alpha", alpha)?;
        check_exponent("beta", beta)?;
        Ok(Self {
            distances,
            pheromones,
            alpha,
            beta,
        })
    }

    /// Unnormalized transition weight from `from` to `to`.
    ///
    /// Infinite when the distance is zero and `beta > 0`.
    pub fn desirability(&self, from: usize, to: usize) -> f64 {
        let pher = self.pheromones.get(from, to).powf(self.alpha);
        let heur = (1.0 / self.distances.get(from, to)).powf(self.beta);
        pher * heur
    }

    /// Picks the next node from `current` given a uniform draw in `[0, 1)`.
    ///
    /// `visited` must hold one flag per node. Returns `Ok(None)` only when
    /// every node is already visited.
    pub fn select_next(
        &self,
        current: usize,
        visited: &[bool],
        draw: f64,
    ) -> Result<Option<Selection>> {
        let n = self.distances.size();
        if current >= n {
            return Err(AcoError::IndexOutOfBounds {
                index: current,
                size: n,
            });
        }
        if visited.len() != n {
            return Err(AcoError::config(format!(
                "visited flags cover {} nodes, expected {n}",
                visited.len()
            )));
        }
        Ok(self.pick(current, visited, draw))
    }

    fn pick(&self, current: usize, visited: &[bool], draw: f64) -> Option<Selection> {
        let candidates: Vec<usize> = (0..self.distances.size())
            .filter(|&j| j != current && !visited[j])
            .collect();
        let first = *candidates.first()?;

        if let Some(&j) = candidates
            .iter()
            .find(|&&j| self.distances.get(current, j) == 0.0)
        {
            return Some(Selection::Certain(j));
        }

        let mut weights = Vec::with_capacity(candidates.len());
        for &j in &candidates {
            let w = self.desirability(current, j);
            if w.is_infinite() {
                return Some(Selection::Certain(j));
            }
            // NaN counts as unreachable
            weights.push((j, if w > 0.0 { w } else { 0.0 }));
        }

        let mut total: f64 = weights.iter().map(|&(_, w)| w).sum();
        if total <= 0.0 {
            return Some(Selection::Fallback(first));
        }
        if !total.is_finite() {
            // Sum overflowed; rescale so the wheel keeps its proportions.
            let max = weights.iter().map(|&(_, w)| w).fold(0.0, f64::max);
            for (_, w) in &mut weights {
                *w /= max;
            }
            total = weights.iter().map(|&(_, w)| w).sum();
        }

        let mut remaining = draw * total;
        let mut last_positive = first;
        for &(j, w) in &weights {
            if w <= 0.0 {
                continue;
            }
            last_positive = j;
            remaining -= w;
            if remaining <= 0.0 {
                return Some(Selection::Weighted(j));
            }
        }
        // Rounding left a sliver on the wheel
        Some(Selection::Weighted(last_positive))
    }

    /// Builds one tour, drawing the start node and every transition from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Construction {
        let start = rng.random_range(0..self.distances.size());
        self.construct(start, || rng.random::<f64>())
    }

    /// Builds one tour from `start`, taking one draw in `[0, 1)` per step.
    ///
    /// Exactly `n - 1` draws are consumed.
    pub fn build_from<F: FnMut() -> f64>(&self, start: usize, draw: F) -> Result<Construction> {
        let n = self.distances.size();
        if start >= n {
            return Err(AcoError::IndexOutOfBounds {
                index: start,
                size: n,
            });
        }
        Ok(self.construct(start, draw))
    }

    fn construct<F: FnMut() -> f64>(&self, start: usize, mut draw: F) -> Construction {
        let n = self.distances.size();
        let mut visited = vec![false; n];
        let mut route = Vec::with_capacity(n);
        let mut diagnostics = Vec::new();

        visited[start] = true;
        route.push(start);
        let mut current = start;

        while route.len() < n {
            let u = draw();
            let Some(selection) = self.pick(current, &visited, u) else {
                break;
            };
            if let Selection::Fallback(next) = selection {
                warn!(from = current, fallback = next, "all candidates at zero desirability");
                diagnostics.push(Diagnostic::DegenerateSelection {
                    from: current,
                    fallback: next,
                });
            }
            let next = selection.node();
            visited[next] = true;
            route.push(next);
            current = next;
        }

        Construction {
            tour: TourRecord::scored(route, self.distances),
            diagnostics,
        }
    }
}
