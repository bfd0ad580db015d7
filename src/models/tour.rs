//! Tour record type.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{AcoError, Result};

/// A closed tour over every node paired with its cyclic length.
///
/// The route is implicitly closed: the last node connects back to the first.
/// Records are immutable once created. Deserialization applies the same
/// permutation check as [`TourRecord::from_route`], over `0..route.len()`.
///
/// # Examples
///
/// ```
/// use u_colony::distance::DistanceMatrix;
/// use u_colony::models::TourRecord;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 3.0, 4.0],
///     vec![3.0, 0.0, 5.0],
///     vec![4.0, 5.0, 0.0],
/// ])
/// .expect("valid");
///
/// let tour = TourRecord::from_route(vec![2, 0, 1], &dm).expect("permutation");
/// assert_eq!(tour.route(), &[2, 0, 1]);
/// assert_eq!(tour.length(), 12.0);
/// assert_eq!(tour.edges().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTour")]
pub struct TourRecord {
    route: Vec<usize>,
    length: f64,
}

#[derive(Deserialize)]
struct RawTour {
    route: Vec<usize>,
    length: f64,
}

impl TryFrom<RawTour> for TourRecord {
    type Error = AcoError;

    fn try_from(raw: RawTour) -> Result<Self> {
        check_permutation(&raw.route, raw.route.len())?;
        if raw.length.is_nan() || raw.length < 0.0 {
            return Err(AcoError::tour(format!(
                "tour length must be non-negative, got {}",
                raw.length
            )));
        }
        Ok(Self {
            route: raw.route,
            length: raw.length,
        })
    }
}

/// Checks that `route` visits each of `0..n` exactly once.
pub(crate) fn check_permutation(route: &[usize], n: usize) -> Result<()> {
    if route.len() != n {
        return Err(AcoError::tour(format!(
            "route visits {} nodes, expected {n}",
            route.len()
        )));
    }
    let mut seen = vec![false; n];
    for &node in route {
        if node >= n {
            return Err(AcoError::IndexOutOfBounds {
                index: node,
                size: n,
            });
        }
        if seen[node] {
            return Err(AcoError::tour(format!("node {node} visited twice")));
        }
        seen[node] = true;
    }
    Ok(())
}

impl TourRecord {
    /// Validates `route` as a permutation of all matrix nodes and scores it.
    pub fn from_route(route: Vec<usize>, distances: &DistanceMatrix) -> Result<Self> {
        check_permutation(&route, distances.size())?;
        let length = distances.tour_length(&route);
        Ok(Self { route, length })
    }

    /// Builds a record from a route already known to be a permutation.
    pub(crate) fn scored(route: Vec<usize>, distances: &DistanceMatrix) -> Self {
        let length = distances.tour_length(&route);
        Self { route, length }
    }

    #[cfg(test)]
    pub(crate) fn unchecked(route: Vec<usize>, length: f64) -> Self {
        Self { route, length }
    }

    /// Node indices in visiting order.
    pub fn route(&self) -> &[usize] {
        &self.route
    }

    /// Total cyclic length, closing edge included.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of nodes visited.
    pub fn len(&self) -> usize {
        self.route.len()
    }

    /// Returns `true` if the route is empty.
    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// Every edge of the closed tour as `(from, to)`, closing edge last.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.route.len();
        (0..n).map(move |k| (self.route[k], self.route[(k + 1) % n]))
    }

    /// Consumes the record, returning the route.
    pub fn into_route(self) -> Vec<usize> {
        self.route
    }
}
