//! One colony generation: construct every ant's tour, then update pheromone.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::DistanceMatrix;
use crate::error::{Diagnostic, Result};
use crate::models::TourRecord;

use super::builder::RouteBuilder;
use super::config::AcoConfig;
use super::pheromone::PheromoneMatrix;
use super::update::PheromoneUpdate;

/// Tours and diagnostics produced by one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationOutcome {
    /// One tour per ant, in ant order.
    pub tours: Vec<TourRecord>,
    /// Degenerate selections and skipped deposits, in the order raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl IterationOutcome {
    /// Shortest tour of the iteration; the earliest ant wins ties.
    pub fn best(&self) -> Option<&TourRecord> {
        self.tours.iter().fold(None, |best, t| match best {
            Some(b) if b.length() <= t.length() => Some(b),
            _ => Some(t),
        })
    }

    /// Mean tour length, or `NaN` when no ant ran.
    pub fn mean_length(&self) -> f64 {
        let total: f64 = self.tours.iter().map(|t| t.length()).sum();
        total / self.tours.len() as f64
    }
}

/// Runs a single generation of the colony.
///
/// Construction reads a shared pheromone snapshot; the update takes the
/// matrix mutably only after every ant has finished.
///
/// Each ant draws from its own [`StdRng`], seeded from the caller's stream
/// in ant order, so the tours do not depend on the order ants are run in.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_colony::aco::{AcoConfig, ColonyIteration, PheromoneMatrix};
/// use u_colony::distance::DistanceMatrix;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let dm = DistanceMatrix::random_symmetric(6, 10..100, &mut rng).expect("valid");
/// let config = AcoConfig::default().with_ant_count(4);
/// let mut pher = PheromoneMatrix::new(6, config.initial_pheromone).expect("valid");
///
/// let iteration = ColonyIteration::new(&dm, &config).expect("valid config");
/// let outcome = iteration.run(&mut pher, &mut rng).expect("update succeeds");
/// assert_eq!(outcome.tours.len(), 4);
/// assert!(outcome.best().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColonyIteration<'a> {
    distances: &'a DistanceMatrix,
    config: &'a AcoConfig,
    update: PheromoneUpdate,
}

impl<'a> ColonyIteration<'a> {
    /// Validates `config` and prepares an iteration over `distances`.
    pub fn new(distances: &'a DistanceMatrix, config: &'a AcoConfig) -> Result<Self> {
        config.validate()?;
        let update = PheromoneUpdate::new(config.evaporation_rate)?;
        Ok(Self {
            distances,
            config,
            update,
        })
    }

    /// Builds one tour per ant and applies the pheromone update.
    pub fn run<R: Rng + ?Sized>(
        &self,
        pheromones: &mut PheromoneMatrix,
        rng: &mut R,
    ) -> Result<IterationOutcome> {
        let seeds: Vec<u64> = (0..self.config.ant_count).map(|_| rng.random()).collect();

        let constructions = {
            let builder = RouteBuilder::new(
                self.distances,
                pheromones,
                self.config.alpha,
                self.config.beta,
            )?;
            seeds
                .iter()
                .map(|&seed| builder.build(&mut StdRng::seed_from_u64(seed)))
                .collect::<Vec<_>>()
        };

        let mut tours = Vec::with_capacity(constructions.len());
        let mut diagnostics = Vec::new();
        for construction in constructions {
            diagnostics.extend(construction.diagnostics);
            tours.push(construction.tour);
        }

        let report = self.update.apply(pheromones, &tours)?;
        diagnostics.extend(report.skipped);

        Ok(IterationOutcome { tours, diagnostics })
    }
}
