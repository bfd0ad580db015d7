//! Iteration loop with best-so-far memory.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::distance::DistanceMatrix;
use crate::error::{AcoError, Diagnostic, Result};
use crate::models::TourRecord;

use super::colony::ColonyIteration;
use super::config::AcoConfig;
use super::pheromone::PheromoneMatrix;

/// Lifecycle of a colony run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Matrices are built; no iteration has run yet.
    Initializing,
    /// At least one iteration has run and budget remains.
    Iterating,
    /// The iteration budget is spent.
    Done,
}

/// Statistics for a single iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Shortest tour length found in this iteration.
    pub iteration_best: f64,
    /// Mean tour length over this iteration's ants.
    pub iteration_mean: f64,
    /// Best-so-far length after this iteration.
    pub best_length: f64,
    /// Degeneracies recovered during this iteration.
    pub diagnostics: Vec<Diagnostic>,
}

/// Final result of a colony run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoResult {
    /// Best tour observed across all iterations.
    pub best: TourRecord,
    /// Seed that reproduces this run.
    pub seed: u64,
    /// Iterations executed.
    pub iterations: usize,
    /// Per-iteration statistics.
    pub history: Vec<IterationStats>,
    /// Selections resolved by the lowest-index fallback.
    pub degenerate_selections: usize,
    /// Tours that were not allowed to deposit pheromone.
    pub skipped_deposits: usize,
}

/// A colony run that can be driven one iteration at a time.
///
/// Owns the distance matrix, the pheromone matrix, and the master random
/// stream. The best tour is replaced only by a strictly shorter one.
/// There is no early exit: the loop always runs the configured budget.
///
/// # Examples
///
/// ```
/// use u_colony::aco::{AcoConfig, AntColony, Phase};
/// use u_colony::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 10.0, 15.0, 20.0],
///     vec![10.0, 0.0, 35.0, 25.0],
///     vec![15.0, 35.0, 0.0, 30.0],
///     vec![20.0, 25.0, 30.0, 0.0],
/// ])
/// .expect("valid");
/// let config = AcoConfig::default().with_iterations(3).with_seed(42);
///
/// let mut colony = AntColony::new(dm, config).expect("valid");
/// assert_eq!(colony.phase(), Phase::Initializing);
/// while let Some(stats) = colony.step().expect("iteration") {
///     assert!(stats.best_length <= stats.iteration_best);
/// }
/// assert_eq!(colony.phase(), Phase::Done);
///
/// let result = colony.run().expect("finished");
/// assert_eq!(result.iterations, 3);
/// assert_eq!(result.best.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct AntColony {
    distances: DistanceMatrix,
    pheromones: PheromoneMatrix,
    config: AcoConfig,
    rng: StdRng,
    seed: u64,
    iteration: usize,
    best: Option<TourRecord>,
    history: Vec<IterationStats>,
    phase: Phase,
}

impl AntColony {
    /// Validates the inputs and builds the initial pheromone matrix.
    ///
    /// Without a configured seed, one is drawn from the thread-local
    /// generator and kept so the run can be replayed.
    pub fn new(distances: DistanceMatrix, config: AcoConfig) -> Result<Self> {
        config.validate()?;
        let pheromones = PheromoneMatrix::new(distances.size(), config.initial_pheromone)?;
        let seed = config.seed.unwrap_or_else(rand::random);

        info!(
            nodes = distances.size(),
            ants = config.ant_count,
            iterations = config.iterations,
            alpha = config.alpha,
            beta = config.beta,
            evaporation_rate = config.evaporation_rate,
            seed,
            "starting ant colony"
        );

        Ok(Self {
            distances,
            pheromones,
            rng: StdRng::seed_from_u64(seed),
            seed,
            iteration: 0,
            best: None,
            history: Vec::with_capacity(config.iterations),
            phase: Phase::Initializing,
            config,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of iterations completed.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Best tour seen so far.
    pub fn best(&self) -> Option<&TourRecord> {
        self.best.as_ref()
    }

    /// Current pheromone levels.
    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    /// The instance being solved.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Seed of the master random stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs one iteration. Returns `None` once the budget is spent.
    pub fn step(&mut self) -> Result<Option<IterationStats>> {
        if self.phase == Phase::Done {
            return Ok(None);
        }

        let outcome = ColonyIteration::new(&self.distances, &self.config)?
            .run(&mut self.pheromones, &mut self.rng)?;

        let iteration_best = outcome
            .best()
            .ok_or_else(|| AcoError::config("iteration produced no tours"))?;
        let improved = match &self.best {
            Some(best) => iteration_best.length() < best.length(),
            None => true,
        };
        if improved {
            self.best = Some(iteration_best.clone());
        }
        let best_length = self
            .best
            .as_ref()
            .map_or(iteration_best.length(), TourRecord::length);

        let stats = IterationStats {
            iteration: self.iteration,
            iteration_best: iteration_best.length(),
            iteration_mean: outcome.mean_length(),
            best_length,
            diagnostics: outcome.diagnostics,
        };
        debug!(
            iteration = stats.iteration,
            iteration_best = stats.iteration_best,
            best = stats.best_length,
            improved,
            "iteration complete"
        );

        self.iteration += 1;
        self.phase = if self.iteration >= self.config.iterations {
            Phase::Done
        } else {
            Phase::Iterating
        };
        self.history.push(stats.clone());
        Ok(Some(stats))
    }

    /// Runs the remaining budget and returns the result.
    pub fn run(self) -> Result<AcoResult> {
        self.run_with(|_| {})
    }

    /// Runs the remaining budget, calling `observer` after every iteration.
    pub fn run_with<F: FnMut(&IterationStats)>(mut self, mut observer: F) -> Result<AcoResult> {
        while let Some(stats) = self.step()? {
            observer(&stats);
        }
        self.finish()
    }

    fn finish(self) -> Result<AcoResult> {
        let best = self
            .best
            .ok_or_else(|| AcoError::config("no iterations were run"))?;
        let mut degenerate_selections = 0;
        let mut skipped_deposits = 0;
        for diagnostic in self.history.iter().flat_map(|s| &s.diagnostics) {
            match diagnostic {
                Diagnostic::DegenerateSelection { .. } => degenerate_selections += 1,
                Diagnostic::SkippedDeposit { .. } => skipped_deposits += 1,
            }
        }

        info!(
            best_length = best.length(),
            iterations = self.iteration,
            degenerate_selections,
            skipped_deposits,
            "ant colony finished"
        );

        Ok(AcoResult {
            best,
            seed: self.seed,
            iterations: self.iteration,
            history: self.history,
            degenerate_selections,
            skipped_deposits,
        })
    }
}

/// One-shot entry point.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_colony::aco::{AcoConfig, AcoRunner};
/// use u_colony::distance::DistanceMatrix;
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let dm = DistanceMatrix::random_symmetric(10, 10..100, &mut rng).expect("valid");
/// let config = AcoConfig::default().with_iterations(20).with_seed(3);
///
/// let result = AcoRunner::run(&dm, &config).expect("valid");
/// assert_eq!(result.best.len(), 10);
/// assert_eq!(result.history.len(), 20);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs a colony over `distances` for the configured budget.
    pub fn run(distances: &DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        AntColony::new(distances.clone(), config.clone())?.run()
    }
}
