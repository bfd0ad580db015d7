//! Ant colony optimization engine.
//!
//! - [`AcoConfig`] — Run parameters with validation
//! - [`PheromoneMatrix`] — Symmetric, strictly positive edge desirability
//! - [`RouteBuilder`] — Roulette-wheel tour construction for one ant
//! - [`PheromoneUpdate`] — Evaporation followed by `1 / length` deposition
//! - [`ColonyIteration`] — One generation: all ants, then one update
//! - [`AntColony`] / [`AcoRunner`] — Fixed-budget loop with best-so-far memory
//!
//! # Reference
//!
//! Dorigo, M., Maniezzo, V. & Colorni, A. (1996). "Ant system: optimization
//! by a colony of cooperating agents", *IEEE Transactions on Systems, Man,
//! and Cybernetics, Part B* 26(1), 29-41.

mod builder;
mod colony;
mod config;
mod pheromone;
mod runner;
mod update;

pub use builder::{Construction, RouteBuilder, Selection};
pub use colony::{ColonyIteration, IterationOutcome};
pub use config::AcoConfig;
pub use pheromone::PheromoneMatrix;
pub use runner::{AcoResult, AcoRunner, AntColony, IterationStats, Phase};
pub use update::{PheromoneUpdate, UpdateReport};
