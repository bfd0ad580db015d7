//! # u-colony
//!
//! Ant colony optimization for small symmetric routing instances: every
//! node is visited exactly once on a closed tour, and the colony learns
//! which edges belong to short tours through a shared pheromone matrix.
//!
//! ## Modules
//!
//! - [`distance`] — Symmetric distance matrix and random instance generation
//! - [`models`] — Tour record (route + cyclic length)
//! - [`aco`] — Pheromone matrix, tour construction, update rule, iteration loop
//! - [`error`] — Error type and recovered-degeneracy diagnostics
//!
//! ## Example
//!
//! ```
//! use u_colony::aco::{AcoConfig, AcoRunner};
//! use u_colony::distance::DistanceMatrix;
//!
//! let dm = DistanceMatrix::from_rows(&[
//!     vec![0.0, 10.0, 15.0, 20.0],
//!     vec![10.0, 0.0, 35.0, 25.0],
//!     vec![15.0, 35.0, 0.0, 30.0],
//!     vec![20.0, 25.0, 30.0, 0.0],
//! ])
//! .expect("valid matrix");
//!
//! let config = AcoConfig::default().with_iterations(50).with_seed(42);
//! let result = AcoRunner::run(&dm, &config).expect("valid config");
//! assert_eq!(result.best.len(), 4);
//! assert!(result.best.length() >= 80.0);
//! ```

pub mod aco;
pub mod distance;
pub mod error;
pub mod models;
