//! Colony configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AcoError, Result};

/// Parameters of an ant colony run.
///
/// # Transition rule
///
/// From node `c`, an ant picks unvisited `j` with probability proportional
/// to `pher[c][j]^alpha * (1 / dist[c][j])^beta`.
///
/// # Update rule
///
/// After every ant finishes, all pheromone is multiplied by
/// `1 - evaporation_rate`, then each ant deposits `1 / length` on every edge
/// of its tour.
///
/// # Examples
///
/// ```
/// use u_colony::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(20)
///     .with_iterations(200)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_evaporation_rate(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Ants spawned per iteration.
    pub ant_count: usize,

    /// Number of iterations; the loop always runs all of them.
    pub iterations: usize,

    /// Pheromone exponent (alpha).
    pub alpha: f64,

    /// Inverse-distance exponent (beta).
    pub beta: f64,

    /// Fraction of pheromone removed each iteration, in `[0, 1)`.
    pub evaporation_rate: f64,

    /// Pheromone on every edge before the first iteration.
    pub initial_pheromone: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 10,
            iterations: 100,
            alpha: 1.0,
            beta: 5.0,
            evaporation_rate: 0.5,
            initial_pheromone: 1.0,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_initial_pheromone(mut self, value: f64) -> Self {
        self.initial_pheromone = value;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ant_count == 0 {
            return Err(AcoError::config("ant_count must be at least 1"));
        }
        if self.iterations == 0 {
            return Err(AcoError::config("iterations must be at least 1"));
        }
        check_exponent("alpha", self.alpha)?;
        check_exponent("beta", self.beta)?;
        validate_evaporation_rate(self.evaporation_rate)?;
        validate_initial_pheromone(self.initial_pheromone)?;
        Ok(())
    }
}

pub(crate) fn check_exponent(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AcoError::config(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_evaporation_rate(rate: f64) -> Result<()> {
    if !(0.0..1.0).contains(&rate) {
        return Err(AcoError::config(format!(
            "evaporation_rate must be in [0, 1), got {rate}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_initial_pheromone(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AcoError::config(format!(
            "initial_pheromone must be finite and positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcoConfig::default();
        assert_eq!(config.ant_count, 10);
        assert_eq!(config.iterations, 100);
        assert!((config.alpha - 1.0).abs() < 1e-10);
        assert!((config.beta - 5.0).abs() < 1e-10);
        assert!((config.evaporation_rate - 0.5).abs() < 1e-10);
        assert!((config.initial_pheromone - 1.0).abs() < 1e-10);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_validate_ok() {
        assert!(AcoConfig::default().validate().is_ok());
        assert!(AcoConfig::default()
            .with_alpha(0.0)
            .with_beta(0.0)
            .with_evaporation_rate(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_bad_counts() {
        assert!(AcoConfig::default().with_ant_count(0).validate().is_err());
        assert!(AcoConfig::default().with_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_exponents() {
        assert!(AcoConfig::default().with_alpha(-0.1).validate().is_err());
        assert!(AcoConfig::default().with_beta(-1.0).validate().is_err());
        assert!(AcoConfig::default().with_beta(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_validate_bad_evaporation_rate() {
        let err = AcoConfig::default()
            .with_evaporation_rate(1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AcoError::InvalidConfiguration { .. }));
        assert!(AcoConfig::default()
            .with_evaporation_rate(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_initial_pheromone() {
        assert!(AcoConfig::default()
            .with_initial_pheromone(0.0)
            .validate()
            .is_err());
        assert!(AcoConfig::default()
            .with_initial_pheromone(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = AcoConfig::default()
            .with_ant_count(4)
            .with_iterations(25)
            .with_alpha(2.0)
            .with_beta(1.5)
            .with_evaporation_rate(0.1)
            .with_initial_pheromone(0.5)
            .with_seed(7);
        assert_eq!(config.ant_count, 4);
        assert_eq!(config.iterations, 25);
        assert!((config.alpha - 2.0).abs() < 1e-10);
        assert!((config.beta - 1.5).abs() < 1e-10);
        assert!((config.evaporation_rate - 0.1).abs() < 1e-10);
        assert!((config.initial_pheromone - 0.5).abs() < 1e-10);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AcoConfig =
            serde_json::from_str(r#"{"ant_count": 3, "seed": 11}"#).expect("parse");
        assert_eq!(config.ant_count, 3);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.iterations, 100);
        assert!(config.validate().is_ok());
    }
}
