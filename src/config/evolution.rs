use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvolutionError;
use serde::{Deserialize, Serialize};

/// Parameters of one evolutionary run. Fixed for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvoParams {
    /// Pool size of every generation
    pub population: usize,
    /// Fraction of a pool kept as parents each generation
    pub selection: f64,
    /// Probability of crossover instead of a mutate-and-clone step
    pub recombination: f64,
    /// Per-allele mutation probability, reduced to `abs(m) % 1.0`
    pub mutation: f64,
    /// Passed untouched to the environment's fitness function
    pub weights: Vec<f64>,
}

impl Default for EvoParams {
    fn default() -> Self {
        Self {
            population: 128,
            selection: 0.5,
            recombination: 0.618,
            mutation: 0.02,
            weights: vec![0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0],
        }
    }
}

/// Number of parents drawn from a pool of `pool_size`: `floor(pool_size * selection)`.
pub fn selection_size(pool_size: usize, selection: f64) -> usize {
    (pool_size as f64 * selection).floor() as usize
}

impl EvoParams {
    /// Number of parents SUS draws from a pool of `pool_size`.
    pub fn selection_size(&self, pool_size: usize) -> usize {
        selection_size(pool_size, self.selection)
    }

    /// Size of every pool produced by recombination.
    pub fn offspring_size(&self) -> usize {
        2 * (self.population / 2)
    }
}

impl ConfigSection for EvoParams {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvolutionError> {
        if self.population < 2 {
            return Err(EvolutionError::Configuration(
                "Population must be at least 2".to_string(),
            ));
        }
        if !(self.selection > 0.0 && self.selection <= 1.0) {
            return Err(EvolutionError::Configuration(
                "Selection rate must be in (0, 1]".to_string(),
            ));
        }
        if self.selection_size(self.population) == 0 {
            return Err(EvolutionError::Configuration(format!(
                "Selection rate {} keeps no parents from a population of {}",
                self.selection, self.population
            )));
        }
        if !(0.0..=1.0).contains(&self.recombination) {
            return Err(EvolutionError::Configuration(
                "Recombination rate must be between 0 and 1".to_string(),
            ));
        }
        if !self.mutation.is_finite() {
            return Err(EvolutionError::Configuration(
                "Mutation rate must be finite".to_string(),
            ));
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(EvolutionError::Configuration(
                "Fitness weights must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population",
                    "integer",
                    serde_json::json!(128),
                    (Some(2.0), None),
                    "Number of residents in every generation",
                ),
                FieldManifest::new(
                    "selection",
                    "float",
                    serde_json::json!(0.5),
                    (Some(0.0), Some(1.0)),
                    "Fraction of the pool sampled as parents",
                ),
                FieldManifest::new(
                    "recombination",
                    "float",
                    serde_json::json!(0.618),
                    (Some(0.0), Some(1.0)),
                    "Probability of crossover per offspring pair",
                ),
                FieldManifest::new(
                    "mutation",
                    "float",
                    serde_json::json!(0.02),
                    (None, None),
                    "Per-allele mutation probability; any finite value, wrapped to abs(m) % 1.0",
                ),
                FieldManifest::new(
                    "weights",
                    "float[]",
                    serde_json::json!(self.weights),
                    (None, None),
                    "Weights handed to the environment's fitness function",
                ),
            ],
        }
    }
}
