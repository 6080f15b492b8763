use super::traits::ConfigSection;
use crate::engines::generation::RunParams;
use crate::error::TradegeneError;
use crate::types::EndOfDataPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_iter: usize,
    /// Standard deviation of the gaussian noise added to a mutated coefficient
    pub mutation_std: f64,
    /// Number of gene slots mutated per generation
    pub n_mutations: usize,
    /// Number of next-generation slots filled by crossover
    pub n_crossover: usize,
    pub elite_copies: usize,
    pub crossover_method: CrossoverMethod,
    pub coefficient_min: f64,
    pub coefficient_max: f64,
    pub field_redraw_probability: f64,
    pub end_of_data: EndOfDataPolicy,
    /// Pruning is only honoured once the epoch is past this value
    pub prune_warmup_epochs: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    SinglePoint,
    Uniform,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 501,
            max_iter: 30,
            mutation_std: 1.5,
            n_mutations: 15,
            n_crossover: 250,
            elite_copies: 1,
            crossover_method: CrossoverMethod::SinglePoint,
            coefficient_min: 0.5,
            coefficient_max: 1.5,
            field_redraw_probability: 0.1,
            end_of_data: EndOfDataPolicy::Discard,
            prune_warmup_epochs: 10,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn run_params(&self) -> RunParams {
        RunParams {
            mutation_std: self.mutation_std,
            n_mutations: self.n_mutations,
            n_crossover: self.n_crossover,
        }
    }

    /// Copy of this config with the tunable parameters replaced.
    pub fn with_params(&self, params: RunParams) -> Self {
        Self {
            mutation_std: params.mutation_std,
            n_mutations: params.n_mutations,
            n_crossover: params.n_crossover,
            ..self.clone()
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), TradegeneError> {
        if self.population_size < 2 {
            return Err(TradegeneError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.elite_copies == 0 || self.elite_copies > self.population_size {
            return Err(TradegeneError::Configuration(format!(
                "Elite copies must be between 1 and the population size ({})",
                self.population_size
            )));
        }
        if !(self.coefficient_min < self.coefficient_max) {
            return Err(TradegeneError::Configuration(format!(
                "Coefficient range [{}, {}) is empty",
                self.coefficient_min, self.coefficient_max
            )));
        }
        if !(0.0..=1.0).contains(&self.field_redraw_probability) {
            return Err(TradegeneError::Configuration(
                "Field redraw probability must be between 0 and 1".to_string(),
            ));
        }
        self.run_params().validate(self.population_size, self.elite_copies)
    }
}
