use super::traits::ConfigSection;
use crate::error::TradegeneError;
use serde::{Deserialize, Serialize};

/// Grid searched by the hyperparameter study
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mutation_std: Vec<f64>,
    pub n_mutations: Vec<usize>,
    pub n_crossover: Vec<usize>,
    /// Completed trials required before the median pruner may prune
    pub n_startup_trials: usize,
    /// Steps of each trial during which the pruner never prunes
    pub n_warmup_steps: usize,
    pub max_trials: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mutation_std: linspace(0.1, 3.0, 20),
            n_mutations: (5..25).collect(),
            n_crossover: (100..=500).step_by(50).collect(),
            n_startup_trials: 5,
            n_warmup_steps: 0,
            max_trials: None,
        }
    }
}

impl SearchConfig {
    pub fn grid_size(&self) -> usize {
        self.mutation_std.len() * self.n_mutations.len() * self.n_crossover.len()
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), TradegeneError> {
        if self.grid_size() == 0 {
            return Err(TradegeneError::Configuration(
                "Search space must contain at least one value per parameter".to_string(),
            ));
        }
        if self.max_trials == Some(0) {
            return Err(TradegeneError::Configuration(
                "max_trials must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}
