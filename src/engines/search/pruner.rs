use super::study::{TrialRecord, TrialState};
use serde::{Deserialize, Serialize};

/// Prunes a trial whose intermediate value falls below the median of the
/// completed trials at the same step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedianPruner {
    /// Completed trials required before anything is pruned
    pub n_startup_trials: usize,
    /// Steps of a trial that are never pruned
    pub n_warmup_steps: usize,
}

impl MedianPruner {
    pub fn new(n_startup_trials: usize, n_warmup_steps: usize) -> Self {
        Self {
            n_startup_trials,
            n_warmup_steps,
        }
    }

    pub fn should_prune(&self, history: &[TrialRecord], step: usize, value: f64) -> bool {
        if step < self.n_warmup_steps {
            return false;
        }

        let completed: Vec<&TrialRecord> = history
            .iter()
            .filter(|t| t.state == TrialState::Complete)
            .collect();
        if completed.len() < self.n_startup_trials {
            return false;
        }

        let mut at_step: Vec<f64> = completed
            .iter()
            .filter_map(|t| t.intermediate_values.get(&step).copied())
            .filter(|v| !v.is_nan())
            .collect();
        match median(&mut at_step) {
            Some(median) => value < median,
            None => false,
        }
    }
}

impl Default for MedianPruner {
    fn default() -> Self {
        Self::new(5, 0)
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::RunParams;
    use std::collections::BTreeMap;

    fn completed(number: usize, value_at_step_3: f64) -> TrialRecord {
        let mut intermediate_values = BTreeMap::new();
        intermediate_values.insert(3, value_at_step_3);
        TrialRecord {
            number,
            params: RunParams {
                mutation_std: 1.0,
                n_mutations: 5,
                n_crossover: 100,
            },
            state: TrialState::Complete,
            value: Some(value_at_step_3),
            intermediate_values,
        }
    }

    #[test]
    fn test_waits_for_startup_trials() {
        let pruner = MedianPruner::default();
        let history: Vec<TrialRecord> = (0..4).map(|i| completed(i, 10.0)).collect();
        assert!(!pruner.should_prune(&history, 3, -100.0));
    }

    #[test]
    fn test_prunes_below_median() {
        let pruner = MedianPruner::default();
        let history: Vec<TrialRecord> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, v)| completed(i, *v))
            .collect();

        assert!(pruner.should_prune(&history, 3, 2.5));
        assert!(!pruner.should_prune(&history, 3, 3.0));
        // no completed trial reported step 4
        assert!(!pruner.should_prune(&history, 4, -1.0));
    }

    #[test]
    fn test_warmup_steps_are_never_pruned() {
        let pruner = MedianPruner::new(0, 5);
        let history = vec![completed(0, 10.0)];
        assert!(!pruner.should_prune(&history, 3, 0.0));
    }

    #[test]
    fn test_even_median() {
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }
}
