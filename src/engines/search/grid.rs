use crate::config::SearchConfig;
use crate::engines::generation::RunParams;
use serde::{Deserialize, Serialize};

/// Candidate values for each tunable run parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub mutation_std: Vec<f64>,
    pub n_mutations: Vec<usize>,
    pub n_crossover: Vec<usize>,
}

impl SearchSpace {
    pub fn len(&self) -> usize {
        self.mutation_std.len() * self.n_mutations.len() * self.n_crossover.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point `index` of the Cartesian product; `n_crossover` varies fastest.
    pub fn get(&self, index: usize) -> Option<RunParams> {
        if index >= self.len() {
            return None;
        }
        let crossover_len = self.n_crossover.len();
        let mutations_len = self.n_mutations.len();

        let n_crossover = self.n_crossover[index % crossover_len];
        let n_mutations = self.n_mutations[(index / crossover_len) % mutations_len];
        let mutation_std = self.mutation_std[index / (crossover_len * mutations_len)];
        Some(RunParams {
            mutation_std,
            n_mutations,
            n_crossover,
        })
    }
}

impl From<&SearchConfig> for SearchSpace {
    fn from(config: &SearchConfig) -> Self {
        Self {
            mutation_std: config.mutation_std.clone(),
            n_mutations: config.n_mutations.clone(),
            n_crossover: config.n_crossover.clone(),
        }
    }
}

/// Exhaustive sampler visiting every point of a [`SearchSpace`] once, in a
/// fixed order.
#[derive(Debug, Clone)]
pub struct GridSampler {
    space: SearchSpace,
    next: usize,
}

impl GridSampler {
    pub fn new(space: SearchSpace) -> Self {
        Self { space, next: 0 }
    }

    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn remaining(&self) -> usize {
        self.space.len().saturating_sub(self.next)
    }
}

impl Iterator for GridSampler {
    type Item = RunParams;

    fn next(&mut self) -> Option<Self::Item> {
        let params = self.space.get(self.next)?;
        self.next += 1;
        Some(params)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visits_every_point_in_order() {
        let space = SearchSpace {
            mutation_std: vec![0.5, 1.0],
            n_mutations: vec![5, 10],
            n_crossover: vec![100, 200, 300],
        };
        let points: Vec<RunParams> = GridSampler::new(space.clone()).collect();

        assert_eq!(points.len(), 12);
        assert_eq!(
            points[0],
            RunParams { mutation_std: 0.5, n_mutations: 5, n_crossover: 100 }
        );
        assert_eq!(
            points[4],
            RunParams { mutation_std: 0.5, n_mutations: 10, n_crossover: 200 }
        );
        assert_eq!(
            points[11],
            RunParams { mutation_std: 1.0, n_mutations: 10, n_crossover: 300 }
        );
        assert_eq!(space.get(12), None);
    }

    #[test]
    fn test_default_grid_size() {
        let space = SearchSpace::from(&SearchConfig::default());
        assert_eq!(space.len(), 20 * 20 * 9);
    }
}
