use crate::config::{ConfigSection, EvolutionConfig};
use crate::data::{LegalFields, PriceTable};
use crate::engines::evaluation::{Backtester, FitnessRecord};
use crate::engines::generation::{
    genome::{random_population, Gene, Population},
    operators::{crossover, mutation, RouletteWheel},
};
use crate::error::{Result, TradegeneError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Parameters tuned by the hyperparameter search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    pub mutation_std: f64,
    pub n_mutations: usize,
    pub n_crossover: usize,
}

impl RunParams {
    pub fn validate(&self, population_size: usize, elite_copies: usize) -> Result<()> {
        if !(self.mutation_std > 0.0 && self.mutation_std.is_finite()) {
            return Err(TradegeneError::Configuration(format!(
                "mutation_std must be positive and finite, got {}",
                self.mutation_std
            )));
        }
        if self.n_mutations > population_size {
            return Err(TradegeneError::Configuration(format!(
                "n_mutations ({}) exceeds the population size ({})",
                self.n_mutations, population_size
            )));
        }
        if self.n_crossover % 2 != 0 {
            return Err(TradegeneError::Configuration(format!(
                "n_crossover must be even, got {}",
                self.n_crossover
            )));
        }
        if elite_copies + self.n_crossover > population_size {
            return Err(TradegeneError::Configuration(format!(
                "elite_copies ({}) + n_crossover ({}) exceeds the population size ({})",
                elite_copies, self.n_crossover, population_size
            )));
        }
        Ok(())
    }
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, record: &FitnessRecord);
}

/// Observer of a running trial that may ask it to stop between generations.
pub trait TrialMonitor {
    fn report(&mut self, value: f64, epoch: usize);
    fn should_stop(&self) -> bool;
}

/// Monitor for standalone runs: records nothing, never stops.
pub struct NoopMonitor;

impl TrialMonitor for NoopMonitor {
    fn report(&mut self, _value: f64, _epoch: usize) {}

    fn should_stop(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunReport),
    Pruned { epoch: usize },
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub seed: u64,
    pub params: RunParams,
    /// Evaluation of the terminal population
    pub final_record: FitnessRecord,
    /// One record per generation, indexed by epoch
    pub history: Vec<FitnessRecord>,
    pub population: Population,
}

impl RunReport {
    pub fn best_index(&self) -> usize {
        self.final_record.best_index
    }

    pub fn best_fitness(&self) -> f64 {
        self.final_record.best_fitness
    }

    pub fn best_gene(&self) -> &Gene {
        &self.population[self.final_record.best_index]
    }

    pub fn mean_fitness(&self) -> f64 {
        self.final_record.mean()
    }
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    backtester: Backtester,
    seed: u64,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let backtester = Backtester::new(config.end_of_data);

        Ok(Self {
            config,
            backtester,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn backtester(&self) -> &Backtester {
        &self.backtester
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(
        &mut self,
        table: &PriceTable,
        callback: &mut C,
        monitor: &mut dyn TrialMonitor,
    ) -> Result<RunOutcome> {
        if table.is_empty() {
            return Err(TradegeneError::DataLoading(
                "Price table has no rows".to_string(),
            ));
        }

        let params = self.config.run_params();
        log::info!(
            "Evolving {} genes for {} generations (seed {}, mutation_std {:.3}, n_mutations {}, n_crossover {})",
            self.config.population_size,
            self.config.max_iter,
            self.seed,
            params.mutation_std,
            params.n_mutations,
            params.n_crossover
        );

        let fields = table.fields();
        let coefficients = self.config.coefficient_min..self.config.coefficient_max;
        let mut pool = random_population(
            self.config.population_size,
            fields,
            &coefficients,
            &mut self.rng,
        );

        let mut history = Vec::with_capacity(self.config.max_iter);
        for epoch in 0..self.config.max_iter {
            callback.on_generation_start(epoch);

            // Shuffle so crossover pairing carries no positional bias
            pool.shuffle(&mut self.rng);
            let record = self.backtester.evaluate(table, &pool)?;

            monitor.report(record.mean(), epoch);
            if epoch > self.config.prune_warmup_epochs && monitor.should_stop() {
                log::info!("Run pruned at generation {}", epoch);
                return Ok(RunOutcome::Pruned { epoch });
            }

            log::debug!(
                "Generation {}: best {:.5} at {}, sum {:.5}",
                epoch,
                record.best_fitness,
                record.best_index,
                record.fitness_sum
            );
            callback.on_generation_complete(epoch, &record);

            let next = self.next_generation(&pool, &record, fields)?;
            history.push(record);
            pool = next;
        }

        let final_record = self.backtester.evaluate(table, &pool)?;
        log::info!(
            "Run finished: best fitness {:.5}, mean fitness {:.5}",
            final_record.best_fitness,
            final_record.mean()
        );

        Ok(RunOutcome::Completed(RunReport {
            seed: self.seed,
            params,
            final_record,
            history,
            population: pool,
        }))
    }

    /// Elite copies, then crossover pairs, then the rest of `pool` at the
    /// same positions; finally mutation outside the elite slots.
    fn next_generation(
        &mut self,
        pool: &[Gene],
        record: &FitnessRecord,
        fields: &LegalFields,
    ) -> Result<Population> {
        let elite_copies = self.config.elite_copies;
        let crossover_end = elite_copies + self.config.n_crossover;

        let mut next: Population = Vec::with_capacity(pool.len());
        let elite = pool[record.best_index];
        next.extend(std::iter::repeat(elite).take(elite_copies));

        let wheel = RouletteWheel::new(&record.fitnesses)?;
        while next.len() < crossover_end {
            let first = wheel.spin(&mut self.rng);
            let second = wheel.spin(&mut self.rng);
            let (child1, child2) = crossover(
                &pool[first],
                &pool[second],
                self.config.crossover_method,
                &mut self.rng,
            );
            next.push(child1);
            next.push(child2);
        }

        let filled = next.len();
        next.extend_from_slice(&pool[filled..]);

        mutation(
            &mut next,
            self.config.n_mutations,
            self.config.mutation_std,
            elite_copies,
            fields,
            self.config.field_redraw_probability,
            &mut self.rng,
        )?;

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_params_bounds() {
        let params = RunParams {
            mutation_std: 1.5,
            n_mutations: 15,
            n_crossover: 250,
        };
        assert!(params.validate(501, 1).is_ok());
        assert!(params.validate(250, 1).is_err());

        let odd = RunParams { n_crossover: 251, ..params };
        assert!(odd.validate(501, 1).is_err());

        let flat = RunParams { mutation_std: 0.0, ..params };
        assert!(flat.validate(501, 1).is_err());

        let many = RunParams { n_mutations: 600, ..params };
        assert!(many.validate(501, 1).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EvolutionConfig {
            n_crossover: 3,
            ..Default::default()
        };
        assert!(matches!(
            EvolutionEngine::new(config),
            Err(TradegeneError::Configuration(_))
        ));
    }

    #[test]
    fn test_explicit_seed_is_kept() {
        let config = EvolutionConfig {
            seed: Some(1234),
            ..Default::default()
        };
        assert_eq!(EvolutionEngine::new(config).unwrap().seed(), 1234);
    }
}
