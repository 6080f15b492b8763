pub mod grid;
pub mod pruner;
pub mod study;

pub use grid::{GridSampler, SearchSpace};
pub use pruner::MedianPruner;
pub use study::{Study, Trial, TrialRecord, TrialState};

use crate::config::{ConfigSection, EvolutionConfig, SearchConfig};
use crate::data::PriceTable;
use crate::engines::generation::{EvolutionEngine, RunOutcome, SilentProgressCallback};
use crate::error::Result;

/// Grid search over the tunable run parameters.
///
/// Every trial starts a fresh engine seeded with `seed`, so two trials with
/// the same parameters produce the same value. The objective is the mean
/// fitness of the terminal population. Grid points that do not fit the
/// configured population are skipped.
pub fn run_study(
    evolution: &EvolutionConfig,
    search: &SearchConfig,
    table: &PriceTable,
    seed: u64,
) -> Result<Study> {
    search.validate()?;

    let space = SearchSpace::from(search);
    let total = space.len();
    let sampler = GridSampler::new(space).filter(|params| {
        match params.validate(evolution.population_size, evolution.elite_copies) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Skipping grid point {:?}: {}", params, e);
                false
            }
        }
    });

    let mut study = Study::new(
        seed,
        MedianPruner::new(search.n_startup_trials, search.n_warmup_steps),
    );
    log::info!("Study {} over {} grid points", study.name, total);

    study.optimize(sampler, search.max_trials, |trial| {
        let config = EvolutionConfig {
            seed: Some(seed),
            ..evolution.with_params(trial.params())
        };
        let mut engine = EvolutionEngine::new(config)?;
        match engine.run(table, &mut SilentProgressCallback, trial)? {
            RunOutcome::Completed(report) => Ok(Some(report.mean_fitness())),
            RunOutcome::Pruned { .. } => Ok(None),
        }
    })?;

    Ok(study)
}
