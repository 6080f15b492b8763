use tradegene::config::{DataConfig, EvolutionConfig, SearchConfig};
use tradegene::data::Dataset;
use tradegene::engines::search::{run_study, Study, TrialState};

fn configs() -> (EvolutionConfig, SearchConfig) {
    let evolution = EvolutionConfig {
        population_size: 21,
        max_iter: 4,
        ..Default::default()
    };
    let search = SearchConfig {
        mutation_std: vec![0.5, 1.5],
        n_mutations: vec![3],
        // 30 does not fit behind the elite of a 21-gene population
        n_crossover: vec![10, 30],
        n_startup_trials: 5,
        n_warmup_steps: 0,
        max_trials: None,
    };
    (evolution, search)
}

#[test]
fn test_study_runs_every_valid_grid_point() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sample.csv");
    let dataset = Dataset::prepare(path, &DataConfig::default()).unwrap();
    let (evolution, search) = configs();

    let study = run_study(&evolution, &search, &dataset.table, 123).unwrap();

    assert_eq!(study.name, "seed_00123");
    assert_eq!(study.trials.len(), 2);
    assert!(study.trials.iter().all(|t| t.params.n_crossover == 10));
    // too few trials for the median pruner to act
    assert!(study.trials.iter().all(|t| t.state == TrialState::Complete));
    for trial in &study.trials {
        assert_eq!(trial.intermediate_values.len(), evolution.max_iter);
    }
    assert!(study.best_trial().is_some());
}

#[test]
fn test_trials_are_reproducible() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sample.csv");
    let dataset = Dataset::prepare(path, &DataConfig::default()).unwrap();
    let (evolution, search) = configs();

    let first = run_study(&evolution, &search, &dataset.table, 9).unwrap();
    let second = run_study(&evolution, &search, &dataset.table, 9).unwrap();
    assert_eq!(first.trials, second.trials);
}

#[test]
fn test_max_trials_caps_the_study() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sample.csv");
    let dataset = Dataset::prepare(path, &DataConfig::default()).unwrap();
    let (evolution, mut search) = configs();
    search.max_trials = Some(1);

    let study = run_study(&evolution, &search, &dataset.table, 1).unwrap();
    assert_eq!(study.trials.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(format!("{}.json", study.name));
    study.save_json(&file).unwrap();
    assert_eq!(Study::load_json(&file).unwrap().trials, study.trials);
}
