mod cli;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, InitConfigArgs, RunArgs, SearchArgs};
use rand::Rng;
use tradegene::config::{AppConfig, ConfigManager};
use tradegene::data::Dataset;
use tradegene::engines::generation::{BarProgressCallback, EvolutionEngine, NoopMonitor, RunOutcome};
use tradegene::engines::search::run_study;
use tradegene::report::{write_fitness_csv, RunSummary};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Search(args) => search(args),
        Commands::InitConfig(args) => init_config(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<ConfigManager> {
    ConfigManager::load(path).with_context(|| match path {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })
}

fn csv_path(arg: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    match arg.or_else(|| config.data.csv_path.clone()) {
        Some(path) => Ok(path),
        None => bail!("no input data: pass --csv or set data.csv_path"),
    }
}

fn output_dir(arg: Option<PathBuf>) -> Result<PathBuf> {
    let dir = arg.unwrap_or_else(|| {
        PathBuf::from("runs").join(chrono::Local::now().format("%Y%m%d_%H%M%S").to_string())
    });
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

fn run(args: RunArgs) -> Result<()> {
    let mut manager = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        manager.update(|c| c.evolution.seed = Some(seed))?;
    }
    let config = manager.into_inner();
    let csv = csv_path(args.csv_path, &config)?;
    let out = output_dir(args.output_dir)?;

    let mut dataset = Dataset::prepare(&csv, &config.data)
        .with_context(|| format!("failed to prepare {}", csv.display()))?;
    if config.data.export_enriched {
        dataset.export(out.join("data.csv"))?;
    }

    let mut engine = EvolutionEngine::new(config.evolution.clone())?;
    let mut progress = BarProgressCallback::new(config.evolution.max_iter)?;
    let outcome = engine.run(&dataset.table, &mut progress, &mut NoopMonitor)?;
    progress.finish();

    let report = match outcome {
        RunOutcome::Completed(report) => report,
        RunOutcome::Pruned { epoch } => bail!("standalone run stopped at generation {}", epoch),
    };

    let winner = engine.backtester().simulate(&dataset.table, report.best_gene())?;
    let summary = RunSummary::new(&report, &winner, dataset.table.fields());
    summary.print();

    write_fitness_csv(&report.history, out.join("fitness.csv"))?;
    summary.save_json(out.join("summary.json"))?;
    println!("outputs written to {}", out.display());
    Ok(())
}

fn search(args: SearchArgs) -> Result<()> {
    let mut manager = load_config(args.config.as_deref())?;
    if let Some(max_trials) = args.max_trials {
        manager.update(|c| c.search.max_trials = Some(max_trials))?;
    }
    let config = manager.into_inner();
    let csv = csv_path(args.csv_path, &config)?;
    let out = output_dir(args.output_dir)?;

    let seed = args
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(0..100_000));
    let dataset = Dataset::prepare(&csv, &config.data)
        .with_context(|| format!("failed to prepare {}", csv.display()))?;

    let study = run_study(&config.evolution, &config.search, &dataset.table, seed)?;
    let path = out.join(format!("{}.json", study.name));
    study.save_json(&path)?;

    match study.best_trial() {
        Some(best) => println!(
            "best trial {}: value {:.5} with {:?}",
            best.number,
            best.value.unwrap_or(f64::NAN),
            best.params
        ),
        None => println!("no trial completed"),
    }
    println!(
        "{} trials ({} pruned) saved to {}",
        study.trials.len(),
        study.n_pruned(),
        path.display()
    );
    Ok(())
}

fn init_config(args: InitConfigArgs) -> Result<()> {
    if args.path.exists() {
        bail!("{} already exists", args.path.display());
    }
    ConfigManager::new().save_to_file(&args.path)?;
    println!("wrote default configuration to {}", args.path.display());
    Ok(())
}
