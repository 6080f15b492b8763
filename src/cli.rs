use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tradegene",
    version,
    about = "Evolve buy/sell trigger expressions with a genetic algorithm"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evolve a population once and report the best gene
    Run(RunArgs),
    /// Grid search over mutation and crossover parameters
    Search(SearchArgs),
    /// Write the default configuration as TOML
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// OHLCV CSV file; overrides `data.csv_path`
    #[arg(long = "csv", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub csv_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory for fitness.csv, summary.json and data.csv
    #[arg(long = "output-dir", value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    #[arg(long = "csv", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub csv_path: Option<PathBuf>,

    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Directory for the study JSON
    #[arg(long = "output-dir", value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Study seed shared by every trial; random in 0..100000 when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many trials
    #[arg(long = "max-trials")]
    pub max_trials: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct InitConfigArgs {
    #[arg(long, default_value = "tradegene.toml", value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,
}
