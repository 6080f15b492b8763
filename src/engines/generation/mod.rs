pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;
pub mod trigger;

pub use evolution_engine::{
    EvolutionEngine, NoopMonitor, ProgressCallback, RunOutcome, RunParams, RunReport, TrialMonitor,
};
pub use genome::{
    get_indicator_and_candle_values_from_gene, random_gene, random_population, Gene, Population,
    TriggerRole,
};
pub use operators::{crossover, mutation, selection, RouletteWheel};
pub use progress::{BarProgressCallback, SilentProgressCallback};
pub use trigger::{evaluate_trigger, rand_trigger, Clause, Trigger};
