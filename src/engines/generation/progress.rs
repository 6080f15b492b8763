use super::evolution_engine::ProgressCallback;
use crate::engines::evaluation::FitnessRecord;
use crate::error::{Result, TradegeneError};
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar over the generations of one run
pub struct BarProgressCallback {
    bar: ProgressBar,
}

impl BarProgressCallback {
    pub fn new(generations: usize) -> Result<Self> {
        let bar = ProgressBar::new(generations as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| TradegeneError::Configuration(e.to_string()))?
                .progress_chars("=>-"),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for BarProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, record: &FitnessRecord) {
        self.bar.set_message(format!("best {:.4}", record.best_fitness));
        self.bar.inc(1);
    }
}

/// Reports nothing; used by search trials
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, record: &FitnessRecord) {
        log::trace!("generation {} best {:.4}", generation, record.best_fitness);
    }
}
