use super::pruner::MedianPruner;
use crate::engines::generation::{RunParams, TrialMonitor};
use crate::error::{Result, TradegeneError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialState {
    Complete,
    Pruned,
}

/// Stored outcome of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub number: usize,
    pub params: RunParams,
    pub state: TrialState,
    /// Objective value; absent for pruned trials
    pub value: Option<f64>,
    /// Values reported per step while the trial was running
    pub intermediate_values: BTreeMap<usize, f64>,
}

/// A running trial: collects intermediate values and consults the pruner
/// against the trials finished before it.
pub struct Trial<'a> {
    number: usize,
    params: RunParams,
    intermediate_values: BTreeMap<usize, f64>,
    pruner: &'a MedianPruner,
    history: &'a [TrialRecord],
    prune: bool,
}

impl<'a> Trial<'a> {
    pub fn new(
        number: usize,
        params: RunParams,
        pruner: &'a MedianPruner,
        history: &'a [TrialRecord],
    ) -> Self {
        Self {
            number,
            params,
            intermediate_values: BTreeMap::new(),
            pruner,
            history,
            prune: false,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn params(&self) -> RunParams {
        self.params
    }

    pub fn intermediate_values(&self) -> &BTreeMap<usize, f64> {
        &self.intermediate_values
    }

    fn into_record(self, value: Option<f64>) -> TrialRecord {
        TrialRecord {
            number: self.number,
            params: self.params,
            state: if value.is_some() {
                TrialState::Complete
            } else {
                TrialState::Pruned
            },
            value,
            intermediate_values: self.intermediate_values,
        }
    }
}

impl TrialMonitor for Trial<'_> {
    fn report(&mut self, value: f64, epoch: usize) {
        self.intermediate_values.insert(epoch, value);
        self.prune = self.pruner.should_prune(self.history, epoch, value);
    }

    fn should_stop(&self) -> bool {
        self.prune
    }
}

/// Sequential maximisation study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    pub name: String,
    pub seed: u64,
    pub pruner: MedianPruner,
    pub trials: Vec<TrialRecord>,
}

impl Study {
    pub fn new(seed: u64, pruner: MedianPruner) -> Self {
        Self {
            name: format!("seed_{:05}", seed),
            seed,
            pruner,
            trials: Vec::new(),
        }
    }

    /// Run `objective` once per sampled parameter set.
    ///
    /// The objective returns `Some(value)` for a finished trial and `None`
    /// when it stopped on the pruner's request.
    pub fn optimize<I, F>(
        &mut self,
        sampler: I,
        max_trials: Option<usize>,
        mut objective: F,
    ) -> Result<()>
    where
        I: IntoIterator<Item = RunParams>,
        F: FnMut(&mut Trial<'_>) -> Result<Option<f64>>,
    {
        let limit = max_trials.unwrap_or(usize::MAX);
        for params in sampler.into_iter().take(limit) {
            let number = self.trials.len();
            let mut trial = Trial::new(number, params, &self.pruner, &self.trials);
            let value = objective(&mut trial)?;
            let record = trial.into_record(value);

            match record.value {
                Some(value) => log::info!(
                    "Trial {} finished with value {:.5} ({:?})",
                    number, value, params
                ),
                None => log::info!("Trial {} pruned ({:?})", number, params),
            }
            self.trials.push(record);
        }

        if let Some(best) = self.best_trial() {
            log::info!(
                "Best is trial {} with value {:.5}",
                best.number,
                best.value.unwrap_or(f64::NAN)
            );
        }
        Ok(())
    }

    /// Completed trial with the largest value; earliest wins ties.
    pub fn best_trial(&self) -> Option<&TrialRecord> {
        let mut best: Option<(&TrialRecord, f64)> = None;
        for trial in &self.trials {
            if let (TrialState::Complete, Some(value)) = (trial.state, trial.value) {
                if best.map_or(true, |(_, b)| value > b) {
                    best = Some((trial, value));
                }
            }
        }
        best.map(|(trial, _)| trial)
    }

    pub fn n_pruned(&self) -> usize {
        self.trials
            .iter()
            .filter(|t| t.state == TrialState::Pruned)
            .count()
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TradegeneError::Search(format!("Cannot read study {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
