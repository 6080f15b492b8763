use crate::data::LegalFields;
use crate::engines::evaluation::{Backtest, FitnessRecord};
use crate::engines::generation::{RunParams, RunReport};
use crate::engines::metrics::MetricsEngine;
use crate::error::Result;
use polars::df;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Everything worth keeping about a finished standalone run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub params: RunParams,
    pub generations: usize,
    pub best_index: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub buy_trigger: String,
    pub sell_trigger: String,
    pub metrics: BTreeMap<String, f64>,
}

impl RunSummary {
    pub fn new(report: &RunReport, winner: &Backtest, fields: &LegalFields) -> Self {
        let (buy_trigger, sell_trigger) = report.best_gene().describe(fields);
        let metrics = MetricsEngine::new().calculate_all(winner).into_iter().collect();

        Self {
            seed: report.seed,
            params: report.params,
            generations: report.history.len(),
            best_index: report.best_index(),
            best_fitness: report.best_fitness(),
            mean_fitness: report.mean_fitness(),
            buy_trigger,
            sell_trigger,
            metrics,
        }
    }

    pub fn print(&self) {
        println!("buy trigger: {}", self.buy_trigger);
        println!("sell trigger: {}", self.sell_trigger);
        println!("best bot earns ${:.5}", self.best_fitness);

        let stat = |name: &str| self.metrics.get(name).copied().unwrap_or(0.0);
        println!(
            "trades: {}, win rate: {:.1}%, profit factor: {:.3}, max drawdown: {:.5}",
            stat("num_trades"),
            stat("win_rate"),
            stat("profit_factor"),
            stat("max_drawdown")
        );
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        log::info!("Wrote run summary to {}", path.as_ref().display());
        Ok(())
    }
}

/// Per-epoch fitness log: `epoch, max_pos, max_fit, fit_sum, mean_fit,
/// fitnesses`, the last column holding the whole generation as a JSON array.
pub fn fitness_frame(history: &[FitnessRecord]) -> Result<DataFrame> {
    let epoch: Vec<u64> = (0..history.len() as u64).collect();
    let max_pos: Vec<u64> = history.iter().map(|r| r.best_index as u64).collect();
    let max_fit: Vec<f64> = history.iter().map(|r| r.best_fitness).collect();
    let fit_sum: Vec<f64> = history.iter().map(|r| r.fitness_sum).collect();
    let mean_fit: Vec<f64> = history.iter().map(FitnessRecord::mean).collect();
    let fitnesses = history
        .iter()
        .map(|r| serde_json::to_string(&r.fitnesses))
        .collect::<std::result::Result<Vec<String>, _>>()?;

    let df = df! {
        "epoch" => epoch,
        "max_pos" => max_pos,
        "max_fit" => max_fit,
        "fit_sum" => fit_sum,
        "mean_fit" => mean_fit,
        "fitnesses" => fitnesses,
    }?;
    Ok(df)
}

pub fn write_fitness_csv<P: AsRef<Path>>(history: &[FitnessRecord], path: P) -> Result<()> {
    let mut df = fitness_frame(history)?;
    let mut file = fs::File::create(path.as_ref())?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    log::info!("Wrote {} epochs to {}", history.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<FitnessRecord> {
        vec![
            FitnessRecord::from_fitnesses(vec![1.0, -1.0, 3.0]).unwrap(),
            FitnessRecord::from_fitnesses(vec![3.0, 2.0, 3.0]).unwrap(),
        ]
    }

    #[test]
    fn test_fitness_frame_columns() {
        let df = fitness_frame(&history()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            vec!["epoch", "max_pos", "max_fit", "fit_sum", "mean_fit", "fitnesses"]
        );

        let max_pos = df.column("max_pos").unwrap().u64().unwrap();
        assert_eq!(max_pos.get(0), Some(2));
        assert_eq!(max_pos.get(1), Some(0));

        let fitnesses = df.column("fitnesses").unwrap().str().unwrap();
        assert_eq!(fitnesses.get(0), Some("[1.0,-1.0,3.0]"));
    }

    #[test]
    fn test_write_fitness_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitness.csv");
        write_fitness_csv(&history(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, "epoch,max_pos,max_fit,fit_sum,mean_fit,fitnesses");
        assert_eq!(content.lines().count(), 3);
    }
}
