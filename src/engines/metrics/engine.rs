use crate::engines::evaluation::Backtest;
use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use std::collections::HashMap;

pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_all(&self, backtest: &Backtest) -> HashMap<String, f64> {
        let mut all_metrics = HashMap::new();

        all_metrics.extend(ProfitabilityMetrics::calculate(&backtest.trades));
        all_metrics.extend(RiskMetrics::calculate(&backtest.equity_curve));

        all_metrics.insert("fitness".to_string(), backtest.fitness);
        all_metrics.insert(
            "open_at_end".to_string(),
            if backtest.open_position.is_some() { 1.0 } else { 0.0 },
        );

        all_metrics
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}
