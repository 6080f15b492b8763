use crate::types::Trade;
use std::collections::HashMap;

/// Trade statistics of a replayed gene. Profits are in price units.
pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    pub fn calculate(trades: &[Trade]) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        metrics.insert("num_trades".to_string(), trades.len() as f64);

        if trades.is_empty() {
            metrics.insert("total_profit".to_string(), 0.0);
            return metrics;
        }

        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();
        metrics.insert("total_profit".to_string(), total_profit);

        let winning_trades: Vec<&Trade> = trades.iter().filter(|t| t.profit > 0.0).collect();
        let losing_trades: Vec<&Trade> = trades.iter().filter(|t| t.profit <= 0.0).collect();

        let win_rate = (winning_trades.len() as f64 / trades.len() as f64) * 100.0;
        metrics.insert("win_rate".to_string(), win_rate);

        if !winning_trades.is_empty() {
            let avg_win: f64 = winning_trades.iter().map(|t| t.profit).sum::<f64>()
                / winning_trades.len() as f64;
            metrics.insert("avg_win".to_string(), avg_win);
        }

        if !losing_trades.is_empty() {
            let avg_loss: f64 = losing_trades.iter().map(|t| t.profit.abs()).sum::<f64>()
                / losing_trades.len() as f64;
            metrics.insert("avg_loss".to_string(), avg_loss);
        }

        let gross_profit: f64 = winning_trades.iter().map(|t| t.profit).sum();
        let gross_loss: f64 = losing_trades.iter().map(|t| t.profit.abs()).sum();
        if gross_loss > 0.0 {
            metrics.insert("profit_factor".to_string(), gross_profit / gross_loss);
        }

        let avg_bars: f64 = trades
            .iter()
            .map(|t| (t.exit_bar - t.entry_bar) as f64)
            .sum::<f64>()
            / trades.len() as f64;
        metrics.insert("avg_bars_held".to_string(), avg_bars);

        metrics
    }
}
