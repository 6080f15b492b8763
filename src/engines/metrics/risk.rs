use std::collections::HashMap;

/// Risk statistics of a P&L curve expressed in price units.
///
/// The curve starts at zero, so drawdown is absolute and the ratios are
/// computed on per-bar P&L changes rather than percentage returns.
pub struct RiskMetrics;

impl RiskMetrics {
    pub fn calculate(equity_curve: &[f64]) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        if equity_curve.len() < 2 {
            return metrics;
        }

        metrics.insert("max_drawdown".to_string(), Self::max_drawdown(equity_curve));

        let changes = Self::calculate_changes(equity_curve);
        let volatility = Self::std_dev(&changes);
        metrics.insert("volatility".to_string(), volatility);

        let avg_change = changes.iter().sum::<f64>() / changes.len() as f64;
        if volatility > 0.0 {
            metrics.insert("sharpe_ratio".to_string(), avg_change / volatility);
        }

        let downside: Vec<f64> = changes.iter().filter(|&&c| c < 0.0).copied().collect();
        if !downside.is_empty() {
            let downside_dev = Self::std_dev(&downside);
            if downside_dev > 0.0 {
                metrics.insert("sortino_ratio".to_string(), avg_change / downside_dev);
            }
        }

        metrics
    }

    pub fn max_drawdown(equity: &[f64]) -> f64 {
        let mut max_dd = 0.0;
        let mut peak = f64::NEG_INFINITY;

        for &value in equity {
            if value > peak {
                peak = value;
            }
            let dd = peak - value;
            if dd > max_dd {
                max_dd = dd;
            }
        }

        max_dd
    }

    fn calculate_changes(equity: &[f64]) -> Vec<f64> {
        equity.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance =
            values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }
}
