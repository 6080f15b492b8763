use crate::data::PriceColumn;
use crate::functions::primitives::{
    input, lag, rolling_max, rolling_min, sma, strength_index, wilder,
};
use crate::functions::traits::{Indicator, ScaleType};
use polars::prelude::{lit, when, Expr};

/// Position of close inside the `[low, high]` range, scaled to `[0, 100]`.
/// A flat range reads as the midpoint.
fn range_position(close: Expr, lowest: Expr, highest: Expr) -> Expr {
    let range = highest - lowest.clone();
    when(range.clone().eq(lit(0.0)))
        .then(lit(50.0))
        .otherwise(lit(100.0) * (close - lowest) / range)
}

// --- RSI (Relative Strength Index, Wilder smoothing) ---
pub struct RSI {
    pub period: usize,
}

impl RSI {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for RSI {
    fn alias(&self) -> &'static str {
        "RSI"
    }

    fn ui_name(&self) -> &'static str {
        "Relative Strength Index"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Oscillator0_100
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("rsi_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        let close = input(PriceColumn::Close);
        let delta = close.clone() - lag(close, 1);
        // split into non-negative parts, keeping the leading null
        let gains = (delta.clone().abs() + delta.clone()) / lit(2.0);
        let losses = (delta.clone().abs() - delta) / lit(2.0);

        vec![strength_index(
            wilder(gains, self.period),
            wilder(losses, self.period),
        )]
    }
}

// --- Stochastic Oscillator ---
pub struct Stochastic {
    pub k_period: usize,
    pub d_period: usize,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }
}

impl Indicator for Stochastic {
    fn alias(&self) -> &'static str {
        "Stochastic"
    }

    fn ui_name(&self) -> &'static str {
        "Stochastic Oscillator"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Oscillator0_100
    }

    fn output_names(&self) -> Vec<String> {
        vec!["stoch_k".to_string(), "stoch_d".to_string()]
    }

    fn calculate(&self) -> Vec<Expr> {
        let k = range_position(
            input(PriceColumn::Close),
            rolling_min(input(PriceColumn::Low), self.k_period),
            rolling_max(input(PriceColumn::High), self.k_period),
        );
        let d = sma(k.clone(), self.d_period);
        vec![k, d]
    }
}

// --- Williams %R ---
pub struct WilliamsR {
    pub period: usize,
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for WilliamsR {
    fn alias(&self) -> &'static str {
        "WilliamsR"
    }

    fn ui_name(&self) -> &'static str {
        "Williams %R"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Oscillator0_100
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("willr_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        let position = range_position(
            input(PriceColumn::Close),
            rolling_min(input(PriceColumn::Low), self.period),
            rolling_max(input(PriceColumn::High), self.period),
        );
        vec![position - lit(100.0)]
    }
}

// --- ROC (Rate of Change) ---
pub struct ROC {
    pub period: usize,
}

impl ROC {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for ROC {
    fn alias(&self) -> &'static str {
        "ROC"
    }

    fn ui_name(&self) -> &'static str {
        "Rate of Change"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::OscillatorCentered
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("roc_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        let close = input(PriceColumn::Close);
        let past = lag(close.clone(), self.period);
        vec![when(past.clone().eq(lit(0.0)))
            .then(lit(f64::NAN))
            .otherwise(lit(100.0) * (close - past.clone()) / past)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::testing::{compute, frame_from_close};

    #[test]
    fn test_rsi_bounds() {
        let close: Vec<f64> = (0..40).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        let rsi = &compute(&RSI::new(14), &frame_from_close(&close))[0];
        assert!(rsi[13].is_nan());
        for value in &rsi[14..] {
            assert!((0.0..=100.0).contains(value), "rsi out of range: {}", value);
        }
    }

    #[test]
    fn test_rsi_of_rising_series_is_100() {
        let close: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let rsi = &compute(&RSI::new(5), &frame_from_close(&close))[0];
        assert_eq!(rsi[19], 100.0);
    }

    #[test]
    fn test_stochastic_at_high_is_100() {
        let close: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let out = compute(&Stochastic::new(3, 3), &frame_from_close(&close));
        assert_eq!(out[0][9], 100.0);
        assert_eq!(out[1][9], 100.0);
        assert!(out[0][1].is_nan());
    }

    #[test]
    fn test_williams_r_at_low_is_minus_100() {
        let close: Vec<f64> = (0..10).map(|i| 10.0 - i as f64).collect();
        let out = compute(&WilliamsR::new(3), &frame_from_close(&close));
        assert_eq!(out[0][9], -100.0);
    }

    #[test]
    fn test_roc() {
        let out = compute(&ROC::new(1), &frame_from_close(&[100.0, 110.0, 99.0]));
        assert!(out[0][0].is_nan());
        assert!((out[0][1] - 10.0).abs() < 1e-9);
        assert!((out[0][2] + 10.0).abs() < 1e-9);
    }
}
