use crate::data::PriceColumn;
use crate::functions::primitives::{ema, input, rolling_std, sma};
use crate::functions::traits::{Indicator, ScaleType};
use polars::prelude::{lit, Expr};

// --- SMA ---
pub struct SMA {
    pub period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for SMA {
    fn alias(&self) -> &'static str {
        "SMA"
    }

    fn ui_name(&self) -> &'static str {
        "Simple Moving Average"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Price
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("sma_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        vec![sma(input(PriceColumn::Close), self.period)]
    }
}

// --- EMA ---
pub struct EMA {
    pub period: usize,
}

impl EMA {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for EMA {
    fn alias(&self) -> &'static str {
        "EMA"
    }

    fn ui_name(&self) -> &'static str {
        "Exponential Moving Average"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Price
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("ema_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        vec![ema(input(PriceColumn::Close), self.period)]
    }
}

// --- MACD ---
pub struct MACD {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MACD {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }
}

impl Indicator for MACD {
    fn alias(&self) -> &'static str {
        "MACD"
    }

    fn ui_name(&self) -> &'static str {
        "Moving Average Convergence Divergence"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::OscillatorCentered
    }

    fn output_names(&self) -> Vec<String> {
        vec![
            "macd".to_string(),
            "macd_signal".to_string(),
            "macd_diff".to_string(),
        ]
    }

    fn calculate(&self) -> Vec<Expr> {
        let close = input(PriceColumn::Close);
        let line = ema(close.clone(), self.fast) - ema(close, self.slow);
        let signal = ema(line.clone(), self.signal);
        let diff = line.clone() - signal.clone();
        vec![line, signal, diff]
    }
}

// --- Bollinger Bands ---
pub struct BollingerBands {
    pub period: usize,
    pub deviations: f64,
}

impl BollingerBands {
    pub fn new(period: usize, deviations: f64) -> Self {
        Self { period, deviations }
    }
}

impl Indicator for BollingerBands {
    fn alias(&self) -> &'static str {
        "BB"
    }

    fn ui_name(&self) -> &'static str {
        "Bollinger Bands"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Price
    }

    fn output_names(&self) -> Vec<String> {
        vec![
            "bb_upper".to_string(),
            "bb_middle".to_string(),
            "bb_lower".to_string(),
        ]
    }

    fn calculate(&self) -> Vec<Expr> {
        let close = input(PriceColumn::Close);
        let middle = sma(close.clone(), self.period);
        let width = lit(self.deviations) * rolling_std(close, self.period);
        vec![
            middle.clone() + width.clone(),
            middle.clone(),
            middle - width,
        ]
    }
}
