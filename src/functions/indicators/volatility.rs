use crate::data::PriceColumn;
use crate::functions::primitives::{greatest, input, lag, wilder};
use crate::functions::traits::{Indicator, ScaleType};
use polars::prelude::Expr;

// --- ATR (Average True Range) ---
pub struct ATR {
    pub period: usize,
}

impl ATR {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for ATR {
    fn alias(&self) -> &'static str {
        "ATR"
    }

    fn ui_name(&self) -> &'static str {
        "Average True Range"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Volatility
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("atr_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        let high = input(PriceColumn::High);
        let low = input(PriceColumn::Low);
        let prev_close = lag(input(PriceColumn::Close), 1);

        // the first bar has no previous close and falls back to high - low
        let true_range = greatest(
            greatest(high.clone() - low.clone(), (high - prev_close.clone()).abs()),
            (low - prev_close).abs(),
        );
        vec![wilder(true_range, self.period)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::testing::{compute, ohlcv};

    #[test]
    fn test_atr_uses_gaps() {
        let df = ohlcv(
            &[10.0, 20.0, 20.0],
            &[11.0, 21.0, 21.0],
            &[9.0, 19.0, 19.0],
            &[10.0, 20.0, 20.0],
            &[1.0; 3],
        );
        let atr = &compute(&ATR::new(1), &df)[0];
        assert_eq!(atr[0], 2.0);
        // gap up from 10 to a 21 high
        assert_eq!(atr[1], 11.0);
        assert_eq!(atr[2], 2.0);
    }
}
