use crate::data::PriceColumn;
use crate::functions::primitives::{input, lag, rolling_sum, strength_index};
use crate::functions::traits::{Indicator, ScaleType};
use polars::prelude::{lit, when, Expr};

// --- OBV (On-Balance Volume) ---
pub struct OBV;

impl Indicator for OBV {
    fn alias(&self) -> &'static str {
        "OBV"
    }

    fn ui_name(&self) -> &'static str {
        "On-Balance Volume"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Volume
    }

    fn output_names(&self) -> Vec<String> {
        vec!["obv".to_string()]
    }

    fn calculate(&self) -> Vec<Expr> {
        let close = input(PriceColumn::Close);
        let volume = input(PriceColumn::Volume);
        let prev_close = lag(close.clone(), 1);

        let signed_volume = when(close.clone().gt(prev_close.clone()))
            .then(volume.clone())
            .when(close.lt(prev_close))
            .then(lit(0.0) - volume)
            .otherwise(lit(0.0));
        vec![signed_volume.cum_sum(false)]
    }
}

// --- MFI (Money Flow Index) ---
pub struct MFI {
    pub period: usize,
}

impl MFI {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for MFI {
    fn alias(&self) -> &'static str {
        "MFI"
    }

    fn ui_name(&self) -> &'static str {
        "Money Flow Index"
    }

    fn scale_type(&self) -> ScaleType {
        ScaleType::Oscillator0_100
    }

    fn output_names(&self) -> Vec<String> {
        vec![format!("mfi_{}", self.period)]
    }

    fn calculate(&self) -> Vec<Expr> {
        let high = input(PriceColumn::High);
        let low = input(PriceColumn::Low);
        let typical = (high + low + input(PriceColumn::Close)) / lit(3.0);
        let raw_flow = typical.clone() * input(PriceColumn::Volume);
        let prev_typical = lag(typical.clone(), 1);

        let positive = when(typical.clone().gt(prev_typical.clone()))
            .then(raw_flow.clone())
            .otherwise(lit(0.0));
        let negative = when(typical.lt(prev_typical))
            .then(raw_flow)
            .otherwise(lit(0.0));

        vec![strength_index(
            rolling_sum(positive, self.period),
            rolling_sum(negative, self.period),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::testing::{compute, frame_from_close, ohlcv};

    #[test]
    fn test_obv_accumulates_signed_volume() {
        let df = ohlcv(
            &[1.0; 4],
            &[3.0; 4],
            &[0.5; 4],
            &[1.0, 2.0, 1.5, 1.5],
            &[10.0, 20.0, 5.0, 7.0],
        );
        let obv = &compute(&OBV, &df)[0];
        assert_eq!(obv, &vec![0.0, 20.0, 15.0, 15.0]);
    }

    #[test]
    fn test_mfi_rising_prices() {
        let close: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let mfi = &compute(&MFI::new(3), &frame_from_close(&close))[0];
        assert!(mfi[1].is_nan());
        assert_eq!(mfi[9], 100.0);
    }
}
