pub mod indicators;
pub mod primitives;
pub mod registry;
pub mod traits;

pub use registry::IndicatorRegistry;
pub use traits::{Indicator, ScaleType};

#[cfg(test)]
pub(crate) mod testing {
    use super::Indicator;
    use polars::df;
    use polars::prelude::*;

    /// Flat candles where open, high and low equal close and volume is 1
    pub fn frame_from_close(close: &[f64]) -> DataFrame {
        ohlcv(close, close, close, close, &vec![1.0; close.len()])
    }

    pub fn ohlcv(
        open: &[f64],
        high: &[f64],
        low: &[f64],
        close: &[f64],
        volume: &[f64],
    ) -> DataFrame {
        df! {
            "open" => open,
            "high" => high,
            "low" => low,
            "close" => close,
            "volume" => volume,
        }
        .unwrap()
    }

    /// Column as `f64`, nulls read as NaN
    pub fn values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect()
    }

    /// Every output of `indicator` over `df`, in `output_names` order
    pub fn compute(indicator: &dyn Indicator, df: &DataFrame) -> Vec<Vec<f64>> {
        let names = indicator.output_names();
        let exprs: Vec<Expr> = indicator
            .calculate()
            .into_iter()
            .zip(&names)
            .map(|(expr, name)| expr.alias(name.as_str()))
            .collect();
        let out = df.clone().lazy().select(exprs).collect().unwrap();
        names.iter().map(|name| values(&out, name)).collect()
    }
}
