//! Expression building blocks shared by the indicators.
//!
//! Every helper maps a column expression to another one of the same length.
//! Bars before a window is full come out null.

use crate::data::PriceColumn;
use polars::prelude::*;

/// Canonical OHLCV column as `f64`
pub fn input(column: PriceColumn) -> Expr {
    col(column.name()).cast(DataType::Float64)
}

fn window(period: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: period,
        min_periods: period,
        ..Default::default()
    }
}

/// Simple moving average over `period` bars
pub fn sma(series: Expr, period: usize) -> Expr {
    series.rolling_mean(window(period))
}

pub fn rolling_sum(series: Expr, period: usize) -> Expr {
    series.rolling_sum(window(period))
}

pub fn rolling_std(series: Expr, period: usize) -> Expr {
    series.rolling_std(window(period))
}

pub fn rolling_max(series: Expr, period: usize) -> Expr {
    series.rolling_max(window(period))
}

pub fn rolling_min(series: Expr, period: usize) -> Expr {
    series.rolling_min(window(period))
}

/// Exponential moving average with `alpha = 2 / (period + 1)`
pub fn ema(series: Expr, period: usize) -> Expr {
    ewm(series, 2.0 / (period as f64 + 1.0), period)
}

/// Wilder's smoothing, `alpha = 1 / period`
pub fn wilder(series: Expr, period: usize) -> Expr {
    ewm(series, 1.0 / period as f64, period)
}

/// Unadjusted exponentially weighted mean. Leading nulls are skipped and
/// a value is reported once `min_periods` observations were seen.
pub fn ewm(series: Expr, alpha: f64, min_periods: usize) -> Expr {
    series.ewm_mean(EWMOptions {
        alpha,
        adjust: false,
        min_periods: min_periods.max(1),
        ..Default::default()
    })
}

/// Value `lag` bars back
pub fn lag(series: Expr, lag: usize) -> Expr {
    series.shift(lit(lag as i64))
}

/// Element-wise maximum; a null `b` yields `a`
pub fn greatest(a: Expr, b: Expr) -> Expr {
    when(b.clone().gt(a.clone())).then(b).otherwise(a)
}

/// `100 - 100 / (1 + up / down)`, 100 when only `up` moved and 50 when
/// neither did.
pub fn strength_index(up: Expr, down: Expr) -> Expr {
    let flat = down.clone().eq(lit(0.0));
    when(flat.clone().and(up.clone().eq(lit(0.0))))
        .then(lit(50.0))
        .when(flat)
        .then(lit(100.0))
        .otherwise(lit(100.0) - lit(100.0) / (lit(1.0) + up / down))
}
