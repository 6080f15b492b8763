use super::connectors::{is_timestamp_column, validator::is_numeric, PriceColumn};
use super::fields::LegalFields;
use crate::error::{Result, TradegeneError};
use crate::functions::IndicatorRegistry;
use polars::prelude::*;

/// Append every output column of every registered indicator to `df`.
///
/// The frame must carry the canonical price columns; all indicator
/// expressions are evaluated in one lazy pass.
pub fn add_all_indicators(df: DataFrame, registry: &IndicatorRegistry) -> Result<DataFrame> {
    for column in PriceColumn::ALL {
        if df.column(column.name()).is_err() {
            return Err(TradegeneError::MissingField {
                field: column.name().to_string(),
            });
        }
    }

    let mut exprs = Vec::new();
    for indicator in registry.indicators() {
        let names = indicator.output_names();
        let outputs = indicator.calculate();
        if names.len() != outputs.len() {
            return Err(TradegeneError::IndicatorError(format!(
                "{} produced {} outputs for {} names",
                indicator.alias(),
                outputs.len(),
                names.len()
            )));
        }

        exprs.extend(
            outputs
                .into_iter()
                .zip(&names)
                .map(|(expr, name)| expr.alias(name.as_str())),
        );
        log::debug!(
            "Adding {} ({:?}): {:?}",
            indicator.ui_name(),
            indicator.scale_type(),
            names
        );
    }

    if exprs.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Every numeric column that is not a timestamp: the fields a clause may use.
pub fn list_indicators_and_candle_values(df: &DataFrame) -> Result<LegalFields> {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| is_numeric(column.dtype()))
        .map(|column| column.name().to_string())
        .filter(|name| !is_timestamp_column(name))
        .collect();

    if names.is_empty() {
        return Err(TradegeneError::DataLoading(
            "No numeric columns available for triggers".to_string(),
        ));
    }
    LegalFields::new(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn ohlcv(rows: usize) -> DataFrame {
        let close: Vec<f64> = (0..rows).map(|i| 100.0 + (i % 7) as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let volume: Vec<f64> = (0..rows).map(|i| 1000.0 + i as f64).collect();
        let timestamp: Vec<i64> = (0..rows as i64).collect();
        df! {
            "timestamp" => timestamp,
            "open" => close.clone(),
            "high" => high,
            "low" => low,
            "close" => close,
            "volume" => volume,
        }
        .unwrap()
    }

    #[test]
    fn test_add_all_indicators_appends_columns() {
        let registry = IndicatorRegistry::new();
        let expected: usize = registry
            .indicators()
            .iter()
            .map(|i| i.output_names().len())
            .sum();

        let df = add_all_indicators(ohlcv(60), &registry).unwrap();
        assert_eq!(df.width(), 6 + expected);
        assert!(df.column("rsi_14").is_ok());
        assert!(df.column("macd_signal").is_ok());
    }

    #[test]
    fn test_legal_fields_skip_timestamp() {
        let fields = list_indicators_and_candle_values(&ohlcv(5)).unwrap();
        assert_eq!(fields.names(), &["open", "high", "low", "close", "volume"]);
    }

    #[test]
    fn test_indicators_require_ohlcv() {
        let df = df! { "close" => &[1.0, 2.0] }.unwrap();
        assert!(matches!(
            add_all_indicators(df, &IndicatorRegistry::new()),
            Err(TradegeneError::MissingField { .. })
        ));
    }

    #[test]
    fn test_indicator_columns_match_direct_evaluation() {
        let registry = IndicatorRegistry::with_aliases(&["SMA".to_string()]).unwrap();
        let df = add_all_indicators(ohlcv(30), &registry).unwrap();
        let sma = df.column("sma_20").unwrap().f64().unwrap();
        assert_eq!(sma.get(18), None);

        let close = df.column("close").unwrap().f64().unwrap();
        let expected: f64 = (10..30).map(|i| close.get(i).unwrap()).sum::<f64>() / 20.0;
        assert!((sma.get(29).unwrap() - expected).abs() < 1e-9);
    }
}
