//! Single normalisation pass over a raw OHLCV frame.
//!
//! Headers are resolved to [`PriceColumn`]s, renamed to their canonical
//! names and cast to `f64`, and every complete row is checked for
//! `low <= open, close <= high`. Rows with a null price are skipped by the
//! check and reported by [`null_counts`].

use super::types::PriceColumn;
use crate::error::{Result, TradegeneError};
use polars::prelude::*;

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

/// Header in `df` that names `column`. Two matching headers are ambiguous.
fn resolve(df: &DataFrame, column: PriceColumn) -> Result<String> {
    let mut found = df
        .get_column_names()
        .into_iter()
        .filter(|header| column.matches(header.as_str()));

    let Some(header) = found.next() else {
        return Err(TradegeneError::MissingField {
            field: column.name().to_string(),
        });
    };
    if let Some(other) = found.next() {
        return Err(TradegeneError::DataLoading(format!(
            "Columns '{}' and '{}' both look like {}",
            header,
            other,
            column.name()
        )));
    }

    let dtype = df.column(header.as_str())?.dtype();
    if !is_numeric(dtype) {
        return Err(TradegeneError::DataLoading(format!(
            "Column '{}' must be numeric, found {:?}",
            header, dtype
        )));
    }
    Ok(header.to_string())
}

/// Rename the price columns to their canonical names, cast them to `f64`
/// and reject rows whose high/low do not bracket open and close.
pub fn normalize(mut df: DataFrame) -> Result<DataFrame> {
    for column in PriceColumn::ALL {
        let header = resolve(&df, column)?;
        if header != column.name() {
            df.rename(&header, column.name().into())?;
        }
    }

    let df = df
        .lazy()
        .with_columns(
            PriceColumn::ALL
                .iter()
                .map(|column| col(column.name()).cast(DataType::Float64))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    check_bars(&df)?;
    Ok(df)
}

fn check_bars(df: &DataFrame) -> Result<()> {
    let (open, high, low, close) = (col("open"), col("high"), col("low"), col("close"));
    let broken = high
        .clone()
        .lt(low.clone())
        .or(high.clone().lt(open.clone()))
        .or(high.lt(close.clone()))
        .or(low.clone().gt(open))
        .or(low.gt(close));

    let bad = df
        .clone()
        .lazy()
        .with_row_index("row", None)
        .filter(broken)
        .select([col("row").cast(DataType::UInt64)])
        .collect()?;

    if bad.height() > 0 {
        let first = bad.column("row")?.u64()?.get(0).unwrap_or_default();
        return Err(TradegeneError::DataLoading(format!(
            "{} bars violate low <= open, close <= high (first at row {})",
            bad.height(),
            first
        )));
    }
    Ok(())
}

pub fn ensure_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
    if df.height() < min_rows {
        return Err(TradegeneError::DataLoading(format!(
            "Insufficient data: {} rows, minimum {} required",
            df.height(),
            min_rows
        )));
    }
    Ok(())
}

/// Null counts per column, only for columns that have any
pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
    df.get_columns()
        .iter()
        .filter(|column| column.null_count() > 0)
        .map(|column| (column.name().to_string(), column.null_count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_normalize_renames_and_casts() {
        let df = df! {
            "Open" => &[100.0, 101.0],
            "HIGH" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "Close" => &[100.5, 102.0],
            "Vol" => &[1000i64, 1500],
        }
        .unwrap();

        let df = normalize(df).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["open", "high", "low", "close", "volume"]);
        assert_eq!(df.column("volume").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_missing_column() {
        let df = df! {
            "open" => &[100.0, 101.0],
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        assert!(matches!(
            normalize(df),
            Err(TradegeneError::MissingField { field }) if field == "close"
        ));
    }

    #[test]
    fn test_ambiguous_headers() {
        let df = df! {
            "open" => &[1.0],
            "high" => &[1.0],
            "low" => &[1.0],
            "close" => &[1.0],
            "Close" => &[1.0],
            "volume" => &[1.0],
        }
        .unwrap();

        assert!(matches!(normalize(df), Err(TradegeneError::DataLoading(_))));
    }

    #[test]
    fn test_broken_bar_is_reported_with_row() {
        let df = df! {
            "open" => &[100.0, 101.0, 102.0],
            "high" => &[101.0, 103.0, 101.0],
            "low" => &[99.0, 100.0, 100.0],
            "close" => &[100.5, 102.0, 100.5],
            "volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        match normalize(df) {
            Err(TradegeneError::DataLoading(message)) => {
                assert!(message.contains("row 2"), "{}", message)
            }
            other => panic!("expected a data error, got {:?}", other.map(|df| df.height())),
        }
    }

    #[test]
    fn test_null_prices_are_counted() {
        let df = df! {
            "open" => &[Some(100.0), None],
            "high" => &[Some(101.0), Some(96.0)],
            "low" => &[Some(99.0), Some(95.0)],
            "close" => &[Some(100.5), Some(95.5)],
            "volume" => &[Some(1000.0), Some(1.0)],
        }
        .unwrap();

        let df = normalize(df).unwrap();
        assert_eq!(null_counts(&df), vec![("open".to_string(), 1)]);
    }

    #[test]
    fn test_ensure_rows() {
        let df = df! { "close" => &[1.0, 2.0, 3.0] }.unwrap();
        assert!(ensure_rows(&df, 3).is_ok());
        assert!(ensure_rows(&df, 4).is_err());
    }
}
