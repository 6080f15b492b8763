use super::types::{is_timestamp_column, DatasetMetadata, PriceColumn, ValueRange};
use super::validator;
use crate::error::{Result, TradegeneError};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| TradegeneError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load an OHLCV CSV and normalise its price columns
    pub fn load_and_validate<P: AsRef<Path>>(path: P, min_rows: usize) -> Result<DataFrame> {
        let df = validator::normalize(Self::load(&path)?)?;
        validator::ensure_rows(&df, min_rows)?;

        let nulls = validator::null_counts(&df);
        if !nulls.is_empty() {
            log::warn!("Null values detected: {:?}", nulls);
        }

        Ok(df)
    }

    /// Write a DataFrame (typically the indicator-enriched one) as CSV
    pub fn export<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<()> {
        let mut file = std::fs::File::create(path.as_ref())?;
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
        log::info!("Wrote {} rows to {}", df.height(), path.as_ref().display());
        Ok(())
    }

    /// Describe a normalised frame
    pub fn create_metadata<P: AsRef<Path>>(path: P, df: &DataFrame) -> Result<DatasetMetadata> {
        let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        let timestamp_column = columns.iter().find(|c| is_timestamp_column(c)).cloned();

        Ok(DatasetMetadata {
            source: path.as_ref().display().to_string(),
            rows: df.height(),
            columns,
            timestamp_column,
            close: Self::value_range(df, PriceColumn::Close)?,
            volume: Self::value_range(df, PriceColumn::Volume)?,
        })
    }

    fn value_range(df: &DataFrame, column: PriceColumn) -> Result<Option<ValueRange>> {
        let Ok(values) = df.column(column.name()) else {
            return Ok(None);
        };
        let values = values.cast(&DataType::Float64)?;
        let values = values.f64()?;
        Ok(values
            .min()
            .zip(values.max())
            .map(|(min, max)| ValueRange { min, max }))
    }
}
