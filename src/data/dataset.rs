use super::{
    add_all_indicators, list_indicators_and_candle_values, CsvConnector, DatasetMetadata,
    PriceTable,
};
use crate::config::DataConfig;
use crate::error::Result;
use crate::functions::IndicatorRegistry;
use polars::prelude::DataFrame;
use std::path::Path;

/// Enriched rows ready for a run.
pub struct Dataset {
    /// Input columns plus every indicator output
    pub frame: DataFrame,
    pub table: PriceTable,
    pub metadata: DatasetMetadata,
}

impl Dataset {
    /// Load an OHLCV CSV, append the configured indicators and extract the
    /// legal fields into a [`PriceTable`].
    pub fn prepare<P: AsRef<Path>>(path: P, config: &DataConfig) -> Result<Self> {
        let path = path.as_ref();
        let raw = CsvConnector::load_and_validate(path, config.min_rows)?;
        let metadata = CsvConnector::create_metadata(path, &raw)?;
        log::info!(
            "Loaded {} rows x {} columns from {}",
            metadata.rows,
            metadata.columns.len(),
            path.display()
        );

        let registry = IndicatorRegistry::with_aliases(&config.indicators)?;
        let frame = add_all_indicators(raw, &registry)?;
        let fields = list_indicators_and_candle_values(&frame)?;
        log::info!("{} legal fields for triggers", fields.len());

        let table = PriceTable::from_dataframe(&frame, fields, &config.price_column)?;
        Ok(Self {
            frame,
            table,
            metadata,
        })
    }

    pub fn export<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        CsvConnector::export(&mut self.frame, path)
    }
}
