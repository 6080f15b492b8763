use super::traits::ConfigSection;
use crate::error::TradegeneError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: Option<PathBuf>,
    /// Column used as entry/exit price by the backtester
    pub price_column: String,
    pub min_rows: usize,
    /// Indicator aliases to compute; empty means every registered indicator
    pub indicators: Vec<String>,
    /// Write the indicator-enriched frame next to the other run outputs
    pub export_enriched: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            price_column: "close".to_string(),
            min_rows: 30,
            indicators: Vec::new(),
            export_enriched: true,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), TradegeneError> {
        if self.price_column.trim().is_empty() {
            return Err(TradegeneError::Configuration(
                "Price column must not be empty".to_string(),
            ));
        }
        if self.min_rows == 0 {
            return Err(TradegeneError::Configuration(
                "Minimum row count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
