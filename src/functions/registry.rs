use crate::error::{Result, TradegeneError};
use crate::functions::indicators::{
    momentum::{Stochastic, RSI, ROC, WilliamsR},
    trend::{BollingerBands, EMA, MACD, SMA},
    volatility::ATR,
    volume::{MFI, OBV},
};
use std::sync::Arc;

use super::traits::Indicator;

/// Ordered set of indicators appended to the price data before a run.
///
/// Order matters: it fixes the column order of the enriched frame and
/// therefore the `FieldId` each indicator output receives.
pub struct IndicatorRegistry {
    indicators: Vec<Arc<dyn Indicator>>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            indicators: Vec::new(),
        };
        registry.register_indicators();
        registry
    }

    pub fn empty() -> Self {
        Self {
            indicators: Vec::new(),
        }
    }

    /// Keep only the indicators whose alias is listed (case-insensitive).
    /// An empty list keeps everything.
    pub fn with_aliases(aliases: &[String]) -> Result<Self> {
        let registry = Self::new();
        if aliases.is_empty() {
            return Ok(registry);
        }

        let mut selected = Vec::with_capacity(aliases.len());
        for alias in aliases {
            let indicator = registry.get(alias).ok_or_else(|| {
                TradegeneError::IndicatorError(format!(
                    "Unknown indicator '{}', expected one of {:?}",
                    alias,
                    registry.aliases()
                ))
            })?;
            selected.push(indicator);
        }
        Ok(Self {
            indicators: selected,
        })
    }

    pub fn register(&mut self, indicator: Arc<dyn Indicator>) {
        self.indicators.push(indicator);
    }

    pub fn get(&self, alias: &str) -> Option<Arc<dyn Indicator>> {
        self.indicators
            .iter()
            .find(|i| i.alias().eq_ignore_ascii_case(alias))
            .cloned()
    }

    pub fn indicators(&self) -> &[Arc<dyn Indicator>] {
        &self.indicators
    }

    pub fn aliases(&self) -> Vec<&'static str> {
        self.indicators.iter().map(|i| i.alias()).collect()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    fn register_indicators(&mut self) {
        let indicators: Vec<Arc<dyn Indicator>> = vec![
            Arc::new(SMA::new(20)),
            Arc::new(EMA::new(12)),
            Arc::new(EMA::new(26)),
            Arc::new(MACD::new(12, 26, 9)),
            Arc::new(BollingerBands::new(20, 2.0)),
            Arc::new(RSI::new(14)),
            Arc::new(Stochastic::new(14, 3)),
            Arc::new(WilliamsR::new(14)),
            Arc::new(ROC::new(12)),
            Arc::new(ATR::new(14)),
            Arc::new(OBV),
            Arc::new(MFI::new(14)),
        ];

        for indicator in indicators {
            self.register(indicator);
        }
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_output_names_are_unique() {
        let registry = IndicatorRegistry::new();
        let mut seen = HashSet::new();
        for indicator in registry.indicators() {
            for name in indicator.output_names() {
                assert!(seen.insert(name.clone()), "duplicate output column {}", name);
            }
        }
    }

    #[test]
    fn test_with_aliases_filters_and_keeps_order() {
        let registry =
            IndicatorRegistry::with_aliases(&["rsi".to_string(), "OBV".to_string()]).unwrap();
        assert_eq!(registry.aliases(), vec!["RSI", "OBV"]);
    }

    #[test]
    fn test_unknown_alias_is_rejected() {
        let result = IndicatorRegistry::with_aliases(&["Ichimoku".to_string()]);
        assert!(matches!(result, Err(TradegeneError::IndicatorError(_))));
    }
}
