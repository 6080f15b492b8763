use polars::prelude::Expr;

/// Semantic scale of an indicator's output, used when logging the field set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleType {
    Price,
    Oscillator0_100,
    OscillatorCentered,
    Volatility,
    Volume,
}

/// Base trait for all indicators.
///
/// Indicators are polars expressions over the canonical OHLCV columns. They
/// are evaluated once per dataset and appended before the evolution starts.
pub trait Indicator: Send + Sync {
    /// Display name
    fn ui_name(&self) -> &'static str;

    /// Short name used in configuration to select the indicator
    fn alias(&self) -> &'static str;

    fn scale_type(&self) -> ScaleType;

    /// Column names produced by `calculate`, in the same order
    fn output_names(&self) -> Vec<String>;

    /// One unaliased expression per name in `output_names`
    fn calculate(&self) -> Vec<Expr>;
}
