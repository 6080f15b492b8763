use tradegene::config::DataConfig;
use tradegene::data::{CsvConnector, Dataset};
use tradegene::TradegeneError;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/sample.csv");

#[test]
fn test_prepare_enriches_and_extracts_fields() {
    let dataset = Dataset::prepare(SAMPLE, &DataConfig::default()).unwrap();
    let fields = dataset.table.fields();

    assert_eq!(dataset.table.len(), 120);
    assert_eq!(dataset.metadata.rows, 120);
    for name in ["open", "high", "low", "close", "volume", "rsi_14", "macd", "obv"] {
        assert!(fields.id(name).is_some(), "missing {}", name);
    }
    // timestamp strings are not a legal field
    assert!(fields.id("timestamp").is_none());
    assert_eq!(dataset.table.price_column(), "close");
    assert_eq!(dataset.table.width(), fields.len());
}

#[test]
fn test_indicator_subset_from_config() {
    let config = DataConfig {
        indicators: vec!["RSI".to_string()],
        ..Default::default()
    };
    let dataset = Dataset::prepare(SAMPLE, &config).unwrap();
    assert_eq!(
        dataset.table.fields().names(),
        &["open", "high", "low", "close", "volume", "rsi_14"]
    );
}

#[test]
fn test_missing_price_column_is_rejected() {
    let config = DataConfig {
        price_column: "adj_close".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        Dataset::prepare(SAMPLE, &config),
        Err(TradegeneError::MissingField { .. })
    ));
}

#[test]
fn test_too_few_rows() {
    let config = DataConfig {
        min_rows: 500,
        ..Default::default()
    };
    assert!(Dataset::prepare(SAMPLE, &config).is_err());
}

#[test]
fn test_export_writes_enriched_frame() {
    let mut dataset = Dataset::prepare(SAMPLE, &DataConfig::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    dataset.export(&path).unwrap();

    let reloaded = CsvConnector::load(&path).unwrap();
    assert_eq!(reloaded.height(), 120);
    assert_eq!(reloaded.width(), dataset.frame.width());
}
