//! End-to-end tests for pricing-facade
//!
//! Configuration through registry, forecast and report, the way the
//! server and CLI drive the stack.

use chrono::{Days, NaiveDate};
use pricing_facade::prelude::*;
use pricing_facade::ModelArtifact;
use std::collections::HashMap;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn env(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    move |key| map.get(key).cloned()
}

// ============================================================================
// Full Workflow Tests
// ============================================================================

#[test]
fn e2e_config_to_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lstm_model.json");
    ModelArtifact::demo(7, 16).write(&path).unwrap();

    let config = PredictorConfig::from_lookup(env(&[(
        "MODEL_PATH",
        path.to_string_lossy().into_owned(),
    )]))
    .unwrap();
    let registry = config.registry();
    let predictor = registry.get().unwrap();

    let start = date(2024, 1, 1);
    let forecast = predictor
        .forecast(&ForecastRequest::new(start, 100.0, 1, 7))
        .unwrap();
    assert_eq!(forecast.dates.len(), 14);
    assert_eq!(forecast.dates[0], start);
    assert_eq!(forecast.dates[13], date(2024, 1, 14));

    let report = ForecastReport::from_forecast(&forecast, config.horizon_days);
    assert_eq!(report.rows.len(), 7);
    assert_eq!(report.raw_predictions, forecast.prices);
    for (i, row) in report.rows.iter().enumerate() {
        assert_eq!(row.label, format!("Day #{}", i + 1));
        assert_eq!(row.date, start + Days::new(i as u64 + 1));
        assert_eq!(row.price, forecast.prices[i]);
        assert!(row.price_display.starts_with('$'));
    }
    assert_eq!(report.rows[0].date_display, "January 02, 2024");
    assert_eq!(report.rows[0].weekday, "Tuesday");
    assert_eq!(report.rows[6].weekday, "Monday");
}

#[test]
fn e2e_repeated_requests_recompute_identically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.json");
    ModelArtifact::demo(2, 8).write(&path).unwrap();

    let registry = PredictorConfig::new(&path, ScalerSource::Persisted).registry();
    let request = ForecastRequest::new(date(2025, 7, 1), 95.5, 2, 10);
    let first = registry.get().unwrap().forecast(&request).unwrap();
    let second = registry.get().unwrap().forecast(&request).unwrap();
    assert_eq!(first, second);
}

#[test]
fn e2e_text_table_for_terminal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.json");
    ModelArtifact::demo(4, 8).write(&path).unwrap();

    let config = PredictorConfigBuilder::new()
        .model_path(&path)
        .horizon_days(3)
        .build()
        .unwrap();
    let forecast = config
        .registry()
        .get()
        .unwrap()
        .forecast(&ForecastRequest::new(date(2024, 2, 27), 140.0, 1, 5))
        .unwrap();
    let table = ForecastReport::from_forecast(&forecast, config.horizon_days).to_text_table();

    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("February 28, 2024"));
    assert!(lines[2].contains("February 29, 2024"));
    assert!(lines[3].contains("March 01, 2024"));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn e2e_missing_artifact_fails_fast() {
    let dir = TempDir::new().unwrap();
    let config = PredictorConfig::new(dir.path().join("nope.json"), ScalerSource::Persisted);
    let registry = config.registry();

    let err = registry.get().unwrap_err();
    assert!(matches!(err, PricingError::ArtifactNotFound { .. }));
    assert!(err.to_string().contains("nope.json"));
    assert!(!registry.is_loaded());
}

#[test]
fn e2e_synthetic_scalers_still_forecast() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.json");
    ModelArtifact::demo(8, 8).write(&path).unwrap();

    let config = PredictorConfig::from_lookup(env(&[
        ("MODEL_PATH", path.to_string_lossy().into_owned()),
        ("SCALER_SOURCE", "synthetic".to_string()),
        ("SCALER_SEED", "42".to_string()),
    ]))
    .unwrap();
    let predictor = config.registry().get().unwrap();
    assert_eq!(predictor.scaler_source(), ScalerSource::SyntheticFit { seed: 42 });

    let forecast = predictor
        .forecast(&ForecastRequest::new(date(2024, 6, 1), 100.0, 1, 7))
        .unwrap();
    assert_eq!(forecast.prices.len(), 14);
    assert!(forecast.prices.iter().all(|p| p.is_finite()));
}
