//! # pricing-cli
//!
//! Command-line interface for seven-day nightly price forecasts.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use pricing_facade::{
    artifact, ForecastReport, ForecastRequest, ModelArtifact, PredictorConfigBuilder,
    ScalerSource, DEFAULT_MODEL_PATH,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "pricing")]
#[command(about = "Nightly price forecasting CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast nightly prices for the days after a start date
    Predict {
        /// Average nightly price
        #[arg(short = 'p', long, default_value = "100.0")]
        avg_price: f64,

        /// Minimum nights per stay
        #[arg(long, default_value = "1")]
        min_nights: u32,

        /// Maximum nights per stay
        #[arg(long, default_value = "7")]
        max_nights: u32,

        /// First day of the window (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        start_date: Option<NaiveDate>,

        /// Model artifact
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Scaler source (artifact, synthetic)
        #[arg(long, default_value = "artifact")]
        scalers: ScalerSource,

        /// Seed for synthetic scalers
        #[arg(long)]
        seed: Option<u64>,

        /// Number of days to show
        #[arg(short, long, default_value = "7")]
        days: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the metadata of a model artifact
    Inspect {
        /// Model artifact
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },

    /// Write an untrained demo artifact with seeded random weights
    Scaffold {
        /// Output file
        #[arg(short, long, default_value = DEFAULT_MODEL_PATH)]
        output: PathBuf,

        /// Weight seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// LSTM units
        #[arg(long, default_value = "32")]
        units: usize,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

struct PredictArgs {
    avg_price: f64,
    min_nights: u32,
    max_nights: u32,
    start_date: Option<NaiveDate>,
    model: PathBuf,
    scalers: ScalerSource,
    seed: Option<u64>,
    days: usize,
    json: bool,
}

/// Forecast and render the report as text or JSON
fn run_predict(args: PredictArgs) -> CliResult<String> {
    let mut source = args.scalers;
    if let (ScalerSource::SyntheticFit { seed }, Some(value)) = (&mut source, args.seed) {
        *seed = value;
    }

    let config = PredictorConfigBuilder::new()
        .model_path(args.model)
        .scaler_source(source)
        .horizon_days(args.days)
        .build()
        .map_err(|e| e.to_string())?;
    let predictor = config.registry().get().map_err(|e| e.to_string())?;

    let start = args
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let request = ForecastRequest::new(start, args.avg_price, args.min_nights, args.max_nights);
    let forecast = predictor.forecast(&request).map_err(|e| e.to_string())?;
    let report = ForecastReport::from_forecast(&forecast, config.horizon_days);

    if args.json {
        return serde_json::to_string_pretty(&report).map_err(|e| e.to_string());
    }
    Ok(format!(
        "Model: {} (scalers: {})\n\n{}",
        predictor.metadata().name,
        predictor.scaler_source(),
        report.to_text_table()
    ))
}

fn run_inspect(model: PathBuf) -> CliResult<String> {
    let loaded = artifact::load(&model).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&loaded.metadata).map_err(|e| e.to_string())
}

fn run_scaffold(output: PathBuf, seed: u64, units: usize, force: bool) -> CliResult<String> {
    if units == 0 {
        return Err("units must be at least 1".to_string());
    }
    if output.exists() && !force {
        return Err(format!(
            "{:?} already exists; pass --force to overwrite it",
            output
        ));
    }
    ModelArtifact::demo(seed, units)
        .write(&output)
        .map_err(|e| e.to_string())?;
    Ok(format!(
        "Demo artifact written to {:?} (seed {}, {} units). Its weights are untrained.",
        output, seed, units
    ))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Predict {
            avg_price,
            min_nights,
            max_nights,
            start_date,
            model,
            scalers,
            seed,
            days,
            json,
        } => run_predict(PredictArgs {
            avg_price,
            min_nights,
            max_nights,
            start_date,
            model,
            scalers,
            seed,
            days,
            json,
        }),

        Commands::Inspect { model } => run_inspect(model),

        Commands::Scaffold {
            output,
            seed,
            units,
            force,
        } => run_scaffold(output, seed, units, force),
    };

    match result {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn predict_args(model: PathBuf) -> PredictArgs {
        PredictArgs {
            avg_price: 100.0,
            min_nights: 1,
            max_nights: 7,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            model,
            scalers: ScalerSource::Persisted,
            seed: None,
            days: 7,
            json: false,
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "pricing",
            "predict",
            "-p",
            "150",
            "--start-date",
            "2024-07-01",
            "--scalers",
            "synthetic",
            "--seed",
            "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict {
                avg_price,
                start_date,
                scalers,
                seed,
                model,
                ..
            } => {
                assert_eq!(avg_price, 150.0);
                assert_eq!(start_date, NaiveDate::from_ymd_opt(2024, 7, 1));
                assert_eq!(scalers, ScalerSource::SyntheticFit { seed: 0 });
                assert_eq!(seed, Some(9));
                assert_eq!(model, PathBuf::from(DEFAULT_MODEL_PATH));
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_scalers() {
        assert!(Cli::try_parse_from(["pricing", "predict", "--scalers", "csv"]).is_err());
    }

    #[test]
    fn test_scaffold_then_predict() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model").join("lstm_model.json");
        run_scaffold(path.clone(), 3, 8, false).unwrap();

        let table = run_predict(predict_args(path.clone())).unwrap();
        assert!(table.starts_with("Model: demo-lstm-3 (scalers: persisted)"));
        assert!(table.contains("Day #7"));
        assert!(table.contains("January 08, 2024"));

        let metadata = run_inspect(path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&metadata).unwrap();
        assert_eq!(json["window"], 14);
        assert_eq!(json["has_persisted_scalers"], true);
    }

    #[test]
    fn test_scaffold_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        run_scaffold(path.clone(), 1, 4, false).unwrap();
        assert!(run_scaffold(path.clone(), 1, 4, false).is_err());
        assert!(run_scaffold(path.clone(), 2, 4, true).is_ok());
        assert!(run_scaffold(path, 2, 0, true).is_err());
    }

    #[test]
    fn test_predict_json_with_synthetic_seed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        run_scaffold(path.clone(), 5, 4, false).unwrap();

        let mut args = predict_args(path);
        args.scalers = ScalerSource::SyntheticFit { seed: 0 };
        args.seed = Some(11);
        args.days = 3;
        args.json = true;
        let out = run_predict(args).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 3);
        assert_eq!(json["raw_predictions"].as_array().unwrap().len(), 14);
    }

    #[test]
    fn test_predict_missing_model() {
        let dir = TempDir::new().unwrap();
        let err = run_predict(predict_args(dir.path().join("none.json"))).unwrap_err();
        assert!(err.starts_with("Model artifact not found"));
    }
}
