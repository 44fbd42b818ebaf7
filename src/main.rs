//! Cropcast CLI.
//!
//! Plays the role of the web layer: parses user input and uploaded CSV
//! datasets, calls the pipeline, and formats the results.
//!
//! # Usage
//! ```sh
//! cropcast predict Wheat 10 2025 --rainfall 150
//! cropcast retrain Cotton data/cotton.csv
//! cropcast models
//! ```
//!
//! # Environment Variables
//! - `CROPCAST_MODEL_DIR` - Directory holding model blobs (default: model)
//! - `CROPCAST_MIN_YEAR` - Earliest accepted request year (default: 2000)
//! - `CROPCAST_MAX_YEARS_AHEAD` - Accepted years past today (default: 10)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cropcast::application::bootstrap::build_pipeline;
use cropcast::application::pipeline::PricePipeline;
use cropcast::config::{ModelStoreEnvConfig, ValidationEnvConfig};
use cropcast::domain::commodity::Commodity;
use cropcast::domain::types::{DatasetRow, PredictionRequest};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "cropcast", version, about = "Crop wholesale-price prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a commodity's price for a given month and year
    Predict {
        commodity: String,
        /// Month, 1-12
        month: u32,
        year: i32,
        /// Rainfall in mm (historical average when omitted)
        #[arg(long)]
        rainfall: Option<f64>,
        /// Temperature in °C (historical average when omitted)
        #[arg(long)]
        temperature: Option<f64>,
    },
    /// Retrain a commodity's model from a historical CSV dataset
    Retrain {
        commodity: String,
        /// CSV with Month, Year, Rainfall, WPI columns (Temperature optional)
        dataset: PathBuf,
    },
    /// List supported commodities and their loaded models
    Models,
}

/// Uploaded dataset row, matching the historical dataset column names.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Rainfall")]
    rainfall: f64,
    #[serde(rename = "Temperature", default)]
    temperature: Option<f64>,
    #[serde(rename = "WPI")]
    index_value: f64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Cropcast {} starting...", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let validation = ValidationEnvConfig::from_env();
    let store_cfg = ModelStoreEnvConfig::from_env();
    let pipeline = build_pipeline(&validation, &store_cfg)?;

    match cli.command {
        Commands::Predict {
            commodity,
            month,
            year,
            rainfall,
            temperature,
        } => {
            let commodity: Commodity = commodity.parse()?;
            let result = pipeline.predict(&PredictionRequest {
                commodity,
                month,
                year,
                rainfall,
                temperature,
            })?;
            println!("{commodity}, {month}/{year}");
            println!("Predicted price: ₹{:.2} per quintal", result.price);
            println!(
                "Expected range:  ₹{:.2} to ₹{:.2}",
                result.price_min, result.price_max
            );
            println!("Predicted WPI:   {:.2}", result.raw_index);
        }
        Commands::Retrain { commodity, dataset } => {
            let commodity: Commodity = commodity.parse()?;
            let rows = read_dataset(&dataset)?;
            let entry = pipeline.retrain_commodity(commodity, &rows)?;
            println!("Retrained {commodity} model at {}", entry.trained_at);
            if let Some(report) = &entry.report {
                println!(
                    "Samples: {} (holdout {})  R²: {:.4}  RMSE: {:.4}",
                    report.samples, report.holdout_samples, report.r2, report.rmse
                );
            }
        }
        Commands::Models => print_models(&pipeline),
    }

    Ok(())
}

fn read_dataset(path: &PathBuf) -> Result<Vec<DatasetRow>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening dataset {path:?}"))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CsvRow = record.with_context(|| format!("parsing dataset {path:?}"))?;
        rows.push(DatasetRow {
            month: row.month,
            year: row.year,
            rainfall: row.rainfall,
            temperature: row.temperature,
            index_value: row.index_value,
        });
    }
    Ok(rows)
}

fn print_models(pipeline: &PricePipeline) {
    for commodity in Commodity::ALL {
        match pipeline.registry().resolve(commodity) {
            Ok(entry) => match &entry.report {
                Some(report) => println!(
                    "{commodity}: trained {} (R² {:.4}, RMSE {:.4})",
                    entry.trained_at, report.r2, report.rmse
                ),
                None => println!("{commodity}: trained {}", entry.trained_at),
            },
            Err(_) => println!("{commodity}: no model loaded"),
        }
    }
}
