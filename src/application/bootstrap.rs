//! Startup wiring: load blobs, build the registry, construct the pipeline.
//!
//! When the model directory holds no blobs at all, synthetic seed models are
//! fitted and persisted so the serving path works out of the box. Seed
//! models are for trying the application, not for real price advice, and
//! startup says so loudly.

use crate::application::features::FeatureBuilder;
use crate::application::ml::scaler::FeatureScaler;
use crate::application::pipeline::PricePipeline;
use crate::config::{ModelStoreEnvConfig, ValidationEnvConfig};
use crate::domain::commodity::Commodity;
use crate::domain::ml::feature_schema::{FEATURE_COUNT, defaults_for, feature_row};
use crate::domain::types::DatasetRow;
use crate::infrastructure::persistence::model_store::ModelStore;
use crate::infrastructure::registry::ModelRegistry;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{info, warn};

const SEED_ROWS_PER_COMMODITY: usize = 120;
const SEED_RNG_SEED: u64 = 42;

/// Builds the serving pipeline from configuration.
pub fn build_pipeline(
    validation: &ValidationEnvConfig,
    store_cfg: &ModelStoreEnvConfig,
) -> Result<PricePipeline> {
    let store = ModelStore::new(store_cfg.model_dir.clone());
    let loaded = store.load_all();

    if loaded.is_empty() {
        warn!(
            "No model blobs found under {:?}; seeding synthetic models",
            store_cfg.model_dir
        );
        return seed_pipeline(validation, store);
    }

    let preprocessor = store.load_preprocessor().unwrap_or_else(|| {
        warn!("No preprocessor blob; serving raw feature values");
        FeatureScaler::identity(FEATURE_COUNT)
    });

    let registry = Arc::new(ModelRegistry::new(preprocessor));
    for stored in loaded {
        registry.replace(
            stored.commodity,
            Arc::new(stored.estimator),
            stored.trained_at,
            stored.report,
        );
    }
    info!("Serving {} commodity models", registry.loaded().len());

    Ok(PricePipeline::new(FeatureBuilder::new(validation), registry).with_store(store))
}

fn seed_pipeline(validation: &ValidationEnvConfig, store: ModelStore) -> Result<PricePipeline> {
    let mut rng = StdRng::seed_from_u64(SEED_RNG_SEED);
    let datasets: Vec<(Commodity, Vec<DatasetRow>)> = Commodity::ALL
        .into_iter()
        .map(|commodity| (commodity, synthetic_rows(commodity, &mut rng)))
        .collect();

    let feature_rows: Vec<Vec<f64>> = datasets
        .iter()
        .flat_map(|(commodity, rows)| {
            rows.iter().map(|row| {
                feature_row(*commodity, row.month, row.year, Some(row.rainfall), row.temperature)
                    .as_slice()
                    .to_vec()
            })
        })
        .collect();
    let preprocessor =
        FeatureScaler::fit(&feature_rows).context("seed dataset produced no feature rows")?;
    store.save_preprocessor(&preprocessor)?;

    let registry = Arc::new(ModelRegistry::new(preprocessor));
    let pipeline = PricePipeline::new(FeatureBuilder::new(validation), registry).with_store(store);
    for (commodity, rows) in &datasets {
        pipeline
            .retrain_commodity(*commodity, rows)
            .with_context(|| format!("seeding {commodity} model"))?;
    }
    Ok(pipeline)
}

/// Five years of monthly rows with a mild seasonal cycle around the
/// commodity's historical averages.
fn synthetic_rows(commodity: Commodity, rng: &mut StdRng) -> Vec<DatasetRow> {
    let defaults = defaults_for(commodity);
    (0..SEED_ROWS_PER_COMMODITY)
        .map(|i| {
            let month = (i % 12) as u32 + 1;
            let seasonal = (f64::from(month) / 12.0 * std::f64::consts::TAU).sin();
            let rainfall = (defaults.rainfall_mm * (1.0 + 0.4 * seasonal)
                + rng.random_range(-15.0..15.0))
            .max(0.0);
            let temperature =
                defaults.temperature_c + 4.0 * seasonal + rng.random_range(-1.5..1.5);
            let index_value =
                118.0 + 10.0 * seasonal + 0.04 * rainfall + rng.random_range(-6.0..6.0);
            DatasetRow {
                month,
                year: 2014 + (i / 12) as i32,
                rainfall,
                temperature: Some(temperature),
                index_value,
            }
        })
        .collect()
}
