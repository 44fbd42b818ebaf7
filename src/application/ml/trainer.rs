//! Refits a commodity's estimator from an uploaded historical dataset.
//!
//! Training is all-or-nothing: any failure here propagates as a
//! [`RetrainError`] and the caller leaves the previous model active.

use crate::application::ml::estimator::PriceEstimator;
use crate::application::ml::random_forest::ForestEstimator;
use crate::application::ml::scaler::FeatureScaler;
use crate::domain::commodity::Commodity;
use crate::domain::errors::RetrainError;
use crate::domain::ml::feature_schema::feature_row;
use crate::domain::types::DatasetRow;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

/// A forest cannot be meaningfully fit on fewer rows than this.
pub const MIN_TRAINING_ROWS: usize = 10;

/// Seed for the holdout shuffle and the forest's bootstrap sampling, so a
/// retrain on identical data yields an identical model.
const TRAINING_SEED: u64 = 42;

/// Holdout evaluation of a freshly fitted estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub holdout_samples: usize,
    pub r2: f64,
    pub rmse: f64,
}

/// Hyperparameter family shared by every commodity model. A retrain always
/// produces the same family as the model it replaces.
fn forest_parameters() -> RandomForestRegressorParameters {
    RandomForestRegressorParameters::default()
        .with_n_trees(100)
        .with_max_depth(15)
        .with_min_samples_split(5)
        .with_min_samples_leaf(2)
        .with_seed(TRAINING_SEED)
}

/// Fits a new estimator for `commodity` from the full provided dataset,
/// evaluating it on a 20% holdout first. The shared preprocessor is applied
/// to every row, keeping training and serving on one schema.
pub fn fit(
    commodity: Commodity,
    rows: &[DatasetRow],
    preprocessor: &FeatureScaler,
) -> Result<(ForestEstimator, TrainingReport), RetrainError> {
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(RetrainError::InsufficientData {
            rows: rows.len(),
            minimum: MIN_TRAINING_ROWS,
        });
    }

    let mut features = Vec::with_capacity(rows.len());
    let mut targets = Vec::with_capacity(rows.len());
    for row in rows {
        let raw = feature_row(
            commodity,
            row.month,
            row.year,
            Some(row.rainfall),
            row.temperature,
        );
        let transformed =
            preprocessor
                .transform(raw.as_slice())
                .map_err(|e| RetrainError::FitFailure {
                    reason: e.to_string(),
                })?;
        features.push(transformed);
        targets.push(row.index_value);
    }

    // Seeded shuffle, then hold out 20% for the report.
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(TRAINING_SEED);
    indices.shuffle(&mut rng);
    let holdout_len = (rows.len() / 5).max(1);
    let (holdout_idx, train_idx) = indices.split_at(holdout_len);

    let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| features[i].clone()).collect();
    let train_y: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
    let eval_forest = fit_forest(&train_x, &train_y)?;

    let mut residual_sq = 0.0;
    for &i in holdout_idx {
        let p = eval_forest
            .predict_index(&features[i])
            .map_err(|e| RetrainError::FitFailure {
                reason: format!("holdout evaluation failed: {e}"),
            })?;
        residual_sq += (targets[i] - p) * (targets[i] - p);
    }
    let holdout_y: Vec<f64> = holdout_idx.iter().map(|&i| targets[i]).collect();
    let rmse = (residual_sq / holdout_len as f64).sqrt();
    let r2 = r_squared(&holdout_y, residual_sq);

    // The served model is refit on the full dataset in one batch.
    let forest = fit_forest(&features, &targets)?;

    let report = TrainingReport {
        samples: rows.len(),
        holdout_samples: holdout_len,
        r2,
        rmse,
    };
    info!(
        commodity = %commodity,
        samples = report.samples,
        r2 = report.r2,
        rmse = report.rmse,
        "Fitted new random forest"
    );
    Ok((forest, report))
}

fn fit_forest(x: &[Vec<f64>], y: &[f64]) -> Result<ForestEstimator, RetrainError> {
    let matrix =
        DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| RetrainError::FitFailure {
            reason: format!("matrix creation failed: {e}"),
        })?;
    let forest = RandomForestRegressor::fit(&matrix, &y.to_vec(), forest_parameters()).map_err(
        |e| RetrainError::FitFailure {
            reason: format!("forest fit failed: {e}"),
        },
    )?;
    Ok(ForestEstimator::new(forest))
}

fn r_squared(actual: &[f64], residual_sq: f64) -> f64 {
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let total_sq: f64 = actual.iter().map(|y| (y - mean) * (y - mean)).sum();
    if total_sq < 1e-12 {
        return 0.0;
    }
    1.0 - residual_sq / total_sq
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_rows(n: usize) -> Vec<DatasetRow> {
        (0..n)
            .map(|i| DatasetRow {
                month: (i % 12) as u32 + 1,
                year: 2015 + (i / 12) as i32,
                rainfall: 60.0 + (i % 7) as f64 * 15.0,
                temperature: Some(22.0 + (i % 5) as f64),
                index_value: 110.0 + (i % 12) as f64 * 2.5,
            })
            .collect()
    }

    #[test]
    fn test_too_few_rows_is_insufficient_data() {
        let rows = synthetic_rows(3);
        let scaler = FeatureScaler::identity(4);
        let err = fit(Commodity::Cotton, &rows, &scaler).unwrap_err();
        assert!(matches!(
            err,
            RetrainError::InsufficientData {
                rows: 3,
                minimum: MIN_TRAINING_ROWS
            }
        ));
    }

    #[test]
    fn test_fit_produces_usable_estimator_and_report() {
        let rows = synthetic_rows(60);
        let feature_rows: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| {
                feature_row(Commodity::Wheat, r.month, r.year, Some(r.rainfall), r.temperature)
                    .as_slice()
                    .to_vec()
            })
            .collect();
        let scaler = FeatureScaler::fit(&feature_rows).unwrap();

        let (estimator, report) = fit(Commodity::Wheat, &rows, &scaler).unwrap();
        assert_eq!(report.samples, 60);
        assert_eq!(report.holdout_samples, 12);
        assert!(report.rmse >= 0.0);

        let row = feature_row(Commodity::Wheat, 6, 2020, Some(90.0), Some(24.0));
        let transformed = scaler.transform(row.as_slice()).unwrap();
        let index = estimator.predict_index(&transformed).unwrap();
        assert!(index.is_finite());
    }

    #[test]
    fn test_fit_is_deterministic_for_identical_data() {
        let rows = synthetic_rows(40);
        let scaler = FeatureScaler::identity(4);
        let (first, _) = fit(Commodity::Bajra, &rows, &scaler).unwrap();
        let (second, _) = fit(Commodity::Bajra, &rows, &scaler).unwrap();

        let probe = feature_row(Commodity::Bajra, 3, 2021, Some(80.0), None);
        assert_eq!(
            first.predict_index(probe.as_slice()).unwrap(),
            second.predict_index(probe.as_slice()).unwrap()
        );
    }
}
