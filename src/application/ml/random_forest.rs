use crate::application::ml::estimator::PriceEstimator;
use crate::domain::errors::PredictionError;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;

/// A fitted random-forest regressor over preprocessed feature rows.
///
/// This is the only concrete estimator family; blobs on disk are JSON
/// serializations of this struct.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestEstimator {
    forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl ForestEstimator {
    pub fn new(forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>) -> Self {
        Self { forest }
    }
}

impl PriceEstimator for ForestEstimator {
    fn predict_index(&self, features: &[f64]) -> Result<f64, PredictionError> {
        let matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()]).map_err(|e| {
            PredictionError::InferenceError {
                reason: format!("matrix creation failed: {e}"),
            }
        })?;

        let predictions =
            self.forest
                .predict(&matrix)
                .map_err(|e| PredictionError::InferenceError {
                    reason: format!("forest predict failed: {e}"),
                })?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| PredictionError::InferenceError {
                reason: "forest returned no prediction".to_string(),
            })
    }

    fn family(&self) -> &'static str {
        "random-forest"
    }
}
