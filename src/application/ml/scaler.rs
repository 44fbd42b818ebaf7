use crate::domain::errors::PredictionError;
use serde::{Deserialize, Serialize};

/// Column-wise standardizing preprocessor shared by every commodity model.
///
/// Fitted once at training time and serialized next to the model blobs;
/// serving must apply the exact same affine transform the models were
/// fitted on, so the fitted means and deviations travel with the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl FeatureScaler {
    /// Pass-through scaler for the given column count. Used when no fitted
    /// preprocessor blob exists on disk.
    pub fn identity(columns: usize) -> Self {
        Self {
            means: vec![0.0; columns],
            std_devs: vec![1.0; columns],
        }
    }

    /// Fits per-column mean and standard deviation over the given rows.
    /// Constant columns get a unit deviation so they pass through centred.
    pub fn fit(rows: &[Vec<f64>]) -> Option<Self> {
        let first = rows.first()?;
        let columns = first.len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; columns];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value / n;
            }
        }

        let mut std_devs = vec![0.0; columns];
        for row in rows {
            for (col, value) in row.iter().enumerate() {
                let delta = value - means[col];
                std_devs[col] += delta * delta / n;
            }
        }
        for dev in &mut std_devs {
            *dev = dev.sqrt();
            if *dev < 1e-12 {
                *dev = 1.0;
            }
        }

        Some(Self { means, std_devs })
    }

    pub fn columns(&self) -> usize {
        self.means.len()
    }

    /// Applies the fitted transform to one feature row. A row of the wrong
    /// width is schema drift and is surfaced, never truncated or padded.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if row.len() != self.columns() {
            return Err(PredictionError::InferenceError {
                reason: format!(
                    "feature row has {} values, preprocessor was fitted on {}",
                    row.len(),
                    self.columns()
                ),
            });
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(value, (mean, dev))| (value - mean) / dev)
            .collect())
    }
}
