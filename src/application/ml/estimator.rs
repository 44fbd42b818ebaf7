use crate::domain::errors::PredictionError;

/// Capability interface for a trained price-index estimator.
///
/// The input row must already be preprocessed; implementations only run the
/// predict step and report the estimator family for logging.
pub trait PriceEstimator: Send + Sync {
    /// Predict the wholesale-price-index value for one preprocessed row.
    fn predict_index(&self, features: &[f64]) -> Result<f64, PredictionError>;

    /// Estimator family name (e.g. "random-forest").
    fn family(&self) -> &'static str;
}
