use thiserror::Error;

/// A commodity name outside the supported set was supplied at a string
/// boundary (CLI argument, uploaded dataset, stored blob).
#[derive(Debug, Clone, Error)]
#[error("Unknown commodity '{name}' (supported: Jowar, Wheat, Cotton, Sugarcane, Bajra)")]
pub struct UnknownCommodityError {
    pub name: String,
}

/// Errors surfaced by the prediction path.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Unknown commodity '{name}': no trained model available")]
    UnknownCommodity { name: String },

    #[error("Inference failed: {reason}")]
    InferenceError { reason: String },
}

/// Errors surfaced by the retraining path. A retrain that fails with any of
/// these leaves the previously active model untouched.
#[derive(Debug, Error)]
pub enum RetrainError {
    #[error("Unknown commodity '{name}': not in the supported set")]
    UnknownCommodity { name: String },

    #[error("Insufficient data: got {rows} rows, need at least {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("Model fitting failed: {reason}")]
    FitFailure { reason: String },
}

impl From<UnknownCommodityError> for PredictionError {
    fn from(err: UnknownCommodityError) -> Self {
        PredictionError::UnknownCommodity { name: err.name }
    }
}

impl From<UnknownCommodityError> for RetrainError {
    fn from(err: UnknownCommodityError) -> Self {
        RetrainError::UnknownCommodity { name: err.name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_formatting() {
        let err = PredictionError::InvalidInput {
            field: "month",
            reason: "13 is outside 1..=12".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("month"));
        assert!(msg.contains("13"));
    }

    #[test]
    fn test_insufficient_data_formatting() {
        let err = RetrainError::InsufficientData {
            rows: 3,
            minimum: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("10"));
    }
}
