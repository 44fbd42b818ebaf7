//! The prediction and retraining entry points exposed to callers.

use crate::application::features::FeatureBuilder;
use crate::application::ml::trainer;
use crate::domain::commodity::Commodity;
use crate::domain::errors::{PredictionError, RetrainError};
use crate::domain::pricing::derive_price;
use crate::domain::types::{DatasetRow, PredictionRequest, PredictionResult};
use crate::infrastructure::persistence::model_store::{ModelStore, StoredModel};
use crate::infrastructure::registry::{ModelEntry, ModelRegistry};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Request pipeline: validation, feature building, model lookup, inference,
/// price derivation. Holds the registry explicitly rather than reaching for
/// ambient global state, so retraining's swap is straightforward to test.
pub struct PricePipeline {
    builder: FeatureBuilder,
    registry: Arc<ModelRegistry>,
    store: Option<ModelStore>,
}

impl PricePipeline {
    pub fn new(builder: FeatureBuilder, registry: Arc<ModelRegistry>) -> Self {
        Self {
            builder,
            registry,
            store: None,
        }
    }

    /// Attach a store so successful retrains are persisted.
    pub fn with_store(mut self, store: ModelStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Predicts a ₹/quintal price for the request.
    ///
    /// Validation failures are reported before any model lookup or
    /// inference. A non-finite estimator output is surfaced as an
    /// `InferenceError`; a wrong silent price is worse than a visible
    /// failure in this domain.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionError> {
        let features = self.builder.build(request)?;
        let entry = self.registry.resolve(request.commodity)?;
        let transformed = self
            .registry
            .preprocessor()
            .transform(features.as_slice())?;
        let raw_index = entry.estimator.predict_index(&transformed)?;
        if !raw_index.is_finite() {
            return Err(PredictionError::InferenceError {
                reason: format!("estimator produced non-finite index {raw_index}"),
            });
        }

        let result = derive_price(request.commodity, raw_index);
        debug!(
            commodity = %request.commodity,
            raw_index,
            price = result.price,
            "Prediction served"
        );
        Ok(result)
    }

    /// Refits the commodity's estimator from the uploaded rows and swaps it
    /// into the registry. All-or-nothing: on any failure, including a failed
    /// blob write, the previous entry stays active and on disk.
    pub fn retrain_commodity(
        &self,
        commodity: Commodity,
        rows: &[DatasetRow],
    ) -> Result<Arc<ModelEntry>, RetrainError> {
        let (estimator, report) = trainer::fit(commodity, rows, self.registry.preprocessor())?;

        let trained_at = Utc::now();
        let stored = StoredModel {
            commodity,
            trained_at,
            report: Some(report.clone()),
            estimator,
        };
        if let Some(store) = &self.store {
            store.save(&stored).map_err(|e| RetrainError::FitFailure {
                reason: format!("persisting model blob: {e}"),
            })?;
        }

        Ok(self
            .registry
            .replace(commodity, Arc::new(stored.estimator), trained_at, Some(report)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::scaler::FeatureScaler;

    fn empty_pipeline() -> PricePipeline {
        let registry = Arc::new(ModelRegistry::new(FeatureScaler::identity(4)));
        PricePipeline::new(FeatureBuilder::default(), registry)
    }

    #[test]
    fn test_validation_precedes_model_lookup() {
        // Month 13 on a registry with no models at all: the rejection must
        // come from validation, proving no lookup or inference was reached.
        let pipeline = empty_pipeline();
        let err = pipeline
            .predict(&PredictionRequest {
                commodity: Commodity::Wheat,
                month: 13,
                year: 2025,
                rainfall: Some(150.0),
                temperature: None,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            PredictionError::InvalidInput { field: "month", .. }
        ));
    }

    #[test]
    fn test_predict_without_loaded_model_is_unknown_commodity() {
        let pipeline = empty_pipeline();
        let err = pipeline
            .predict(&PredictionRequest {
                commodity: Commodity::Bajra,
                month: 6,
                year: 2025,
                rainfall: None,
                temperature: None,
            })
            .unwrap_err();
        assert!(matches!(err, PredictionError::UnknownCommodity { .. }));
    }
}
