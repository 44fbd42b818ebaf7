//! Commodity-keyed registry of trained estimators.
//!
//! Entries are immutable values behind `Arc`: a reader either sees the old
//! entry or the new one in full, never a torn mix. Each commodity has its
//! own slot and lock, so replacing one commodity's model never blocks or
//! disturbs reads of another.

use crate::application::ml::estimator::PriceEstimator;
use crate::application::ml::scaler::FeatureScaler;
use crate::application::ml::trainer::TrainingReport;
use crate::domain::commodity::Commodity;
use crate::domain::errors::PredictionError;
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// One commodity's currently active model. Replaced wholesale on retrain,
/// never mutated in place.
pub struct ModelEntry {
    pub commodity: Commodity,
    pub estimator: Arc<dyn PriceEstimator>,
    pub trained_at: DateTime<Utc>,
    pub report: Option<TrainingReport>,
}

impl std::fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEntry")
            .field("commodity", &self.commodity)
            .field("estimator", &self.estimator.family())
            .field("trained_at", &self.trained_at)
            .field("report", &self.report)
            .finish()
    }
}

type Slot = RwLock<Option<Arc<ModelEntry>>>;

pub struct ModelRegistry {
    preprocessor: FeatureScaler,
    slots: [Slot; Commodity::ALL.len()],
}

fn slot_index(commodity: Commodity) -> usize {
    match commodity {
        Commodity::Jowar => 0,
        Commodity::Wheat => 1,
        Commodity::Cotton => 2,
        Commodity::Sugarcane => 3,
        Commodity::Bajra => 4,
    }
}

impl ModelRegistry {
    pub fn new(preprocessor: FeatureScaler) -> Self {
        Self {
            preprocessor,
            slots: std::array::from_fn(|_| RwLock::new(None)),
        }
    }

    /// The shared feature preprocessor every model was fitted against.
    pub fn preprocessor(&self) -> &FeatureScaler {
        &self.preprocessor
    }

    fn slot(&self, commodity: Commodity) -> &Slot {
        &self.slots[slot_index(commodity)]
    }

    /// Looks up the current entry for a commodity. A commodity whose model
    /// was never loaded fails here rather than defaulting.
    pub fn resolve(&self, commodity: Commodity) -> Result<Arc<ModelEntry>, PredictionError> {
        self.slot(commodity)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| PredictionError::UnknownCommodity {
                name: commodity.to_string(),
            })
    }

    /// Atomically swaps in a new entry for one commodity and returns it.
    pub fn replace(
        &self,
        commodity: Commodity,
        estimator: Arc<dyn PriceEstimator>,
        trained_at: DateTime<Utc>,
        report: Option<TrainingReport>,
    ) -> Arc<ModelEntry> {
        let entry = Arc::new(ModelEntry {
            commodity,
            estimator,
            trained_at,
            report,
        });
        *self
            .slot(commodity)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(entry.clone());
        info!(commodity = %commodity, trained_at = %trained_at, "Registry entry replaced");
        entry
    }

    pub fn is_loaded(&self, commodity: Commodity) -> bool {
        self.slot(commodity)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Commodities with a loaded model, in declaration order.
    pub fn loaded(&self) -> Vec<Commodity> {
        Commodity::ALL
            .into_iter()
            .filter(|&c| self.is_loaded(c))
            .collect()
    }
}
