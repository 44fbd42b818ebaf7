//! Durable store for trained model blobs.
//!
//! One JSON file per commodity plus one shared preprocessor file, all under
//! a configured directory. Blobs are opaque to everything outside this
//! module; missing or unreadable files are logged and skipped so one bad
//! blob never takes down the rest of the serving path.

use crate::application::ml::random_forest::ForestEstimator;
use crate::application::ml::scaler::FeatureScaler;
use crate::application::ml::trainer::TrainingReport;
use crate::domain::commodity::Commodity;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk form of one commodity's model, blob and metadata together.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredModel {
    pub commodity: Commodity,
    pub trained_at: DateTime<Utc>,
    pub report: Option<TrainingReport>,
    pub estimator: ForestEstimator,
}

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn model_path(&self, commodity: Commodity) -> PathBuf {
        self.dir.join(format!("{}_model.json", commodity.file_stem()))
    }

    fn preprocessor_path(&self) -> PathBuf {
        self.dir.join("preprocessor.json")
    }

    /// Loads the shared preprocessor, or `None` if it is absent or
    /// unreadable. The caller decides the fallback.
    pub fn load_preprocessor(&self) -> Option<FeatureScaler> {
        let path = self.preprocessor_path();
        match read_json::<FeatureScaler>(&path) {
            Ok(Some(scaler)) => {
                info!("Loaded preprocessor from {:?}", path);
                Some(scaler)
            }
            Ok(None) => {
                warn!("Preprocessor not found at {:?}", path);
                None
            }
            Err(e) => {
                warn!("Could not load preprocessor from {:?}: {e}", path);
                None
            }
        }
    }

    pub fn save_preprocessor(&self, scaler: &FeatureScaler) -> Result<()> {
        write_json(&self.preprocessor_path(), scaler)
    }

    /// Loads one commodity's model, or `None` if its blob is absent or
    /// unreadable.
    pub fn load(&self, commodity: Commodity) -> Option<StoredModel> {
        let path = self.model_path(commodity);
        match read_json::<StoredModel>(&path) {
            Ok(Some(stored)) => {
                info!("Loaded {commodity} model from {:?}", path);
                Some(stored)
            }
            Ok(None) => {
                warn!("Model not found: {:?}", path);
                None
            }
            Err(e) => {
                warn!("Could not load {commodity} model from {:?}: {e}", path);
                None
            }
        }
    }

    /// Loads every commodity model present on disk.
    pub fn load_all(&self) -> Vec<StoredModel> {
        Commodity::ALL
            .into_iter()
            .filter_map(|commodity| self.load(commodity))
            .collect()
    }

    pub fn save(&self, stored: &StoredModel) -> Result<()> {
        write_json(&self.model_path(stored.commodity), stored)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
    let value =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {path:?}"))?;
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("creating {path:?}"))?;
    serde_json::to_writer(BufWriter::new(file), value)
        .with_context(|| format!("writing {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::estimator::PriceEstimator;
    use crate::application::ml::trainer;
    use crate::domain::types::DatasetRow;

    fn rows() -> Vec<DatasetRow> {
        (0..30)
            .map(|i| DatasetRow {
                month: (i % 12) as u32 + 1,
                year: 2018 + (i / 12) as i32,
                rainfall: 40.0 + (i % 6) as f64 * 20.0,
                temperature: None,
                index_value: 100.0 + (i % 9) as f64 * 3.0,
            })
            .collect()
    }

    #[test]
    fn test_model_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());

        let scaler = FeatureScaler::identity(4);
        let (estimator, report) = trainer::fit(Commodity::Jowar, &rows(), &scaler).unwrap();
        let probe = [6.0, 2020.0, 80.0, 27.0];
        let expected = estimator.predict_index(&probe).unwrap();

        let stored = StoredModel {
            commodity: Commodity::Jowar,
            trained_at: Utc::now(),
            report: Some(report),
            estimator,
        };
        store.save(&stored).unwrap();

        let loaded = store.load(Commodity::Jowar).unwrap();
        assert_eq!(loaded.commodity, Commodity::Jowar);
        assert_eq!(loaded.estimator.predict_index(&probe).unwrap(), expected);
        assert_eq!(loaded.report, stored.report);
    }

    #[test]
    fn test_missing_blob_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(store.load(Commodity::Sugarcane).is_none());
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_preprocessor_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(store.load_preprocessor().is_none());

        let scaler = FeatureScaler::fit(&[vec![1.0, 2.0], vec![3.0, 8.0]]).unwrap();
        store.save_preprocessor(&scaler).unwrap();
        assert_eq!(store.load_preprocessor().unwrap(), scaler);
    }
}
