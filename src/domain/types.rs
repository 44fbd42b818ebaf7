use crate::domain::commodity::Commodity;
use serde::{Deserialize, Serialize};

/// A single price-prediction request as received from the caller.
///
/// `rainfall` (mm) and `temperature` (°C) are optional; missing values are
/// substituted with per-commodity historical averages during feature
/// building, never with zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub commodity: Commodity,
    pub month: u32,
    pub year: i32,
    pub rainfall: Option<f64>,
    pub temperature: Option<f64>,
}

/// The outcome of one prediction. Prices are in ₹ per quintal.
///
/// `raw_index` is the wholesale-price-index value the estimator produced;
/// the price fields are derived from it by the pricing anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub commodity: Commodity,
    pub raw_index: f64,
    pub price: f64,
    pub price_min: f64,
    pub price_max: f64,
}

/// One historical observation in an uploaded retraining dataset.
///
/// The caller is responsible for parsing whatever file format the upload
/// arrived in; the core only ever sees these rows. `temperature` is optional
/// for compatibility with older datasets that predate the temperature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub month: u32,
    pub year: i32,
    pub rainfall: f64,
    pub temperature: Option<f64>,
    pub index_value: f64,
}
