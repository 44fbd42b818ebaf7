use crate::domain::commodity::Commodity;
use serde::{Deserialize, Serialize};

/// Ordered list of feature names.
/// This order MUST match exactly the order the preprocessor and every
/// commodity model were fitted on. Any change here is a breaking change
/// for all stored model blobs.
pub const FEATURE_NAMES: &[&str] = &["month", "year", "rainfall", "temperature"];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Historical averages substituted for missing optional inputs.
///
/// Zero-filling a missing rainfall or temperature would hand the estimator
/// an out-of-distribution point, so each commodity carries growing-season
/// averages instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommodityDefaults {
    pub rainfall_mm: f64,
    pub temperature_c: f64,
}

pub fn defaults_for(commodity: Commodity) -> CommodityDefaults {
    match commodity {
        Commodity::Jowar => CommodityDefaults {
            rainfall_mm: 82.5,
            temperature_c: 27.0,
        },
        Commodity::Wheat => CommodityDefaults {
            rainfall_mm: 48.0,
            temperature_c: 22.5,
        },
        Commodity::Cotton => CommodityDefaults {
            rainfall_mm: 118.0,
            temperature_c: 28.5,
        },
        Commodity::Sugarcane => CommodityDefaults {
            rainfall_mm: 135.0,
            temperature_c: 26.0,
        },
        Commodity::Bajra => CommodityDefaults {
            rainfall_mm: 96.0,
            temperature_c: 29.0,
        },
    }
}

/// The ordered numeric input row handed to the preprocessor.
///
/// Always `FEATURE_COUNT` values in `FEATURE_NAMES` order; constructed only
/// through [`feature_row`] so the ordering cannot drift between call sites.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds the feature row for already-validated inputs, filling missing
/// rainfall/temperature with the commodity's historical defaults.
pub fn feature_row(
    commodity: Commodity,
    month: u32,
    year: i32,
    rainfall: Option<f64>,
    temperature: Option<f64>,
) -> FeatureVector {
    let defaults = defaults_for(commodity);
    FeatureVector(vec![
        f64::from(month),
        f64::from(year),
        rainfall.unwrap_or(defaults.rainfall_mm),
        temperature.unwrap_or(defaults.temperature_c),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_row_length_matches_schema() {
        let row = feature_row(Commodity::Wheat, 10, 2025, Some(150.0), Some(24.0));
        assert_eq!(row.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_ordering() {
        let row = feature_row(Commodity::Wheat, 10, 2025, Some(150.0), Some(24.0));
        assert_eq!(row.as_slice(), &[10.0, 2025.0, 150.0, 24.0]);
    }

    #[test]
    fn test_missing_optionals_use_commodity_defaults() {
        let row = feature_row(Commodity::Cotton, 6, 2024, None, None);
        let defaults = defaults_for(Commodity::Cotton);
        assert_eq!(row.as_slice()[2], defaults.rainfall_mm);
        assert_eq!(row.as_slice()[3], defaults.temperature_c);
        // Defaults are historical averages, never zero.
        assert!(defaults.rainfall_mm > 0.0);
    }

    #[test]
    fn test_defaults_differ_per_commodity() {
        assert_ne!(
            defaults_for(Commodity::Wheat),
            defaults_for(Commodity::Sugarcane)
        );
    }
}
