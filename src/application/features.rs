use crate::config::ValidationEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_schema::{FeatureVector, feature_row};
use crate::domain::types::PredictionRequest;
use chrono::{Datelike, Utc};

/// Validates a prediction request and converts it into the feature vector
/// the estimators were fitted on.
///
/// All validation happens here, before any model lookup or inference; a
/// rejected request never reaches an estimator. The accepted year window is
/// resolved once at construction, so `build` is a pure function of the
/// request and this builder.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    min_year: i32,
    max_year: i32,
    max_rainfall_mm: f64,
}

impl FeatureBuilder {
    pub fn new(config: &ValidationEnvConfig) -> Self {
        Self {
            min_year: config.min_year,
            max_year: Utc::now().year() + config.max_years_ahead,
            max_rainfall_mm: config.max_rainfall_mm,
        }
    }

    pub fn build(&self, request: &PredictionRequest) -> Result<FeatureVector, PredictionError> {
        if !(1..=12).contains(&request.month) {
            return Err(PredictionError::InvalidInput {
                field: "month",
                reason: format!("{} is outside 1..=12", request.month),
            });
        }
        if request.year < self.min_year || request.year > self.max_year {
            return Err(PredictionError::InvalidInput {
                field: "year",
                reason: format!(
                    "{} is outside {}..={}",
                    request.year, self.min_year, self.max_year
                ),
            });
        }
        if let Some(rainfall) = request.rainfall {
            if !(0.0..=self.max_rainfall_mm).contains(&rainfall) {
                return Err(PredictionError::InvalidInput {
                    field: "rainfall",
                    reason: format!("{rainfall} mm is outside 0..={} mm", self.max_rainfall_mm),
                });
            }
        }

        Ok(feature_row(
            request.commodity,
            request.month,
            request.year,
            request.rainfall,
            request.temperature,
        ))
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(&ValidationEnvConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commodity::Commodity;

    fn request() -> PredictionRequest {
        PredictionRequest {
            commodity: Commodity::Wheat,
            month: 10,
            year: 2025,
            rainfall: Some(150.0),
            temperature: None,
        }
    }

    #[test]
    fn test_valid_request_builds_full_row() {
        let builder = FeatureBuilder::default();
        let features = builder.build(&request()).unwrap();
        assert_eq!(features.as_slice()[0], 10.0);
        assert_eq!(features.as_slice()[1], 2025.0);
        assert_eq!(features.as_slice()[2], 150.0);
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        let builder = FeatureBuilder::default();
        for month in [0, 13, 99] {
            let err = builder
                .build(&PredictionRequest {
                    month,
                    ..request()
                })
                .unwrap_err();
            assert!(matches!(
                err,
                PredictionError::InvalidInput { field: "month", .. }
            ));
        }
    }

    #[test]
    fn test_year_outside_window_is_rejected() {
        let builder = FeatureBuilder::default();
        for year in [1987, 3000] {
            let err = builder
                .build(&PredictionRequest { year, ..request() })
                .unwrap_err();
            assert!(matches!(
                err,
                PredictionError::InvalidInput { field: "year", .. }
            ));
        }
    }

    #[test]
    fn test_rainfall_bounds() {
        let builder = FeatureBuilder::default();
        for rainfall in [-1.0, 5000.1, f64::NAN] {
            let err = builder
                .build(&PredictionRequest {
                    rainfall: Some(rainfall),
                    ..request()
                })
                .unwrap_err();
            assert!(matches!(
                err,
                PredictionError::InvalidInput {
                    field: "rainfall",
                    ..
                }
            ));
        }
        // The bounds themselves are accepted.
        assert!(
            builder
                .build(&PredictionRequest {
                    rainfall: Some(0.0),
                    ..request()
                })
                .is_ok()
        );
        assert!(
            builder
                .build(&PredictionRequest {
                    rainfall: Some(5000.0),
                    ..request()
                })
                .is_ok()
        );
    }
}
