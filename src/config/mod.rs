//! Configuration module for Cropcast.
//!
//! Structured configuration loading from environment variables, split by
//! concern: request validation bounds and the model store location.

use std::env;
use std::path::PathBuf;

/// Bounds applied by the feature builder before any inference runs.
#[derive(Debug, Clone)]
pub struct ValidationEnvConfig {
    /// Earliest year accepted in a prediction request.
    pub min_year: i32,
    /// Latest accepted year is the current year plus this many years.
    pub max_years_ahead: i32,
    /// Upper bound on rainfall input, in millimetres.
    pub max_rainfall_mm: f64,
}

impl Default for ValidationEnvConfig {
    fn default() -> Self {
        Self {
            min_year: 2000,
            max_years_ahead: 10,
            max_rainfall_mm: 5000.0,
        }
    }
}

impl ValidationEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_year: env::var("CROPCAST_MIN_YEAR")
                .ok()
                .and_then(|v| v.parse::<i32>().ok())
                .unwrap_or(defaults.min_year),
            max_years_ahead: env::var("CROPCAST_MAX_YEARS_AHEAD")
                .ok()
                .and_then(|v| v.parse::<i32>().ok())
                .unwrap_or(defaults.max_years_ahead),
            max_rainfall_mm: env::var("CROPCAST_MAX_RAINFALL_MM")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(defaults.max_rainfall_mm),
        }
    }
}

/// Location of the serialized model blobs.
#[derive(Debug, Clone)]
pub struct ModelStoreEnvConfig {
    pub model_dir: PathBuf,
}

impl Default for ModelStoreEnvConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
        }
    }
}

impl ModelStoreEnvConfig {
    pub fn from_env() -> Self {
        Self {
            model_dir: env::var("CROPCAST_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Self::default().model_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_config_defaults() {
        let config = ValidationEnvConfig::default();
        assert_eq!(config.min_year, 2000);
        assert_eq!(config.max_years_ahead, 10);
        assert_eq!(config.max_rainfall_mm, 5000.0);
    }

    #[test]
    fn test_model_store_config_defaults() {
        let config = ModelStoreEnvConfig::default();
        assert_eq!(config.model_dir, PathBuf::from("model"));
    }
}
