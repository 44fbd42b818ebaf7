pub mod estimator;
pub mod random_forest;
pub mod scaler;
pub mod trainer;
