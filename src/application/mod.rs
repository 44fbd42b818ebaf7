// Pipeline wiring and startup model seeding
pub mod bootstrap;

// Request validation and feature vector construction
pub mod features;

// Estimator capability, scaler, forest wrapper, trainer
pub mod ml;

// The two public entry points: predict and retrain
pub mod pipeline;
