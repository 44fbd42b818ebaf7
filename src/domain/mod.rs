// Commodity identifiers
pub mod commodity;

// Domain-specific error types
pub mod errors;

// Feature schema shared by training and serving
pub mod ml;

// Index-to-rupee price derivation
pub mod pricing;

// Request/result value types
pub mod types;
