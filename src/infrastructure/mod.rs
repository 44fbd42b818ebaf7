// Model blob load/save
pub mod persistence;

// Commodity-keyed model registry
pub mod registry;
