pub mod feature_schema;
