pub mod aggregator;
pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod format;
pub mod query;
pub mod sources;
