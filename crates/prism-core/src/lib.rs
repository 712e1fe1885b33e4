pub mod config;
pub mod engine;
pub mod errors;
pub mod metrics_api;
pub mod model;
pub mod pricing;
pub mod providers;
pub mod report;
pub mod scoring;
pub mod templates;
pub mod variants;
