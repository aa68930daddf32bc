pub mod api;
pub mod cache;
pub mod config;
pub mod metrics;
pub mod models;
pub mod source;
