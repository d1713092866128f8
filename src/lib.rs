pub mod api;
pub mod classifier;
pub mod config;
pub mod detection;
pub mod observability;
pub mod storage;
