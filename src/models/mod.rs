//! Data models and structures for the region ping service

pub mod config;
pub mod measurement;

// Re-export main model types
pub use config::Config;
pub use measurement::{Measurement, PingRecord};
