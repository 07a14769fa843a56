//! Error types
//!
//! Only configuration and construction can fail. Per-sample anomalies are
//! reported through [`crate::UpdateOutcome`] instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum YawBiasError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
