//! Estimator parameters
//!
//! Gate thresholds, the prior and the observation noise. Set once at
//! construction; the estimator never mutates them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::YawBiasError;

/// Thresholds of the motion gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateLimits {
    /// Minimum forward speed for a usable heading [m/s]
    pub speed_lower_limit: f64,
    /// Maximum yaw rate while straight-line driving is assumed [rad/s]
    pub rotation_speed_upper_limit: f64,
    /// Maximum distance between consecutive poses [m]
    pub distance_upper_limit: f64,
    /// Minimum distance between consecutive poses [m]
    pub distance_lower_limit: f64,
}

impl GateLimits {
    pub fn new(
        speed_lower_limit: f64,
        rotation_speed_upper_limit: f64,
        distance_upper_limit: f64,
        distance_lower_limit: f64,
    ) -> Self {
        Self {
            speed_lower_limit,
            rotation_speed_upper_limit,
            distance_upper_limit,
            distance_lower_limit,
        }
    }

    pub fn validate(&self) -> Result<(), YawBiasError> {
        let values = [
            self.speed_lower_limit,
            self.rotation_speed_upper_limit,
            self.distance_upper_limit,
            self.distance_lower_limit,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(YawBiasError::InvalidConfig(
                "gate limits must be finite and non-negative".to_string(),
            ));
        }

        if self.distance_lower_limit >= self.distance_upper_limit {
            return Err(YawBiasError::InvalidConfig(
                "distance_lower_limit must be smaller than distance_upper_limit".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GateLimits {
    fn default() -> Self {
        Self {
            speed_lower_limit: 2.0,
            rotation_speed_upper_limit: 0.01,
            distance_upper_limit: 10.0,
            distance_lower_limit: 0.1,
        }
    }
}

/// Parameters for the yaw bias estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YawBiasParams {
    /// Motion gate thresholds
    pub gate: GateLimits,
    /// Prior bias estimate [rad]
    pub initial_estimate: f64,
    /// Prior variance [rad^2]
    pub initial_variance: f64,
    /// Variance assigned to each admitted observation [rad^2]
    pub observation_variance: f64,
    /// Random-walk variance rate of the bias [rad^2/s^2], 0 disables widening
    pub process_variance: f64,
}

impl YawBiasParams {
    /// Create new parameters with the default gate
    pub fn new(initial_estimate: f64, initial_variance: f64, observation_variance: f64) -> Self {
        Self {
            initial_estimate,
            initial_variance,
            observation_variance,
            ..Self::default()
        }
    }

    /// Replace the gate thresholds
    pub fn with_gate(mut self, gate: GateLimits) -> Self {
        self.gate = gate;
        self
    }

    /// Enable process-noise widening
    pub fn with_process_variance(mut self, process_variance: f64) -> Self {
        self.process_variance = process_variance;
        self
    }

    pub fn validate(&self) -> Result<(), YawBiasError> {
        self.gate.validate()?;

        if !self.initial_estimate.is_finite() {
            return Err(YawBiasError::InvalidConfig(
                "initial_estimate must be finite".to_string(),
            ));
        }

        if !self.initial_variance.is_finite() || self.initial_variance < 0.0 {
            return Err(YawBiasError::InvalidConfig(
                "initial_variance must be finite and non-negative".to_string(),
            ));
        }

        if !self.observation_variance.is_finite() || self.observation_variance <= 0.0 {
            return Err(YawBiasError::InvalidConfig(
                "observation_variance must be finite and greater than zero".to_string(),
            ));
        }

        if !self.process_variance.is_finite() || self.process_variance < 0.0 {
            return Err(YawBiasError::InvalidConfig(
                "process_variance must be finite and non-negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate parameters from TOML. Missing keys take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, YawBiasError> {
        let params: Self = toml::from_str(raw)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, YawBiasError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

impl Default for YawBiasParams {
    fn default() -> Self {
        Self {
            gate: GateLimits::default(),
            initial_estimate: 0.0,
            initial_variance: 1e9,
            observation_variance: 0.1,
            process_variance: 0.0,
        }
    }
}
