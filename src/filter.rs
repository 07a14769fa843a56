//! Scalar recursive filter
//!
//! Variance-weighted fusion of scalar observations into a running estimate.
//! With the prior variance `P` and observation variance `R`:
//!
//! ```text
//! K = P / (P + R)
//! x = x + K (z - x)
//! P = (1 - K) P
//! ```
//!
//! An optional process-noise rate `q` widens the variance by `q * dt^2`
//! before each fusion, `dt` being the time since the previous fusion. With
//! `q = 0` the variance never grows.

/// Snapshot of a scalar filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    /// Current estimate
    pub estimate: f64,
    /// Variance of the estimate, never negative
    pub variance: f64,
    /// Timestamp of the last fusion [s], `None` before the first one
    pub last_update_time: Option<f64>,
}

impl FilterState {
    pub fn new(estimate: f64, variance: f64) -> Self {
        Self {
            estimate,
            variance,
            last_update_time: None,
        }
    }

    /// Standard deviation of the estimate
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Result of a single fusion attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FusionStatus {
    /// Observation merged with the given gain
    Fused { gain: f64 },
    /// Prior and observation both carry zero variance; nothing to weigh
    Degenerate,
    /// Observation variance negative or non-finite
    InvalidVariance,
    /// Observation or timestamp non-finite
    InvalidObservation,
}

impl FusionStatus {
    pub fn is_fused(&self) -> bool {
        matches!(self, FusionStatus::Fused { .. })
    }
}

/// Scalar estimator that merges one observation at a time
pub trait ScalarFilter {
    /// Merge an observation. Rejected observations leave the state unchanged.
    fn update(&mut self, observation: f64, observation_variance: f64, timestamp: f64)
        -> FusionStatus;

    fn state(&self) -> FilterState;

    fn estimate(&self) -> f64 {
        self.state().estimate
    }

    fn variance(&self) -> f64 {
        self.state().variance
    }
}

/// One-dimensional Kalman-style filter with a constant-state model
#[derive(Debug, Clone, PartialEq)]
pub struct Simple1DFilter {
    state: FilterState,
    process_variance: f64,
}

impl Simple1DFilter {
    /// Create a filter from a prior
    pub fn new(initial_estimate: f64, initial_variance: f64) -> Self {
        Self {
            state: FilterState::new(initial_estimate, initial_variance.max(0.0)),
            process_variance: 0.0,
        }
    }

    /// Set the random-walk variance rate applied before each fusion
    pub fn with_process_variance(mut self, process_variance: f64) -> Self {
        self.process_variance = process_variance.max(0.0);
        self
    }

    pub fn process_variance(&self) -> f64 {
        self.process_variance
    }

    /// Restore a prior, forgetting the update history
    pub fn reset(&mut self, estimate: f64, variance: f64) {
        self.state = FilterState::new(estimate, variance.max(0.0));
    }

    fn predicted_variance(&self, timestamp: f64) -> f64 {
        match self.state.last_update_time {
            Some(last) if self.process_variance > 0.0 => {
                let dt = (timestamp - last).max(0.0);
                self.state.variance + self.process_variance * dt * dt
            }
            _ => self.state.variance,
        }
    }
}

impl Default for Simple1DFilter {
    fn default() -> Self {
        Self::new(0.0, 1e9)
    }
}

impl ScalarFilter for Simple1DFilter {
    fn update(
        &mut self,
        observation: f64,
        observation_variance: f64,
        timestamp: f64,
    ) -> FusionStatus {
        if !observation.is_finite() || !timestamp.is_finite() {
            return FusionStatus::InvalidObservation;
        }
        if !observation_variance.is_finite() || observation_variance < 0.0 {
            return FusionStatus::InvalidVariance;
        }

        let variance = self.predicted_variance(timestamp);
        let total = variance + observation_variance;
        if total <= 0.0 {
            return FusionStatus::Degenerate;
        }

        let gain = variance / total;
        self.state.estimate += gain * (observation - self.state.estimate);
        self.state.variance = ((1.0 - gain) * variance).max(0.0);
        self.state.last_update_time = Some(timestamp);

        FusionStatus::Fused { gain }
    }

    fn state(&self) -> FilterState {
        self.state
    }
}
