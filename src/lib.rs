//! Yaw bias estimation
//!
//! A motion-gated recursive estimator for the slowly varying offset between
//! a directly measured heading (NDT, GNSS/INS) and the heading implied by
//! consecutive positions. Observations are only fused while the vehicle
//! drives straight at speed, and are merged with a scalar variance-weighted
//! filter whose (estimate, variance, time) triple feeds a downstream EKF.

pub mod angle;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod gate;
pub mod observation;
pub mod params;
pub mod sample;
pub mod sim;

// Re-export main types
pub use angle::{heading_from_quaternion, wrap_half_pi};
pub use error::YawBiasError;
pub use estimator::{EstimatorPhase, UpdateCounters, UpdateOutcome, YawBiasEstimator};
pub use filter::{FilterState, FusionStatus, ScalarFilter, Simple1DFilter};
pub use gate::{GateDecision, MotionGate};
pub use observation::BiasObservation;
pub use params::{GateLimits, YawBiasParams};
pub use sample::{PoseSample, TwistSample};
