//! Motion gate
//!
//! A heading inferred from displacement is only meaningful while the
//! vehicle drives straight at a reasonable speed between two poses that are
//! neither too close nor too far apart.

use crate::params::GateLimits;

/// Outcome of a gate evaluation, naming the first failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Admitted,
    /// Speed at or below `speed_lower_limit`
    TooSlow,
    /// Yaw rate above `rotation_speed_upper_limit`
    Turning,
    /// Displacement at or above `distance_upper_limit`
    TooFar,
    /// Displacement at or below `distance_lower_limit`
    TooClose,
}

impl GateDecision {
    pub fn is_admitted(self) -> bool {
        self == GateDecision::Admitted
    }
}

/// Stateless admissibility predicate over kinematic signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionGate {
    limits: GateLimits,
}

impl MotionGate {
    pub fn new(limits: GateLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &GateLimits {
        &self.limits
    }

    /// Evaluate all checks. Boundary values are rejected.
    pub fn evaluate(&self, speed: f64, angular_speed: f64, displacement: f64) -> GateDecision {
        let limits = &self.limits;
        if speed.abs() <= limits.speed_lower_limit {
            GateDecision::TooSlow
        } else if angular_speed.abs() > limits.rotation_speed_upper_limit {
            GateDecision::Turning
        } else if displacement >= limits.distance_upper_limit {
            GateDecision::TooFar
        } else if displacement <= limits.distance_lower_limit {
            GateDecision::TooClose
        } else {
            GateDecision::Admitted
        }
    }

    pub fn admit(&self, speed: f64, angular_speed: f64, displacement: f64) -> bool {
        self.evaluate(speed, angular_speed, displacement).is_admitted()
    }
}

impl Default for MotionGate {
    fn default() -> Self {
        Self::new(GateLimits::default())
    }
}
