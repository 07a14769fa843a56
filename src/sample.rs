//! Input samples
//!
//! Minimal views of the pose and twist records produced by the upstream
//! localization source. Only the fields the estimator reads are kept.

use nalgebra::{UnitQuaternion, Vector2};

use crate::angle::heading_from_quaternion;

/// Timestamped planar pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    /// Position in the map frame [m]
    pub position: Vector2<f64>,
    /// Measured orientation
    pub orientation: UnitQuaternion<f64>,
    /// Monotonic timestamp [s]
    pub timestamp: f64,
}

impl PoseSample {
    /// Create a new pose sample
    pub fn new(position: Vector2<f64>, orientation: UnitQuaternion<f64>, timestamp: f64) -> Self {
        Self {
            position,
            orientation,
            timestamp,
        }
    }

    /// Create a pose sample from planar coordinates and a heading [rad]
    pub fn from_heading(x: f64, y: f64, heading: f64, timestamp: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, heading),
            timestamp,
        }
    }

    /// Directly measured heading [rad]
    pub fn heading(&self) -> f64 {
        heading_from_quaternion(&self.orientation)
    }

    /// True when every field is finite
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.orientation.coords.iter().all(|v| v.is_finite())
            && self.timestamp.is_finite()
    }
}

/// Instantaneous body velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwistSample {
    /// Speed along the forward axis [m/s]
    pub linear_speed: f64,
    /// Rate about the vertical axis [rad/s]
    pub angular_speed: f64,
}

impl TwistSample {
    pub fn new(linear_speed: f64, angular_speed: f64) -> Self {
        Self {
            linear_speed,
            angular_speed,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.linear_speed.is_finite() && self.angular_speed.is_finite()
    }
}
