//! Instantaneous bias observations
//!
//! A pair of consecutive poses implies a direction of travel. Comparing it
//! with the orientation reported by the newer pose gives one noisy sample
//! of the yaw bias.

use crate::angle::wrap_half_pi;
use crate::sample::PoseSample;

/// Bias sample derived from two consecutive poses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasObservation {
    /// Wrapped difference between measured and displacement heading [rad]
    pub bias: f64,
    /// Planar distance between the two poses [m]
    pub displacement: f64,
    /// Heading implied by the displacement [rad]
    pub estimated_heading: f64,
    /// Heading reported by the current pose [rad]
    pub measured_heading: f64,
}

impl BiasObservation {
    /// Derive an observation from the previous and current pose.
    ///
    /// Coincident positions yield `atan2(0, 0) = 0` as the estimated
    /// heading. Such observations carry no information and must be
    /// rejected by the motion gate's lower distance limit.
    pub fn derive(previous: &PoseSample, current: &PoseSample) -> Self {
        let delta = current.position - previous.position;
        let displacement = delta.norm();
        let estimated_heading = delta.y.atan2(delta.x);
        let measured_heading = current.heading();

        Self {
            bias: wrap_half_pi(measured_heading - estimated_heading),
            displacement,
            estimated_heading,
            measured_heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_derive_straight_east() {
        let prev = PoseSample::from_heading(0.0, 0.0, 0.0, 0.0);
        let curr = PoseSample::from_heading(5.0, 0.0, 0.05, 1.0);
        let obs = BiasObservation::derive(&prev, &curr);

        assert_abs_diff_eq!(obs.displacement, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(obs.estimated_heading, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(obs.measured_heading, 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(obs.bias, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_derive_diagonal() {
        let prev = PoseSample::from_heading(1.0, 1.0, 0.0, 0.0);
        let curr = PoseSample::from_heading(4.0, 5.0, 0.9, 1.0);
        let obs = BiasObservation::derive(&prev, &curr);

        assert_abs_diff_eq!(obs.displacement, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(obs.bias, 0.9 - 4.0_f64.atan2(3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_derive_reversing_folds_to_small_bias() {
        // Backing up east while facing east: displacement points west.
        let prev = PoseSample::from_heading(5.0, 0.0, 0.02, 0.0);
        let curr = PoseSample::from_heading(0.0, 0.0, 0.02, 1.0);
        let obs = BiasObservation::derive(&prev, &curr);

        assert_abs_diff_eq!(obs.estimated_heading, PI, epsilon = 1e-12);
        assert_abs_diff_eq!(obs.bias, 0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_derive_coincident_positions() {
        let prev = PoseSample::from_heading(2.0, 3.0, 0.0, 0.0);
        let curr = PoseSample::from_heading(2.0, 3.0, 0.3, 1.0);
        let obs = BiasObservation::derive(&prev, &curr);

        assert_eq!(obs.displacement, 0.0);
        assert_eq!(obs.estimated_heading, 0.0);
        assert!(obs.bias > -FRAC_PI_2 && obs.bias <= FRAC_PI_2);
    }
}
