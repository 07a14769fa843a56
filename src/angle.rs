//! Angle helpers
//!
//! Yaw bias is only defined up to a half turn: a heading inferred from
//! displacement cannot tell driving forward from reversing. Biases are
//! therefore wrapped into (-pi/2, pi/2] rather than the usual (-pi, pi].

use nalgebra::UnitQuaternion;
use std::f64::consts::{FRAC_PI_2, PI};

/// Wrap an angle into (-pi/2, pi/2], preserving it modulo pi.
///
/// Non-finite input is returned unchanged; callers are expected to reject
/// it before wrapping.
pub fn wrap_half_pi(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }

    let mut wrapped = angle;
    while wrapped > FRAC_PI_2 {
        wrapped -= PI;
    }
    while wrapped <= -FRAC_PI_2 {
        wrapped += PI;
    }
    wrapped
}

/// Heading (yaw about the vertical axis) encoded by a planar orientation.
pub fn heading_from_quaternion(orientation: &UnitQuaternion<f64>) -> f64 {
    let q = orientation.quaternion();
    2.0 * q.k.atan2(q.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_in_range_is_identity() {
        assert_eq!(wrap_half_pi(0.0), 0.0);
        assert_eq!(wrap_half_pi(0.05), 0.05);
        assert_eq!(wrap_half_pi(FRAC_PI_2), FRAC_PI_2);
    }

    #[test]
    fn test_wrap_lower_edge_maps_to_upper() {
        assert_abs_diff_eq!(wrap_half_pi(-FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_reversing_is_zero_bias() {
        assert_abs_diff_eq!(wrap_half_pi(PI), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_half_pi(-PI + 0.1), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_many_turns() {
        let wrapped = wrap_half_pi(0.3 + 7.0 * PI);
        assert_abs_diff_eq!(wrapped, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_non_finite_passthrough() {
        assert!(wrap_half_pi(f64::NAN).is_nan());
        assert_eq!(wrap_half_pi(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_heading_from_quaternion() {
        let q = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.7);
        assert_abs_diff_eq!(heading_from_quaternion(&q), 0.7, epsilon = 1e-12);

        let identity = UnitQuaternion::identity();
        assert_eq!(heading_from_quaternion(&identity), 0.0);
    }
}
