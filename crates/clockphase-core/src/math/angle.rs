//! Circular angle arithmetic
//!
//! Every stored or returned angle in the crate lives in the canonical range
//! `(-pi, pi]` unless explicitly documented as a raw quantity.

use std::f64::consts::{PI, TAU};

/// Wrap an angle to the canonical range `(-pi, pi]`.
pub fn wrap_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(TAU);
    if t > PI {
        t - TAU
    } else {
        t
    }
}

/// Shortest signed angular difference `a - b`, wrapped to `(-pi, pi]`.
pub fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_angle(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrap_is_canonical_over_many_turns() {
        let mut theta = -25.0;
        while theta <= 25.0 {
            let w = wrap_angle(theta);
            assert!(w > -PI && w <= PI, "wrap({theta}) = {w} out of range");
            // Wrapping must not change the direction the angle points in.
            assert_abs_diff_eq!(w.sin(), theta.sin(), epsilon = 1e-9);
            assert_abs_diff_eq!(w.cos(), theta.cos(), epsilon = 1e-9);
            theta += 0.37;
        }
    }

    #[test]
    fn diff_of_equal_angles_is_zero() {
        for &a in &[-3.0, -0.5, 0.0, 1.0, 3.1, 100.0] {
            assert_abs_diff_eq!(angle_diff(a, a), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn diff_takes_the_short_way_round() {
        assert_abs_diff_eq!(angle_diff(3.0, -3.0), 6.0 - TAU, epsilon = 1e-12);
        assert_abs_diff_eq!(angle_diff(-3.0, 3.0), TAU - 6.0, epsilon = 1e-12);
    }

    #[test]
    fn boundary_maps_to_positive_pi() {
        assert_abs_diff_eq!(wrap_angle(PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(3.0 * PI), PI, epsilon = 1e-9);
    }
}
