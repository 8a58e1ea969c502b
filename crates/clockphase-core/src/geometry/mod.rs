//! Linkage geometry
//!
//! Converts between the oscillator phase and the observable arm angle for a
//! two-pivot linkage: the contact point of the oscillator circle drives a
//! line that must stay tangent to a fixed circle around the arm pivot. The
//! tangent condition is a quadratic in the line slope, so every phase yields
//! two arm-angle solutions and every arm angle yields two phase candidates.

mod lookup;

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;

pub use lookup::Geometry;

/// One of the two kinematic branches of the linkage.
///
/// In the forward direction the branch selects which root of the tangent
/// quadratic is taken; in the inverse direction it selects which phase
/// sub-range (lookup table) the candidate is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Close,
    Far,
}

impl Branch {
    pub fn other(self) -> Self {
        match self {
            Branch::Close => Branch::Far,
            Branch::Far => Branch::Close,
        }
    }
}

/// Closed-form forward mapping: oscillator phase to arm angle.
///
/// The contact point sits at `(D + L cos phase, L sin phase)`. Requiring the
/// line through it to be tangent to the circle of radius `A` at the origin
/// gives `(cx^2 - A^2) k^2 - 2 cy cx k + cy^2 - A^2 = 0` in the slope `k`.
/// Returns NaN when the discriminant is negative, which means the contact
/// point has entered the tangent circle and no tangent line exists. That
/// never happens inside the valid operating range.
pub(crate) fn tangent_arm_angle(cfg: &GeometryConfig, phase: f64, branch: Branch) -> f64 {
    let radius = cfg.tangent_radius();
    let cx = cfg.pivot_separation + phase.cos() * cfg.oscillator_length;
    let cy = phase.sin() * cfg.oscillator_length;

    let ak = cx * cx - radius * radius;
    let bk = 2.0 * cy * cx;
    let ck = cy * cy - radius * radius;

    let discriminant = bk * bk - 4.0 * ak * ck;
    if discriminant < 0.0 {
        return f64::NAN;
    }
    let sqrt = discriminant.sqrt();
    let k = match branch {
        Branch::Close => -(bk - sqrt) / (2.0 * ak),
        Branch::Far => -(bk + sqrt) / (2.0 * ak),
    };
    k.atan()
}
