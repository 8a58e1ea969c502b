//! Inverse lookup tables
//!
//! The forward mapping sweeps the arm angle up and down once per oscillator
//! turn, so a single arm angle corresponds to two phases. The build scan
//! finds the phases of the extreme arm angles; they split the phase circle
//! into two sub-ranges, one per table. Each table bin keeps the scanned
//! phase whose quantized arm angle landed nearest the bin center.
//!
//! Built once, immutable afterwards; safe to share read-only across threads.

use std::f64::consts::{PI, TAU};

use crate::config::GeometryConfig;
use crate::error::GeometryError;
use crate::geometry::{tangent_arm_angle, Branch};

#[derive(Debug, Clone, Copy)]
struct LookupBin {
    /// Best-fit oscillator phase for this arm-angle bin [rad]
    phase: f64,
    /// Quantization residual of that phase, in bins
    residual: f64,
}

impl LookupBin {
    const EMPTY: Self = Self { phase: 0.0, residual: f64::INFINITY };
}

/// Immutable linkage geometry: forward solver plus inverse lookup.
#[derive(Debug, Clone)]
pub struct Geometry {
    cfg: GeometryConfig,
    close: Vec<LookupBin>,
    far: Vec<LookupBin>,
    min_arm_angle: f64,
    max_arm_angle: f64,
    /// Phase that produced the minimum arm angle [rad]
    min_angle_phase: f64,
    /// Phase that produced the maximum arm angle [rad]
    max_angle_phase: f64,
    /// Arm-angle width of one lookup bin [rad]
    bin_width: f64,
}

impl Geometry {
    /// Build the inverse lookup by densely scanning the forward mapping over
    /// one full oscillator turn.
    pub fn build(cfg: GeometryConfig) -> Result<Self, GeometryError> {
        cfg.validate()?;

        let len = cfg.lookup_len;
        let step = TAU / (len * cfg.scan_oversample) as f64;

        // First pass: find the operating band and the phases of its extremes.
        let mut min_arm_angle = f64::INFINITY;
        let mut max_arm_angle = f64::NEG_INFINITY;
        let mut min_angle_phase = 0.0;
        let mut max_angle_phase = 0.0;
        let mut phase = -PI;
        while phase <= PI {
            let arm = tangent_arm_angle(&cfg, phase, Branch::Close);
            if arm < min_arm_angle {
                min_arm_angle = arm;
                min_angle_phase = phase;
            }
            if arm > max_arm_angle {
                max_arm_angle = arm;
                max_angle_phase = phase;
            }
            phase += step;
        }
        if !min_arm_angle.is_finite() || !max_arm_angle.is_finite() || max_arm_angle <= min_arm_angle
        {
            return Err(GeometryError::EmptyOperatingBand);
        }
        let bin_width = (max_arm_angle - min_arm_angle) / (len - 1) as f64;

        // Second pass: quantize every scanned phase into an arm-angle bin and
        // keep, per branch table, the phase nearest the bin center.
        let mut close = vec![LookupBin::EMPTY; len];
        let mut far = vec![LookupBin::EMPTY; len];
        let mut phase = -PI;
        while phase <= PI {
            let arm = tangent_arm_angle(&cfg, phase, Branch::Close);
            if arm.is_finite() {
                let fractional = (arm - min_arm_angle) / bin_width;
                let residual = (fractional - fractional.round()).abs();
                let index = (fractional.round() as isize).clamp(0, len as isize - 1) as usize;
                let table = if phase <= max_angle_phase || phase > min_angle_phase {
                    &mut close
                } else {
                    &mut far
                };
                if table[index].residual > residual {
                    table[index] = LookupBin { phase, residual };
                }
            }
            phase += step;
        }

        Ok(Self {
            cfg,
            close,
            far,
            min_arm_angle,
            max_arm_angle,
            min_angle_phase,
            max_angle_phase,
            bin_width,
        })
    }

    /// Lower edge of the arm-angle operating band [rad].
    pub fn min_arm_angle(&self) -> f64 {
        self.min_arm_angle
    }

    /// Upper edge of the arm-angle operating band [rad].
    pub fn max_arm_angle(&self) -> f64 {
        self.max_arm_angle
    }

    /// Which phase sub-range (inverse table) a phase belongs to.
    pub fn branch_of_phase(&self, phase: f64) -> Branch {
        if phase <= self.max_angle_phase || phase > self.min_angle_phase {
            Branch::Close
        } else {
            Branch::Far
        }
    }

    /// Closed-form forward mapping; NaN when no tangent exists at `phase`.
    pub fn arm_angle_from_phase(&self, phase: f64, branch: Branch) -> f64 {
        tangent_arm_angle(&self.cfg, phase, branch)
    }

    /// Inverse mapping via the lookup table for `branch`, linearly
    /// interpolating the two nearest bins. The arm angle is clamped to the
    /// operating band first, which keeps both interpolation indices valid.
    pub fn phase_from_arm_angle(&self, arm_angle: f64, branch: Branch) -> f64 {
        let clamped = arm_angle.clamp(self.min_arm_angle, self.max_arm_angle);
        let fractional = (clamped - self.min_arm_angle) / self.bin_width;
        let top = self.cfg.lookup_len - 1;
        let high = (fractional.ceil() as usize).min(top);
        let low = (fractional.floor() as usize).min(high);
        let high_weight = fractional - low as f64;
        let low_weight = 1.0 - high_weight;

        let table = match branch {
            Branch::Close => &self.close,
            Branch::Far => &self.far,
        };
        table[low].phase * low_weight + table[high].phase * high_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angle_diff;

    fn small_cfg() -> GeometryConfig {
        GeometryConfig {
            lookup_len: 2048,
            scan_oversample: 8,
            ..Default::default()
        }
    }

    #[test]
    fn operating_band_is_a_proper_interval() {
        let g = Geometry::build(small_cfg()).unwrap();
        assert!(g.min_arm_angle() < g.max_arm_angle());
        assert!(g.min_arm_angle() > -PI / 2.0);
        assert!(g.max_arm_angle() < PI / 2.0);
    }

    #[test]
    fn round_trip_recovers_the_phase() {
        let g = Geometry::build(small_cfg()).unwrap();
        let mut phase = -PI + 0.05;
        while phase < PI {
            // Skip the neighborhoods of the band extremes, where the forward
            // mapping is flat and the inverse is ill-conditioned.
            let near_extreme = angle_diff(phase, g.min_angle_phase).abs() < 0.15
                || angle_diff(phase, g.max_angle_phase).abs() < 0.15;
            if !near_extreme {
                let arm = g.arm_angle_from_phase(phase, Branch::Close);
                let recovered = g.phase_from_arm_angle(arm, g.branch_of_phase(phase));
                assert!(
                    angle_diff(recovered, phase).abs() < 0.02,
                    "phase {phase} recovered as {recovered}"
                );
            }
            phase += 0.01;
        }
    }

    #[test]
    fn inverse_clamps_out_of_band_input() {
        let g = Geometry::build(small_cfg()).unwrap();
        let below = g.phase_from_arm_angle(g.min_arm_angle() - 1.0, Branch::Close);
        let at_min = g.phase_from_arm_angle(g.min_arm_angle(), Branch::Close);
        assert_eq!(below, at_min);
        let above = g.phase_from_arm_angle(g.max_arm_angle() + 1.0, Branch::Far);
        let at_max = g.phase_from_arm_angle(g.max_arm_angle(), Branch::Far);
        assert_eq!(above, at_max);
    }

    #[test]
    fn branch_partition_covers_the_circle() {
        let g = Geometry::build(small_cfg()).unwrap();
        let mut close_bins = 0usize;
        let mut far_bins = 0usize;
        let mut phase = -PI + 1e-6;
        while phase <= PI {
            match g.branch_of_phase(phase) {
                Branch::Close => close_bins += 1,
                Branch::Far => far_bins += 1,
            }
            phase += 0.01;
        }
        // Both sub-ranges are substantial fractions of the turn.
        assert!(close_bins > 50);
        assert!(far_bins > 50);
    }

    #[test]
    fn build_rejects_unreachable_linkage() {
        // Pivots so close that the contact point stays inside the tangent
        // circle for every phase.
        let cfg = GeometryConfig {
            pivot_separation: 0.001,
            oscillator_length: 0.001,
            ..small_cfg()
        };
        assert!(matches!(
            Geometry::build(cfg),
            Err(GeometryError::EmptyOperatingBand)
        ));
    }

    #[test]
    fn default_table_resolution_round_trips_tightly() {
        let g = Geometry::build(GeometryConfig::default()).unwrap();
        for &phase in &[-2.0, -1.0, 0.3, 1.3, 2.4] {
            let arm = g.arm_angle_from_phase(phase, Branch::Close);
            let recovered = g.phase_from_arm_angle(arm, g.branch_of_phase(phase));
            assert!(angle_diff(recovered, phase).abs() < 5e-3);
        }
    }
}
