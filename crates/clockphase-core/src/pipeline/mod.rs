//! Per-sample tracking pipeline
//!
//! [`PhaseTracker`] owns one Kalman filter and one belief filter, shares the
//! immutable geometry, and carries the previous cycle's phase estimate and
//! branch selection. One `process` call handles one sensor sample to
//! completion; there is no suspension, I/O, or failure path inside it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::ConfigError;
use crate::estimation::{ArmStateFilter, BeliefFilter, NoiseModel};
use crate::geometry::{Branch, Geometry};
use crate::math::angle_diff;

/// Phase step for the symmetric finite difference in the acceleration
/// control model, expressed as a time step [s].
const ACCEL_DIFF_STEP: f64 = 1e-3;

/// Which control term feeds the Kalman filter.
///
/// The two variants imply different branch handling downstream: the velocity
/// model re-selects the branch every cycle from the disambiguated phase, the
/// acceleration model holds it fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlModel {
    /// Arm angular velocity implied by advancing the previous phase estimate
    /// at the commanded rate for one sample.
    #[default]
    ArmVelocity,
    /// Arm angular acceleration from a symmetric finite difference of the
    /// forward mapping around the previous phase estimate.
    ArmAcceleration,
}

/// One sample's disambiguated output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseEstimate {
    /// Disambiguated oscillator phase [rad], canonical range
    pub phase: f64,
    /// The close- and far-branch phase candidates that produced it [rad]
    pub candidates: [f64; 2],
}

/// The per-sample estimation pipeline.
///
/// Not safe for concurrent invocation; the surrounding system serializes
/// access. The shared [`Geometry`] is read-only and may be shared freely.
pub struct PhaseTracker {
    geometry: Arc<Geometry>,
    arm_filter: ArmStateFilter,
    belief: BeliefFilter,
    control_model: ControlModel,
    /// Previous cycle's disambiguated phase [rad]
    phase: f64,
    /// Previous cycle's branch selection
    branch: Branch,
    /// log10 of the last control acceleration magnitude (acceleration model)
    arm_accel_log10: Option<f64>,
}

impl PhaseTracker {
    pub fn new(geometry: Arc<Geometry>, cfg: &TrackerConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            geometry,
            arm_filter: ArmStateFilter::new(NoiseModel::from_config(&cfg.noise)),
            belief: BeliefFilter::new(&cfg.act_kernel, &cfg.see_kernel),
            control_model: cfg.control_model,
            phase: 0.0,
            branch: Branch::Close,
            arm_accel_log10: None,
        })
    }

    /// Clear all filter state back to the neutral initial condition.
    pub fn reset(&mut self) {
        self.arm_filter.reset();
        self.belief.reset();
        self.phase = 0.0;
        self.branch = Branch::Close;
        self.arm_accel_log10 = None;
    }

    /// Last disambiguated oscillator phase [rad].
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Last refined arm angle [rad].
    pub fn arm_angle(&self) -> f64 {
        self.arm_filter.angle()
    }

    /// Last refined arm angular rate [rad/s].
    pub fn arm_rate(&self) -> f64 {
        self.arm_filter.rate()
    }

    /// Log-magnitude of the last control acceleration, when the acceleration
    /// control model is active.
    pub fn arm_accel_log10(&self) -> Option<f64> {
        self.arm_accel_log10
    }

    /// Current branch selection.
    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Process one sample: raw accelerometer-derived arm angle [rad], raw
    /// gyro arm rate [rad/s], sample period [s], and the commanded
    /// oscillator rate [rad/s].
    pub fn process(
        &mut self,
        raw_arm_angle: f64,
        raw_arm_rate: f64,
        dt: f64,
        commanded_phase_rate: f64,
    ) -> PhaseEstimate {
        let control = self.control_term(dt, commanded_phase_rate);

        let refined = self.arm_filter.step(raw_arm_angle, raw_arm_rate, dt, control);

        let close = self.geometry.phase_from_arm_angle(refined.angle, Branch::Close);
        let far = self.geometry.phase_from_arm_angle(refined.angle, Branch::Far);

        let phase = self
            .belief
            .update(commanded_phase_rate * dt, close, far);

        if self.control_model == ControlModel::ArmVelocity {
            // Follow whichever candidate the disambiguated phase landed on.
            self.branch = if angle_diff(phase, close).abs() < angle_diff(phase, far).abs() {
                Branch::Close
            } else {
                Branch::Far
            };
        }
        self.phase = phase;

        PhaseEstimate {
            phase,
            candidates: [close, far],
        }
    }

    /// Control scalar for the Kalman filter, derived from the forward model
    /// at the previous phase estimate. NaN from an out-of-domain forward
    /// query degrades to zero control rather than poisoning the filter.
    fn control_term(&mut self, dt: f64, commanded_phase_rate: f64) -> f64 {
        let control = match self.control_model {
            ControlModel::ArmVelocity => {
                self.arm_accel_log10 = None;
                let here = self.geometry.arm_angle_from_phase(self.phase, self.branch);
                let next = self
                    .geometry
                    .arm_angle_from_phase(self.phase + commanded_phase_rate * dt, self.branch);
                angle_diff(next, here) / dt
            }
            ControlModel::ArmAcceleration => {
                let step = commanded_phase_rate * ACCEL_DIFF_STEP;
                let before = self.geometry.arm_angle_from_phase(self.phase - step, self.branch);
                let here = self.geometry.arm_angle_from_phase(self.phase, self.branch);
                let after = self.geometry.arm_angle_from_phase(self.phase + step, self.branch);
                let accel =
                    (angle_diff(after, here) - angle_diff(here, before)) / (dt * dt);
                let accel = if accel.is_finite() { accel } else { 0.0 };
                self.arm_accel_log10 = Some(accel.abs().max(f64::MIN_POSITIVE).log10());
                accel
            }
        };
        if control.is_finite() {
            control
        } else {
            0.0
        }
    }
}
