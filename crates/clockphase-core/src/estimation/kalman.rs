//! Arm-state Kalman filter
//!
//! Linear filter over `[arm angle, arm angular rate]` with an identity
//! observation model: both components are measured directly (accelerometer
//! angle, gyro rate). The control term is the model-implied arm motion
//! derived from the commanded oscillator rate; its magnitude also scales the
//! process noise, since the forward model is least trustworthy when the
//! commanded motion is small.

use crate::config::NoiseConfig;
use crate::{Mat2, Vec2};

/// Floor on the adaptive process-noise scale.
const PROCESS_NOISE_FLOOR: f64 = 0.001;

/// Fixed process and measurement noise, configured once.
#[derive(Debug, Clone)]
pub struct NoiseModel {
    q: Mat2,
    r: Mat2,
}

impl NoiseModel {
    pub fn from_config(cfg: &NoiseConfig) -> Self {
        Self {
            q: Mat2::new(cfg.q_diag[0], 0.0, 0.0, cfg.q_diag[1]),
            r: Mat2::new(cfg.r_diag[0], 0.0, 0.0, cfg.r_diag[1]),
        }
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self::from_config(&NoiseConfig::default())
    }
}

/// Refined arm state after one predict/update step.
#[derive(Debug, Clone, Copy)]
pub struct ArmEstimate {
    /// Arm angle [rad]
    pub angle: f64,
    /// Arm angular rate [rad/s]
    pub rate: f64,
}

/// 2-state Kalman filter over arm angle and rate.
#[derive(Debug, Clone)]
pub struct ArmStateFilter {
    state: Vec2,
    covariance: Mat2,
    noise: NoiseModel,
}

impl ArmStateFilter {
    pub fn new(noise: NoiseModel) -> Self {
        Self {
            state: Vec2::zeros(),
            covariance: Mat2::zeros(),
            noise,
        }
    }

    /// Zero both state and covariance.
    pub fn reset(&mut self) {
        self.state = Vec2::zeros();
        self.covariance = Mat2::zeros();
    }

    /// Last refined arm angle [rad].
    pub fn angle(&self) -> f64 {
        self.state[0]
    }

    /// Last refined arm angular rate [rad/s].
    pub fn rate(&self) -> f64 {
        self.state[1]
    }

    /// One predict/update step.
    ///
    /// `control` is the model-derived control scalar `u`; the transition
    /// applies it as `[0.5 u dt^2, u dt]`. The gyro sign convention of the
    /// mechanism makes the angle evolve as `angle - dt * rate`.
    pub fn step(&mut self, raw_angle: f64, raw_rate: f64, dt: f64, control: f64) -> ArmEstimate {
        let transition = Mat2::new(1.0, -dt, 0.0, 1.0);
        let control_input = Vec2::new(0.5 * control * dt * dt, control * dt);

        // The model is trusted less the closer the commanded control is to
        // zero. The magnitude is floored before the log so the scale stays
        // finite at u = 0.
        let magnitude = control.abs().max(f64::MIN_POSITIVE);
        let scale = (magnitude.log10().abs() / 10.0).max(PROCESS_NOISE_FLOOR);
        let process_noise = self.noise.q * scale;

        // Predict.
        let state_hat = transition * self.state + control_input;
        let covariance_hat =
            transition * self.covariance * transition.transpose() + process_noise;

        // Update. The innovation is taken on the raw angle without
        // shortest-path wrapping: the arm's operating band stays well clear
        // of the +/-pi seam.
        let observation = Vec2::new(raw_angle, raw_rate);
        let innovation = observation - state_hat;
        let s = covariance_hat + self.noise.r;
        let det = s[(0, 0)] * s[(1, 1)] - s[(0, 1)] * s[(1, 0)];
        let s_inverse = Mat2::new(s[(1, 1)], -s[(0, 1)], -s[(1, 0)], s[(0, 0)]) / det;
        let gain = covariance_hat * s_inverse;

        self.state = state_hat + gain * innovation;
        self.covariance = (Mat2::identity() - gain) * covariance_hat;

        ArmEstimate {
            angle: self.state[0],
            rate: self.state[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_innovation_is_a_fixed_point() {
        // Observation equal to the prediction with u = 0 must leave the
        // state exactly at the prediction.
        let mut filter = ArmStateFilter::new(NoiseModel::default());
        let est = filter.step(0.0, 0.0, 0.01, 0.0);
        assert_abs_diff_eq!(est.angle, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.rate, 0.0, epsilon = 1e-12);

        // Same with a non-trivial predicted state: prime the filter, then
        // feed it exactly what it predicts.
        let mut filter = ArmStateFilter::new(NoiseModel::default());
        for _ in 0..20 {
            filter.step(0.2, -0.5, 0.01, 0.0);
        }
        let predicted_angle = filter.angle() - 0.01 * filter.rate();
        let predicted_rate = filter.rate();
        let est = filter.step(predicted_angle, predicted_rate, 0.01, 0.0);
        assert_abs_diff_eq!(est.angle, predicted_angle, epsilon = 1e-9);
        assert_abs_diff_eq!(est.rate, predicted_rate, epsilon = 1e-9);
    }

    #[test]
    fn measurements_pull_the_state_toward_the_observation() {
        let mut filter = ArmStateFilter::new(NoiseModel::default());
        let mut previous_error = 0.3f64;
        for _ in 0..200 {
            let est = filter.step(0.3, 0.0, 0.01, 0.0);
            let error = (0.3 - est.angle).abs();
            assert!(error <= previous_error + 1e-12);
            previous_error = error;
        }
        assert!(previous_error < 0.02, "error still {previous_error}");
    }

    #[test]
    fn control_term_accelerates_the_predicted_rate() {
        let mut filter = ArmStateFilter::new(NoiseModel::default());
        let dt = 0.01;
        // Feed measurements consistent with a constant acceleration of 1.
        let mut angle = 0.0;
        let mut rate = 0.0f64;
        for _ in 0..100 {
            angle -= dt * rate;
            rate += dt;
            filter.step(angle, rate, dt, 1.0);
        }
        assert!((filter.rate() - rate).abs() < 0.05);
    }

    #[test]
    fn reset_zeroes_the_state() {
        let mut filter = ArmStateFilter::new(NoiseModel::default());
        for _ in 0..10 {
            filter.step(1.0, -2.0, 0.01, 0.5);
        }
        assert!(filter.angle().abs() > 0.0);
        filter.reset();
        assert_eq!(filter.angle(), 0.0);
        assert_eq!(filter.rate(), 0.0);
    }
}
