//! Synthetic linkage simulation
//!
//! Replaces the hardware IMU for tests and demos: spins the oscillator at a
//! constant commanded rate, evaluates the forward geometry for the true arm
//! angle, and emits sample batches with seeded Gaussian noise. Deterministic
//! for a given seed.

use std::f64::consts::PI;
use std::sync::Arc;

use clockphase_core::geometry::{Branch, Geometry};
use clockphase_core::math::{angle_diff, wrap_angle};

use crate::sensor::{InertialSample, SampleBatch, SampleSource, DEFAULT_ANGLE_OFFSET};

/// Simple xorshift RNG; deterministic and good enough for sensor noise.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard Gaussian via Box-Muller.
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// A simulated mechanism driven at a constant oscillator rate.
pub struct SyntheticLinkage {
    geometry: Arc<Geometry>,
    /// Commanded (and actual) oscillator rate [rad/s]
    phase_rate: f64,
    sample_period: f64,
    angle_noise_std: f64,
    rate_noise_std: f64,
    mounting_offset: f64,
    rng: XorShiftRng,
    elapsed: f64,
    previous_arm: f64,
}

impl SyntheticLinkage {
    pub fn new(geometry: Arc<Geometry>, phase_rate: f64, sample_period: f64, seed: u64) -> Self {
        let previous_arm = geometry.arm_angle_from_phase(0.0, Branch::Close);
        Self {
            geometry,
            phase_rate,
            sample_period,
            angle_noise_std: 0.0,
            rate_noise_std: 0.0,
            mounting_offset: DEFAULT_ANGLE_OFFSET,
            rng: XorShiftRng::new(seed),
            elapsed: 0.0,
            previous_arm,
        }
    }

    pub fn with_noise(mut self, angle_std: f64, rate_std: f64) -> Self {
        self.angle_noise_std = angle_std;
        self.rate_noise_std = rate_std;
        self
    }

    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }

    pub fn mounting_offset(&self) -> f64 {
        self.mounting_offset
    }

    pub fn phase_rate(&self) -> f64 {
        self.phase_rate
    }

    /// True oscillator phase at the time of the most recent sample [rad].
    pub fn true_phase(&self) -> f64 {
        wrap_angle(self.phase_rate * self.elapsed)
    }

    /// True arm angle at the time of the most recent sample [rad].
    pub fn true_arm_angle(&self) -> f64 {
        self.geometry.arm_angle_from_phase(self.true_phase(), Branch::Close)
    }

    /// Generate the next batch of `len` samples.
    pub fn batch(&mut self, len: usize) -> SampleBatch {
        let mut samples = Vec::with_capacity(len);
        for _ in 0..len {
            self.elapsed += self.sample_period;
            let arm = self.true_arm_angle();
            // The gyro axis reads the negated arm angle derivative (the sign
            // convention the estimator's transition model is built around).
            let true_rate = -angle_diff(arm, self.previous_arm) / self.sample_period;
            self.previous_arm = arm;

            let measured_angle = arm + self.rng.next_gaussian() * self.angle_noise_std;
            let gyro_z = true_rate + self.rng.next_gaussian() * self.rate_noise_std;

            // Build an accelerometer vector whose derived raw angle is the
            // noisy arm angle (inverts InertialSample::raw_arm_angle).
            let theta = PI + self.mounting_offset - measured_angle;
            samples.push(InertialSample {
                accel_x: theta.cos(),
                accel_y: theta.sin(),
                gyro_z,
            });
        }
        SampleBatch {
            sample_period: self.sample_period,
            samples,
        }
    }
}

impl SampleSource for SyntheticLinkage {
    fn next_batch(&mut self) -> Option<SampleBatch> {
        Some(self.batch(16))
    }
}
