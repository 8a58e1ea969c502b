//! Inertial sensor interface
//!
//! The acquisition driver delivers calibrated samples in interrupt-sized
//! batches with a known sample period. The raw arm angle is derived from the
//! accelerometer vector in the arm plane; the raw arm rate is the gyro axis
//! normal to it.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use clockphase_core::math::wrap_angle;

/// Accelerometer mounting offset of the reference rig [rad].
pub const DEFAULT_ANGLE_OFFSET: f64 = -0.03;

/// One calibrated inertial sample. Accelerations in g, rates in rad/s.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InertialSample {
    pub accel_x: f64,
    pub accel_y: f64,
    pub gyro_z: f64,
}

impl InertialSample {
    /// Raw arm angle from the accelerometer vector, canonical range, with
    /// the mounting offset applied.
    pub fn raw_arm_angle(&self, offset: f64) -> f64 {
        let theta = self.accel_y.atan2(self.accel_x).rem_euclid(TAU);
        wrap_angle(PI - theta + offset)
    }

    /// Raw arm angular rate [rad/s].
    pub fn raw_arm_rate(&self) -> f64 {
        self.gyro_z
    }
}

/// One sensor interrupt's worth of samples, chronological, no gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleBatch {
    /// Sample period within the batch [s]
    pub sample_period: f64,
    pub samples: Vec<InertialSample>,
}

/// Upstream acquisition contract. Implementations must deliver batches in
/// chronological order; the consumer runs the pipeline once per sample.
pub trait SampleSource {
    fn next_batch(&mut self) -> Option<SampleBatch>;
}
