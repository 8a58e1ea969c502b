//! Tracker configuration
//!
//! All configuration is plain data with serde derives so hosts can load it
//! from whatever format they use. Defaults carry the constants of the
//! reference mechanism.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::estimation::BELIEF_BINS;
use crate::pipeline::ControlModel;

/// Linkage geometry constants and lookup-table sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Distance between the arm pivot and the oscillator pivot [m]
    pub pivot_separation: f64,
    /// Length of the oscillating arm [m]
    pub oscillator_length: f64,
    /// Radius of the boss at the arm pivot [m]
    pub boss_radius: f64,
    /// Width of the driven arm [m]
    pub arm_width: f64,
    /// Number of bins in each inverse lookup table
    pub lookup_len: usize,
    /// Forward-scan samples per lookup bin during table construction
    pub scan_oversample: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            pivot_separation: 0.065,
            oscillator_length: 0.04,
            boss_radius: 0.0025,
            arm_width: 0.02,
            lookup_len: 16384,
            scan_oversample: 25,
        }
    }
}

impl GeometryConfig {
    /// Radius of the circle the arm's edge stays tangent to [m].
    pub fn tangent_radius(&self) -> f64 {
        self.boss_radius + self.arm_width * 0.5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_len < 2 {
            return Err(ConfigError::LookupTooShort(self.lookup_len));
        }
        if self.scan_oversample == 0 {
            return Err(ConfigError::ZeroOversample);
        }
        for (name, value) in [
            ("pivot_separation", self.pivot_separation),
            ("oscillator_length", self.oscillator_length),
            ("boss_radius", self.boss_radius),
            ("arm_width", self.arm_width),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}

/// Kalman process and measurement noise, diagonal form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Process noise diagonal [angle, rate]
    pub q_diag: [f64; 2],
    /// Measurement noise diagonal [angle, rate]
    pub r_diag: [f64; 2],
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            q_diag: [1.0, 1.0],
            // The accelerometer-derived angle is noisier than the gyro rate.
            r_diag: [3.0, 1.0],
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // R must be strictly positive-definite for the innovation covariance
        // to stay invertible.
        for (i, &value) in self.r_diag.iter().enumerate() {
            if !(value > 0.0) {
                let name = if i == 0 { "r_diag[0]" } else { "r_diag[1]" };
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        for (i, &value) in self.q_diag.iter().enumerate() {
            if value < 0.0 {
                let name = if i == 0 { "q_diag[0]" } else { "q_diag[1]" };
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}

/// Gaussian kernel shape for the belief filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Standard deviation in belief-grid bins (degrees)
    pub sigma: f64,
    /// Support width in bins
    pub width: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self { sigma: 6.4, width: 45 }
    }
}

impl KernelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sigma > 0.0) {
            return Err(ConfigError::NonPositive { name: "sigma", value: self.sigma });
        }
        if self.width == 0 || self.width > BELIEF_BINS {
            return Err(ConfigError::BadKernelWidth { width: self.width, max: BELIEF_BINS });
        }
        Ok(())
    }
}

/// Top-level tracker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Which control-model variant feeds the Kalman filter
    pub control_model: ControlModel,
    pub noise: NoiseConfig,
    /// Kernel applied in the belief predict ("act") step
    pub act_kernel: KernelConfig,
    /// Kernel applied in the belief update ("see") step
    pub see_kernel: KernelConfig,
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.noise.validate()?;
        self.act_kernel.validate()?;
        self.see_kernel.validate()
    }
}
