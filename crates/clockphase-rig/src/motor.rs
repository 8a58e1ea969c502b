//! Motor actuation interface
//!
//! The motor driver accepts one scalar: a signed power level. Sign selects
//! the winding polarity, magnitude the PWM duty. Everything past this trait
//! (GPIO, duty scheduling) belongs to the hardware driver.

use serde::{Deserialize, Serialize};

/// A commanded power level, always within [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PowerLevel(f64);

impl PowerLevel {
    /// Clamp an arbitrary command into the valid range. Non-finite commands
    /// degrade to zero power.
    pub fn new(level: f64) -> Self {
        if level.is_finite() {
            Self(level.clamp(-1.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// Downstream actuation contract.
pub trait MotorDrive {
    /// Apply a new power level.
    fn drive(&mut self, level: PowerLevel);
    /// Cut power immediately.
    fn stop(&mut self);
    /// Last commanded level.
    fn power(&self) -> PowerLevel;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_level_is_clamped() {
        assert_eq!(PowerLevel::new(2.5).get(), 1.0);
        assert_eq!(PowerLevel::new(-7.0).get(), -1.0);
        assert_eq!(PowerLevel::new(0.25).get(), 0.25);
    }

    #[test]
    fn non_finite_commands_degrade_to_zero() {
        assert_eq!(PowerLevel::new(f64::NAN).get(), 0.0);
        assert_eq!(PowerLevel::new(f64::INFINITY).get(), 0.0);
    }
}
