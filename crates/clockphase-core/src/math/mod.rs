//! Mathematical utilities for clockphase
//!
//! Angle wrapping and circular arithmetic. All angles are radians; the
//! canonical range for a wrapped angle is `(-pi, pi]`.

pub mod angle;

pub use angle::*;
