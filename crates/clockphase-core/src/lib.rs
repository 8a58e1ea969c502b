//! # clockphase-core
//!
//! Estimation core for a two-arm clock drive whose visible arm angle maps to
//! two geometrically valid oscillator phases. From noisy inertial measurements
//! the pipeline produces a single disambiguated phase estimate per sample.
//!
//! ## Modules
//!
//! - [`math`]: angle wrapping and canonicalization utilities
//! - [`geometry`]: tangent-circle linkage solver and inverse lookup tables
//! - [`estimation`]: arm-state Kalman filter and circular belief filter
//! - [`pipeline`]: the per-sample tracking pipeline ([`PhaseTracker`])
//! - [`config`]: serde-backed configuration with validation
//!
//! ## Pipeline
//!
//! ```text
//! raw sample ──► control term (geometry forward model)
//!            ──► Kalman filter ──► refined arm angle / rate
//!            ──► inverse lookup ──► two phase candidates
//!            ──► belief filter ──► disambiguated oscillator phase
//! ```

pub mod config;
pub mod error;
pub mod estimation;
pub mod geometry;
pub mod math;
pub mod pipeline;

use nalgebra::{Matrix2, Vector2};

/// 2D vector type used by the arm-state filter
pub type Vec2 = Vector2<f64>;

/// 2x2 matrix type used by the arm-state filter
pub type Mat2 = Matrix2<f64>;

pub use config::{GeometryConfig, KernelConfig, NoiseConfig, TrackerConfig};
pub use error::{ConfigError, GeometryError};
pub use geometry::{Branch, Geometry};
pub use pipeline::{ControlModel, PhaseEstimate, PhaseTracker};
