//! Error types for construction-time failures
//!
//! Per-sample processing is infallible: numerical failure modes surface as
//! NaN, never as `Err`. Errors exist only where a tracker or lookup table is
//! built from configuration.

use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lookup table needs at least 2 bins, got {0}")]
    LookupTooShort(usize),
    #[error("{name} must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("scan oversample must be at least 1")]
    ZeroOversample,
    #[error("kernel width must be between 1 and {max}, got {width}")]
    BadKernelWidth { width: usize, max: usize },
}

/// Geometry lookup construction errors
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The forward scan produced no finite arm angle: the configured linkage
    /// constants do not describe a mechanism with a reachable tangent line.
    #[error("forward scan found no valid operating band")]
    EmptyOperatingBand,
}
