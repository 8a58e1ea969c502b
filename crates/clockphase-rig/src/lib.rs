//! # clockphase-rig
//!
//! Collaborator interfaces and test rig around `clockphase-core`:
//!
//! - [`sensor`]: calibrated inertial sample types and the upstream driver
//!   contract (batches at a known sample period, chronological order)
//! - [`motor`]: the downstream actuation contract (scalar power in [-1, 1])
//! - [`telemetry`]: per-sample estimate records with a drain-on-read log
//! - [`sim`]: deterministic synthetic linkage for tests and demos
//!
//! The real hardware drivers (IMU bring-up, PWM, display) live outside this
//! workspace; this crate pins down only the shapes they must satisfy.

pub mod motor;
pub mod sensor;
pub mod sim;
pub mod telemetry;

pub use motor::{MotorDrive, PowerLevel};
pub use sensor::{InertialSample, SampleBatch, SampleSource};
pub use sim::SyntheticLinkage;
pub use telemetry::{EstimateRecord, SharedTelemetry, TelemetryLog};
