//! State estimation for the clockphase tracker
//!
//! - [`kalman`]: 2-state linear filter over arm angle and arm angular rate
//! - [`belief`]: discretized circular Bayesian filter that resolves the
//!   two-fold geometric ambiguity in the inverse linkage mapping

pub mod belief;
pub mod kalman;

pub use belief::{BeliefFilter, BELIEF_BINS};
pub use kalman::{ArmEstimate, ArmStateFilter, NoiseModel};
