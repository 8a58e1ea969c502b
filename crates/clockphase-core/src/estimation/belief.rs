//! Circular belief filter
//!
//! A 360-bin discrete probability distribution over oscillator phase at 1
//! degree resolution. Each sample runs two passes:
//!
//! 1. act: shift the belief by the control-implied phase change and smear it
//!    with a Gaussian kernel. The convolution is one-directional; the
//!    mechanism only ever advances between samples, so a destination bin
//!    accumulates only from sources at or behind it.
//! 2. see: multiply the shifted belief by a Gaussian likelihood centered at
//!    each of the two branch candidates, then renormalize.
//!
//! The inverse geometry alone cannot say which candidate is physically
//! correct; over consecutive samples the candidate consistent with the
//! commanded motion keeps reinforcing the same region of the grid while the
//! other drifts against it, and the posterior mode settles on the true phase.

use std::f64::consts::PI;

use crate::config::KernelConfig;
use crate::math::wrap_angle;

/// Number of bins in the circular belief grid (1 degree resolution).
pub const BELIEF_BINS: usize = 360;

const BINS_PER_RAD: f64 = 180.0 / PI;

/// Precomputed Gaussian weighting taps.
#[derive(Debug, Clone)]
struct GaussianKernel {
    taps: Vec<f64>,
    /// Integer tap displacement offset (width / 2)
    half: i32,
}

impl GaussianKernel {
    fn from_config(cfg: &KernelConfig) -> Self {
        let center = (cfg.width / 2) as f64;
        let factor = 1.0 / (2.0 * PI * cfg.sigma * cfg.sigma);
        let taps = (0..cfg.width)
            .map(|i| {
                let d = i as f64 - center;
                (-(d * d) / (2.0 * cfg.sigma * cfg.sigma)).exp() * factor
            })
            .collect();
        Self {
            taps,
            half: (cfg.width / 2) as i32,
        }
    }
}

fn wrap_bin(index: i32) -> usize {
    index.rem_euclid(BELIEF_BINS as i32) as usize
}

/// Circular bin difference `a - b` in `[-180, 180)`.
fn bin_diff(a: i32, b: i32) -> i32 {
    let half = BELIEF_BINS as i32 / 2;
    let diff = a - b;
    if diff < -half {
        diff + BELIEF_BINS as i32
    } else if diff >= half {
        diff - BELIEF_BINS as i32
    } else {
        diff
    }
}

/// Split a fractional bin position into its floor bin and the interpolation
/// weights of the two adjacent bins.
fn split_bin(position: f64) -> (i32, f64, f64) {
    let low = position.floor();
    let high_weight = position - low;
    (low as i32, 1.0 - high_weight, high_weight)
}

/// Discretized circular Bayesian filter over oscillator phase.
#[derive(Debug, Clone)]
pub struct BeliefFilter {
    belief: [f64; BELIEF_BINS],
    post_act: [f64; BELIEF_BINS],
    act: GaussianKernel,
    see: GaussianKernel,
    peak: usize,
}

impl BeliefFilter {
    /// Kernel configs are assumed validated (see [`KernelConfig::validate`]).
    pub fn new(act: &KernelConfig, see: &KernelConfig) -> Self {
        Self {
            belief: [1.0 / BELIEF_BINS as f64; BELIEF_BINS],
            post_act: [0.0; BELIEF_BINS],
            act: GaussianKernel::from_config(act),
            see: GaussianKernel::from_config(see),
            peak: 0,
        }
    }

    /// Reset to the uniform distribution.
    pub fn reset(&mut self) {
        self.belief = [1.0 / BELIEF_BINS as f64; BELIEF_BINS];
        self.peak = 0;
    }

    /// Current posterior, one probability per degree bin.
    pub fn distribution(&self) -> &[f64; BELIEF_BINS] {
        &self.belief
    }

    /// Bin index of the posterior mode.
    pub fn peak_bin(&self) -> usize {
        self.peak
    }

    /// One act/see cycle. All arguments are radians; returns the posterior
    /// mode as a canonical angle.
    pub fn update(&mut self, control_phase_delta: f64, candidate0: f64, candidate1: f64) -> f64 {
        self.act_step(control_phase_delta * BINS_PER_RAD);
        self.see_step(candidate0 * BINS_PER_RAD, candidate1 * BINS_PER_RAD);
        wrap_angle(self.peak as f64 / BINS_PER_RAD)
    }

    /// Shift the belief forward by `shift` bins (fractional, interpolated
    /// between the two adjacent integer shifts) under the act kernel.
    fn act_step(&mut self, shift: f64) {
        let (offset, low_weight, high_weight) = split_bin(shift);
        for i in 0..BELIEF_BINS as i32 {
            let mut mass = 0.0;
            for (tap_index, &tap) in self.act.taps.iter().enumerate() {
                let displacement = tap_index as i32 - self.act.half;
                let source_low = wrap_bin(i - offset - displacement);
                let source_high = wrap_bin(i - offset - 1 - displacement);
                // Mass never moves backward.
                if bin_diff(i, source_low as i32) >= 0 {
                    mass += tap
                        * (self.belief[source_low] * low_weight
                            + self.belief[source_high] * high_weight);
                }
            }
            self.post_act[i as usize] = mass;
        }
    }

    /// Fold both candidate observations into the post-act belief and
    /// renormalize. A zero total mass means both observations fell entirely
    /// outside the predicted support; the belief restarts uniform.
    fn see_step(&mut self, candidate0: f64, candidate1: f64) {
        self.belief = [0.0; BELIEF_BINS];
        let mut total = 0.0;

        for &candidate in &[candidate0, candidate1] {
            let (offset, low_weight, high_weight) = split_bin(candidate);
            for (tap_index, &tap) in self.see.taps.iter().enumerate() {
                let displacement = tap_index as i32 - self.see.half;
                let low = wrap_bin(offset + displacement);
                let high = wrap_bin(offset + displacement + 1);
                let low_mass = tap * self.post_act[low] * low_weight;
                let high_mass = tap * self.post_act[high] * high_weight;
                self.belief[low] += low_mass;
                self.belief[high] += high_mass;
                total += low_mass + high_mass;
            }
        }

        if total == 0.0 {
            self.reset();
            return;
        }

        let mut peak = 0;
        let mut strongest = f64::NEG_INFINITY;
        for (i, value) in self.belief.iter_mut().enumerate() {
            *value /= total;
            if *value > strongest {
                strongest = *value;
                peak = i;
            }
        }
        self.peak = peak;
    }
}
