//! Simulated tracking demo
//!
//! Spins a synthetic linkage at a constant oscillator rate, runs the full
//! estimation pipeline over noisy samples, and prints a tracking summary.
//!
//! Run with: `cargo run --example track_sim`

use std::sync::Arc;

use clockphase_core::math::{angle_diff, wrap_angle};
use clockphase_core::{ControlModel, Geometry, GeometryConfig, PhaseTracker, TrackerConfig};
use clockphase_rig::sensor::SampleSource;
use clockphase_rig::sim::SyntheticLinkage;

fn main() {
    let geometry_cfg = GeometryConfig {
        lookup_len: 4096,
        scan_oversample: 10,
        ..Default::default()
    };
    let geometry = Arc::new(Geometry::build(geometry_cfg).expect("geometry build"));
    println!(
        "operating band: [{:.4}, {:.4}] rad",
        geometry.min_arm_angle(),
        geometry.max_arm_angle()
    );

    let cfg = TrackerConfig {
        control_model: ControlModel::ArmVelocity,
        ..Default::default()
    };
    let mut tracker = PhaseTracker::new(Arc::clone(&geometry), &cfg).expect("tracker config");

    let phase_rate = 1.0; // rad/s
    let sample_period = 0.005; // s
    let mut sim = SyntheticLinkage::new(Arc::clone(&geometry), phase_rate, sample_period, 1234)
        .with_noise(0.01, 0.02);

    let total = 4000;
    let mut time = 0.0;
    let mut processed = 0;
    let mut worst = 0.0f64;
    let mut sum = 0.0;

    while processed < total {
        let batch = sim.next_batch().expect("sim batch");
        for sample in &batch.samples {
            if processed == total {
                break;
            }
            time += batch.sample_period;
            let estimate = tracker.process(
                sample.raw_arm_angle(sim.mounting_offset()),
                sample.raw_arm_rate(),
                batch.sample_period,
                phase_rate,
            );
            let truth = wrap_angle(phase_rate * time);
            let error = angle_diff(estimate.phase, truth).abs();
            processed += 1;

            // Skip the initial transient in the statistics.
            if processed > 500 {
                sum += error;
                worst = worst.max(error);
            }
            if processed % 500 == 0 {
                println!(
                    "t = {time:6.2} s  phase = {:7.3}  truth = {:7.3}  error = {:6.3} rad",
                    estimate.phase, truth, error
                );
            }
        }
    }

    println!(
        "steady state over {} samples: mean error {:.4} rad, max error {:.4} rad",
        total - 500,
        sum / (total - 500) as f64,
        worst
    );
}
