//! End-to-end tracking under sensor noise
//!
//! Drives the full pipeline with synthetic noisy batches at a constant
//! commanded oscillator rate and checks that the disambiguated phase settles
//! into a bounded error band after the initial transient.

use std::sync::Arc;

use clockphase_core::math::{angle_diff, wrap_angle};
use clockphase_core::{ControlModel, Geometry, GeometryConfig, PhaseTracker, TrackerConfig};
use clockphase_rig::sensor::SampleSource;
use clockphase_rig::sim::SyntheticLinkage;
use clockphase_rig::telemetry::{EstimateRecord, TelemetryLog};

fn build_geometry() -> Arc<Geometry> {
    let cfg = GeometryConfig {
        lookup_len: 4096,
        scan_oversample: 10,
        ..Default::default()
    };
    Arc::new(Geometry::build(cfg).unwrap())
}

/// Run `total` samples and return (mean, max) absolute phase error over the
/// trailing `window` samples.
fn run_tracking(model: ControlModel, seed: u64) -> (f64, f64) {
    let geometry = build_geometry();
    let cfg = TrackerConfig {
        control_model: model,
        ..Default::default()
    };
    let mut tracker = PhaseTracker::new(Arc::clone(&geometry), &cfg).unwrap();
    let mut sim =
        SyntheticLinkage::new(Arc::clone(&geometry), 1.0, 0.005, seed).with_noise(0.01, 0.02);

    let total = 3000;
    let window = 500;
    let mut log = TelemetryLog::new();
    let mut errors = Vec::with_capacity(total);
    let mut time = 0.0;

    let mut processed = 0;
    while processed < total {
        let batch = sim.next_batch().unwrap();
        for sample in &batch.samples {
            if processed == total {
                break;
            }
            time += batch.sample_period;
            let raw_angle = sample.raw_arm_angle(sim.mounting_offset());
            let raw_rate = sample.raw_arm_rate();
            let estimate = tracker.process(
                raw_angle,
                raw_rate,
                batch.sample_period,
                sim.phase_rate(),
            );
            log.push(EstimateRecord {
                time,
                raw_arm_angle: raw_angle,
                raw_arm_rate: raw_rate,
                arm_angle: tracker.arm_angle(),
                arm_rate: tracker.arm_rate(),
                phase: estimate.phase,
                candidates: estimate.candidates,
                arm_accel_log10: tracker.arm_accel_log10(),
            });
            // `time` mirrors the sim's per-sample clock, so the true phase
            // at this sample is just rate * time.
            let truth = wrap_angle(sim.phase_rate() * time);
            errors.push(angle_diff(estimate.phase, truth).abs());
            processed += 1;
        }
    }

    let tail = &errors[total - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    let max = tail.iter().cloned().fold(0.0, f64::max);

    // Telemetry sanity: every sample produced a record and the measured
    // operating band is inside the geometric one.
    assert_eq!(log.len(), total);
    assert!(log.min_arm_angle().unwrap() >= geometry.min_arm_angle() - 0.1);
    assert!(log.max_arm_angle().unwrap() <= geometry.max_arm_angle() + 0.1);

    (mean, max)
}

#[test]
fn velocity_model_tracks_through_noise() {
    let (mean, max) = run_tracking(ControlModel::ArmVelocity, 11);
    assert!(mean < 0.1, "trailing mean error {mean}");
    assert!(max < 0.4, "trailing max error {max}");
}

#[test]
fn acceleration_model_tracks_through_noise() {
    let (mean, max) = run_tracking(ControlModel::ArmAcceleration, 23);
    assert!(mean < 0.1, "trailing mean error {mean}");
    assert!(max < 0.4, "trailing max error {max}");
}
